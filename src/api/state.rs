//! Application state for shared services

use std::sync::Arc;

use crate::domain::{TokenVerifier, UserRepository};
use crate::infrastructure::auth::AuthService;

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    /// Verifies bearer tokens for protected routes
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// Probed by the readiness check
    pub user_repository: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        token_verifier: Arc<dyn TokenVerifier>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            auth_service,
            token_verifier,
            user_repository,
        }
    }
}
