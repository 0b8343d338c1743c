//! Authentication API endpoints
//!
//! Sign-up, sign-in and current-user resolution under `/api/v1/auth`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::RequireIdentity;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::UserProfile;
use crate::infrastructure::auth::{SignInResult, SignUpCommand};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/current_user", get(current_user))
}

/// Sign-up request
#[derive(Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
}

impl From<SignUpRequest> for SignUpCommand {
    fn from(request: SignUpRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

/// Sign-in request
#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Sign-in response
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: UserProfile,
}

impl From<SignInResult> for SignInResponse {
    fn from(result: SignInResult) -> Self {
        Self {
            expires_at: result.token.expires_at(),
            access_token: result.token.token,
            user: result.user,
        }
    }
}

/// Register a new user
///
/// POST /api/v1/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    request.validate()?;

    let profile = state.auth_service.sign_up(request.into()).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Exchange credentials for an access token
///
/// POST /api/v1/auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    request.validate()?;

    let result = state
        .auth_service
        .sign_in(&request.email, &request.password)
        .await?;

    Ok(Json(result.into()))
}

/// Profile of the caller identified by the bearer token
///
/// GET /api/v1/auth/current_user
pub async fn current_user(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.auth_service.current_user(&identity).await?;

    Ok(Json(profile))
}
