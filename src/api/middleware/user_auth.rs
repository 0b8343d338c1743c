//! Bearer token authentication for protected routes

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::AuthenticatedIdentity;

const AUTHENTICATION_REQUIRED: &str =
    "Authentication required. Provide a token via 'Authorization: Bearer <token>' header";

/// Extractor that requires a valid, unexpired bearer token.
///
/// Yields the token subject; the user record is resolved by the handler.
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating bearer token");

        let claims = state.token_verifier.verify(token)?;

        Ok(RequireIdentity(AuthenticatedIdentity::new(claims.sub)))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized(AUTHENTICATION_REQUIRED))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| ApiError::unauthorized(AUTHENTICATION_REQUIRED))?;

    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::unauthorized(AUTHENTICATION_REQUIRED));
    }

    Ok(token)
}
