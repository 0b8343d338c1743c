//! Error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Outcome};

/// Error category carried in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    NotFoundError,
    ConflictError,
    ServerError,
}

impl From<Outcome> for ApiErrorType {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::BadRequest => Self::InvalidRequestError,
            Outcome::Unauthorized => Self::AuthenticationError,
            Outcome::NotFound => Self::NotFoundError,
            Outcome::Conflict => Self::ConflictError,
            Outcome::InternalError => Self::ServerError,
        }
    }
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body: `{"error": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    /// Numeric outcome code, equal to the HTTP status
    pub code: u16,
    /// Offending request field, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::BadRequest => StatusCode::BAD_REQUEST,
        Outcome::Unauthorized => StatusCode::UNAUTHORIZED,
        Outcome::Conflict => StatusCode::FORBIDDEN,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    /// Build an error for `outcome`.
    ///
    /// Internal errors always carry the opaque default message.
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        let message = match outcome {
            Outcome::InternalError => outcome.default_message().to_string(),
            _ => message.into(),
        };

        Self {
            status: status_for(outcome),
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message,
                    error_type: outcome.into(),
                    code: outcome.code(),
                    param: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Outcome::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(Outcome::Unauthorized, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::new(err.outcome(), err.public_message())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        match fields.first() {
            Some(field) => Self::bad_request(format!("Missing or empty field '{}'", field))
                .with_param(field.clone()),
            None => Self::bad_request("Invalid request"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1))]
        email: String,
        #[validate(length(min = 1))]
        password: String,
    }

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Invalid body");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.message, "Invalid body");
        assert_eq!(err.response.error.code, 400);
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("User not found"), StatusCode::NOT_FOUND, ApiErrorType::NotFoundError),
            (DomainError::unauthorized("Invalid password"), StatusCode::UNAUTHORIZED, ApiErrorType::AuthenticationError),
            (DomainError::conflict("Email address already exists"), StatusCode::FORBIDDEN, ApiErrorType::ConflictError),
            (DomainError::storage("db down"), StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError),
        ];

        for (domain_err, status, error_type) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
            assert_eq!(api_err.response.error.error_type, error_type);
            assert_eq!(api_err.response.error.code, status.as_u16());
        }
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let api_err: ApiError =
            DomainError::storage("dial tcp 10.0.0.5:5432: connection refused").into();

        assert_eq!(api_err.response.error.message, "Internal server error");

        let direct = ApiError::new(Outcome::InternalError, "argon2: bad params");
        assert_eq!(direct.response.error.message, "Internal server error");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::bad_request("Missing or empty field 'email'").with_param("email");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert_eq!(json["error"]["code"], 400);
        assert_eq!(json["error"]["param"], "email");
    }

    #[test]
    fn test_param_omitted_when_absent() {
        let err = ApiError::unauthorized("Invalid password");
        let json = serde_json::to_value(&err.response).unwrap();

        assert!(json["error"].get("param").is_none());
    }

    #[test]
    fn test_validation_errors_name_field() {
        let form = Form {
            email: String::new(),
            password: String::new(),
        };

        let err: ApiError = form.validate().unwrap_err().into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("email"));
    }
}
