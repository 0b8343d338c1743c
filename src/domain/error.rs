use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Collapse this error into the closed set of caller-visible outcomes
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::NotFound { .. } => Outcome::NotFound,
            Self::Unauthorized { .. } => Outcome::Unauthorized,
            Self::Conflict { .. } => Outcome::Conflict,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. } => {
                Outcome::InternalError
            }
        }
    }

    /// Message that is safe to hand to a caller.
    ///
    /// Infrastructure detail (driver errors, key material problems) stays in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Conflict { message } => message,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. } => {
                Outcome::InternalError.default_message()
            }
        }
    }
}

/// Caller-visible outcome of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    BadRequest,
    NotFound,
    Unauthorized,
    /// Duplicate email at sign-up; reported as 403 for wire compatibility
    Conflict,
    InternalError,
}

impl Outcome {
    /// Stable numeric code carried in every error response
    pub fn code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Conflict => 403,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Conflict => "conflict",
            Self::InternalError => "internal_error",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Invalid request",
            Self::NotFound => "User not found",
            Self::Unauthorized => "Invalid password",
            Self::Conflict => "Email address already exists",
            Self::InternalError => "Internal server error",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
