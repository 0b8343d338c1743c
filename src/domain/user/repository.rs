//! User repository trait

use async_trait::async_trait;
use thiserror::Error;

use super::entity::{NewUser, User};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Typed failure from the user store
///
/// Backends translate their driver errors into these variants so callers never
/// inspect driver-specific codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("user not found")]
    NotFound,

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("storage failure: {message}")]
    Other { message: String },
}

impl RepositoryError {
    pub fn unique_violation(constraint: impl Into<String>) -> Self {
        Self::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => DomainError::not_found("User not found"),
            RepositoryError::UniqueViolation { .. } => {
                DomainError::conflict("Email address already exists")
            }
            RepositoryError::Other { message } => DomainError::storage(message),
        }
    }
}

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by email (the authentication subject)
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;

    /// Create a user; the store assigns the id and creation timestamp
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Cheap connectivity probe used by readiness checks
    async fn ping(&self) -> Result<(), RepositoryError>;
}
