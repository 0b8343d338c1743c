//! Domain layer - Core entities, contracts and the error taxonomy

pub mod auth;
pub mod error;
pub mod user;

pub use auth::{AuthenticatedIdentity, IssuedToken, TokenClaims, TokenIssuer, TokenVerifier};
pub use error::{DomainError, Outcome};
pub use user::{NewUser, RepositoryError, User, UserId, UserProfile, UserRepository};
