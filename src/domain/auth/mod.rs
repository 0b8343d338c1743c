//! Authentication domain
//!
//! The trusted caller identity and the token capability the workflow issues
//! bearer tokens through.

mod identity;
mod token;

pub use identity::AuthenticatedIdentity;
pub use token::{IssuedToken, TokenClaims, TokenIssuer, TokenVerifier};
