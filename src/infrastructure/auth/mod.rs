//! Authentication infrastructure module
//!
//! JWT token services and the authentication workflow built on them.

mod jwt;
mod service;

pub use jwt::{JwksJwtService, JwtConfig, JwtService};
pub use service::{AuthService, SignInResult, SignUpCommand};
