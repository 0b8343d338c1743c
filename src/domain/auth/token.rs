//! Token issuance and verification capabilities

use std::fmt::Debug;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Claims carried by every bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (the user's email, verbatim)
    pub sub: String,
    /// Unique token id
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for `subject` that expire after `duration`
    pub fn new(subject: &str, duration: Duration) -> Result<Self, DomainError> {
        if duration.is_zero() {
            return Err(DomainError::internal("Token duration must be positive"));
        }

        let ttl = chrono::Duration::from_std(duration)
            .map_err(|e| DomainError::internal(format!("Token duration out of range: {}", e)))?;
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::internal("Token expiry overflows the clock"))?;

        Ok(Self {
            sub: subject.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A freshly signed token
#[derive(Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

impl IssuedToken {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }
}

impl Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[hidden]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Signs expiring tokens bound to a subject
///
/// Any failure (key unavailable, clock problems) is an infrastructure error;
/// callers issue once and never retry.
pub trait TokenIssuer: Send + Sync + Debug {
    fn issue(&self, subject: &str, duration: Duration) -> Result<IssuedToken, DomainError>;
}

/// Checks signature and expiry of a bearer token
pub trait TokenVerifier: Send + Sync + Debug {
    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError>;
}
