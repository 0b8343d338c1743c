//! Verified caller identity

/// Subject of a verified, unexpired bearer token
///
/// Only the token verification layer constructs this; the workflow treats it
/// as trusted and never re-checks the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    subject: String,
}

impl AuthenticatedIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// The email the token was issued for
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
