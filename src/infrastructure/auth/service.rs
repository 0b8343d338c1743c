//! Authentication workflow: sign-up, sign-in and current-identity resolution

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::user::{NewUser, RepositoryError, User, UserProfile, UserRepository};
use crate::domain::{AuthenticatedIdentity, DomainError, IssuedToken, TokenIssuer};
use crate::infrastructure::observability::record_auth_outcome;
use crate::infrastructure::user::{PasswordHasher, PasswordVerification};

/// Input for sign-up. Fields are already checked for presence.
#[derive(Clone)]
pub struct SignUpCommand {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for SignUpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpCommand")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Successful sign-in
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub token: IssuedToken,
    pub user: UserProfile,
}

/// Authentication workflow over a user store, a password hasher and a token issuer
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
    token_duration: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("issuer", &self.issuer)
            .field("token_duration", &self.token_duration)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
        token_duration: Duration,
    ) -> Self {
        Self {
            repository,
            hasher,
            issuer,
            token_duration,
        }
    }

    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// Register a user and return its public projection.
    ///
    /// A taken email is `Conflict`; nothing is written in that case.
    pub async fn sign_up(&self, command: SignUpCommand) -> Result<UserProfile, DomainError> {
        let result = self.register(command).await;
        record_auth_outcome("sign_up", result.as_ref().err().map(DomainError::outcome));
        result
    }

    /// Check credentials and issue a bearer token for the email.
    ///
    /// Unknown email is `NotFound`, wrong password is `Unauthorized`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResult, DomainError> {
        let result = self.authenticate(email, password).await;
        record_auth_outcome("sign_in", result.as_ref().err().map(DomainError::outcome));
        result
    }

    /// Resolve the profile behind a verified token subject
    pub async fn current_user(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<UserProfile, DomainError> {
        let result = self
            .find_user(identity.subject(), "current_user")
            .await
            .map(|user| user.profile());
        record_auth_outcome("current_user", result.as_ref().err().map(DomainError::outcome));
        result
    }

    async fn register(&self, command: SignUpCommand) -> Result<UserProfile, DomainError> {
        let password_hash = self.hasher.hash(&command.password).inspect_err(|e| {
            error!(error = %e, "Failed to hash password during sign-up");
        })?;

        let new_user = NewUser {
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
        };

        match self.repository.create(new_user).await {
            Ok(user) => {
                info!(user_id = %user.id(), "User signed up");
                Ok(user.profile())
            }
            Err(e @ RepositoryError::UniqueViolation { .. }) => {
                warn!(error = %e, "Sign-up rejected: email already registered");
                Err(e.into())
            }
            Err(e) => {
                error!(error = %e, "Failed to create user");
                Err(e.into())
            }
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<SignInResult, DomainError> {
        let user = self.find_user(email, "sign_in").await?;

        let verification = self
            .hasher
            .verify(password, user.password_hash())
            .inspect_err(|e| {
                error!(user_id = %user.id(), error = %e, "Failed to verify password");
            })?;

        if verification == PasswordVerification::Mismatch {
            warn!(user_id = %user.id(), "Sign-in rejected: invalid password");
            return Err(DomainError::unauthorized("Invalid password"));
        }

        let token = self
            .issuer
            .issue(email, self.token_duration)
            .inspect_err(|e| {
                error!(user_id = %user.id(), error = %e, "Failed to issue access token");
            })?;

        info!(user_id = %user.id(), "User signed in");

        Ok(SignInResult {
            token,
            user: user.profile(),
        })
    }

    async fn find_user(&self, email: &str, operation: &'static str) -> Result<User, DomainError> {
        self.repository.get_by_email(email).await.map_err(|e| {
            match &e {
                RepositoryError::NotFound => warn!(operation, "No user for email"),
                _ => error!(operation, error = %e, "Failed to look up user"),
            }
            e.into()
        })
    }
}
