//! Car rental user authentication service
//!
//! Sign-up, sign-in and current-identity resolution over HTTP, with Argon2
//! password hashing and signed bearer tokens.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{DomainError, TokenIssuer, TokenVerifier, UserRepository};
use infrastructure::{
    auth::{AuthService, JwksJwtService, JwtConfig, JwtService},
    storage::{connect_pool, run_migrations, StorageType},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository},
};
use tracing::info;

/// Create the application state from validated configuration
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let (issuer, verifier) = create_token_services(config)?;

    let hasher = Arc::new(Argon2Hasher::with_params(
        config.password.memory_cost_kib,
        config.password.time_cost,
        config.password.parallelism,
    )?);

    let repository = create_user_repository(config).await?;

    let auth_service = Arc::new(AuthService::new(
        repository.clone(),
        hasher,
        issuer,
        config.auth.access_token_duration(),
    ));

    Ok(AppState::new(auth_service, verifier, repository))
}

/// One signing service backs both capabilities; JWKS wins over the secret.
fn create_token_services(
    config: &AppConfig,
) -> Result<(Arc<dyn TokenIssuer>, Arc<dyn TokenVerifier>), DomainError> {
    match config.auth.jwks.as_deref() {
        Some(jwks) => {
            let service = Arc::new(JwksJwtService::from_jwks_json(jwks)?);
            info!(algorithm = ?service.algorithm(), "Using JWKS token signing");
            Ok((service.clone(), service))
        }
        None => {
            let service = Arc::new(JwtService::new(JwtConfig::new(
                config.auth.token_secret.clone(),
            )));
            info!("Using shared-secret token signing");
            Ok((service.clone(), service))
        }
    }
}

async fn create_user_repository(
    config: &AppConfig,
) -> Result<Arc<dyn UserRepository>, DomainError> {
    let backend = config.storage_type()?;
    info!("Storage backend: {:?}", backend);

    match backend {
        StorageType::InMemory => Ok(Arc::new(InMemoryUserRepository::new())),
        StorageType::Postgres => {
            let pool = connect_pool(&config.database).await?;

            if config.database.run_migrations {
                let applied = run_migrations(&pool).await?;
                info!(applied, "Database migrations complete");
            }

            Ok(Arc::new(PostgresUserRepository::new(pool)))
        }
    }
}
