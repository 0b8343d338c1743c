use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::StorageType;

/// Minimum length of the shared signing secret, in bytes
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which user store backs the service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `postgres` or `memory`
    pub backend: String,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Apply pending migrations when the server starts
    #[serde(default)]
    pub run_migrations: bool,
}

/// Token signing settings
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret, used when `jwks` is not set
    #[serde(default)]
    pub token_secret: String,
    /// JWKS JSON document holding the signing key
    pub jwks: Option<String>,
    #[serde(default = "default_access_token_duration_secs")]
    pub access_token_duration_secs: u64,
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_access_token_duration_secs() -> u64 {
    900
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "postgres".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[hidden]"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            jwks: None,
            access_token_duration_secs: default_access_token_duration_secs(),
        }
    }
}

impl AuthConfig {
    pub fn access_token_duration(&self) -> Duration {
        Duration::from_secs(self.access_token_duration_secs)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[hidden]")
            .field("jwks", &self.jwks.as_ref().map(|_| "[hidden]"))
            .field("access_token_duration_secs", &self.access_token_duration_secs)
            .finish()
    }
}

impl Default for PasswordConfig {
    // Argon2's recommended Argon2id costs
    fn default() -> Self {
        Self {
            memory_cost_kib: argon2::Params::DEFAULT_M_COST,
            time_cost: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl AppConfig {
    /// Load configuration from `config/default`, `config/local` and `APP__*`
    /// environment variables, in increasing precedence.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.auth.jwks.is_none() && self.auth.token_secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(DomainError::configuration(format!(
                "auth.token_secret must be at least {} bytes when auth.jwks is not set",
                MIN_TOKEN_SECRET_LEN
            )));
        }

        if self.auth.access_token_duration_secs == 0 {
            return Err(DomainError::configuration(
                "auth.access_token_duration_secs must be positive",
            ));
        }

        let backend = self.storage_type()?;

        if backend == StorageType::Postgres
            && self.database.url.as_deref().is_none_or(str::is_empty)
        {
            return Err(DomainError::configuration(
                "database.url is required when storage.backend is postgres",
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(DomainError::configuration(
                "database.min_connections must not exceed database.max_connections",
            ));
        }

        Ok(())
    }

    pub fn storage_type(&self) -> Result<StorageType, DomainError> {
        self.storage.backend.parse()
    }
}
