//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, PasswordConfig,
    ServerConfig, StorageConfig, MIN_TOKEN_SECRET_LEN,
};
