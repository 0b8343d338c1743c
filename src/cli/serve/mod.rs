//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::{create_router, with_metrics};
use crate::config::AppConfig;
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};

/// Run the API server until Ctrl+C or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);

    let result = serve(&config).await;

    if let Err(e) = &result {
        error!(error = %e, "Server exited with an error");
    }

    // Flush exported spans on every exit path
    shutdown_tracing();

    result
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    let state = crate::create_app_state(config).await?;
    let metrics = init_metrics(&config.observability.metrics);
    let app = with_metrics(
        create_router(state),
        metrics,
        &config.observability.metrics.path,
    );

    let addr = build_socket_addr(config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 3000;

        assert_eq!(
            build_socket_addr(&config).unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_serve_returns_startup_errors() {
        let mut config = AppConfig::default();
        config.storage.backend = "memory".to_string();
        config.auth.token_secret = "too-short".to_string();

        let err = serve(&config).await.unwrap_err();
        assert!(err.to_string().contains("token_secret"));
    }

    #[tokio::test]
    async fn test_serve_rejects_unparseable_host() {
        let mut config = AppConfig::default();
        config.storage.backend = "memory".to_string();
        config.auth.token_secret = "0123456789abcdef0123456789abcdef".to_string();
        config.password.memory_cost_kib = 64;
        config.password.time_cost = 1;
        config.password.parallelism = 1;
        config.observability.metrics.enabled = false;
        config.server.host = "not-an-ip".to_string();

        assert!(serve(&config).await.is_err());
    }

    #[test]
    fn test_build_socket_addr_rejects_hostname() {
        let mut config = AppConfig::default();
        config.server.host = "localhost".to_string();

        assert!(build_socket_addr(&config).is_err());
    }
}
