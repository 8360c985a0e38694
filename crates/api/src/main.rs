use anyhow::Context;

use catalog_api::app::{self, services};
use catalog_infra::{AppConfig, load_dotenv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before tracing init so RUST_LOG from the file applies.
    let dotenv = load_dotenv();
    catalog_observability::init();
    if let Some(path) = dotenv {
        tracing::info!(path = %path.display(), "loaded environment file");
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = services::build_services(&config).await?;
    let app = app::build_app(services, &config)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
