//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: infrastructure wiring (which product store backs the API)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: response envelopes and error mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use catalog_infra::AppConfig;

use crate::middleware;

pub mod errors;
pub mod payload;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Versioned prefix every resource route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices, config: &AppConfig) -> anyhow::Result<Router> {
    let cors = middleware::cors_layer(&config.cors_origin)?;

    let api = routes::router().layer(Extension(Arc::new(services)));

    let app = Router::new()
        .route("/health", get(routes::system::health))
        .nest(API_PREFIX, api);

    Ok(middleware::apply(app, cors))
}
