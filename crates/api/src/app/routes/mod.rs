use axum::Router;

pub mod products;
pub mod system;

/// Router for every resource under the versioned prefix.
pub fn router() -> Router {
    Router::new().nest("/products", products::router())
}
