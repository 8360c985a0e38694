//! Infrastructure layer: product storage backends and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError, load_dotenv};
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
