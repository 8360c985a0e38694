//! Configuration loading and representation.
//!
//! Everything comes from environment variables, optionally seeded from a
//! `.env` file in the working directory (or a parent). Variables already set
//! in the process environment take precedence over the file.
//!
//! | variable       | default                  |
//! |----------------|--------------------------|
//! | `DATABASE_URL` | unset (in-memory store)  |
//! | `PORT`         | `4000`                   |
//! | `CORS_ORIGIN`  | `http://localhost:3000`  |

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    /// Single origin allowed by CORS.
    pub cors_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Load the nearest `.env` file into the process environment.
///
/// Returns the file's path, or `None` when there is no readable file.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::Empty("DATABASE_URL"));
            }
            config.database_url = Some(url);
        }

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(origin) = lookup("CORS_ORIGIN") {
            if origin.trim().is_empty() {
                return Err(ConfigError::Empty("CORS_ORIGIN"));
            }
            config.cors_origin = origin;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 4000);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/catalog"),
            ("PORT", "8080"),
            ("CORS_ORIGIN", "https://shop.example"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/catalog"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, "https://shop.example");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));

        assert!(AppConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn dotenv_syntax_feeds_the_same_lookup() {
        let file = "# local overrides\nPORT=5050\nCORS_ORIGIN=\"http://localhost:5173\"\n";
        let pairs: HashMap<String, String> = dotenvy::from_read_iter(file.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        let config = AppConfig::from_lookup(|key| pairs.get(key).cloned()).unwrap();
        assert_eq!(config.port, 5050);
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn empty_database_url_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty("DATABASE_URL"));
    }
}
