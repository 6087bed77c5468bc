//! Market API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default        |
//! |-----------------------------|----------------|
//! | `MARKET_BIND_ADDR`          | `0.0.0.0`      |
//! | `MARKET_HTTP_PORT`          | `8080`         |
//! | `MARKET_DB_PATH`            | `./market.db`  |
//! | `MARKET_DB_MAX_CONNECTIONS` | `5`            |
//! | `MARKET_CORS_ALLOW_ANY`     | `false`        |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use market_db::DbConfig;

/// Market API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to listen on
    pub bind_addr: IpAddr,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size; must be at least 1
    pub db_max_connections: u32,

    /// Allow cross-origin requests from any origin (the client is served
    /// from a different port during development)
    pub cors_allow_any: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            bind_addr: var("MARKET_BIND_ADDR", "0.0.0.0")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MARKET_BIND_ADDR".to_string()))?,

            http_port: var("MARKET_HTTP_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MARKET_HTTP_PORT".to_string()))?,

            db_path: PathBuf::from(var("MARKET_DB_PATH", "./market.db")),

            db_max_connections: var("MARKET_DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MARKET_DB_MAX_CONNECTIONS".to_string()))?,

            cors_allow_any: var("MARKET_CORS_ALLOW_ANY", "false")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MARKET_CORS_ALLOW_ANY".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MARKET_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.db_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("MARKET_DB_PATH".to_string()));
        }

        Ok(config)
    }

    /// Socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }

    /// Pool settings for [`market_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("./market.db"));
        assert_eq!(config.db_max_connections, 5);
        assert!(!config.cors_allow_any);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MARKET_BIND_ADDR", "127.0.0.1"),
            ("MARKET_HTTP_PORT", "3000"),
            ("MARKET_DB_PATH", "/var/lib/market/market.db"),
            ("MARKET_DB_MAX_CONNECTIONS", "8"),
            ("MARKET_CORS_ALLOW_ANY", "true"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.cors_allow_any);
        assert_eq!(config.db_config().max_connections, 8);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("MARKET_HTTP_PORT", "eighty")]),
            Err(ConfigError::InvalidValue(key)) if key == "MARKET_HTTP_PORT"
        ));
        assert!(load(&[("MARKET_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("MARKET_CORS_ALLOW_ANY", "sometimes")]).is_err());
        assert!(load(&[("MARKET_BIND_ADDR", "not-an-ip")]).is_err());
    }
}
