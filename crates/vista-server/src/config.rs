//! Server configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vista_engine::DashboardConfig;

/// Configuration load error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which price source backs the ticker-returns view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceProvider {
    /// Offline closes from `prices_file`.
    #[default]
    File,
    /// Yahoo-style chart endpoint.
    Yahoo,
    /// No prices; every returns view is empty.
    None,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Waterfall scenario file
    #[serde(default = "default_waterfall_file")]
    pub waterfall_file: String,

    /// ALM scenario file
    #[serde(default = "default_alm_file")]
    pub alm_file: String,

    /// Ticker reference file
    #[serde(default = "default_tickers_file")]
    pub tickers_file: String,

    /// Offline close prices (used by the `file` provider)
    pub prices_file: Option<String>,

    /// Price source
    #[serde(default)]
    pub price_provider: PriceProvider,

    /// Base URL of the remote price endpoint
    pub price_base_url: Option<String>,

    /// Pipeline settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_waterfall_file() -> String {
    "./Data/Waterfall.csv".to_string()
}

fn default_alm_file() -> String {
    "./Data/ALM.csv".to_string()
}

fn default_tickers_file() -> String {
    "./Data/tickers.csv".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            waterfall_file: default_waterfall_file(),
            alm_file: default_alm_file(),
            tickers_file: default_tickers_file(),
            prices_file: None,
            price_provider: PriceProvider::default(),
            price_base_url: None,
            dashboard: DashboardConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_engine::FallbackPolicy;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.price_provider, PriceProvider::File);
        assert_eq!(config.dashboard.fetch_timeout_secs, 10);
    }

    #[test]
    fn test_full_toml() {
        let config = ServerConfig::from_toml(
            r#"
            host = "127.0.0.1"
            port = 9000
            waterfall_file = "w.csv"
            price_provider = "yahoo"
            price_base_url = "http://localhost:1234"

            [dashboard]
            annual_risk_free_rate = 0.02
            fetch_timeout_secs = 3
            fallback = "empty"
            cache_max_entries = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.waterfall_file, "w.csv");
        assert_eq!(config.alm_file, "./Data/ALM.csv");
        assert_eq!(config.price_provider, PriceProvider::Yahoo);
        assert_eq!(config.dashboard.fetch_timeout_secs, 3);
        assert_eq!(config.dashboard.fallback, FallbackPolicy::Empty);
        assert_eq!(config.dashboard.trading_days_per_year, 250);
        assert_eq!(config.dashboard.cache_max_entries, 32);
        assert_eq!(config.dashboard.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_bad_provider_is_parse_error() {
        assert!(matches!(
            ServerConfig::from_toml(r#"price_provider = "bloomberg""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServerConfig::from_file("/nonexistent/vista.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
