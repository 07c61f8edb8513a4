//! Dashboard configuration.
//!
//! Configuration contains:
//! - Risk ratio parameters (risk-free rate, trading days per year)
//! - Price fetch timeout, fallback policy and last-good cache bounds
//!
//! Configuration does NOT contain:
//! - Data file locations (owned by whoever builds the dashboard)
//! - Slicer domains (fixed by the dimension types)

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a failed or timed-out price fetch degrades to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Serve the last good history for the same request, else empty.
    #[default]
    LastGood,
    /// Always serve an empty history.
    Empty,
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Annual risk-free rate used in the Sharpe-like ratio
    #[serde(default = "default_risk_free_rate")]
    pub annual_risk_free_rate: f64,

    /// Trading days used to de-annualise the risk-free rate
    #[serde(default = "default_trading_days")]
    pub trading_days_per_year: u32,

    /// Upper bound on one price fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Behaviour when a price fetch fails
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Age after which a cached price history is dropped, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Most price requests kept in the last-good cache
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
}

fn default_risk_free_rate() -> f64 {
    0.01
}

fn default_trading_days() -> u32 {
    250
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    256
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            annual_risk_free_rate: default_risk_free_rate(),
            trading_days_per_year: default_trading_days(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fallback: FallbackPolicy::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

impl DashboardConfig {
    /// Fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Last-good cache entry lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Daily risk-free rate, `(1 + annual)^(1 / days) - 1`.
    pub fn daily_risk_free_rate(&self) -> f64 {
        (1.0 + self.annual_risk_free_rate).powf(1.0 / f64::from(self.trading_days_per_year)) - 1.0
    }
}
