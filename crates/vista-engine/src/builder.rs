//! Builder pattern for the dashboard.

use std::sync::Arc;

use vista_core::{FactKind, FactTable};
use vista_traits::DataProvider;

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::EngineError;

/// Builder for constructing a [`Dashboard`].
pub struct DashboardBuilder {
    config: Option<DashboardConfig>,
    waterfall: Option<Arc<FactTable>>,
    alm: Option<Arc<FactTable>>,
    provider: Option<DataProvider>,
}

impl DashboardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            waterfall: None,
            alm: None,
            provider: None,
        }
    }

    /// Set the dashboard configuration.
    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the waterfall dataset.
    pub fn with_waterfall(mut self, table: impl Into<Arc<FactTable>>) -> Self {
        self.waterfall = Some(table.into());
        self
    }

    /// Set the ALM dataset.
    pub fn with_alm(mut self, table: impl Into<Arc<FactTable>>) -> Self {
        self.alm = Some(table.into());
        self
    }

    /// Set the price and ticker sources.
    pub fn with_provider(mut self, provider: DataProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the dashboard. Datasets not set are empty.
    pub fn build(self) -> Result<Dashboard, EngineError> {
        let config = self.config.unwrap_or_default();
        if config.trading_days_per_year == 0 {
            return Err(EngineError::ConfigError(
                "trading_days_per_year must be positive".into(),
            ));
        }
        if config.fetch_timeout_secs == 0 {
            return Err(EngineError::ConfigError(
                "fetch_timeout_secs must be positive".into(),
            ));
        }

        let provider = self
            .provider
            .ok_or_else(|| EngineError::ConfigError("provider not configured".into()))?;

        let waterfall = checked(self.waterfall, FactKind::Waterfall)?;
        let alm = checked(self.alm, FactKind::Alm)?;

        Ok(Dashboard::new(waterfall, alm, provider, config))
    }
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn checked(table: Option<Arc<FactTable>>, kind: FactKind) -> Result<Arc<FactTable>, EngineError> {
    match table {
        None => Ok(Arc::new(FactTable::empty(kind))),
        Some(t) if t.kind() == kind => Ok(t),
        Some(t) => Err(EngineError::ConfigError(format!(
            "expected a {kind} table, got a {} table",
            t.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_ext_file::create_empty_provider;

    fn build_with(config: DashboardConfig) -> Result<Dashboard, EngineError> {
        DashboardBuilder::new()
            .with_config(config)
            .with_provider(create_empty_provider())
            .build()
    }

    #[test]
    fn test_defaults_build() {
        assert!(build_with(DashboardConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_fetch_timeout_rejected() {
        let config = DashboardConfig {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        match build_with(config) {
            Err(EngineError::ConfigError(msg)) => assert!(msg.contains("fetch_timeout_secs")),
            other => panic!("expected a config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zero_trading_days_rejected() {
        let config = DashboardConfig {
            trading_days_per_year: 0,
            ..Default::default()
        };
        assert!(matches!(build_with(config), Err(EngineError::ConfigError(_))));
    }
}
