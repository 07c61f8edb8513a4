//! The dashboard: datasets, sources and the recompute entry points.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use vista_core::{AlmBasis, DateRange, FactKind, FactRow, FactTable, PortfolioBasis, Selection};
use vista_traits::reference_data::TickerInfo;
use vista_traits::{DataProvider, Ticker};

use crate::assembler::{assemble_alm, assemble_kpis, assemble_returns, assemble_waterfall};
use crate::baseline::{element_values, BaselineSnapshot};
use crate::chart::ChartSpec;
use crate::config::DashboardConfig;
use crate::error::EngineError;
use crate::filter::{filter, FactFilter};
use crate::prices::{DataStatus, PriceFetcher};
use crate::transform::{format_ratio, risk_metrics, signed_waterfall, RiskMetrics};

/// Return-on-capital page content for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocView {
    /// Year slider label.
    pub year_header: String,
    /// Waterfall chart.
    pub waterfall: ChartSpec,
    /// One indicator card per waterfall element; empty when `kpi_error` is set.
    pub kpis: Vec<ChartSpec>,
    /// Why the KPI cards could not be built. The waterfall is unaffected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi_error: Option<String>,
}

/// Ticker-returns request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnsRequest {
    /// Tickers to chart, in trace order.
    pub tickers: Vec<Ticker>,
    /// Closed date interval.
    pub range: DateRange,
    /// Whether to overlay running-peak lines.
    pub drawdown: bool,
}

/// Risk figures of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerMetrics {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Reference name, the symbol when unknown.
    pub name: String,
    /// Raw figures; NaN serializes as null.
    pub metrics: RiskMetrics,
    /// Ratio text, `"N/A"` when undefined.
    pub sharpe_display: String,
}

/// Ticker-returns page content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnsView {
    /// Rebased price chart.
    pub chart: ChartSpec,
    /// Per-ticker risk figures, in request order.
    pub metrics: Vec<TickerMetrics>,
    /// Provenance of the price data.
    pub status: DataStatus,
}

/// Read-only datasets plus the sources and settings the views draw from.
///
/// Scenario views are synchronous and pure; only ticker views touch a source.
pub struct Dashboard {
    waterfall: Arc<FactTable>,
    alm: Arc<FactTable>,
    provider: DataProvider,
    fetcher: PriceFetcher,
    config: DashboardConfig,
}

impl Dashboard {
    pub(crate) fn new(
        waterfall: Arc<FactTable>,
        alm: Arc<FactTable>,
        provider: DataProvider,
        config: DashboardConfig,
    ) -> Self {
        let fetcher = PriceFetcher::new(
            provider.prices.clone(),
            config.fetch_timeout(),
            config.fallback,
        )
        .with_cache_limits(config.cache_ttl(), config.cache_max_entries);
        Self {
            waterfall,
            alm,
            provider,
            fetcher,
            config,
        }
    }

    /// Configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Dataset of the given kind.
    pub fn table(&self, kind: FactKind) -> &Arc<FactTable> {
        match kind {
            FactKind::Waterfall => &self.waterfall,
            FactKind::Alm => &self.alm,
        }
    }

    /// Waterfall chart, header and KPI cards for one selection.
    ///
    /// A KPI failure is reported in [`RocView::kpi_error`] and leaves the
    /// waterfall and header in place.
    #[instrument(skip(self), level = "debug")]
    pub fn return_on_capital(&self, selection: &Selection) -> RocView {
        let (kpis, kpi_error) = match self.kpis(selection) {
            Ok(kpis) => (kpis, None),
            Err(e) => {
                warn!(error = %e, "kpi cards unavailable");
                (Vec::new(), Some(e.to_string()))
            }
        };
        RocView {
            year_header: selection.year_header(),
            waterfall: self.waterfall(selection),
            kpis,
            kpi_error,
        }
    }

    /// Waterfall chart for one selection.
    pub fn waterfall(&self, selection: &Selection) -> ChartSpec {
        let values = element_values(&self.waterfall, selection);
        debug!(elements = values.len(), "waterfall rows");
        assemble_waterfall(&signed_waterfall(values))
    }

    /// KPI cards for one selection against the baseline.
    pub fn kpis(&self, selection: &Selection) -> Result<Vec<ChartSpec>, EngineError> {
        let live = element_values(&self.waterfall, selection);
        assemble_kpis(&live, &self.baseline())
    }

    /// Baseline snapshot, recomputed from the dataset on every call.
    pub fn baseline(&self) -> BaselineSnapshot {
        BaselineSnapshot::capture(&self.waterfall)
    }

    /// ALM scenario fan for one portfolio and basis.
    pub fn alm(&self, portfolio: PortfolioBasis, basis: AlmBasis) -> ChartSpec {
        assemble_alm(&self.alm, portfolio, basis)
    }

    /// Raw rows of one dataset matching `predicate`.
    pub fn facts(&self, kind: FactKind, predicate: &FactFilter) -> Vec<FactRow> {
        filter(self.table(kind), predicate).into_iter().copied().collect()
    }

    /// Ticker reference list.
    pub async fn tickers(&self) -> Result<Vec<TickerInfo>, EngineError> {
        Ok(self.provider.tickers.list().await?)
    }

    /// Rebased price chart and risk figures.
    ///
    /// Never fails on source errors; the returned status reports degraded data.
    #[instrument(skip(self, request), fields(tickers = request.tickers.len()))]
    pub async fn ticker_returns(&self, request: &ReturnsRequest) -> ReturnsView {
        let outcome = self.fetcher.fetch(&request.tickers, request.range).await;
        let labels = self.ticker_labels(&request.tickers).await;
        let daily_rf = self.config.daily_risk_free_rate();

        let metrics = request
            .tickers
            .iter()
            .map(|ticker| {
                let closes = outcome
                    .history
                    .get(ticker)
                    .map(|s| s.closes.as_slice())
                    .unwrap_or_default();
                let metrics = risk_metrics(closes, daily_rf);
                TickerMetrics {
                    ticker: ticker.clone(),
                    name: labels
                        .get(ticker)
                        .cloned()
                        .unwrap_or_else(|| ticker.to_string()),
                    sharpe_display: format_ratio(metrics.sharpe),
                    metrics,
                }
            })
            .collect();

        let mut chart = assemble_returns(&outcome.history, request.drawdown, &labels);
        if let DataStatus::Unavailable { reason } | DataStatus::Cached { reason, .. } =
            &outcome.status
        {
            chart = chart.with_note(format!("price data degraded: {reason}"));
        }

        ReturnsView {
            chart,
            metrics,
            status: outcome.status,
        }
    }

    /// Reference names of the requested tickers. Lookup failures leave names out.
    async fn ticker_labels(&self, tickers: &[Ticker]) -> BTreeMap<Ticker, String> {
        let mut labels = BTreeMap::new();
        for ticker in tickers {
            if let Ok(Some(info)) = self.provider.tickers.get(ticker).await {
                labels.insert(info.symbol, info.name);
            }
        }
        labels
    }
}
