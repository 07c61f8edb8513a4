//! # Vista Engine
//!
//! The reporting pipeline behind the Vista dashboard.
//!
//! This crate provides:
//! - [`FactFilter`]: exact-match selection over fact tables, date filtering of prices
//! - [`transform`]: signed waterfall, rebase-to-one, drawdown and risk ratios
//! - [`assembler`]: transformed series to [`ChartSpec`]s
//! - [`BaselineSnapshot`]: reference values for KPI deltas
//! - [`PriceFetcher`]: bounded price fetches with a last-good fallback
//! - [`Dashboard`]: owns the datasets and exposes one entry point per view
//!
//! ## Architecture
//!
//! ```text
//! Selection ─> FactFilter ─> transform ─> assembler ─> ChartSpec
//!                  │                          ▲
//!                  └─> BaselineSnapshot ──────┘ (KPI deltas)
//!
//! ReturnsRequest ─> PriceFetcher ─> rebase / drawdown / risk ─> ChartSpec
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let dashboard = DashboardBuilder::new()
//!     .with_waterfall(waterfall_table)
//!     .with_alm(alm_table)
//!     .with_provider(provider)
//!     .with_config(config)
//!     .build()?;
//!
//! let view = dashboard.return_on_capital(&Selection::default());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod baseline;
pub mod builder;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod prices;
pub mod transform;

// Re-exports
pub use baseline::{BaselineEntry, BaselineSnapshot};
pub use builder::DashboardBuilder;
pub use chart::{AxisValue, ChartSpec, Layout, Trace};
pub use config::{DashboardConfig, FallbackPolicy};
pub use dashboard::{Dashboard, ReturnsRequest, ReturnsView, RocView, TickerMetrics};
pub use error::EngineError;
pub use filter::{filter, filter_dates, FactFilter};
pub use prices::{DataStatus, FetchOutcome, PriceFetcher};
pub use transform::{Measure, RiskMetrics, WaterfallBar};
