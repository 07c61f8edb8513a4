//! Market data source traits.
//!
//! - [`PriceSource`]: daily close-price history for a ticker list and date range
//!
//! Sources return a [`PriceHistory`], a close-price table indexed by trading
//! date with one column per requested ticker. Sources make no availability or
//! latency promises; callers bound every fetch with their own timeout.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TraitError;
use crate::ids::Ticker;
use vista_core::DateRange;

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (REST APIs)
    Snapshot,
    /// File-based (CSV)
    File,
    /// Manual entry or no source at all
    Manual,
}

/// Close prices of one ticker, aligned to [`PriceHistory::dates`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub ticker: Ticker,
    /// Close per trading date; `None` where the ticker did not trade
    pub closes: Vec<Option<f64>>,
}

/// Close-price table indexed by trading date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    dates: Vec<NaiveDate>,
    series: Vec<PriceSeries>,
}

impl PriceHistory {
    /// Create a table, checking dates ascend strictly and every column matches their length.
    pub fn new(dates: Vec<NaiveDate>, series: Vec<PriceSeries>) -> Result<Self, TraitError> {
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TraitError::InvalidInput(
                "price dates must be strictly ascending".into(),
            ));
        }
        if let Some(bad) = series.iter().find(|s| s.closes.len() != dates.len()) {
            return Err(TraitError::InvalidInput(format!(
                "{} has {} closes for {} dates",
                bad.ticker,
                bad.closes.len(),
                dates.len()
            )));
        }
        Ok(Self { dates, series })
    }

    /// Empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Outer-joins individual `(date, ticker, close)` observations into a table.
    ///
    /// Columns follow `tickers` order; a ticker without observations gets an
    /// all-missing column. Observations for tickers not in `tickers` are ignored.
    pub fn from_observations(
        tickers: &[Ticker],
        observations: impl IntoIterator<Item = (NaiveDate, Ticker, f64)>,
    ) -> Self {
        let mut by_ticker: BTreeMap<Ticker, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        let mut dates = BTreeSet::new();

        for (date, ticker, close) in observations {
            if !tickers.contains(&ticker) {
                continue;
            }
            dates.insert(date);
            by_ticker.entry(ticker).or_default().insert(date, close);
        }

        let dates: Vec<NaiveDate> = dates.into_iter().collect();
        let series = tickers
            .iter()
            .map(|ticker| {
                let observed = by_ticker.get(ticker);
                PriceSeries {
                    ticker: ticker.clone(),
                    closes: dates
                        .iter()
                        .map(|d| observed.and_then(|o| o.get(d).copied()))
                        .collect(),
                }
            })
            .collect();

        Self { dates, series }
    }

    /// Trading dates in ascending order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Ticker columns.
    pub fn series(&self) -> &[PriceSeries] {
        &self.series
    }

    /// Column for one ticker.
    pub fn get(&self, ticker: &Ticker) -> Option<&PriceSeries> {
        self.series.iter().find(|s| &s.ticker == ticker)
    }

    /// Returns true if there are no dates or no columns.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.series.is_empty()
    }
}

/// Trait for close-price history providers.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Daily closes for `tickers` over the closed interval `range`.
    async fn fetch_closes(
        &self,
        tickers: &[Ticker],
        range: DateRange,
    ) -> Result<PriceHistory, TraitError>;
}
