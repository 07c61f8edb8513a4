//! File-based price history sources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use vista_core::DateRange;
use vista_traits::error::TraitError;
use vista_traits::ids::Ticker;
use vista_traits::market_data::*;

// =============================================================================
// CSV PRICE SOURCE
// =============================================================================

/// CSV record for daily closes.
#[derive(Debug, Deserialize)]
struct CloseRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Close")]
    close: Option<f64>,
}

/// CSV-based close-price source (`Date,Symbol,Close`) for offline use and tests.
pub struct CsvPriceSource {
    file_path: PathBuf,
    observations: Vec<(NaiveDate, Ticker, f64)>,
}

impl CsvPriceSource {
    /// Create a new CSV price source. A missing file gives an empty source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let file_path = file_path.as_ref().to_path_buf();
        let observations = Self::read(&file_path)?;
        Ok(Self {
            file_path,
            observations,
        })
    }

    fn read(file_path: &Path) -> Result<Vec<(NaiveDate, Ticker, f64)>, TraitError> {
        if !file_path.exists() {
            return Ok(Vec::new()); // Empty source
        }

        let mut reader =
            csv::Reader::from_path(file_path).map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut observations = Vec::new();
        for result in reader.deserialize() {
            let record: CloseRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            // Blank closes are non-trading days
            let Some(close) = record.close else {
                continue;
            };
            let date = vista_core::types::parse_date(&record.date)?;
            observations.push((date, Ticker::new(&record.symbol), close));
        }

        debug!(
            path = %file_path.display(),
            observations = observations.len(),
            "loaded price file"
        );
        Ok(observations)
    }

    /// Path the source was loaded from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    async fn fetch_closes(
        &self,
        tickers: &[Ticker],
        range: DateRange,
    ) -> Result<PriceHistory, TraitError> {
        Ok(PriceHistory::from_observations(
            tickers,
            self.observations
                .iter()
                .filter(|(date, _, _)| range.contains(*date))
                .cloned(),
        ))
    }
}

// =============================================================================
// EMPTY IMPLEMENTATIONS
// =============================================================================

/// Price source that never has data.
pub struct EmptyPriceSource;

#[async_trait]
impl PriceSource for EmptyPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    async fn fetch_closes(
        &self,
        _tickers: &[Ticker],
        _range: DateRange,
    ) -> Result<PriceHistory, TraitError> {
        Ok(PriceHistory::empty())
    }
}
