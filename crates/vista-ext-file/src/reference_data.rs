//! File-based ticker reference data.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use vista_traits::error::TraitError;
use vista_traits::ids::Ticker;
use vista_traits::reference_data::*;

/// CSV record for tickers.
#[derive(Debug, Deserialize)]
struct TickerRecord {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Name")]
    name: String,
}

/// CSV-based ticker reference source (`Symbol,Name`).
pub struct CsvTickerReferenceSource {
    file_path: PathBuf,
    tickers: Vec<TickerInfo>,
}

impl CsvTickerReferenceSource {
    /// Create a new CSV ticker source. A missing file gives an empty list.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let mut source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            tickers: Vec::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload tickers from file.
    pub fn reload(&mut self) -> Result<(), TraitError> {
        self.tickers.clear();
        if !self.file_path.exists() {
            return Ok(()); // Empty source
        }

        let mut reader = csv::Reader::from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        for result in reader.deserialize() {
            let record: TickerRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let symbol = Ticker::new(&record.symbol);
            if symbol.as_str().is_empty() || self.tickers.iter().any(|t| t.symbol == symbol) {
                continue;
            }
            self.tickers.push(TickerInfo {
                symbol,
                name: record.name.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl TickerReferenceSource for CsvTickerReferenceSource {
    async fn list(&self) -> Result<Vec<TickerInfo>, TraitError> {
        Ok(self.tickers.clone())
    }

    async fn get(&self, symbol: &Ticker) -> Result<Option<TickerInfo>, TraitError> {
        Ok(self.tickers.iter().find(|t| &t.symbol == symbol).cloned())
    }
}

/// Empty ticker reference source.
pub struct EmptyTickerReferenceSource;

#[async_trait]
impl TickerReferenceSource for EmptyTickerReferenceSource {
    async fn list(&self) -> Result<Vec<TickerInfo>, TraitError> {
        Ok(vec![])
    }
}
