//! # Vista Ext File
//!
//! File-based data sources for the Vista reporting pipeline.
//!
//! This crate provides the default implementations used for EOD loads, demos
//! and tests:
//! - CSV-based fact tables (ALM and waterfall scenario outputs)
//! - CSV-based ticker reference source
//! - CSV-based close-price history source
//!
//! For live prices, use `vista-ext-http`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod fact_data;
mod market_data;
mod reference_data;

pub use fact_data::*;
pub use market_data::*;
pub use reference_data::*;

use std::path::Path;
use std::sync::Arc;

use vista_traits::error::TraitError;
use vista_traits::DataProvider;

/// Create a provider reading tickers and prices from CSV files.
pub fn create_file_provider(
    tickers_csv: impl AsRef<Path>,
    prices_csv: impl AsRef<Path>,
) -> Result<DataProvider, TraitError> {
    Ok(DataProvider {
        prices: Arc::new(CsvPriceSource::new(prices_csv)?),
        tickers: Arc::new(CsvTickerReferenceSource::new(tickers_csv)?),
    })
}

/// Create a provider with no tickers and no prices (for testing/development).
pub fn create_empty_provider() -> DataProvider {
    DataProvider {
        prices: Arc::new(EmptyPriceSource),
        tickers: Arc::new(EmptyTickerReferenceSource),
    }
}
