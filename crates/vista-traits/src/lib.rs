//! # Vista Traits
//!
//! Trait definitions for the data sources the Vista pipeline consumes.
//!
//! This crate contains ONLY trait definitions and the plain data types that
//! cross them. Implementations live in the extension crates
//! (`vista-ext-file`, `vista-ext-http`).
//!
//! ## Module Structure
//!
//! - [`market_data`]: Price history sources (remote or file-backed)
//! - [`reference_data`]: Ticker reference sources
//! - [`ids`]: Identifier newtypes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod market_data;
pub mod reference_data;

use std::sync::Arc;

// Re-export commonly used types
pub use error::TraitError;
pub use ids::*;

use market_data::PriceSource;
use reference_data::TickerReferenceSource;

/// Bundle of the external sources a dashboard reads from.
#[derive(Clone)]
pub struct DataProvider {
    /// Close-price history source.
    pub prices: Arc<dyn PriceSource>,
    /// Ticker reference source.
    pub tickers: Arc<dyn TickerReferenceSource>,
}
