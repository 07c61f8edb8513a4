//! # Vista Ext HTTP
//!
//! Remote price history for the Vista reporting pipeline.
//!
//! [`YahooPriceSource`] reads daily closes from a Yahoo-style
//! `/v8/finance/chart/{symbol}` endpoint, one request per ticker, issued
//! concurrently. Every request carries the client timeout; callers are still
//! expected to bound the whole fetch (see `vista-engine`'s price fetcher).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod yahoo;

pub use yahoo::*;
