//! Identifier types used across the data sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange ticker symbol, normalised to upper case.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticker(pub String);

impl Ticker {
    /// Create a new ticker. Surrounding whitespace is dropped and the symbol upper-cased.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_ascii_uppercase())
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a comma separated ticker list, skipping blanks and repeats.
    pub fn parse_list(list: &str) -> Vec<Ticker> {
        let mut tickers: Vec<Ticker> = Vec::new();
        for symbol in list.split(',').filter(|s| !s.trim().is_empty()) {
            let ticker = Ticker::new(symbol);
            if !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
        tickers
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
