//! Reference data source traits.
//!
//! - [`TickerReferenceSource`]: symbols offered in the ticker selector and their names
//!
//! Reference data is static for the lifetime of the process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TraitError;
use crate::ids::Ticker;

/// A selectable ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    /// Ticker symbol
    pub symbol: Ticker,
    /// Company or fund name
    pub name: String,
}

/// Trait for ticker reference data.
#[async_trait]
pub trait TickerReferenceSource: Send + Sync {
    /// All tickers, in source order.
    async fn list(&self) -> Result<Vec<TickerInfo>, TraitError>;

    /// Look up one ticker.
    async fn get(&self, symbol: &Ticker) -> Result<Option<TickerInfo>, TraitError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|info| &info.symbol == symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl TickerReferenceSource for Fixed {
        async fn list(&self) -> Result<Vec<TickerInfo>, TraitError> {
            Ok(vec![TickerInfo {
                symbol: Ticker::new("MSFT"),
                name: "Microsoft Corporation".into(),
            }])
        }
    }

    #[tokio::test]
    async fn test_default_get_searches_list() {
        let source = Fixed;
        let found = source.get(&Ticker::new("msft")).await.unwrap();
        assert_eq!(found.unwrap().name, "Microsoft Corporation");
        assert!(source.get(&Ticker::new("AAPL")).await.unwrap().is_none());
    }
}
