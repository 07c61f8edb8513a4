//! Yahoo-style chart endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use vista_core::DateRange;
use vista_traits::error::TraitError;
use vista_traits::ids::Ticker;
use vista_traits::market_data::*;

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Price source backed by a Yahoo-style chart API.
pub struct YahooPriceSource {
    client: Client,
    base_url: String,
}

impl YahooPriceSource {
    /// Create a source against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TraitError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vista/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TraitError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a source against the public endpoint.
    pub fn public(timeout: Duration) -> Result<Self, TraitError> {
        Self::new(DEFAULT_BASE_URL, timeout)
    }

    async fn fetch_one(
        &self,
        ticker: &Ticker,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, Ticker, f64)>, TraitError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker.as_str());
        let (period1, period2) = period_bounds(range);

        debug!(%ticker, %url, period1, period2, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(map_request_error)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(TraitError::RateLimited),
            StatusCode::NOT_FOUND => return Err(TraitError::NotFound(ticker.to_string())),
            status if !status.is_success() => {
                return Err(TraitError::SourceNotAvailable(format!(
                    "{url} returned {status}"
                )))
            }
            _ => {}
        }

        let body = response.text().await.map_err(map_request_error)?;
        parse_chart(ticker, &body, range)
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::Snapshot
    }

    async fn fetch_closes(
        &self,
        tickers: &[Ticker],
        range: DateRange,
    ) -> Result<PriceHistory, TraitError> {
        let per_ticker = try_join_all(tickers.iter().map(|t| self.fetch_one(t, range))).await?;
        Ok(PriceHistory::from_observations(
            tickers,
            per_ticker.into_iter().flatten(),
        ))
    }
}

/// Unix-second bounds covering every day of the closed range.
fn period_bounds(range: DateRange) -> (i64, i64) {
    let start = range
        .start
        .and_hms_opt(0, 0, 0)
        .map_or(0, |dt| dt.and_utc().timestamp());
    let end = range
        .end
        .succ_opt()
        .unwrap_or(range.end)
        .and_hms_opt(0, 0, 0)
        .map_or(start, |dt| dt.and_utc().timestamp());
    (start, end)
}

fn map_request_error(e: reqwest::Error) -> TraitError {
    if e.is_timeout() {
        TraitError::Timeout
    } else if e.is_connect() {
        TraitError::ConnectionFailed(e.to_string())
    } else {
        TraitError::SourceNotAvailable(e.to_string())
    }
}

/// Decodes one chart response into in-range observations.
fn parse_chart(
    ticker: &Ticker,
    body: &str,
    range: DateRange,
) -> Result<Vec<(NaiveDate, Ticker, f64)>, TraitError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| TraitError::ParseError(e.to_string()))?;

    if let Some(error) = envelope.chart.error {
        return Err(TraitError::SourceNotAvailable(format!(
            "{}: {} {}",
            ticker, error.code, error.description
        )));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    Ok(result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            let close = close?;
            range
                .contains(date)
                .then(|| (date, ticker.clone(), close))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> DateRange {
        DateRange::parse("2021-01-04", "2021-01-06").unwrap()
    }

    #[test]
    fn test_parse_chart_skips_nulls() {
        // 2021-01-04, 2021-01-05, 2021-01-06 at 14:30 UTC
        let body = r#"{"chart":{"result":[{"timestamp":[1609770600,1609857000,1609943400],
            "indicators":{"quote":[{"close":[129.41,null,126.6]}]}}],"error":null}}"#;

        let rows = parse_chart(&Ticker::new("AAPL"), body, range()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, NaiveDate::from_ymd_opt(2021, 1, 4).unwrap());
        assert_eq!(rows[1].2, 126.6);
    }

    #[test]
    fn test_parse_chart_error_block() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        let err = parse_chart(&Ticker::new("NOPE"), body, range()).unwrap_err();
        assert!(matches!(err, TraitError::SourceNotAvailable(_)));
    }

    #[test]
    fn test_parse_chart_garbage() {
        let err = parse_chart(&Ticker::new("AAPL"), "<html>", range()).unwrap_err();
        assert!(matches!(err, TraitError::ParseError(_)));
    }

    #[test]
    fn test_period_bounds_cover_last_day() {
        let (start, end) = period_bounds(range());
        assert_eq!(start, 1609718400);
        assert_eq!(end, 1609977600);
    }
}
