//! Bounded price fetching with a last-good fallback.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vista_core::DateRange;
use vista_traits::market_data::{PriceHistory, PriceSource};
use vista_traits::Ticker;

use crate::config::FallbackPolicy;
use crate::filter::filter_dates;

/// Where the history in a [`FetchOutcome`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DataStatus {
    /// Fetched just now.
    Fresh,
    /// Fetch failed; serving the last good result for the same request.
    Cached {
        /// Why the fetch failed.
        reason: String,
        /// Age of the served result in seconds.
        age_secs: u64,
    },
    /// Fetch failed and nothing was cached; the history is empty.
    Unavailable {
        /// Why the fetch failed.
        reason: String,
    },
    /// No fetch was needed (no tickers or an empty range).
    Skipped,
}

impl DataStatus {
    /// Returns true unless the data came straight from the source.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Cached { .. } | Self::Unavailable { .. })
    }
}

/// Result of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Close prices, possibly empty.
    pub history: PriceHistory,
    /// Provenance.
    pub status: DataStatus,
}

type RequestKey = (Vec<Ticker>, DateRange);

struct CachedHistory {
    history: PriceHistory,
    fetched_at: Instant,
}

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;

/// Wraps a [`PriceSource`] with a timeout and a per-request last-good cache.
///
/// Never fails: errors and timeouts degrade to cached or empty data with a
/// status saying so. Cached entries expire after `cache_ttl` and at most
/// `cache_max_entries` requests are kept; the oldest goes first.
pub struct PriceFetcher {
    source: Arc<dyn PriceSource>,
    timeout: Duration,
    fallback: FallbackPolicy,
    cache_ttl: Duration,
    cache_max_entries: usize,
    last_good: DashMap<RequestKey, CachedHistory>,
}

impl PriceFetcher {
    /// Create a fetcher.
    pub fn new(source: Arc<dyn PriceSource>, timeout: Duration, fallback: FallbackPolicy) -> Self {
        Self {
            source,
            timeout,
            fallback,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            last_good: DashMap::new(),
        }
    }

    /// Bound the last-good cache by entry age and count.
    pub fn with_cache_limits(mut self, ttl: Duration, max_entries: usize) -> Self {
        self.cache_ttl = ttl;
        self.cache_max_entries = max_entries;
        self
    }

    /// Fetch closes for `tickers` over `range`.
    pub async fn fetch(&self, tickers: &[Ticker], range: DateRange) -> FetchOutcome {
        if tickers.is_empty() || range.is_empty() {
            return FetchOutcome {
                history: PriceHistory::empty(),
                status: DataStatus::Skipped,
            };
        }

        self.cleanup_stale();

        let key: RequestKey = (tickers.to_vec(), range);
        let result = tokio::time::timeout(self.timeout, self.source.fetch_closes(tickers, range)).await;

        let reason = match result {
            Ok(Ok(history)) => {
                let history = filter_dates(&history, range);
                debug!(tickers = tickers.len(), dates = history.dates().len(), "price fetch ok");
                self.remember(key, &history);
                return FetchOutcome {
                    history,
                    status: DataStatus::Fresh,
                };
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}s", self.timeout.as_secs()),
        };

        self.degrade(&key, reason)
    }

    fn remember(&self, key: RequestKey, history: &PriceHistory) {
        if self.cache_max_entries == 0 {
            return;
        }
        if !self.last_good.contains_key(&key) {
            while self.last_good.len() >= self.cache_max_entries {
                let oldest = self
                    .last_good
                    .iter()
                    .min_by_key(|entry| entry.value().fetched_at)
                    .map(|entry| entry.key().clone());
                match oldest {
                    Some(oldest) => {
                        self.last_good.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        self.last_good.insert(
            key,
            CachedHistory {
                history: history.clone(),
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop cached histories older than the cache lifetime.
    pub fn cleanup_stale(&self) {
        let ttl = self.cache_ttl;
        self.last_good
            .retain(|_, cached| cached.fetched_at.elapsed() <= ttl);
    }

    fn degrade(&self, key: &RequestKey, reason: String) -> FetchOutcome {
        if self.fallback == FallbackPolicy::LastGood {
            if let Some(cached) = self.last_good.get(key) {
                let age_secs = cached.fetched_at.elapsed().as_secs();
                warn!(%reason, age_secs, "price fetch failed, serving cached history");
                return FetchOutcome {
                    history: cached.history.clone(),
                    status: DataStatus::Cached { reason, age_secs },
                };
            }
        }

        warn!(%reason, "price fetch failed, no cached history");
        FetchOutcome {
            history: PriceHistory::empty(),
            status: DataStatus::Unavailable { reason },
        }
    }

    /// Number of cached requests.
    pub fn cached_requests(&self) -> usize {
        self.last_good.len()
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.last_good.clear();
    }
}
