//! Market-data provider trait and structured error types.
//!
//! The `MarketDataProvider` trait abstracts over price sources (Yahoo Finance,
//! the on-disk cache, synthetic data) so the analysis layer can swap
//! implementations and mock for tests. The cache layer sits above this trait;
//! providers don't know about the cache.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A daily closing-price observation for one symbol.
///
/// Only the close matters downstream (returns are close-to-close); volume is
/// kept because every source reports it and coverage diagnostics use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("no cached data for symbol '{symbol}' — run `headlab download {symbol}` first")]
    NoCachedData { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<ClosingBar>,
    pub source: DataSource,
}

/// Where price data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    Cache,
    Synthetic,
}

/// Trait for market-data providers.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closing bars for a symbol over an inclusive date range.
    ///
    /// The returned range may be a strict subset of what was asked for:
    /// weekends and holidays have no bars, and that is not an error.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// Whether the provider is currently usable (not rate-limited or blocked).
    fn is_available(&self) -> bool;
}

/// Canonicalize bars: sort ascending by date, duplicate dates keep the
/// first occurrence, non-finite closes are dropped.
pub fn canonicalize_bars(mut bars: Vec<ClosingBar>) -> Vec<ClosingBar> {
    bars.retain(|b| b.close.is_finite() && b.close > 0.0);
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> ClosingBar {
        ClosingBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close,
            volume: 1000,
        }
    }

    #[test]
    fn canonicalize_sorts_and_dedupes() {
        let bars = canonicalize_bars(vec![
            bar("2024-01-03", 102.0),
            bar("2024-01-02", 101.0),
            bar("2024-01-03", 999.0),
        ]);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].close, 102.0); // first occurrence kept
    }

    #[test]
    fn canonicalize_drops_bad_closes() {
        let bars = canonicalize_bars(vec![
            bar("2024-01-02", f64::NAN),
            bar("2024-01-03", -5.0),
            bar("2024-01-04", 100.0),
        ]);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 100.0);
    }
}
