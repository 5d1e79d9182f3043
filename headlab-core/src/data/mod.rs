//! Market data: provider trait, Yahoo Finance client, cache, returns.

pub mod cache;
pub mod circuit_breaker;
pub mod provider;
pub mod returns;
pub mod yahoo;

pub use cache::{CacheMeta, PriceCache};
pub use circuit_breaker::CircuitBreaker;
pub use provider::{
    canonicalize_bars, ClosingBar, DataError, DataSource, FetchResult, MarketDataProvider,
};
pub use returns::daily_returns;
pub use yahoo::YahooProvider;
