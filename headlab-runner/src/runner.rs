//! Single-run orchestration: news in, impact report out.
//!
//! This is the entry point the CLI uses. Everything below it is a pure
//! function of its inputs; this layer wires ingestion, scoring, price
//! loading, and the lag sweep together and stamps the report with
//! provenance.

use std::sync::Arc;

use headlab_core::data::{CircuitBreaker, MarketDataProvider, PriceCache, YahooProvider};
use headlab_core::domain::Article;
use headlab_core::ingest::{read_articles, DatePolicy};
use headlab_core::text::{score_articles, sentiment_series, SentimentScorer, VaderScorer};
use thiserror::Error;

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::{load_prices, LoadError, LoadOptions};
use crate::impact::ImpactSweep;
use crate::report::{ImpactReport, SCHEMA_VERSION};

/// Errors from a full analysis run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("news ingestion failed: {0}")]
    Ingest(#[from] headlab_core::ingest::IngestError),

    #[error("no articles for symbol '{symbol}' in the requested date range")]
    NoArticles { symbol: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("data error: {0}")]
    Data(#[from] headlab_core::data::DataError),
}

/// Run a sentiment-impact analysis end to end with the default VADER scorer
/// and the Yahoo provider (unless offline).
pub fn run_impact_analysis(config: &AnalysisConfig) -> Result<ImpactReport, RunError> {
    config.validate()?;

    let scorer = VaderScorer::new();
    let cache = PriceCache::new(&config.cache_dir);

    let provider: Option<Box<dyn MarketDataProvider>> = if config.offline {
        None
    } else {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        Some(Box::new(YahooProvider::new(breaker)?))
    };

    run_impact_analysis_with(config, &scorer, &cache, provider.as_deref())
}

/// Same as [`run_impact_analysis`], with the collaborators injected
/// (tests pass a stub scorer and provider).
pub fn run_impact_analysis_with(
    config: &AnalysisConfig,
    scorer: &dyn SentimentScorer,
    cache: &PriceCache,
    provider: Option<&dyn MarketDataProvider>,
) -> Result<ImpactReport, RunError> {
    config.validate()?;

    // Ingest, keeping only this symbol inside the date range. Unparseable
    // dates in other rows should not kill the run, so drop-and-count.
    let ingested = read_articles(&config.news_csv, DatePolicy::DropUnparseable)?;
    if ingested.dropped > 0 {
        eprintln!(
            "WARNING: dropped {} news rows with unparseable dates",
            ingested.dropped
        );
    }
    let articles: Vec<Article> = ingested
        .articles
        .into_iter()
        .filter(|a| {
            a.symbol == config.symbol
                && a.market_date() >= config.start_date
                && a.market_date() <= config.end_date
        })
        .collect();
    if articles.is_empty() {
        return Err(RunError::NoArticles {
            symbol: config.symbol.clone(),
        });
    }
    let article_count = articles.len();

    let scored = score_articles(scorer, articles);
    let sentiment = sentiment_series(&scored);

    let prices = load_prices(
        &config.symbol,
        cache,
        provider,
        &LoadOptions {
            start: config.start_date,
            end: config.end_date,
            offline: config.offline,
            synthetic: config.synthetic,
            force: false,
        },
    )?;

    let rows = ImpactSweep::new().sweep(&sentiment, &prices.returns, &config.lags);

    Ok(ImpactReport {
        schema_version: SCHEMA_VERSION,
        symbol: config.symbol.clone(),
        start_date: config.start_date,
        end_date: config.end_date,
        sentiment_source: scorer.name().to_string(),
        price_source: prices.source,
        dataset_hash: prices.dataset_hash,
        article_count,
        rows,
        generated_at: chrono::Local::now().naive_local(),
    })
}
