//! Publisher and stock coverage statistics.
//!
//! Who publishes, how often, and about which symbols — plus the mirror view
//! per symbol. All counts are exact aggregations over the article list;
//! nothing is sampled or estimated.

use chrono::NaiveDate;
use headlab_core::domain::Article;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Per-publisher coverage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherCoverage {
    pub total_publishers: usize,
    /// (publisher, article count), descending by count then name.
    pub publisher_counts: Vec<(String, u64)>,
    /// Mean articles per active date, keyed by publisher.
    pub avg_articles_per_day: BTreeMap<String, f64>,
    /// Top five symbols per publisher, descending by count then symbol.
    pub top_stocks: BTreeMap<String, Vec<(String, u64)>>,
}

impl PublisherCoverage {
    pub fn compute(articles: &[Article]) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        let mut active_days: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
        let mut stock_counts: HashMap<&str, HashMap<&str, u64>> = HashMap::new();

        for a in articles {
            *counts.entry(&a.publisher).or_insert(0) += 1;
            active_days
                .entry(&a.publisher)
                .or_default()
                .insert(a.market_date());
            *stock_counts
                .entry(&a.publisher)
                .or_default()
                .entry(&a.symbol)
                .or_insert(0) += 1;
        }

        let mut publisher_counts: Vec<(String, u64)> = counts
            .iter()
            .map(|(p, c)| (p.to_string(), *c))
            .collect();
        publisher_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let avg_articles_per_day = counts
            .iter()
            .map(|(p, c)| {
                let days = active_days[p].len().max(1) as f64;
                (p.to_string(), *c as f64 / days)
            })
            .collect();

        let top_stocks = stock_counts
            .into_iter()
            .map(|(publisher, stocks)| {
                (publisher.to_string(), top_n(stocks, 5))
            })
            .collect();

        Self {
            total_publishers: publisher_counts.len(),
            publisher_counts,
            avg_articles_per_day,
            top_stocks,
        }
    }
}

/// Per-symbol coverage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCoverage {
    pub total_symbols: usize,
    /// (symbol, article count), descending by count then symbol.
    pub stock_counts: Vec<(String, u64)>,
    /// Mean articles per active date, keyed by symbol.
    pub avg_daily_volume: BTreeMap<String, f64>,
    /// Distinct publishers covering each symbol.
    pub publisher_diversity: BTreeMap<String, usize>,
}

impl StockCoverage {
    pub fn compute(articles: &[Article]) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        let mut active_days: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
        let mut publishers: HashMap<&str, HashSet<&str>> = HashMap::new();

        for a in articles {
            *counts.entry(&a.symbol).or_insert(0) += 1;
            active_days
                .entry(&a.symbol)
                .or_default()
                .insert(a.market_date());
            publishers
                .entry(&a.symbol)
                .or_default()
                .insert(&a.publisher);
        }

        let mut stock_counts: Vec<(String, u64)> = counts
            .iter()
            .map(|(s, c)| (s.to_string(), *c))
            .collect();
        stock_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let avg_daily_volume = counts
            .iter()
            .map(|(s, c)| {
                let days = active_days[s].len().max(1) as f64;
                (s.to_string(), *c as f64 / days)
            })
            .collect();

        let publisher_diversity = publishers
            .into_iter()
            .map(|(s, set)| (s.to_string(), set.len()))
            .collect();

        Self {
            total_symbols: stock_counts.len(),
            stock_counts,
            avg_daily_volume,
            publisher_diversity,
        }
    }
}

/// Top `n` entries of a count map, descending by count then key.
fn top_n(counts: HashMap<&str, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(k, c)| (k.to_string(), c))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(publisher: &str, symbol: &str, date: &str) -> Article {
        Article {
            headline: "headline".into(),
            publisher: publisher.into(),
            symbol: symbol.into(),
            url: None,
            published_at: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("Reuters", "TSLA", "2024-01-01"),
            article("Bloomberg", "AAPL", "2024-01-01"),
            article("Reuters", "MSFT", "2024-01-02"),
        ]
    }

    #[test]
    fn publisher_counts_and_averages() {
        let cov = PublisherCoverage::compute(&sample());
        assert_eq!(cov.total_publishers, 2);
        assert_eq!(cov.publisher_counts[0], ("Reuters".to_string(), 2));
        assert_eq!(cov.publisher_counts[1], ("Bloomberg".to_string(), 1));
        // Reuters: 2 articles over 2 active days
        assert!((cov.avg_articles_per_day["Reuters"] - 1.0).abs() < 1e-12);
        let reuters_top = &cov.top_stocks["Reuters"];
        assert_eq!(reuters_top.len(), 2);
        assert!(reuters_top.iter().any(|(s, _)| s == "TSLA"));
    }

    #[test]
    fn stock_counts_and_diversity() {
        let cov = StockCoverage::compute(&sample());
        assert_eq!(cov.total_symbols, 3);
        assert!(cov.stock_counts.iter().any(|(s, c)| s == "TSLA" && *c == 1));
        assert_eq!(cov.publisher_diversity["TSLA"], 1);
        assert!((cov.avg_daily_volume["AAPL"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn top_stocks_is_capped_at_five() {
        let mut articles = Vec::new();
        for (i, sym) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            for _ in 0..=i {
                articles.push(article("Reuters", sym, "2024-01-01"));
            }
        }
        let cov = PublisherCoverage::compute(&articles);
        let top = &cov.top_stocks["Reuters"];
        assert_eq!(top.len(), 5);
        assert_eq!(top[0], ("G".to_string(), 7));
    }

    #[test]
    fn empty_input() {
        let cov = PublisherCoverage::compute(&[]);
        assert_eq!(cov.total_publishers, 0);
        let cov = StockCoverage::compute(&[]);
        assert_eq!(cov.total_symbols, 0);
    }
}
