//! Temporal publication patterns.
//!
//! Pure aggregation over articles: when headlines get published, by day,
//! hour, weekday, and month. All times are market-local (the ingest layer
//! already normalized them).

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use headlab_core::domain::Article;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated publication-time statistics for a set of articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalProfile {
    /// Articles per market date.
    pub daily_counts: BTreeMap<NaiveDate, u64>,
    /// Articles per hour of day, index 0..24.
    pub hourly_counts: [u64; 24],
    /// Articles per weekday, Monday first.
    pub weekday_counts: [u64; 7],
    /// Articles per calendar month, keyed `YYYY-MM` so the profile
    /// serializes to JSON (tuple map keys do not).
    pub monthly_counts: BTreeMap<String, u64>,
    /// Distinct dates with at least one article.
    pub total_days: usize,
    /// Mean articles per active date.
    pub avg_daily: f64,
    /// Busiest date's article count.
    pub max_daily: u64,
    /// Hour of day with the most articles, None for an empty input.
    pub peak_hour: Option<u32>,
    /// Fraction of articles published on Saturday or Sunday.
    pub weekend_ratio: f64,
}

impl TemporalProfile {
    /// Compute the profile from articles. Order does not matter.
    pub fn compute(articles: &[Article]) -> Self {
        let mut daily_counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        let mut hourly_counts = [0u64; 24];
        let mut weekday_counts = [0u64; 7];
        let mut monthly_counts: BTreeMap<String, u64> = BTreeMap::new();
        let mut weekend = 0u64;

        for article in articles {
            let dt = article.published_at;
            let date = dt.date();
            *daily_counts.entry(date).or_insert(0) += 1;
            hourly_counts[dt.hour() as usize] += 1;
            weekday_counts[date.weekday().num_days_from_monday() as usize] += 1;
            *monthly_counts
                .entry(format!("{:04}-{:02}", date.year(), date.month()))
                .or_insert(0) += 1;
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                weekend += 1;
            }
        }

        let total = articles.len() as u64;
        let total_days = daily_counts.len();
        let avg_daily = if total_days > 0 {
            total as f64 / total_days as f64
        } else {
            0.0
        };
        let max_daily = daily_counts.values().copied().max().unwrap_or(0);
        let peak_hour = hourly_counts
            .iter()
            .enumerate()
            .max_by_key(|(_, &c)| c)
            .filter(|(_, &c)| c > 0)
            .map(|(h, _)| h as u32);
        let weekend_ratio = if total > 0 {
            weekend as f64 / total as f64
        } else {
            0.0
        };

        Self {
            daily_counts,
            hourly_counts,
            weekday_counts,
            monthly_counts,
            total_days,
            avg_daily,
            max_daily,
            peak_hour,
            weekend_ratio,
        }
    }
}
