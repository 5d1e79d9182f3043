//! News article records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single news headline, timestamps already normalized to market-local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Headline text.
    pub headline: String,
    /// Publishing outlet.
    pub publisher: String,
    /// Ticker symbol the article covers.
    pub symbol: String,
    /// Source URL, when the dataset carries one.
    pub url: Option<String>,
    /// Publication time, America/New_York wall clock (zone stripped).
    pub published_at: NaiveDateTime,
}

impl Article {
    /// Market-local calendar date of publication (the daily join key).
    pub fn market_date(&self) -> chrono::NaiveDate {
        self.published_at.date()
    }
}

/// Coarse sentiment bucket for a scored headline.
///
/// Cut points follow the VADER convention with right-closed intervals:
/// (-1, -0.05] is negative, (-0.05, 0.05] is neutral, (0.05, 1] is
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    Negative,
    Neutral,
    Positive,
}

impl SentimentCategory {
    /// Bucket a compound score in [-1, 1].
    pub fn from_score(score: f64) -> Self {
        if score <= -0.05 {
            SentimentCategory::Negative
        } else if score > 0.05 {
            SentimentCategory::Positive
        } else {
            SentimentCategory::Neutral
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SentimentCategory::Negative => "negative",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Positive => "positive",
        };
        f.write_str(s)
    }
}

/// An article with its sentiment score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub article: Article,
    /// Compound sentiment score in [-1, 1].
    pub sentiment: f64,
    pub category: SentimentCategory,
}
