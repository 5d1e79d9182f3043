//! Headline sentiment scoring and daily aggregation.
//!
//! Scoring goes through the `SentimentScorer` trait so the analysis layer
//! never depends on a particular lexicon. The default implementation wraps
//! the VADER compound score, which is tuned for short social/news text.
//!
//! Construction of `VaderScorer` owns its lexicon outright — there is no
//! one-time global download step and no ambient state; building a second
//! scorer is cheap and independent.

use crate::domain::{Article, DailySeries, ScoredArticle, SentimentCategory};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use vader_sentiment::SentimentIntensityAnalyzer;

/// A collaborator that assigns one scalar score in [-1, 1] per text.
pub trait SentimentScorer: Send + Sync {
    /// Short identifier recorded in reports ("vader", …).
    fn name(&self) -> &str;

    /// Compound sentiment score in [-1, 1].
    fn score(&self, text: &str) -> f64;
}

/// VADER-based scorer.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn name(&self) -> &str {
        "vader"
    }

    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

/// Score every article's headline.
pub fn score_articles(
    scorer: &dyn SentimentScorer,
    articles: Vec<Article>,
) -> Vec<ScoredArticle> {
    articles
        .into_iter()
        .map(|article| {
            let sentiment = scorer.score(&article.headline);
            ScoredArticle {
                sentiment,
                category: SentimentCategory::from_score(sentiment),
                article,
            }
        })
        .collect()
}

/// One day's aggregated sentiment.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySentiment {
    pub date: NaiveDate,
    /// Mean compound score over the day's articles.
    pub mean_score: f64,
    pub article_count: usize,
    /// Most frequent category; ties resolve negative < neutral < positive.
    pub modal_category: SentimentCategory,
}

/// Aggregate scored articles into per-day sentiment, ascending by date.
pub fn daily_sentiment(scored: &[ScoredArticle]) -> Vec<DailySentiment> {
    let mut by_date: BTreeMap<NaiveDate, (f64, usize, [usize; 3])> = BTreeMap::new();
    for s in scored {
        let entry = by_date
            .entry(s.article.market_date())
            .or_insert((0.0, 0, [0; 3]));
        entry.0 += s.sentiment;
        entry.1 += 1;
        let bucket = match s.category {
            SentimentCategory::Negative => 0,
            SentimentCategory::Neutral => 1,
            SentimentCategory::Positive => 2,
        };
        entry.2[bucket] += 1;
    }

    by_date
        .into_iter()
        .map(|(date, (sum, count, buckets))| {
            let modal = if buckets[0] >= buckets[1] && buckets[0] >= buckets[2] {
                SentimentCategory::Negative
            } else if buckets[1] >= buckets[2] {
                SentimentCategory::Neutral
            } else {
                SentimentCategory::Positive
            };
            DailySentiment {
                date,
                mean_score: sum / count as f64,
                article_count: count,
                modal_category: modal,
            }
        })
        .collect()
}

/// The daily mean-score series (the sentiment input to the lag sweep).
pub fn sentiment_series(scored: &[ScoredArticle]) -> DailySeries {
    DailySeries::from_pairs(
        daily_sentiment(scored)
            .into_iter()
            .map(|d| (d.date, d.mean_score)),
    )
}
