//! Text processing: tokenization, text stats, sentiment scoring.

pub mod sentiment;
pub mod tokenize;

pub use sentiment::{
    daily_sentiment, score_articles, sentiment_series, DailySentiment, SentimentScorer,
    VaderScorer,
};
pub use tokenize::{
    analyze_text, is_stopword, token_frequencies, tokenize, tokenize_filtered, top_tokens,
    TextStats,
};
