//! Domain types: articles and daily series.

pub mod article;
pub mod series;

pub use article::{Article, ScoredArticle, SentimentCategory};
pub use series::DailySeries;
