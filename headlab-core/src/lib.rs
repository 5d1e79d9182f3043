//! HeadLab Core — domain types, date normalization, market data, text and
//! sentiment.
//!
//! This crate contains everything below the analysis layer:
//! - Domain types (articles, daily series with shift/align operations)
//! - Timestamp normalization to America/New_York (`dates`)
//! - Market data pipeline: provider trait, Yahoo client, CSV cache,
//!   circuit breaker, returns (`data`)
//! - News CSV ingestion (`ingest`)
//! - Tokenization and VADER sentiment scoring (`text`)

pub mod data;
pub mod dates;
pub mod domain;
pub mod ingest;
pub mod text;
