//! News CSV ingestion.
//!
//! Reads a headline dataset (`headline, publisher, date, stock[, url]`,
//! extra columns ignored) into `Article`s, normalizing every timestamp to
//! market-local time. Unparseable dates are handled per `DatePolicy`: abort
//! with the row number, or drop the row and count it.

use crate::dates::{normalize_timestamp, DateParseError};
use crate::domain::Article;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// What to do with a row whose date cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    /// Fail the whole ingest on the first bad date.
    #[default]
    Strict,
    /// Skip bad rows, counting them in the report.
    DropUnparseable,
}

/// Errors from news ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open news file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed CSV at record {record}: {source}")]
    Csv { record: u64, source: csv::Error },

    #[error("row {row}: {source}")]
    Date { row: u64, source: DateParseError },
}

/// Result of an ingest: the kept articles plus how many rows were dropped.
#[derive(Debug)]
pub struct IngestReport {
    pub articles: Vec<Article>,
    /// Rows skipped under `DatePolicy::DropUnparseable`.
    pub dropped: usize,
}

#[derive(Debug, Deserialize)]
struct NewsRow {
    headline: String,
    publisher: String,
    date: String,
    stock: String,
    #[serde(default)]
    url: Option<String>,
}

/// Read articles from a news CSV file.
pub fn read_articles(path: &Path, policy: DatePolicy) -> Result<IngestReport, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_articles_from(csv::Reader::from_reader(file), policy)
}

/// Read articles from any CSV reader (tests feed in-memory data here).
pub fn read_articles_from<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
    policy: DatePolicy,
) -> Result<IngestReport, IngestError> {
    let mut articles = Vec::new();
    let mut dropped = 0usize;

    for (idx, record) in rdr.deserialize::<NewsRow>().enumerate() {
        // 1-based data row number, header excluded
        let row = idx as u64 + 1;
        let raw = record.map_err(|source| IngestError::Csv { record: row, source })?;

        let published_at = match normalize_timestamp(&raw.date) {
            Ok(dt) => dt,
            Err(source) => match policy {
                DatePolicy::Strict => return Err(IngestError::Date { row, source }),
                DatePolicy::DropUnparseable => {
                    dropped += 1;
                    continue;
                }
            },
        };

        articles.push(Article {
            headline: raw.headline,
            publisher: raw.publisher,
            symbol: raw.stock,
            url: raw.url,
            published_at,
        });
    }

    Ok(IngestReport { articles, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(data.as_bytes())
    }

    const GOOD: &str = "\
headline,publisher,date,stock
Tesla Stock Surges 10%,Reuters,2024-01-01 10:00:00-05:00,TSLA
Apple Reports Strong Earnings,Bloomberg,2024-01-01 11:00:00-05:00,AAPL
Microsoft Announces New Product,Reuters,2024-01-02 09:00:00-05:00,MSFT
";

    #[test]
    fn reads_well_formed_rows() {
        let report = read_articles_from(reader(GOOD), DatePolicy::Strict).unwrap();
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.articles[0].symbol, "TSLA");
        assert_eq!(report.articles[0].publisher, "Reuters");
        assert_eq!(
            report.articles[0].market_date(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn strict_policy_reports_the_row_number() {
        let data = "\
headline,publisher,date,stock
Good,Reuters,2024-01-01 10:00:00-05:00,TSLA
Bad,Reuters,definitely not a date,AAPL
";
        match read_articles_from(reader(data), DatePolicy::Strict) {
            Err(IngestError::Date { row, source }) => {
                assert_eq!(row, 2);
                assert_eq!(source.raw, "definitely not a date");
            }
            other => panic!("expected Date error, got {other:?}"),
        }
    }

    #[test]
    fn drop_policy_keeps_going() {
        let data = "\
headline,publisher,date,stock
Good,Reuters,2024-01-01 10:00:00-05:00,TSLA
Bad,Reuters,???,AAPL
Also good,Bloomberg,2024-01-02,MSFT
";
        let report = read_articles_from(reader(data), DatePolicy::DropUnparseable).unwrap();
        assert_eq!(report.articles.len(), 2);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = "\
,headline,publisher,date,stock,url
0,Tesla up,Reuters,2024-01-01,TSLA,https://example.com/a
";
        let report = read_articles_from(reader(data), DatePolicy::Strict).unwrap();
        assert_eq!(report.articles.len(), 1);
        assert_eq!(
            report.articles[0].url.as_deref(),
            Some("https://example.com/a")
        );
    }
}
