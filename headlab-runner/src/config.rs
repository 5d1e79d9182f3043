//! Serializable analysis configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors (parse or validation).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("start_date {start} is after end_date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("lags must not be empty")]
    EmptyLags,

    #[error("offline and synthetic are mutually exclusive")]
    OfflineSyntheticConflict,
}

fn default_lags() -> Vec<usize> {
    crate::impact::DEFAULT_LAGS.to_vec()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Configuration for a sentiment-impact analysis run.
///
/// Captures everything needed to reproduce a run: the news input, the
/// symbol and date range, the lag grid, and the data resolution flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Ticker symbol whose returns are correlated against sentiment.
    pub symbol: String,

    /// Path to the news headline CSV.
    pub news_csv: PathBuf,

    /// Analysis start date (inclusive).
    pub start_date: NaiveDate,

    /// Analysis end date (inclusive).
    pub end_date: NaiveDate,

    /// Lag offsets to sweep, in report order.
    #[serde(default = "default_lags")]
    pub lags: Vec<usize>,

    /// Price cache directory.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Never make network requests.
    #[serde(default)]
    pub offline: bool,

    /// Fall back to synthetic prices when real data is unavailable.
    #[serde(default)]
    pub synthetic: bool,
}

impl AnalysisConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AnalysisConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.lags.is_empty() {
            return Err(ConfigError::EmptyLags);
        }
        if self.offline && self.synthetic {
            return Err(ConfigError::OfflineSyntheticConflict);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AnalysisConfig {
        AnalysisConfig {
            symbol: "TSLA".into(),
            news_csv: PathBuf::from("news.csv"),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            lags: default_lags(),
            cache_dir: default_cache_dir(),
            offline: false,
            synthetic: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        base().validate().unwrap();
    }

    #[test]
    fn rejects_empty_symbol() {
        let mut c = base();
        c.symbol = "  ".into();
        assert!(matches!(c.validate(), Err(ConfigError::EmptySymbol)));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut c = base();
        c.end_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(matches!(c.validate(), Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn rejects_empty_lags() {
        let mut c = base();
        c.lags.clear();
        assert!(matches!(c.validate(), Err(ConfigError::EmptyLags)));
    }

    #[test]
    fn rejects_offline_plus_synthetic() {
        let mut c = base();
        c.offline = true;
        c.synthetic = true;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::OfflineSyntheticConflict)
        ));
    }

    #[test]
    fn toml_round_trip_with_defaults() {
        let toml_text = r#"
symbol = "TSLA"
news_csv = "news.csv"
start_date = "2024-01-01"
end_date = "2024-06-30"
"#;
        let config: AnalysisConfig = toml::from_str(toml_text).unwrap();
        assert_eq!(config.lags, default_lags());
        assert_eq!(config.cache_dir, PathBuf::from("data"));
        assert!(!config.offline);
        config.validate().unwrap();
    }
}
