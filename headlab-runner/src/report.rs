//! Report assembly and export — JSON and CSV artifacts.
//!
//! Persisted reports carry a `schema_version` field; loading rejects
//! versions newer than this build understands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use headlab_core::data::DataSource;
use serde::{Deserialize, Serialize};

use crate::impact::LagCorrelation;

/// Current report schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// A complete sentiment-impact report for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    pub schema_version: u32,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Identifier of the sentiment scorer that produced the daily series.
    pub sentiment_source: String,
    /// Provenance of the price data.
    pub price_source: DataSource,
    /// BLAKE3 hash of the price payload.
    pub dataset_hash: String,
    /// Articles that contributed to the sentiment series.
    pub article_count: usize,
    /// One row per requested lag, in request order.
    pub rows: Vec<LagCorrelation>,
    pub generated_at: chrono::NaiveDateTime,
}

/// Serialize a report to pretty JSON.
pub fn export_json(report: &ImpactReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ImpactReport to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ImpactReport> {
    let report: ImpactReport =
        serde_json::from_str(json).context("failed to deserialize ImpactReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

/// Export the lag rows as CSV.
///
/// Columns: lag, correlation, p_value, n_obs. NaN statistics become empty
/// cells so spreadsheet tools read them as missing.
pub fn export_rows_csv(rows: &[LagCorrelation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["lag", "correlation", "p_value", "n_obs"])
        .context("csv header")?;

    for row in rows {
        let fmt = |v: f64| {
            if v.is_finite() {
                format!("{v:.6}")
            } else {
                String::new()
            }
        };
        wtr.write_record([
            row.lag.to_string(),
            fmt(row.correlation),
            fmt(row.p_value),
            row.n_obs.to_string(),
        ])
        .context("csv row")?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context("csv flush")?;
    String::from_utf8(bytes).context("csv utf8")
}

/// Write the JSON report and CSV rows into `output_dir`.
///
/// Returns the path of the JSON artifact.
pub fn save_artifacts(report: &ImpactReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let stem = format!(
        "impact_{}_{}_{}",
        report.symbol, report.start_date, report.end_date
    );

    let json_path = output_dir.join(format!("{stem}.json"));
    std::fs::write(&json_path, export_json(report)?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let csv_path = output_dir.join(format!("{stem}.csv"));
    std::fs::write(&csv_path, export_rows_csv(&report.rows)?)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    Ok(json_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ImpactReport {
        ImpactReport {
            schema_version: SCHEMA_VERSION,
            symbol: "TSLA".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            sentiment_source: "vader".into(),
            price_source: DataSource::Cache,
            dataset_hash: "abc123".into(),
            article_count: 42,
            rows: vec![
                LagCorrelation {
                    lag: 0,
                    correlation: 0.5,
                    p_value: 0.04,
                    n_obs: 20,
                },
                LagCorrelation {
                    lag: 1,
                    correlation: f64::NAN,
                    p_value: f64::NAN,
                    n_obs: 1,
                },
            ],
            generated_at: NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn json_round_trips() {
        let report = sample_report();
        let json = export_json(&report).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.symbol, "TSLA");
        assert_eq!(back.rows.len(), 2);
        assert_eq!(back.rows[0].lag, 0);
        assert!(back.rows[1].correlation.is_nan());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut report = sample_report();
        report.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&report).unwrap();
        assert!(import_json(&json).is_err());
    }

    #[test]
    fn csv_has_header_and_blank_nans() {
        let csv_text = export_rows_csv(&sample_report().rows).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(lines.next().unwrap(), "lag,correlation,p_value,n_obs");
        assert_eq!(lines.next().unwrap(), "0,0.500000,0.040000,20");
        assert_eq!(lines.next().unwrap(), "1,,,1");
    }

    #[test]
    fn artifacts_land_in_the_output_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = sample_report();
        let json_path = save_artifacts(&report, dir.path()).unwrap();
        assert!(json_path.exists());
        assert!(dir
            .path()
            .join("impact_TSLA_2024-01-01_2024-01-31.csv")
            .exists());
    }
}
