//! HeadLab Runner — analysis orchestration over `headlab-core`.
//!
//! This crate provides:
//! - Statistics primitives (Pearson r, Student-t CDF) (`stats`)
//! - The sentiment/return lag-correlation sweep (`impact`)
//! - Temporal publication profiles (`temporal`)
//! - Publisher/stock coverage statistics (`coverage`)
//! - Price loading with cache/download/synthetic fallback (`data_loader`)
//! - TOML configuration (`config`) and report export (`report`)
//! - End-to-end single-run orchestration (`runner`)

pub mod config;
pub mod coverage;
pub mod data_loader;
pub mod impact;
pub mod report;
pub mod runner;
pub mod stats;
pub mod temporal;

pub use config::{AnalysisConfig, ConfigError};
pub use coverage::{PublisherCoverage, StockCoverage};
pub use data_loader::{generate_synthetic_closes, load_prices, LoadError, LoadOptions, LoadedPrices};
pub use impact::{ImpactSweep, LagCorrelation, DEFAULT_LAGS};
pub use report::{export_json, export_rows_csv, import_json, save_artifacts, ImpactReport, SCHEMA_VERSION};
pub use runner::{run_impact_analysis, run_impact_analysis_with, RunError};
pub use stats::{pearson, t_cdf};
pub use temporal::TemporalProfile;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn lag_correlation_is_send_sync() {
        assert_send::<LagCorrelation>();
        assert_sync::<LagCorrelation>();
    }

    #[test]
    fn sweep_is_send_sync() {
        assert_send::<ImpactSweep>();
        assert_sync::<ImpactSweep>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }

    #[test]
    fn report_is_send_sync() {
        assert_send::<ImpactReport>();
        assert_sync::<ImpactReport>();
    }

    #[test]
    fn profiles_are_send_sync() {
        assert_send::<TemporalProfile>();
        assert_sync::<TemporalProfile>();
        assert_send::<PublisherCoverage>();
        assert_sync::<PublisherCoverage>();
        assert_send::<StockCoverage>();
        assert_sync::<StockCoverage>();
    }
}
