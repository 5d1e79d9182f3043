//! Sentiment/return lag-correlation sweep.
//!
//! For each requested lag, the return series is shifted backward by `lag`
//! positions ("the return observed `lag` trading periods after the sentiment
//! observation"), inner-joined with the daily sentiment series on date, and
//! the aligned pairs are fed to the Pearson evaluator. One result row per
//! requested lag, in request order, always — a lag with fewer than two
//! aligned observations yields a NaN row, never a missing row.

use headlab_core::domain::DailySeries;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::stats::pearson;

/// Correlation result for a single lag.
///
/// The two statistics serialize as JSON null when undefined, and come back
/// as NaN — plain f64 fields would fail to round-trip NaN through JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagCorrelation {
    /// Lag in trading periods (returns shifted backward by this amount).
    pub lag: usize,
    /// Pearson coefficient; NaN when `n_obs < 2` or variance is zero.
    #[serde(with = "nan_as_null")]
    pub correlation: f64,
    /// Two-sided p-value under H0: rho = 0; NaN when correlation is NaN.
    #[serde(with = "nan_as_null")]
    pub p_value: f64,
    /// Aligned observations used for this lag.
    pub n_obs: usize,
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_some(v)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

impl LagCorrelation {
    /// Whether the coefficient is defined for this row.
    pub fn is_defined(&self) -> bool {
        self.correlation.is_finite()
    }
}

/// Default lag offsets, matching the exploratory convention of testing the
/// same day through one trading week out.
pub const DEFAULT_LAGS: &[usize] = &[0, 1, 2, 3, 4, 5];

/// Sweep executor for the lag grid.
///
/// Each lag is independent, so the sweep is embarrassingly parallel; rayon's
/// indexed `par_iter` reassembles rows in request order.
pub struct ImpactSweep {
    parallel: bool,
}

impl ImpactSweep {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run the sweep: one `LagCorrelation` per entry of `lags`, in order.
    pub fn sweep(
        &self,
        sentiment: &DailySeries,
        returns: &DailySeries,
        lags: &[usize],
    ) -> Vec<LagCorrelation> {
        if self.parallel {
            lags.par_iter()
                .map(|&lag| correlate_at_lag(sentiment, returns, lag))
                .collect()
        } else {
            lags.iter()
                .map(|&lag| correlate_at_lag(sentiment, returns, lag))
                .collect()
        }
    }
}

impl Default for ImpactSweep {
    fn default() -> Self {
        Self::new()
    }
}

/// Shift, align, and evaluate a single lag.
fn correlate_at_lag(sentiment: &DailySeries, returns: &DailySeries, lag: usize) -> LagCorrelation {
    let lagged = returns.shift_back(lag);
    let aligned = sentiment.align_inner(&lagged);
    let n_obs = aligned.len();

    if n_obs < 2 {
        return LagCorrelation {
            lag,
            correlation: f64::NAN,
            p_value: f64::NAN,
            n_obs,
        };
    }

    let xs: Vec<f64> = aligned.iter().map(|(_, s, _)| *s).collect();
    let ys: Vec<f64> = aligned.iter().map(|(_, _, r)| *r).collect();
    let (correlation, p_value) = pearson(&xs, &ys);

    LagCorrelation {
        lag,
        correlation,
        p_value,
        n_obs,
    }
}
