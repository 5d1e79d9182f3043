//! Daily returns from closing prices.

use super::provider::ClosingBar;
use crate::domain::DailySeries;

/// Percentage change between consecutive closes.
///
/// The first close has no prior observation, so the return series starts at
/// the second bar — a gap, not a NaN. Expects canonicalized bars (ascending,
/// unique dates, positive finite closes).
pub fn daily_returns(bars: &[ClosingBar]) -> DailySeries {
    DailySeries::from_pairs(
        bars.windows(2)
            .map(|w| (w[1].date, w[1].close / w[0].close - 1.0)),
    )
}
