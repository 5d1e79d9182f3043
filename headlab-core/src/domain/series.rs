//! Daily time-indexed series.
//!
//! A `DailySeries` is an ordered sequence of (date, value) points with unique,
//! ascending dates. Construction canonicalizes whatever it is given: points
//! are sorted and duplicate dates keep the first occurrence. Gaps are
//! represented by absence — a date with no observation simply has no point,
//! never a filler value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A daily (date, value) series, sorted ascending with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    points: Vec<(NaiveDate, f64)>,
}

impl DailySeries {
    /// Build a series from arbitrary (date, value) pairs.
    ///
    /// Sorts ascending by date; duplicate dates keep the first occurrence
    /// in the input order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut points: Vec<(NaiveDate, f64)> = pairs.into_iter().collect();
        // Stable sort preserves input order within a date, so dedup keeps
        // the first occurrence.
        points.sort_by_key(|(date, _)| *date);
        points.dedup_by_key(|(date, _)| *date);
        Self { points }
    }

    /// Empty series.
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at an exact date, if observed.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Iterate points in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &(NaiveDate, f64)> {
        self.points.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(d, _)| *d)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    /// Shift values backward by `lag` positions: the point at position `i`
    /// takes the value from position `i + lag` of the original ordering.
    ///
    /// The last `lag` positions have no source value and are dropped, so the
    /// result has `len() - lag` points (empty if `lag >= len()`). Shifting by
    /// zero returns an identical series. The receiver is untouched.
    pub fn shift_back(&self, lag: usize) -> DailySeries {
        if lag == 0 {
            return self.clone();
        }
        let n = self.points.len();
        if lag >= n {
            return DailySeries::empty();
        }
        let points = (0..n - lag)
            .map(|i| (self.points[i].0, self.points[i + lag].1))
            .collect();
        DailySeries { points }
    }

    /// Inner-join with another series on exact date match.
    ///
    /// Returns (date, self value, other value) triples in ascending date
    /// order, dropping dates present in only one series and pairs where
    /// either value is non-finite. Partial overlap is expected (trading
    /// calendars and news calendars differ), not an error.
    pub fn align_inner(&self, other: &DailySeries) -> Vec<(NaiveDate, f64, f64)> {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.points.len() && j < other.points.len() {
            let (da, va) = self.points[i];
            let (db, vb) = other.points[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    if va.is_finite() && vb.is_finite() {
                        out.push((da, va, vb));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(pairs: &[(&str, f64)]) -> DailySeries {
        DailySeries::from_pairs(pairs.iter().map(|(s, v)| (d(s), *v)))
    }

    #[test]
    fn construction_sorts_and_dedupes_keeping_first() {
        let s = DailySeries::from_pairs(vec![
            (d("2024-01-03"), 3.0),
            (d("2024-01-01"), 1.0),
            (d("2024-01-03"), 99.0),
            (d("2024-01-02"), 2.0),
        ]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(d("2024-01-03")), Some(3.0)); // first occurrence wins
        let dates: Vec<_> = s.dates().collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn shift_back_zero_is_identity() {
        let s = series(&[("2024-01-01", 0.01), ("2024-01-02", 0.02), ("2024-01-03", -0.01)]);
        assert_eq!(s.shift_back(0), s);
    }

    #[test]
    fn shift_back_moves_later_values_earlier() {
        let s = series(&[("2024-01-01", 0.01), ("2024-01-02", 0.02), ("2024-01-03", -0.01)]);
        let shifted = s.shift_back(1);
        assert_eq!(shifted.len(), 2);
        assert_eq!(shifted.get(d("2024-01-01")), Some(0.02));
        assert_eq!(shifted.get(d("2024-01-02")), Some(-0.01));
        assert_eq!(shifted.get(d("2024-01-03")), None); // undefined after shift
    }

    #[test]
    fn shift_back_past_length_is_empty() {
        let s = series(&[("2024-01-01", 1.0), ("2024-01-02", 2.0)]);
        assert!(s.shift_back(2).is_empty());
        assert!(s.shift_back(5).is_empty());
    }

    #[test]
    fn align_inner_drops_unmatched_dates() {
        let a = series(&[("2024-01-01", 0.5), ("2024-01-02", -0.2), ("2024-01-04", 0.8)]);
        let b = series(&[("2024-01-02", 0.01), ("2024-01-03", 0.02), ("2024-01-04", -0.01)]);
        let aligned = a.align_inner(&b);
        assert_eq!(
            aligned,
            vec![
                (d("2024-01-02"), -0.2, 0.01),
                (d("2024-01-04"), 0.8, -0.01),
            ]
        );
    }

    #[test]
    fn align_inner_drops_non_finite_values() {
        let a = series(&[("2024-01-01", 0.5), ("2024-01-02", f64::NAN)]);
        let b = series(&[("2024-01-01", 0.01), ("2024-01-02", 0.02)]);
        let aligned = a.align_inner(&b);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].0, d("2024-01-01"));
    }

    #[test]
    fn align_inner_zero_overlap() {
        let a = series(&[("2024-01-01", 0.5)]);
        let b = series(&[("2024-02-01", 0.01)]);
        assert!(a.align_inner(&b).is_empty());
    }
}
