//! Timestamp normalization to the US market time zone.
//!
//! News datasets carry timestamps in a mix of formats: RFC 3339, offset-bearing
//! `YYYY-MM-DD HH:MM:SS-04:00`, naive datetimes, and bare dates. Everything is
//! coerced to America/New_York and the zone is stripped afterwards, so the rest
//! of the pipeline works in market-local wall-clock time.
//!
//! Naive values (no offset) are interpreted as UTC before conversion. That
//! includes bare dates, which land on the prior Eastern evening — intentional,
//! so that a dataset mixing naive and offset-bearing rows stays on one clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// The reference market time zone for all normalized timestamps.
pub const MARKET_TZ: Tz = chrono_tz::America::New_York;

/// A timestamp value that none of the accepted formats could parse.
///
/// Callers decide whether to drop the row or abort the whole ingest; the
/// normalizer never coerces unparseable input to a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable timestamp: {raw:?}")]
pub struct DateParseError {
    /// The offending input, as received.
    pub raw: String,
}

/// Offset-bearing formats, tried before the naive ones.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Naive formats; values are interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats; midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp in any accepted format and normalize it to
/// market-local wall-clock time (America/New_York, zone stripped).
pub fn normalize_timestamp(raw: &str) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateParseError { raw: raw.to_string() });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&MARKET_TZ).naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.with_timezone(&MARKET_TZ).naive_local());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(utc_to_market_local(naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| DateParseError {
                raw: raw.to_string(),
            })?;
            return Ok(utc_to_market_local(midnight));
        }
    }

    Err(DateParseError { raw: raw.to_string() })
}

/// Parse a timestamp and truncate to the market-local calendar date.
///
/// This is the join key used when pairing daily sentiment with daily returns.
pub fn market_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    normalize_timestamp(raw).map(|dt| dt.date())
}

/// Reinterpret a naive datetime as UTC and convert to market-local time.
pub fn utc_to_market_local(naive: NaiveDateTime) -> NaiveDateTime {
    Utc.from_utc_datetime(&naive)
        .with_timezone(&MARKET_TZ)
        .naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn rfc3339_converts_to_eastern() {
        // 14:30 UTC is 10:30 Eastern during daylight saving
        let dt = normalize_timestamp("2024-06-03T14:30:00+00:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn offset_bearing_space_format() {
        // Already Eastern; conversion is a no-op on the wall clock
        let dt = normalize_timestamp("2024-01-02 09:30:00-05:00").unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn naive_is_treated_as_utc() {
        // Winter: UTC-5, so 03:00 UTC is 22:00 the previous Eastern day
        let dt = normalize_timestamp("2024-01-02 03:00:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(dt.hour(), 22);
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let dt = normalize_timestamp("2024-06-03").unwrap();
        // 00:00 UTC = 20:00 Eastern on 2024-06-02 (EDT)
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn fractional_seconds_accepted() {
        let dt = normalize_timestamp("2024-06-03 14:30:00.123456-04:00").unwrap();
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn us_style_date() {
        let dt = normalize_timestamp("06/03/2024 14:30:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn garbage_is_an_error_not_a_default() {
        let err = normalize_timestamp("not a date").unwrap_err();
        assert_eq!(err.raw, "not a date");
        assert!(normalize_timestamp("").is_err());
        assert!(normalize_timestamp("   ").is_err());
    }

    #[test]
    fn market_date_truncates() {
        let d = market_date("2024-06-03T14:30:00-04:00").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn dst_boundary_spring_forward() {
        // 2024-03-10 07:00 UTC is 02:00 EST — inside the skipped hour locally,
        // but UTC-based conversion is always well defined
        let dt = normalize_timestamp("2024-03-10T07:00:00+00:00").unwrap();
        assert_eq!(dt.hour(), 3); // EDT takes effect
    }
}
