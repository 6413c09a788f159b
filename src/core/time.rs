//! Time utilities - canonical instants and elapsed-time arithmetic.
//!
//! Every instant the engine compares is a `DateTime<Utc>`. Inputs that carry a
//! different offset (or none at all) are *relabelled* as UTC, keeping the
//! wall-clock reading: `2024-01-01T00:00:00+05:00` becomes
//! `2024-01-01T00:00:00Z`. Interval arithmetic relies on stored instants being
//! expressed in that canonical wall-clock form.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Anything that has a wall-clock reading.
pub trait WallClock {
    /// The local wall-clock value, ignoring any offset.
    fn wall_clock(&self) -> NaiveDateTime;
}

impl WallClock for NaiveDateTime {
    fn wall_clock(&self) -> NaiveDateTime {
        *self
    }
}

impl<Tz: TimeZone> WallClock for DateTime<Tz> {
    fn wall_clock(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

/// Current instant in canonical form.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Relabels an instant as UTC without shifting its wall-clock value.
#[must_use]
pub fn normalize<T: WallClock + ?Sized>(instant: &T) -> DateTime<Utc> {
    instant.wall_clock().and_utc()
}

/// Signed time elapsed from `from` to `to`.
#[must_use]
pub fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> TimeDelta {
    to - from
}

/// Parses an instant from text and normalizes it.
///
/// Accepts RFC 3339 (`2023-11-13T08:00:00+02:00`), naive date-times with a `T`
/// or space separator, and bare dates (midnight).
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(normalize(&parsed));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(normalize(&parsed));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| normalize(&date.and_time(NaiveTime::MIN)))
        .map_err(|_| Error::InvalidTimestamp {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_normalize_naive_keeps_wall_clock() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(normalize(&naive), utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_offset_is_relabel_not_conversion() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let aware = offset.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        // A conversion would give 2023-12-31T19:00:00Z
        assert_eq!(normalize(&aware), utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_utc_is_identity() {
        let instant = utc(2023, 11, 13, 12, 30, 0);
        assert_eq!(normalize(&instant), instant);
    }

    #[test]
    fn test_elapsed_is_signed() {
        let a = utc(2023, 11, 13, 0, 0, 0);
        let b = utc(2023, 11, 13, 12, 0, 0);
        assert_eq!(elapsed(a, b), TimeDelta::hours(12));
        assert_eq!(elapsed(b, a), TimeDelta::hours(-12));
    }

    #[test]
    fn test_parse_instant_formats() {
        let expected = utc(2023, 11, 13, 8, 0, 0);
        assert_eq!(parse_instant("2023-11-13T08:00:00Z").unwrap(), expected);
        assert_eq!(parse_instant("2023-11-13T08:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_instant("2023-11-13T08:00:00").unwrap(), expected);
        assert_eq!(parse_instant("2023-11-13 08:00:00").unwrap(), expected);
        assert_eq!(
            parse_instant(" 2023-11-13 ").unwrap(),
            utc(2023, 11, 13, 0, 0, 0)
        );
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        let result = parse_instant("next tuesday");
        assert!(matches!(
            result,
            Err(Error::InvalidTimestamp { value }) if value == "next tuesday"
        ));
    }
}
