//! # Permissive Timestamp Parsing
//!
//! Timestamps arrive in many shapes. Formats are tried in order and the
//! first match wins; inputs without a zone are taken as UTC.
//!
//! | Shape | Example |
//! |-------|---------|
//! | RFC 3339 | `2024-03-01T12:30:00.5Z`, `2024-03-01T12:30:00+02:00` |
//! | RFC 2822 | `Fri, 01 Mar 2024 12:30:00 +0000` |
//! | ISO-like with zone | `2024-03-01 12:30:00+0200` |
//! | ISO-like without zone | `2024-03-01 12:30:00`, `2024-03-01T12:30` |
//! | date only | `2024-03-01`, `2024/03/01`, `03/01/2024` |
//! | month names | `Mar 1, 2024`, `March 1 2024 10:00:00`, `1 Mar 2024` |
//! | all digits | see below |
//!
//! All-digit input is read by its length. Other lengths are rejected here
//! so callers can fall back to a plain number.
//!
//! | Digits | Reading |
//! |--------|---------|
//! | 4 | `yyyy`, January 1 |
//! | 8 | `yyyymmdd` |
//! | 10 | Unix seconds |
//! | 13 | Unix milliseconds |
//! | 14 | `yyyymmddhhmmss` |
//! | 16 | Unix microseconds |
//! | 19 | Unix nanoseconds |

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use eyre::{bail, eyre, Result};

use crate::config::{NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_SECOND};
use crate::nano::Ts;

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%b %d %Y %H:%M:%S%.f",
    "%b %d, %Y %H:%M:%S%.f",
    "%b %d %Y %H:%M",
    "%b %d, %Y %H:%M",
    "%d %b %Y %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
];

fn to_ts<Tz: chrono::TimeZone>(s: &str, dt: DateTime<Tz>) -> Result<Ts> {
    match dt.timestamp_nanos_opt() {
        Some(nanos) => Ok(Ts(nanos)),
        None => bail!("timestamp '{}' is out of range", s),
    }
}

fn digits(s: &str, range: std::ops::Range<usize>) -> u32 {
    s[range].bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn calendar(s: &str, year: u32, month: u32, day: u32, hms: (u32, u32, u32)) -> Result<Ts> {
    let dt = i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .and_then(|date| date.and_hms_opt(hms.0, hms.1, hms.2))
        .ok_or_else(|| eyre!("invalid calendar date '{}'", s))?;
    to_ts(s, dt.and_utc())
}

fn epoch(s: &str, scale: i64) -> Result<Ts> {
    s.parse::<i64>()
        .ok()
        .and_then(|v| v.checked_mul(scale))
        .map(Ts)
        .ok_or_else(|| eyre!("timestamp '{}' is out of range", s))
}

fn parse_digits(s: &str) -> Result<Ts> {
    match s.len() {
        4 => calendar(s, digits(s, 0..4), 1, 1, (0, 0, 0)),
        8 => calendar(s, digits(s, 0..4), digits(s, 4..6), digits(s, 6..8), (0, 0, 0)),
        10 => epoch(s, NANOS_PER_SECOND),
        13 => epoch(s, NANOS_PER_MILLI),
        14 => calendar(
            s,
            digits(s, 0..4),
            digits(s, 4..6),
            digits(s, 6..8),
            (digits(s, 8..10), digits(s, 10..12), digits(s, 12..14)),
        ),
        16 => epoch(s, NANOS_PER_MICRO),
        19 => epoch(s, 1),
        n => bail!("{} digits is not a timestamp length", n),
    }
}

pub fn parse_ts(s: &str) -> Result<Ts> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return parse_digits(s);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return to_ts(s, dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return to_ts(s, dt);
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return to_ts(s, dt);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return to_ts(s, dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return to_ts(s, dt.and_utc());
            }
        }
    }
    bail!("unrecognized timestamp '{}'", s)
}
