//! # Nanosecond Durations and Timestamps
//!
//! `Duration` and `Ts` are signed 64-bit nanosecond counts; `Ts` counts from
//! the Unix epoch. Both are the native types behind the `duration` and
//! `time` primitives.
//!
//! ## Duration Literals
//!
//! A duration literal is an optional sign followed by one or more
//! `<number><unit>` terms, where the number may carry a fraction:
//!
//! ```text
//! 1h30m    -1.5s    2d12h    250ms    0
//! ```
//!
//! | Unit | Nanoseconds |
//! |------|-------------|
//! | ns | 1 |
//! | us, µs | 1e3 |
//! | ms | 1e6 |
//! | s | 1e9 |
//! | m | 60 s |
//! | h | 60 m |
//! | d | 24 h |
//! | w | 7 d |
//! | y | 365 d |
//!
//! Formatting produces the same notation with the largest units first
//! (`1y2d3h4m5.5s`), or a single sub-second unit below one second
//! (`1.5ms`, `250ns`).

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{ensure, Result, WrapErr};

use crate::config::{
    NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_MINUTE,
    NANOS_PER_SECOND, NANOS_PER_WEEK, NANOS_PER_YEAR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ts(pub i64);

fn unit_nanos(unit: &str) -> Option<i64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        "d" => Some(NANOS_PER_DAY),
        "w" => Some(NANOS_PER_WEEK),
        "y" => Some(NANOS_PER_YEAR),
        _ => None,
    }
}

impl Duration {
    pub fn nanos(self) -> i64 {
        self.0
    }

    /// Parses a duration literal such as `1h30m` or `-1.5s`.
    pub fn parse(s: &str) -> Result<Duration> {
        ensure!(!s.is_empty(), "empty duration literal");

        let (negative, mut rest) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        if rest == "0" {
            return Ok(Duration(0));
        }
        ensure!(!rest.is_empty(), "invalid duration '{}'", s);

        let not_digit = |c: char| !c.is_ascii_digit();
        let mut total: i128 = 0;

        while !rest.is_empty() {
            let int_end = rest.find(not_digit).unwrap_or(rest.len());
            let int_part = &rest[..int_end];
            rest = &rest[int_end..];

            let mut frac_part = "";
            if let Some(after_dot) = rest.strip_prefix('.') {
                let frac_end = after_dot.find(not_digit).unwrap_or(after_dot.len());
                frac_part = &after_dot[..frac_end];
                rest = &after_dot[frac_end..];
            }
            ensure!(
                !int_part.is_empty() || !frac_part.is_empty(),
                "invalid duration '{}': expected a number",
                s
            );

            let unit_end = rest
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(rest.len());
            let unit = &rest[..unit_end];
            rest = &rest[unit_end..];

            ensure!(!unit.is_empty(), "invalid duration '{}': missing unit", s);
            let scale = unit_nanos(unit)
                .ok_or_else(|| eyre::eyre!("invalid duration '{}': unknown unit '{}'", s, unit))?
                as i128;

            let whole: i128 = if int_part.is_empty() {
                0
            } else {
                int_part
                    .parse()
                    .wrap_err_with(|| format!("invalid duration '{}': bad number", s))?
            };

            let mut frac_nanos: i128 = 0;
            if !frac_part.is_empty() {
                let digits = frac_part.len().min(18);
                let frac: i128 = frac_part[..digits]
                    .parse()
                    .wrap_err_with(|| format!("invalid duration '{}': bad fraction", s))?;
                frac_nanos = frac * scale / 10i128.pow(digits as u32);
            }

            total = whole
                .checked_mul(scale)
                .and_then(|t| t.checked_add(frac_nanos))
                .and_then(|t| t.checked_add(total))
                .ok_or_else(|| eyre::eyre!("duration '{}' overflows", s))?;
            ensure!(total <= i64::MAX as i128 + 1, "duration '{}' overflows", s);
        }

        let signed = if negative { -total } else { total };
        let nanos = i64::try_from(signed).map_err(|_| eyre::eyre!("duration '{}' overflows", s))?;
        Ok(Duration(nanos))
    }
}

fn push_scaled(out: &mut String, value: u64, scale: u64) {
    out.push_str(&(value / scale).to_string());
    let frac = value % scale;
    if frac != 0 {
        let width = scale.ilog10() as usize;
        let digits = format!("{:0width$}", frac, width = width);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }

        let mut out = String::new();
        if self.0 < 0 {
            out.push('-');
        }
        let mut rest = self.0.unsigned_abs();

        if rest < NANOS_PER_SECOND as u64 {
            if rest < NANOS_PER_MICRO as u64 {
                push_scaled(&mut out, rest, 1);
                out.push_str("ns");
            } else if rest < NANOS_PER_MILLI as u64 {
                push_scaled(&mut out, rest, NANOS_PER_MICRO as u64);
                out.push_str("us");
            } else {
                push_scaled(&mut out, rest, NANOS_PER_MILLI as u64);
                out.push_str("ms");
            }
            return f.write_str(&out);
        }

        for (scale, unit) in [
            (NANOS_PER_YEAR, 'y'),
            (NANOS_PER_DAY, 'd'),
            (NANOS_PER_HOUR, 'h'),
            (NANOS_PER_MINUTE, 'm'),
        ] {
            let scale = scale as u64;
            if rest >= scale {
                out.push_str(&(rest / scale).to_string());
                out.push(unit);
                rest %= scale;
            }
        }
        if rest > 0 {
            push_scaled(&mut out, rest, NANOS_PER_SECOND as u64);
            out.push('s');
        }
        f.write_str(&out)
    }
}

impl Ts {
    pub fn nanos(self) -> i64 {
        self.0
    }

    pub fn from_datetime<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> Ts {
        match dt.timestamp_nanos_opt() {
            Some(nanos) => Ts(nanos),
            None => Ts(dt.timestamp().saturating_mul(NANOS_PER_SECOND)),
        }
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let secs = self.0.div_euclid(NANOS_PER_SECOND);
        let nanos = self.0.rem_euclid(NANOS_PER_SECOND) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

impl fmt::Display for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => write!(f, "{}ns", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_literals() {
        assert_eq!(
            Duration::parse("1h30m").unwrap(),
            Duration(NANOS_PER_HOUR + 30 * NANOS_PER_MINUTE)
        );
        assert_eq!(Duration::parse("-1.5s").unwrap(), Duration(-1_500_000_000));
        assert_eq!(Duration::parse("2d").unwrap(), Duration(2 * NANOS_PER_DAY));
        assert_eq!(Duration::parse("250ms").unwrap(), Duration(250 * NANOS_PER_MILLI));
        assert_eq!(Duration::parse("1µs").unwrap(), Duration(1_000));
        assert_eq!(Duration::parse("0").unwrap(), Duration(0));
    }

    #[test]
    fn rejects_malformed_literals() {
        for bad in ["", "-", "10", "1x", "h", "1.5", "1h-2m", "99999999999999999999y"] {
            assert!(Duration::parse(bad).is_err(), "'{}' should not parse", bad);
        }
    }

    #[test]
    fn formats_largest_units_first() {
        assert_eq!(Duration(0).to_string(), "0s");
        assert_eq!(Duration(NANOS_PER_HOUR + 30 * NANOS_PER_MINUTE).to_string(), "1h30m");
        assert_eq!(Duration(-1_500_000_000).to_string(), "-1.5s");
        assert_eq!(Duration(1_500_000).to_string(), "1.5ms");
        assert_eq!(Duration(250).to_string(), "250ns");
        assert_eq!(
            Duration(NANOS_PER_YEAR + 2 * NANOS_PER_DAY + 5 * NANOS_PER_SECOND).to_string(),
            "1y2d5s"
        );
    }

    #[test]
    fn format_and_parse_agree() {
        for nanos in [1i64, 999, 1_234_567, -61 * NANOS_PER_SECOND, 3 * NANOS_PER_WEEK + 7] {
            let d = Duration(nanos);
            assert_eq!(Duration::parse(&d.to_string()).unwrap(), d);
        }
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        assert_eq!(Ts(0).to_string(), "1970-01-01T00:00:00Z");
        assert_eq!(Ts(1_500_000_000).to_string(), "1970-01-01T00:00:01.500Z");
        assert_eq!(Ts(-1).to_string(), "1969-12-31T23:59:59.999999999Z");
    }
}
