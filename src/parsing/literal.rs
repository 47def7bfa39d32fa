//! # Primitive Literals
//!
//! Text forms accepted when coercing strings into primitive values.
//!
//! | Kind | Accepted |
//! |------|----------|
//! | int | decimal `i64`, optional sign, no surrounding whitespace |
//! | uint | decimal `u64` |
//! | float | decimal or exponent notation, `inf`, `NaN` |
//! | bool | `true`, `false`, `t`, `f` (any case), `1`, `0` |
//! | ip | dotted IPv4 or IPv6 text |
//! | net | CIDR, `addr/bits` |
//! | duration | see [`crate::nano::Duration::parse`] |

use std::net::IpAddr;

use eyre::{bail, Result, WrapErr};

use crate::nano::Duration;
use crate::value::Net;

pub fn parse_int(s: &str) -> Result<i64> {
    s.parse()
        .wrap_err_with(|| format!("invalid integer literal '{}'", s))
}

pub fn parse_uint(s: &str) -> Result<u64> {
    s.parse()
        .wrap_err_with(|| format!("invalid unsigned integer literal '{}'", s))
}

pub fn parse_float(s: &str) -> Result<f64> {
    s.parse()
        .wrap_err_with(|| format!("invalid float literal '{}'", s))
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s {
        "1" => Ok(true),
        "0" => Ok(false),
        _ if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("t") => Ok(true),
        _ if s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("f") => Ok(false),
        _ => bail!("invalid bool literal '{}'", s),
    }
}

pub fn parse_ip(s: &str) -> Result<IpAddr> {
    s.parse()
        .wrap_err_with(|| format!("invalid IP address '{}'", s))
}

pub fn parse_net(s: &str) -> Result<Net> {
    Net::parse(s)
}

pub fn parse_duration(s: &str) -> Result<Duration> {
    Duration::parse(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_reject_whitespace() {
        assert_eq!(parse_int("-42").unwrap(), -42);
        assert_eq!(parse_int("+7").unwrap(), 7);
        assert!(parse_int(" 1").is_err());
        assert!(parse_int("1.0").is_err());
        assert!(parse_uint("-1").is_err());
        assert_eq!(parse_uint("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn bool_words_and_digits() {
        for t in ["true", "TRUE", "t", "T", "1"] {
            assert!(parse_bool(t).unwrap(), "{}", t);
        }
        for f in ["false", "False", "f", "0"] {
            assert!(!parse_bool(f).unwrap(), "{}", f);
        }
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn floats_accept_special_values() {
        assert_eq!(parse_float("1e3").unwrap(), 1000.0);
        assert!(parse_float("NaN").unwrap().is_nan());
        assert_eq!(parse_float("-inf").unwrap(), f64::NEG_INFINITY);
        assert!(parse_float("one").is_err());
    }

    #[test]
    fn addresses() {
        assert_eq!(parse_ip("::1").unwrap().to_string(), "::1");
        assert!(parse_ip("300.1.1.1").is_err());
        assert_eq!(parse_net("10.0.0.0/8").unwrap().bits(), 8);
    }
}
