//! # Coercion Helpers
//!
//! Lossy conversions of a value's payload into native numbers and bools.
//! Each helper returns `None` when the value cannot be represented; the
//! casters turn that into a typed error value.
//!
//! | Helper | Accepts |
//! |--------|---------|
//! | `to_int` | signed, unsigned `<= i64::MAX`, finite in-range floats (truncated), decimal strings |
//! | `to_uint` | unsigned, non-negative signed, finite in-range floats (truncated), decimal strings |
//! | `to_float` | any number, float strings |
//! | `to_bool` | bool, bool literals, numbers (non-zero is true) |
//!
//! Named wrappers are looked through; null is never coercible.

use crate::encoding::{decode_int, decode_uint};
use crate::parsing::{parse_bool, parse_float, parse_int, parse_uint};
use crate::types::Primitive;
use crate::value::Value;

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

fn float_to_i64(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    (t >= -TWO_POW_63 && t < TWO_POW_63).then_some(t as i64)
}

fn float_to_u64(f: f64) -> Option<u64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    (t >= 0.0 && t < TWO_POW_64).then_some(t as u64)
}

fn as_text(val: &Value) -> Option<&str> {
    std::str::from_utf8(val.bytes()?).ok()
}

pub fn to_int(val: &Value) -> Option<i64> {
    let p = val.primitive()?;
    let bytes = val.bytes()?;
    match p {
        p if p.is_signed() => decode_int(bytes).ok(),
        p if p.is_unsigned() => decode_uint(bytes).ok().and_then(|v| i64::try_from(v).ok()),
        p if p.is_float() => val.as_float().ok().and_then(float_to_i64),
        Primitive::String => parse_int(as_text(val)?).ok(),
        _ => None,
    }
}

pub fn to_uint(val: &Value) -> Option<u64> {
    let p = val.primitive()?;
    let bytes = val.bytes()?;
    match p {
        p if p.is_unsigned() => decode_uint(bytes).ok(),
        p if p.is_signed() => decode_int(bytes).ok().and_then(|v| u64::try_from(v).ok()),
        p if p.is_float() => val.as_float().ok().and_then(float_to_u64),
        Primitive::String => parse_uint(as_text(val)?).ok(),
        _ => None,
    }
}

pub fn to_float(val: &Value) -> Option<f64> {
    let p = val.primitive()?;
    let bytes = val.bytes()?;
    match p {
        p if p.is_float() => val.as_float().ok(),
        p if p.is_signed() => decode_int(bytes).ok().map(|v| v as f64),
        p if p.is_unsigned() => decode_uint(bytes).ok().map(|v| v as f64),
        Primitive::String => parse_float(as_text(val)?).ok(),
        _ => None,
    }
}

pub fn to_bool(val: &Value) -> Option<bool> {
    match val.primitive()? {
        Primitive::Bool => val.as_bool().ok(),
        Primitive::String => parse_bool(as_text(val)?).ok(),
        p if p.is_number() => to_int(val).map(|v| v != 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn int_from_every_numeric_kind() {
        assert_eq!(to_int(&Value::int(Primitive::Int8, -3)), Some(-3));
        assert_eq!(to_int(&Value::uint(Primitive::Uint64, 7)), Some(7));
        assert_eq!(to_int(&Value::uint(Primitive::Uint64, u64::MAX)), None);
        assert_eq!(to_int(&Value::float64(3.999)), Some(3));
        assert_eq!(to_int(&Value::float64(-3.999)), Some(-3));
        assert_eq!(to_int(&Value::float64(f64::NAN)), None);
        assert_eq!(to_int(&Value::float64(1e19)), None);
        assert_eq!(to_int(&Value::string("-12")), Some(-12));
        assert_eq!(to_int(&Value::string(" 12")), None);
        assert_eq!(to_int(&Value::bool(true)), None);
        assert_eq!(to_int(&Value::null(Type::INT64)), None);
    }

    #[test]
    fn uint_rejects_negatives() {
        assert_eq!(to_uint(&Value::int(Primitive::Int64, -1)), None);
        assert_eq!(to_uint(&Value::int(Primitive::Int64, 5)), Some(5));
        assert_eq!(to_uint(&Value::float64(-0.5)), Some(0));
        assert_eq!(to_uint(&Value::float64(-1.5)), None);
        assert_eq!(to_uint(&Value::string("18446744073709551615")), Some(u64::MAX));
    }

    #[test]
    fn float_from_numbers_and_strings() {
        assert_eq!(to_float(&Value::int(Primitive::Int16, -2)), Some(-2.0));
        assert_eq!(to_float(&Value::float32(0.5)), Some(0.5));
        assert_eq!(to_float(&Value::string("2.5e1")), Some(25.0));
        assert_eq!(to_float(&Value::string("x")), None);
        assert_eq!(to_float(&Value::ip("1.1.1.1".parse().unwrap())), None);
    }

    #[test]
    fn bool_from_words_and_numbers() {
        assert_eq!(to_bool(&Value::string("T")), Some(true));
        assert_eq!(to_bool(&Value::string("0")), Some(false));
        assert_eq!(to_bool(&Value::int(Primitive::Int32, 9)), Some(true));
        assert_eq!(to_bool(&Value::float64(0.0)), Some(false));
        assert_eq!(to_bool(&Value::blob([1])), None);
    }
}
