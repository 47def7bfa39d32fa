//! # Value Ordering
//!
//! A total order over values of any type, used by spans and sorted scans.
//!
//! | Operands | Rule |
//! |----------|------|
//! | null vs non-null | null is greatest when `nulls_max`, least otherwise |
//! | number vs number | numeric, across signed / unsigned / float kinds |
//! | same primitive | natural order of the decoded value, else raw bytes |
//! | ip vs ip | IPv4 before IPv6, then address bytes |
//! | net vs net | address, then prefix length |
//! | anything else | type id, then raw bytes |
//!
//! Payloads that fail to decode fall back to raw byte comparison, so the
//! order stays total on corrupt input.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{Net, Value};
use crate::encoding::{decode_float16, decode_float32, decode_float64, decode_int, decode_uint};
use crate::order::Order;
use crate::types::Primitive;

pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

#[derive(Clone, Copy)]
enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

fn number(p: Primitive, bytes: &[u8]) -> Option<Number> {
    if p.is_signed() {
        decode_int(bytes).ok().map(Number::Signed)
    } else if p.is_unsigned() {
        decode_uint(bytes).ok().map(Number::Unsigned)
    } else {
        match p {
            Primitive::Float16 => decode_float16(bytes).ok().map(|f| Number::Float(f.to_f64())),
            Primitive::Float32 => decode_float32(bytes).ok().map(|f| Number::Float(f as f64)),
            Primitive::Float64 => decode_float64(bytes).ok().map(Number::Float),
            _ => None,
        }
    }
}

fn compare_numbers(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Signed(a), Number::Signed(b)) => a.cmp(&b),
        (Number::Unsigned(a), Number::Unsigned(b)) => a.cmp(&b),
        (Number::Signed(a), Number::Unsigned(b)) => (a as i128).cmp(&(b as i128)),
        (Number::Unsigned(a), Number::Signed(b)) => (a as i128).cmp(&(b as i128)),
        (Number::Signed(a), Number::Float(b)) => compare_int_float(a as i128, b),
        (Number::Unsigned(a), Number::Float(b)) => compare_int_float(a as i128, b),
        (Number::Float(a), Number::Signed(b)) => compare_int_float(b as i128, a).reverse(),
        (Number::Float(a), Number::Unsigned(b)) => compare_int_float(b as i128, a).reverse(),
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
        }
    }
}

/// Exact comparison of an integer against a float. Every i64 and u64 fits
/// in an i128, and so does the integral part of any float inside that range.
fn compare_int_float(int: i128, float: f64) -> Ordering {
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
    const MINUS_TWO_POW_63: f64 = -9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return (int as f64).total_cmp(&float);
    }
    let whole = float.trunc();
    if whole >= TWO_POW_64 {
        return Ordering::Less;
    }
    if whole < MINUS_TWO_POW_63 {
        return Ordering::Greater;
    }
    int.cmp(&(whole as i128)).then_with(|| {
        let frac = float - whole;
        if frac > 0.0 {
            Ordering::Less
        } else if frac < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Compares two values under the total order described in the module docs.
pub fn compare_values(a: &Value, b: &Value, nulls_max: bool) -> Ordering {
    let (ab, bb) = match (a.bytes(), b.bytes()) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return if nulls_max { Ordering::Greater } else { Ordering::Less },
        (Some(_), None) => return if nulls_max { Ordering::Less } else { Ordering::Greater },
        (Some(ab), Some(bb)) => (ab, bb),
    };

    if let (Some(pa), Some(pb)) = (a.primitive(), b.primitive()) {
        if let (Some(na), Some(nb)) = (number(pa, ab), number(pb, bb)) {
            return compare_numbers(na, nb);
        }
        if pa == pb {
            match pa {
                Primitive::Ip => {
                    return ab.len().cmp(&bb.len()).then_with(|| ab.cmp(bb));
                }
                Primitive::Net => {
                    if let (Ok(na), Ok(nb)) = (Net::decode(ab), Net::decode(bb)) {
                        return na
                            .addr()
                            .cmp(&nb.addr())
                            .then_with(|| na.bits().cmp(&nb.bits()));
                    }
                    return ab.cmp(bb);
                }
                _ => return ab.cmp(bb),
            }
        }
        return pa.id().cmp(&pb.id());
    }

    let (ua, ub) = (a.typ().under(), b.typ().under());
    ua.id().cmp(&ub.id()).then_with(|| ab.cmp(bb))
}

/// Builds a comparator for `order`. `Desc` reverses the whole comparison,
/// null placement included.
pub fn value_compare_fn(order: Order, nulls_max: bool) -> CompareFn {
    match order {
        Order::Asc => Arc::new(move |a: &Value, b: &Value| compare_values(a, b, nulls_max)),
        Order::Desc => Arc::new(move |a: &Value, b: &Value| compare_values(b, a, nulls_max)),
    }
}
