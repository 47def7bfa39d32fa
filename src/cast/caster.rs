//! # Primitive Casters
//!
//! | Target | Accepted input | Notes |
//! |--------|----------------|-------|
//! | int8..int32 | anything `to_int` accepts | range checked |
//! | int64 | anything `to_int` accepts | |
//! | uint8..uint32 | anything `to_uint` accepts | range checked |
//! | uint64 | anything `to_uint` accepts | |
//! | float16/32/64 | anything `to_float` accepts | narrowed, never range checked |
//! | bool | anything `to_bool` accepts | |
//! | ip / net | ip / net (unchanged), literal strings | |
//! | duration | duration (unchanged), literals, floats, ints | strings fall back to float nanoseconds |
//! | time | time (unchanged), timestamps, numbers | null becomes the epoch |
//! | string | anything | bytes must be UTF-8, enums give their symbol |
//! | bytes | anything | payload kept verbatim |
//!
//! Null input yields the null of the target type, except for `time`.

use std::sync::Arc;

use half::f16;

use super::coerce::{to_bool, to_float, to_int, to_uint};
use super::Evaluator;
use crate::encoding::decode_uint;
use crate::nano::{Duration, Ts};
use crate::parsing::{parse_duration, parse_float, parse_ip, parse_net, parse_ts};
use crate::types::{Primitive, Type, TypeContext};
use crate::value::{format_value, Value};

#[derive(Debug, Clone, Copy)]
enum Rule {
    Int {
        target: Primitive,
        range: Option<(i64, i64)>,
    },
    Uint {
        target: Primitive,
        max: Option<u64>,
    },
    Bool,
    Float16,
    Float32,
    Float64,
    Ip,
    Net,
    Duration,
    Time,
    String,
    Bytes,
}

/// Casts any value to one primitive type.
#[derive(Debug, Clone)]
pub struct Caster {
    ctx: Arc<TypeContext>,
    rule: Rule,
}

/// Returns the caster for a primitive target, or `None` for `type`, `null`
/// and every complex type.
pub fn lookup_primitive_caster(ctx: &Arc<TypeContext>, typ: &Type) -> Option<Caster> {
    let rule = match typ.primitive()? {
        Primitive::Int8 => int_rule(Primitive::Int8, i8::MIN as i64, i8::MAX as i64),
        Primitive::Int16 => int_rule(Primitive::Int16, i16::MIN as i64, i16::MAX as i64),
        Primitive::Int32 => int_rule(Primitive::Int32, i32::MIN as i64, i32::MAX as i64),
        Primitive::Int64 => Rule::Int {
            target: Primitive::Int64,
            range: None,
        },
        Primitive::Uint8 => uint_rule(Primitive::Uint8, u8::MAX as u64),
        Primitive::Uint16 => uint_rule(Primitive::Uint16, u16::MAX as u64),
        Primitive::Uint32 => uint_rule(Primitive::Uint32, u32::MAX as u64),
        Primitive::Uint64 => Rule::Uint {
            target: Primitive::Uint64,
            max: None,
        },
        Primitive::Bool => Rule::Bool,
        Primitive::Float16 => Rule::Float16,
        Primitive::Float32 => Rule::Float32,
        Primitive::Float64 => Rule::Float64,
        Primitive::Ip => Rule::Ip,
        Primitive::Net => Rule::Net,
        Primitive::Duration => Rule::Duration,
        Primitive::Time => Rule::Time,
        Primitive::String => Rule::String,
        Primitive::Bytes => Rule::Bytes,
        Primitive::Type | Primitive::Null => return None,
    };
    Some(Caster {
        ctx: Arc::clone(ctx),
        rule,
    })
}

fn int_rule(target: Primitive, min: i64, max: i64) -> Rule {
    Rule::Int {
        target,
        range: Some((min, max)),
    }
}

fn uint_rule(target: Primitive, max: u64) -> Rule {
    Rule::Uint {
        target,
        max: Some(max),
    }
}

impl Caster {
    pub fn target(&self) -> Primitive {
        match self.rule {
            Rule::Int { target, .. } | Rule::Uint { target, .. } => target,
            Rule::Bool => Primitive::Bool,
            Rule::Float16 => Primitive::Float16,
            Rule::Float32 => Primitive::Float32,
            Rule::Float64 => Primitive::Float64,
            Rule::Ip => Primitive::Ip,
            Rule::Net => Primitive::Net,
            Rule::Duration => Primitive::Duration,
            Rule::Time => Primitive::Time,
            Rule::String => Primitive::String,
            Rule::Bytes => Primitive::Bytes,
        }
    }

    fn fail(&self, val: &Value) -> Value {
        self.ctx
            .wrap_error(&format!("cannot cast to {}", self.target()), val)
    }

    fn cast_duration(&self, val: &Value) -> Value {
        match val.primitive() {
            Some(Primitive::Duration) => val.clone(),
            Some(Primitive::String) => {
                let Ok(text) = val.as_str() else {
                    return self.fail(val);
                };
                match parse_duration(text) {
                    Ok(d) => Value::duration(d),
                    Err(_) => match parse_float(text) {
                        Ok(f) => Value::duration(Duration(f as i64)),
                        Err(_) => self.fail(val),
                    },
                }
            }
            Some(p) if p.is_float() => match val.as_float() {
                Ok(f) => Value::duration(Duration(f as i64)),
                Err(_) => self.fail(val),
            },
            _ => match to_int(val) {
                Some(v) => Value::duration(Duration(v)),
                None => self.fail(val),
            },
        }
    }

    fn cast_time(&self, val: &Value) -> Value {
        match val.primitive() {
            Some(Primitive::Time) => val.clone(),
            _ if val.is_null() => Value::time(Ts(0)),
            Some(Primitive::String) => {
                let Ok(text) = val.as_str() else {
                    return self.fail(val);
                };
                match parse_ts(text) {
                    Ok(ts) => Value::time(ts),
                    Err(_) => match parse_float(text) {
                        Ok(f) => Value::time(Ts(f as i64)),
                        Err(_) => self.fail(val),
                    },
                }
            }
            Some(p) if p.is_number() => match to_int(val) {
                Some(v) => Value::time(Ts(v)),
                None => self
                    .ctx
                    .wrap_error("cannot cast to time: coerce to int failed", val),
            },
            _ => self.fail(val),
        }
    }

    fn cast_string(&self, val: &Value) -> Value {
        if val.primitive() == Some(Primitive::Bytes) {
            return match val.bytes().map(std::str::from_utf8) {
                Some(Ok(_)) => Value::new(Type::STRING, val.payload().cloned()),
                _ => self
                    .ctx
                    .wrap_error("cannot cast to string: invalid UTF-8", val),
            };
        }
        if val.typ().enum_symbols().is_some() {
            let symbol = val
                .bytes()
                .ok_or_else(|| eyre::eyre!("enum value has no selector"))
                .and_then(decode_uint)
                .and_then(|selector| val.typ().symbol(selector));
            return match symbol {
                Ok(symbol) => Value::string(symbol),
                Err(err) => self.ctx.new_error(&err),
            };
        }
        if val.is_string() {
            return val.with_type(Type::STRING);
        }
        Value::string(format_value(val))
    }
}

impl Evaluator for Caster {
    fn eval(&self, val: &Value) -> Value {
        if let Rule::Time = self.rule {
            return self.cast_time(val);
        }
        if val.is_null() {
            return Value::null(Type::Primitive(self.target()));
        }

        match self.rule {
            Rule::Int { target, range } => match to_int(val) {
                Some(v) if range.map_or(true, |(lo, hi)| (lo..=hi).contains(&v)) => {
                    Value::int(target, v)
                }
                _ => self.fail(val),
            },
            Rule::Uint { target, max } => match to_uint(val) {
                Some(v) if max.map_or(true, |hi| v <= hi) => Value::uint(target, v),
                _ => self.fail(val),
            },
            Rule::Bool => match to_bool(val) {
                Some(b) => Value::bool(b),
                None => self.fail(val),
            },
            Rule::Float16 => match to_float(val) {
                Some(f) => Value::float16(f16::from_f32(f as f32)),
                None => self.fail(val),
            },
            Rule::Float32 => match to_float(val) {
                Some(f) => Value::float32(f as f32),
                None => self.fail(val),
            },
            Rule::Float64 => match to_float(val) {
                Some(f) => Value::float64(f),
                None => self.fail(val),
            },
            Rule::Ip => match val.primitive() {
                Some(Primitive::Ip) => val.clone(),
                Some(Primitive::String) => match val.as_str().and_then(parse_ip) {
                    Ok(ip) => Value::ip(ip),
                    Err(_) => self.fail(val),
                },
                _ => self.fail(val),
            },
            Rule::Net => match val.primitive() {
                Some(Primitive::Net) => val.clone(),
                Some(Primitive::String) => match val.as_str().and_then(parse_net) {
                    Ok(net) => Value::net(net),
                    Err(_) => self.fail(val),
                },
                _ => self.fail(val),
            },
            Rule::Duration => self.cast_duration(val),
            Rule::String => self.cast_string(val),
            Rule::Bytes => Value::new(Type::BYTES, val.payload().cloned()),
            Rule::Time => self.cast_time(val),
        }
    }
}
