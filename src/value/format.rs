//! # Canonical Text Form
//!
//! Values and types render to a compact, self-describing text:
//!
//! | Value | Text |
//! |-------|------|
//! | int64 `1` | `1` |
//! | int32 `1` | `1(int32)` |
//! | float64 `1` | `1.0` |
//! | string | `"a\"b"` |
//! | bytes | `0x01ff` |
//! | record | `{a:1,b:"x"}` |
//! | array / set / map | `[1,2]` / `\|[1,2]\|` / `\|{"k":1}\|` |
//! | error | `error("boom")` |
//! | named | `80(uint16)(=port)` |
//!
//! Primitives whose text already implies their type (int64, float64, bool,
//! strings, addresses, durations, times) are not decorated. A payload that
//! does not decode renders as `<malformed T>` instead of failing.

use std::fmt::Write;

use eyre::{bail, Result};

use super::{decode_ip, Net, Value};
use crate::encoding::{
    decode_float16, decode_float32, decode_float64, decode_int, decode_uint, split_bodies,
    BodyIter,
};
use crate::nano::{Duration, Ts};
use crate::types::{ComplexKind, Primitive, Type};

pub fn format_value(val: &Value) -> String {
    let mut out = String::new();
    match write_value(&mut out, val.typ(), val.bytes()) {
        Ok(()) => out,
        Err(_) => format!("<malformed {}>", format_type(val.typ())),
    }
}

pub fn format_type(typ: &Type) -> String {
    let mut out = String::new();
    write_type(&mut out, typ);
    out
}

fn write_type(out: &mut String, typ: &Type) {
    let kind = match typ {
        Type::Primitive(p) => {
            out.push_str(p.name());
            return;
        }
        Type::Complex(c) => c.kind(),
    };
    match kind {
        ComplexKind::Record(fields) => {
            out.push('{');
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_name(out, &field.name);
                out.push(':');
                write_type(out, &field.typ);
            }
            out.push('}');
        }
        ComplexKind::Array(elem) => {
            out.push('[');
            write_type(out, elem);
            out.push(']');
        }
        ComplexKind::Set(elem) => {
            out.push_str("|[");
            write_type(out, elem);
            out.push_str("]|");
        }
        ComplexKind::Map { key, value } => {
            out.push_str("|{");
            write_type(out, key);
            out.push(':');
            write_type(out, value);
            out.push_str("}|");
        }
        ComplexKind::Union(members) => {
            out.push('(');
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_type(out, member);
            }
            out.push(')');
        }
        ComplexKind::Enum(symbols) => {
            out.push_str("enum(");
            for (i, symbol) in symbols.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_name(out, symbol);
            }
            out.push(')');
        }
        ComplexKind::Error(inner) => {
            out.push_str("error(");
            write_type(out, inner);
            out.push(')');
        }
        ComplexKind::Named { name, under } => {
            write_name(out, name);
            out.push_str("=(");
            write_type(out, under);
            out.push(')');
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn write_name(out: &mut String, name: &str) {
    if is_identifier(name) {
        out.push_str(name);
    } else {
        write_quoted(out, name);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:04x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Shortest text that parses back to the same float; always carries a `.`
/// or an exponent so it never reads as an integer.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    format!("{:?}", v)
}

fn format_float32(v: f32) -> String {
    if v.is_finite() {
        format!("{:?}", v)
    } else {
        format_float(v as f64)
    }
}

fn write_value(out: &mut String, typ: &Type, bytes: Option<&[u8]>) -> Result<()> {
    let kind = match typ {
        Type::Primitive(p) => return write_primitive(out, *p, bytes),
        Type::Complex(c) => c.kind(),
    };

    if let ComplexKind::Named { name, under } = kind {
        write_value(out, under, bytes)?;
        out.push_str("(=");
        write_name(out, name);
        out.push(')');
        return Ok(());
    }

    let Some(bytes) = bytes else {
        out.push_str("null(");
        write_type(out, typ);
        out.push(')');
        return Ok(());
    };

    match kind {
        ComplexKind::Record(fields) => {
            out.push('{');
            let bodies = split_bodies(bytes, fields.len())?;
            for (i, (field, body)) in fields.iter().zip(bodies).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_name(out, &field.name);
                out.push(':');
                write_value(out, &field.typ, body)?;
            }
            out.push('}');
        }
        ComplexKind::Array(elem) => {
            out.push('[');
            write_elements(out, elem, bytes)?;
            out.push(']');
        }
        ComplexKind::Set(elem) => {
            out.push_str("|[");
            write_elements(out, elem, bytes)?;
            out.push_str("]|");
        }
        ComplexKind::Map { key, value } => {
            out.push_str("|{");
            let mut bodies = BodyIter::new(bytes);
            let mut first = true;
            while let Some(k) = bodies.next() {
                let Some(v) = bodies.next() else {
                    bail!("map payload has a key without a value");
                };
                if !first {
                    out.push(',');
                }
                first = false;
                write_value(out, key, k?)?;
                out.push(':');
                write_value(out, value, v?)?;
            }
            out.push_str("}|");
        }
        ComplexKind::Union(members) => {
            let bodies = split_bodies(bytes, 2)?;
            let Some(selector) = bodies[0] else {
                bail!("union value without a selector");
            };
            let selector = decode_uint(selector)?;
            let Some(member) = members.get(selector as usize) else {
                bail!("union selector {} out of range", selector);
            };
            write_value(out, member, bodies[1])?;
        }
        ComplexKind::Enum(_) => {
            let symbol = typ.symbol(decode_uint(bytes)?)?;
            write_name(out, symbol);
        }
        ComplexKind::Error(inner) => {
            out.push_str("error(");
            write_value(out, inner, Some(bytes))?;
            out.push(')');
        }
        ComplexKind::Named { .. } => unreachable!("named types handled above"),
    }
    Ok(())
}

fn write_elements(out: &mut String, elem: &Type, bytes: &[u8]) -> Result<()> {
    for (i, body) in BodyIter::new(bytes).enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, elem, body?)?;
    }
    Ok(())
}

fn write_primitive(out: &mut String, p: Primitive, bytes: Option<&[u8]>) -> Result<()> {
    match bytes {
        None => out.push_str("null"),
        Some(b) => match p {
            Primitive::Uint8 | Primitive::Uint16 | Primitive::Uint32 | Primitive::Uint64 => {
                let _ = write!(out, "{}", decode_uint(b)?);
            }
            Primitive::Int8 | Primitive::Int16 | Primitive::Int32 | Primitive::Int64 => {
                let _ = write!(out, "{}", decode_int(b)?);
            }
            Primitive::Duration => {
                let _ = write!(out, "{}", Duration(decode_int(b)?));
            }
            Primitive::Time => {
                let _ = write!(out, "{}", Ts(decode_int(b)?));
            }
            Primitive::Float16 => out.push_str(&format_float32(decode_float16(b)?.to_f32())),
            Primitive::Float32 => out.push_str(&format_float32(decode_float32(b)?)),
            Primitive::Float64 => out.push_str(&format_float(decode_float64(b)?)),
            Primitive::Bool => match b {
                [0] => out.push_str("false"),
                [_] => out.push_str("true"),
                _ => bail!("bool payload must be 1 byte"),
            },
            Primitive::Bytes => {
                out.push_str("0x");
                for byte in b {
                    let _ = write!(out, "{:02x}", byte);
                }
            }
            Primitive::String => write_quoted(out, std::str::from_utf8(b)?),
            Primitive::Ip => {
                let _ = write!(out, "{}", decode_ip(b)?);
            }
            Primitive::Net => {
                let _ = write!(out, "{}", Net::decode(b)?);
            }
            Primitive::Type => out.push_str("<type>"),
            Primitive::Null => out.push_str("null"),
        },
    }
    if !p.is_implied() {
        out.push('(');
        out.push_str(p.name());
        out.push(')');
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::build_container;
    use crate::types::{Field, TypeContext};
    use bytes::Bytes;
    use half::f16;

    #[test]
    fn implied_primitives_are_undecorated() {
        assert_eq!(Value::int(Primitive::Int64, -3).to_string(), "-3");
        assert_eq!(Value::int(Primitive::Int32, 1).to_string(), "1(int32)");
        assert_eq!(Value::uint(Primitive::Uint8, 255).to_string(), "255(uint8)");
        assert_eq!(Value::bool(false).to_string(), "false");
        assert_eq!(Value::null(Type::INT64).to_string(), "null");
        assert_eq!(Value::null(Type::INT16).to_string(), "null(int16)");
    }

    #[test]
    fn floats_always_look_like_floats() {
        assert_eq!(Value::float64(1.0).to_string(), "1.0");
        assert_eq!(Value::float64(0.25).to_string(), "0.25");
        assert_eq!(Value::float64(f64::INFINITY).to_string(), "+Inf");
        assert_eq!(Value::float64(f64::NEG_INFINITY).to_string(), "-Inf");
        assert_eq!(Value::float64(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::float32(1.5).to_string(), "1.5(float32)");
        assert_eq!(Value::float16(f16::from_f32(2.0)).to_string(), "2.0(float16)");
    }

    #[test]
    fn strings_and_bytes() {
        assert_eq!(Value::string("a\"b\n").to_string(), r#""a\"b\n""#);
        assert_eq!(Value::blob([0x01, 0xff]).to_string(), "0x01ff");
        assert_eq!(Value::blob([]).to_string(), "0x");
    }

    #[test]
    fn containers_render_their_elements() {
        let ctx = TypeContext::new();
        let rec = ctx
            .lookup_record(vec![
                Field::new("a", Type::INT64),
                Field::new("b", Type::STRING),
            ])
            .unwrap();
        let payload = build_container([Some(&[2u8][..]), Some(b"x".as_slice())]);
        let v = Value::new(rec, Some(Bytes::from(payload)));
        assert_eq!(v.to_string(), r#"{a:1,b:"x"}"#);

        let arr = ctx.lookup_array(Type::INT64).unwrap();
        let payload = build_container([Some(&[2u8][..]), None, Some(&[][..])]);
        let v = Value::new(arr, Some(Bytes::from(payload)));
        assert_eq!(v.to_string(), "[1,null,0]");

        let map = ctx.lookup_map(Type::STRING, Type::INT64).unwrap();
        let payload = build_container([Some(b"k".as_slice()), Some(&[4u8][..])]);
        let v = Value::new(map, Some(Bytes::from(payload)));
        assert_eq!(v.to_string(), r#"|{"k":2}|"#);
    }

    #[test]
    fn named_and_enum_values() {
        let ctx = TypeContext::new();
        let port = ctx.lookup_named("port", Type::UINT16).unwrap();
        let v = Value::uint(Primitive::Uint16, 80).with_type(port);
        assert_eq!(v.to_string(), "80(uint16)(=port)");

        let color = ctx.lookup_enum(vec!["red".into(), "green".into()]).unwrap();
        assert_eq!(Value::enum_value(color, 1).unwrap().to_string(), "green");
    }

    #[test]
    fn type_text() {
        let ctx = TypeContext::new();
        let rec = ctx
            .lookup_record(vec![Field::new("a", Type::INT64)])
            .unwrap();
        assert_eq!(format_type(&rec), "{a:int64}");
        assert_eq!(format_type(&ctx.lookup_array(Type::STRING).unwrap()), "[string]");
        assert_eq!(format_type(&ctx.lookup_set(Type::IP).unwrap()), "|[ip]|");
        assert_eq!(
            format_type(&ctx.lookup_map(Type::STRING, Type::INT64).unwrap()),
            "|{string:int64}|"
        );
        assert_eq!(
            format_type(&ctx.lookup_union(vec![Type::INT64, Type::STRING]).unwrap()),
            "(int64,string)"
        );
        assert_eq!(
            format_type(&ctx.lookup_enum(vec!["a".into(), "b c".into()]).unwrap()),
            r#"enum(a,"b c")"#
        );
        assert_eq!(format_type(&ctx.lookup_error(Type::STRING).unwrap()), "error(string)");
        assert_eq!(
            format_type(&ctx.lookup_named("n", Type::INT64).unwrap()),
            "n=(int64)"
        );
    }

    #[test]
    fn malformed_payloads_do_not_panic() {
        let v = Value::from_slice(Type::BOOL, Some(&[1, 2]));
        assert_eq!(v.to_string(), "<malformed bool>");
        let v = Value::from_slice(Type::STRING, Some(&[0xff, 0xfe]));
        assert_eq!(v.to_string(), "<malformed string>");
        let ctx = TypeContext::new();
        let arr = ctx.lookup_array(Type::INT64).unwrap();
        let v = Value::from_slice(arr, Some(&[9]));
        assert_eq!(v.to_string(), "<malformed [int64]>");
    }
}
