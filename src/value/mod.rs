//! # Values
//!
//! A [`Value`] pairs a canonical [`Type`] handle with an immutable encoded
//! payload. The absence of a payload is null; an empty payload is a real
//! value (zero, the empty string, ...).
//!
//! ## Payload Layout
//!
//! | Kind | Payload |
//! |------|---------|
//! | uint8..uint64 | little-endian, trailing zero bytes stripped |
//! | int8..int64, duration, time | zig-zag, then as unsigned |
//! | float16 / float32 / float64 | little-endian IEEE 754, 2 / 4 / 8 bytes |
//! | bool | one byte, `0` or `1` |
//! | string, bytes | raw bytes |
//! | ip | 4 or 16 address bytes |
//! | net | address bytes followed by mask bytes |
//! | enum | unsigned selector |
//! | record, array, set, map, error | tagged bodies, see [`crate::encoding::container`] |
//!
//! Payloads are reference counted [`Bytes`], so cloning a value never copies
//! its data. [`Value::copy`] detaches a value from a shared buffer.

mod compare;
mod format;
mod net;

pub use compare::{compare_values, value_compare_fn, CompareFn};
pub use format::{format_type, format_value};
pub use net::Net;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;

use bytes::Bytes;
use eyre::{bail, ensure, Result};
use half::f16;

use crate::encoding::{
    decode_float16, decode_float32, decode_float64, decode_int, decode_uint, encode_float16,
    encode_float32, encode_float64, encode_int, encode_uint,
};
use crate::nano::{Duration, Ts};
use crate::types::{Primitive, Type};

#[derive(Clone)]
pub struct Value {
    typ: Type,
    bytes: Option<Bytes>,
}

impl Value {
    pub fn new(typ: Type, bytes: Option<Bytes>) -> Self {
        Self { typ, bytes }
    }

    pub fn from_slice(typ: Type, bytes: Option<&[u8]>) -> Self {
        Self::new(typ, bytes.map(Bytes::copy_from_slice))
    }

    pub fn null(typ: Type) -> Self {
        Self::new(typ, None)
    }

    /// A signed integer of kind `p` (int8..int64, duration or time).
    pub fn int(p: Primitive, v: i64) -> Self {
        debug_assert!(p.is_signed(), "{} is not a signed kind", p);
        Self::new(Type::Primitive(p), Some(Bytes::from(encode_int(v))))
    }

    pub fn uint(p: Primitive, v: u64) -> Self {
        debug_assert!(p.is_unsigned(), "{} is not an unsigned kind", p);
        Self::new(Type::Primitive(p), Some(Bytes::from(encode_uint(v))))
    }

    pub fn float64(v: f64) -> Self {
        Self::new(Type::FLOAT64, Some(Bytes::copy_from_slice(&encode_float64(v))))
    }

    pub fn float32(v: f32) -> Self {
        Self::new(Type::FLOAT32, Some(Bytes::copy_from_slice(&encode_float32(v))))
    }

    pub fn float16(v: f16) -> Self {
        Self::new(Type::FLOAT16, Some(Bytes::copy_from_slice(&encode_float16(v))))
    }

    pub fn bool(v: bool) -> Self {
        Self::new(Type::BOOL, Some(Bytes::from_static(if v { &[1] } else { &[0] })))
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Self::new(Type::STRING, Some(Bytes::copy_from_slice(s.as_ref().as_bytes())))
    }

    /// A `bytes` value.
    pub fn blob(b: impl AsRef<[u8]>) -> Self {
        Self::new(Type::BYTES, Some(Bytes::copy_from_slice(b.as_ref())))
    }

    pub fn ip(addr: IpAddr) -> Self {
        let payload = match addr {
            IpAddr::V4(a) => Bytes::copy_from_slice(&a.octets()),
            IpAddr::V6(a) => Bytes::copy_from_slice(&a.octets()),
        };
        Self::new(Type::IP, Some(payload))
    }

    pub fn net(net: Net) -> Self {
        Self::new(Type::NET, Some(Bytes::from(net.encode())))
    }

    pub fn duration(d: Duration) -> Self {
        Self::int(Primitive::Duration, d.0)
    }

    pub fn time(ts: Ts) -> Self {
        Self::int(Primitive::Time, ts.0)
    }

    /// An enum value selecting the symbol at `selector` of `typ`.
    pub fn enum_value(typ: Type, selector: u64) -> Result<Self> {
        typ.symbol(selector)?;
        Ok(Self::new(typ, Some(Bytes::from(encode_uint(selector)))))
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.bytes.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.typ.is_error()
    }

    pub fn is_string(&self) -> bool {
        self.primitive() == Some(Primitive::String)
    }

    /// Primitive kind after stripping named wrappers.
    pub fn primitive(&self) -> Option<Primitive> {
        self.typ.under_primitive()
    }

    /// Same payload under another type.
    pub fn with_type(&self, typ: Type) -> Value {
        Value::new(typ, self.bytes.clone())
    }

    /// Deep copy that owns its payload.
    pub fn copy(&self) -> Value {
        Value::new(
            self.typ.clone(),
            self.bytes.as_ref().map(|b| Bytes::copy_from_slice(b)),
        )
    }

    fn payload_of(&self, what: &str) -> Result<&[u8]> {
        match self.bytes.as_deref() {
            Some(b) => Ok(b),
            None => bail!("cannot read {} from null {}", what, self.typ),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self.primitive() {
            Some(p) if p.is_signed() => decode_int(self.payload_of("int")?),
            _ => bail!("value of type {} is not a signed integer", self.typ),
        }
    }

    pub fn as_uint(&self) -> Result<u64> {
        match self.primitive() {
            Some(p) if p.is_unsigned() => decode_uint(self.payload_of("uint")?),
            _ if self.typ.enum_symbols().is_some() => decode_uint(self.payload_of("enum")?),
            _ => bail!("value of type {} is not an unsigned integer", self.typ),
        }
    }

    pub fn as_float(&self) -> Result<f64> {
        match self.primitive() {
            Some(Primitive::Float16) => Ok(decode_float16(self.payload_of("float16")?)?.to_f64()),
            Some(Primitive::Float32) => Ok(decode_float32(self.payload_of("float32")?)? as f64),
            Some(Primitive::Float64) => decode_float64(self.payload_of("float64")?),
            _ => bail!("value of type {} is not a float", self.typ),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        ensure!(
            self.primitive() == Some(Primitive::Bool),
            "value of type {} is not a bool",
            self.typ
        );
        match self.payload_of("bool")? {
            [b] => Ok(*b != 0),
            other => bail!("bool payload must be 1 byte, got {}", other.len()),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        ensure!(self.is_string(), "value of type {} is not a string", self.typ);
        Ok(std::str::from_utf8(self.payload_of("string")?)?)
    }

    pub fn as_ip(&self) -> Result<IpAddr> {
        ensure!(
            self.primitive() == Some(Primitive::Ip),
            "value of type {} is not an ip",
            self.typ
        );
        decode_ip(self.payload_of("ip")?)
    }

    pub fn as_net(&self) -> Result<Net> {
        ensure!(
            self.primitive() == Some(Primitive::Net),
            "value of type {} is not a net",
            self.typ
        );
        Net::decode(self.payload_of("net")?)
    }

    pub fn as_duration(&self) -> Result<Duration> {
        ensure!(
            self.primitive() == Some(Primitive::Duration),
            "value of type {} is not a duration",
            self.typ
        );
        decode_int(self.payload_of("duration")?).map(Duration)
    }

    pub fn as_time(&self) -> Result<Ts> {
        ensure!(
            self.primitive() == Some(Primitive::Time),
            "value of type {} is not a time",
            self.typ
        );
        decode_int(self.payload_of("time")?).map(Ts)
    }
}

pub(crate) fn decode_ip(bytes: &[u8]) -> Result<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into()?;
            Ok(IpAddr::from(octets))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into()?;
            Ok(IpAddr::from(octets))
        }
        n => bail!("ip payload must be 4 or 16 bytes, got {}", n),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ && self.bytes == other.bytes
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.typ.hash(state);
        self.bytes.hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", format_value(self))
    }
}
