//! # Typed Column Writers and Readers
//!
//! Thin wrappers over the primitive writer and reader that encode and decode
//! native Rust values. The native type of each primitive:
//!
//! | Primitive | Native | Writer / Reader |
//! |-----------|--------|-----------------|
//! | int8..int64 | `i8`..`i64` | `Int8Writer` .. `Int64Reader` |
//! | uint8..uint64 | `u8`..`u64` | `Uint8Writer` .. `Uint64Reader` |
//! | float16 / 32 / 64 | `f16` / `f32` / `f64` | `Float16Writer` .. |
//! | bool | `bool` | `BoolWriter` |
//! | string | `String` | `StringWriter` |
//! | bytes | `Vec<u8>` | `BytesWriter` |
//! | ip / net | `IpAddr` / `Net` | `IpWriter`, `NetWriter` |
//! | duration / time | `Duration` / `Ts` | `DurationWriter`, `TimeWriter` |
//!
//! ```ignore
//! let mut w = Int64Writer::new(spiller.clone());
//! w.write(42)?;
//! w.flush(true)?;
//!
//! let mut r = Int64Reader::new(w.segmap().to_vec(), &file);
//! assert_eq!(r.read()?, Some(42));
//! ```

use std::io::Write;
use std::marker::PhantomData;
use std::net::IpAddr;

use bytes::Bytes;
use eyre::{bail, Result};
use half::f16;

use super::primitive::{PrimitiveColumn, PrimitiveReader, PrimitiveWriter};
use super::segment::Segment;
use super::source::ReadAt;
use super::spiller::SharedSpiller;
use crate::encoding::{
    decode_float16, decode_float32, decode_float64, decode_int, decode_uint, encode_float16,
    encode_float32, encode_float64, put_int, put_uint,
};
use crate::nano::{Duration, Ts};
use crate::types::{Primitive, Type};
use crate::value::{decode_ip, Net};

/// A native value with a canonical payload encoding for one primitive.
pub trait NativeCodec: Sized {
    const PRIMITIVE: Primitive;

    fn encode(&self, buf: &mut Vec<u8>);

    fn decode(bytes: &[u8]) -> Result<Self>;
}

macro_rules! signed_codec {
    ($($native:ty => $prim:ident),* $(,)?) => {
        $(
            impl NativeCodec for $native {
                const PRIMITIVE: Primitive = Primitive::$prim;

                fn encode(&self, buf: &mut Vec<u8>) {
                    put_int(buf, *self as i64);
                }

                fn decode(bytes: &[u8]) -> Result<Self> {
                    let v = decode_int(bytes)?;
                    <$native>::try_from(v)
                        .map_err(|_| eyre::eyre!("{} out of range for {}", v, Primitive::$prim))
                }
            }
        )*
    };
}

macro_rules! unsigned_codec {
    ($($native:ty => $prim:ident),* $(,)?) => {
        $(
            impl NativeCodec for $native {
                const PRIMITIVE: Primitive = Primitive::$prim;

                fn encode(&self, buf: &mut Vec<u8>) {
                    put_uint(buf, *self as u64);
                }

                fn decode(bytes: &[u8]) -> Result<Self> {
                    let v = decode_uint(bytes)?;
                    <$native>::try_from(v)
                        .map_err(|_| eyre::eyre!("{} out of range for {}", v, Primitive::$prim))
                }
            }
        )*
    };
}

signed_codec! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
}

unsigned_codec! {
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
}

impl NativeCodec for f16 {
    const PRIMITIVE: Primitive = Primitive::Float16;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&encode_float16(*self));
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_float16(bytes)
    }
}

impl NativeCodec for f32 {
    const PRIMITIVE: Primitive = Primitive::Float32;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&encode_float32(*self));
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_float32(bytes)
    }
}

impl NativeCodec for f64 {
    const PRIMITIVE: Primitive = Primitive::Float64;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&encode_float64(*self));
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_float64(bytes)
    }
}

impl NativeCodec for bool {
    const PRIMITIVE: Primitive = Primitive::Bool;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [b] => Ok(*b != 0),
            _ => bail!("bool payload must be 1 byte, got {}", bytes.len()),
        }
    }
}

impl NativeCodec for String {
    const PRIMITIVE: Primitive = Primitive::String;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(std::str::from_utf8(bytes)?.to_string())
    }
}

impl NativeCodec for Vec<u8> {
    const PRIMITIVE: Primitive = Primitive::Bytes;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}

impl NativeCodec for IpAddr {
    const PRIMITIVE: Primitive = Primitive::Ip;

    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            IpAddr::V4(a) => buf.extend_from_slice(&a.octets()),
            IpAddr::V6(a) => buf.extend_from_slice(&a.octets()),
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_ip(bytes)
    }
}

impl NativeCodec for Net {
    const PRIMITIVE: Primitive = Primitive::Net;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&Net::encode(self));
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Net::decode(bytes)
    }
}

impl NativeCodec for Duration {
    const PRIMITIVE: Primitive = Primitive::Duration;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_int(buf, self.0);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_int(bytes).map(Duration)
    }
}

impl NativeCodec for Ts {
    const PRIMITIVE: Primitive = Primitive::Time;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_int(buf, self.0);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        decode_int(bytes).map(Ts)
    }
}

pub struct TypedWriter<T: NativeCodec, W: Write> {
    inner: PrimitiveWriter<W>,
    scratch: Vec<u8>,
    _native: PhantomData<fn(T)>,
}

impl<T: NativeCodec, W: Write> TypedWriter<T, W> {
    pub fn new(spiller: SharedSpiller<W>) -> Self {
        Self {
            inner: PrimitiveWriter::new(Type::Primitive(T::PRIMITIVE), spiller),
            scratch: Vec::with_capacity(16),
            _native: PhantomData,
        }
    }

    pub fn write(&mut self, value: T) -> Result<()> {
        self.scratch.clear();
        value.encode(&mut self.scratch);
        self.inner.write(Some(self.scratch.as_slice()))
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.inner.write(None)
    }

    pub fn flush(&mut self, eof: bool) -> Result<()> {
        self.inner.flush(eof)
    }

    pub fn segmap(&self) -> &[Segment] {
        self.inner.segmap()
    }

    pub fn column(&self) -> PrimitiveColumn {
        self.inner.column()
    }
}

pub struct TypedReader<T: NativeCodec, R: ReadAt> {
    inner: PrimitiveReader<R>,
    _native: PhantomData<fn() -> T>,
}

impl<T: NativeCodec, R: ReadAt> TypedReader<T, R> {
    pub fn new(segmap: Vec<Segment>, reader: R) -> Self {
        let column = PrimitiveColumn::new(Type::Primitive(T::PRIMITIVE), segmap);
        Self {
            inner: PrimitiveReader::new(column, reader),
            _native: PhantomData,
        }
    }

    /// Next value, `None` at the end of the column. A null body is an error;
    /// use [`TypedReader::read_nullable`] for columns that hold nulls.
    pub fn read(&mut self) -> Result<Option<T>> {
        match self.read_nullable()? {
            None => Ok(None),
            Some(Some(v)) => Ok(Some(v)),
            Some(None) => bail!("unexpected null in {} column", T::PRIMITIVE),
        }
    }

    pub fn read_nullable(&mut self) -> Result<Option<Option<T>>> {
        let Some(body) = self.inner.read_bytes()? else {
            return Ok(None);
        };
        body.as_ref()
            .map(|b: &Bytes| T::decode(b))
            .transpose()
            .map(Some)
    }
}

macro_rules! typed_column_aliases {
    ($($name:ident => $native:ty),* $(,)?) => {
        ::paste::paste! {
            $(
                pub type [<$name Writer>]<W> = TypedWriter<$native, W>;
                pub type [<$name Reader>]<R> = TypedReader<$native, R>;
            )*
        }
    };
}

typed_column_aliases! {
    Int8 => i8,
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    Uint8 => u8,
    Uint16 => u16,
    Uint32 => u32,
    Uint64 => u64,
    Float16 => f16,
    Float32 => f32,
    Float64 => f64,
    Bool => bool,
    String => String,
    Bytes => Vec<u8>,
    Ip => IpAddr,
    Net => Net,
    Duration => Duration,
    Time => Ts,
}
