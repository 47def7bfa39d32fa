//! # Encoding Module
//!
//! Byte-level building blocks shared by value payloads and the columnar codec:
//!
//! - **Varint**: marker-byte length tags
//! - **Number**: canonical integer and float payloads
//! - **Container**: tagged body sequences used by complex values and column buffers

pub mod container;
pub mod number;
pub mod varint;

pub use container::{append_tagged, build_container, read_tagged, split_bodies, BodyIter};
pub use number::{
    decode_float16, decode_float32, decode_float64, decode_int, decode_uint, encode_float16,
    encode_float32, encode_float64, encode_int, encode_uint, put_int, put_uint,
};
pub use varint::{put_varint, read_varint, varint_len};
