//! # Canonical Number Encodings
//!
//! Payload encodings for numeric primitives:
//!
//! | Kind | Layout |
//! |------|--------|
//! | unsigned (uint8..uint64) | little-endian, trailing zero bytes stripped |
//! | signed (int8..int64, duration, time) | zig-zag, then as unsigned |
//! | float16 / float32 / float64 | little-endian IEEE 754, 2 / 4 / 8 bytes |
//!
//! Zero encodes as an empty payload. An empty payload is not null: null is
//! the absence of a payload and never reaches these functions.

use eyre::{ensure, Result};
use half::f16;

#[inline]
pub fn zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

#[inline]
pub fn unzigzag(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

pub fn put_uint(buf: &mut Vec<u8>, v: u64) {
    let width = 8 - (v.leading_zeros() / 8) as usize;
    buf.extend_from_slice(&v.to_le_bytes()[..width]);
}

pub fn put_int(buf: &mut Vec<u8>, v: i64) {
    put_uint(buf, zigzag(v));
}

pub fn encode_uint(v: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8);
    put_uint(&mut buf, v);
    buf
}

pub fn encode_int(v: i64) -> Vec<u8> {
    encode_uint(zigzag(v))
}

pub fn decode_uint(bytes: &[u8]) -> Result<u64> {
    ensure!(
        bytes.len() <= 8,
        "integer payload too long: {} bytes",
        bytes.len()
    );
    Ok(bytes
        .iter()
        .rev()
        .fold(0u64, |acc, b| (acc << 8) | *b as u64))
}

pub fn decode_int(bytes: &[u8]) -> Result<i64> {
    decode_uint(bytes).map(unzigzag)
}

pub fn encode_float16(v: f16) -> [u8; 2] {
    v.to_le_bytes()
}

pub fn encode_float32(v: f32) -> [u8; 4] {
    v.to_le_bytes()
}

pub fn encode_float64(v: f64) -> [u8; 8] {
    v.to_le_bytes()
}

pub fn decode_float16(bytes: &[u8]) -> Result<f16> {
    let raw: [u8; 2] = bytes
        .try_into()
        .map_err(|_| eyre::eyre!("float16 payload must be 2 bytes, got {}", bytes.len()))?;
    Ok(f16::from_le_bytes(raw))
}

pub fn decode_float32(bytes: &[u8]) -> Result<f32> {
    let raw: [u8; 4] = bytes
        .try_into()
        .map_err(|_| eyre::eyre!("float32 payload must be 4 bytes, got {}", bytes.len()))?;
    Ok(f32::from_le_bytes(raw))
}

pub fn decode_float64(bytes: &[u8]) -> Result<f64> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| eyre::eyre!("float64 payload must be 8 bytes, got {}", bytes.len()))?;
    Ok(f64::from_le_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_interleaves_signs() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        assert_eq!(unzigzag(zigzag(i64::MIN)), i64::MIN);
        assert_eq!(unzigzag(zigzag(i64::MAX)), i64::MAX);
    }

    #[test]
    fn uint_payload_strips_trailing_zeros() {
        assert!(encode_uint(0).is_empty());
        assert_eq!(encode_uint(1), vec![1]);
        assert_eq!(encode_uint(0x0100), vec![0x00, 0x01]);
        assert_eq!(encode_uint(u64::MAX).len(), 8);
    }

    #[test]
    fn int_payload_is_compact_for_small_magnitudes() {
        assert_eq!(encode_int(-1), vec![1]);
        assert_eq!(decode_int(&encode_int(-129)).unwrap(), -129);
        assert_eq!(decode_int(&[]).unwrap(), 0);
    }

    #[test]
    fn oversized_integer_payload_is_rejected() {
        assert!(decode_uint(&[0u8; 9]).is_err());
    }

    #[test]
    fn float_payload_width_is_checked() {
        assert_eq!(decode_float64(&encode_float64(2.5)).unwrap(), 2.5);
        assert_eq!(decode_float32(&encode_float32(-0.25)).unwrap(), -0.25);
        assert_eq!(
            decode_float16(&encode_float16(f16::from_f32(1.5))).unwrap(),
            f16::from_f32(1.5)
        );
        assert!(decode_float64(&[0u8; 4]).is_err());
        assert!(decode_float16(&[0u8; 3]).is_err());
    }
}
