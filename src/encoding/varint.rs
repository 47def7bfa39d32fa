//! # Variable-Length Integer Encoding
//!
//! Length tags for tagged bodies (column buffers and container payloads) are
//! written with a marker-byte varint that favours small values:
//!
//! | Value Range              | Bytes | Layout                            |
//! |--------------------------|-------|-----------------------------------|
//! | 0 - 240                  | 1     | `[value]`                         |
//! | 241 - 2287               | 2     | `[241 + (v-240)>>8, (v-240)&FF]`  |
//! | 2288 - 67823             | 3     | `[249, (v-2288)>>8, (v-2288)&FF]` |
//! | 67824 - 16777215         | 4     | `[250, 3-byte big-endian]`        |
//! | 16777216 - 4294967295    | 5     | `[251, 4-byte big-endian]`        |
//! | 4294967296 - u64::MAX    | 9     | `[255, 8-byte big-endian]`        |
//!
//! Markers 252-254 are invalid.
//!
//! Decoding reads from a cursor (`&mut usize`) so callers walking a buffer of
//! consecutive tags do not re-slice. Truncated input is reported as an error
//! and the cursor is left untouched.

use eyre::{bail, ensure, Result};

pub fn varint_len(value: u64) -> usize {
    match value {
        0..=240 => 1,
        241..=2287 => 2,
        2288..=67823 => 3,
        67824..=0xFF_FFFF => 4,
        0x100_0000..=0xFFFF_FFFF => 5,
        _ => 9,
    }
}

/// Appends the varint encoding of `value` to `buf`.
pub fn put_varint(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=240 => buf.push(value as u8),
        241..=2287 => {
            let v = value - 240;
            buf.push(((v >> 8) + 241) as u8);
            buf.push(v as u8);
        }
        2288..=67823 => {
            let v = value - 2288;
            buf.push(249);
            buf.push((v >> 8) as u8);
            buf.push(v as u8);
        }
        67824..=0xFF_FFFF => {
            buf.push(250);
            buf.extend_from_slice(&value.to_be_bytes()[5..]);
        }
        0x100_0000..=0xFFFF_FFFF => {
            buf.push(251);
            buf.extend_from_slice(&value.to_be_bytes()[4..]);
        }
        _ => {
            buf.push(255);
            buf.extend_from_slice(&value.to_be_bytes());
        }
    }
}

/// Decodes the varint starting at `*pos` and advances the cursor past it.
pub fn read_varint(buf: &[u8], pos: &mut usize) -> Result<u64> {
    let rest = buf.get(*pos..).unwrap_or_default();
    ensure!(!rest.is_empty(), "empty buffer for varint decode at {}", *pos);

    let marker = rest[0];
    let (value, len) = match marker {
        0..=240 => (marker as u64, 1),
        241..=248 => {
            ensure!(rest.len() >= 2, "truncated 2-byte varint at {}", *pos);
            (240 + ((marker as u64 - 241) << 8) + rest[1] as u64, 2)
        }
        249 => {
            ensure!(rest.len() >= 3, "truncated 3-byte varint at {}", *pos);
            (2288 + ((rest[1] as u64) << 8) + rest[2] as u64, 3)
        }
        250 => {
            ensure!(rest.len() >= 4, "truncated 4-byte varint at {}", *pos);
            (be_uint(&rest[1..4]), 4)
        }
        251 => {
            ensure!(rest.len() >= 5, "truncated 5-byte varint at {}", *pos);
            (be_uint(&rest[1..5]), 5)
        }
        255 => {
            ensure!(rest.len() >= 9, "truncated 9-byte varint at {}", *pos);
            (be_uint(&rest[1..9]), 9)
        }
        _ => bail!("invalid varint marker: {}", marker),
    };

    *pos += len;
    Ok(value)
}

fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
}
