//! # Tagged Body Sequences
//!
//! Container payloads (records, arrays, sets, maps, unions) and column
//! buffers share one layout: a sequence of tagged bodies.
//!
//! ```text
//! Body := Tag Bytes
//! Tag  := varint(0)          null body, no bytes follow
//!       | varint(len + 1)    followed by `len` bytes
//! ```

use super::varint::{put_varint, read_varint};
use eyre::{ensure, Result};

/// Appends one tagged body. `None` encodes a null.
pub fn append_tagged(buf: &mut Vec<u8>, body: Option<&[u8]>) {
    match body {
        None => put_varint(buf, 0),
        Some(bytes) => {
            put_varint(buf, bytes.len() as u64 + 1);
            buf.extend_from_slice(bytes);
        }
    }
}

/// Builds a container payload from its bodies.
pub fn build_container<'a, I>(bodies: I) -> Vec<u8>
where
    I: IntoIterator<Item = Option<&'a [u8]>>,
{
    let mut buf = Vec::new();
    for body in bodies {
        append_tagged(&mut buf, body);
    }
    buf
}

/// Reads the tagged body at `*pos`, advancing the cursor.
pub fn read_tagged<'a>(buf: &'a [u8], pos: &mut usize) -> Result<Option<&'a [u8]>> {
    let mut cursor = *pos;
    let tag = read_varint(buf, &mut cursor)?;
    if tag == 0 {
        *pos = cursor;
        return Ok(None);
    }

    let len = (tag - 1) as usize;
    let end = cursor
        .checked_add(len)
        .ok_or_else(|| eyre::eyre!("body length {} overflows", len))?;
    ensure!(
        end <= buf.len(),
        "truncated body at {}: need {} bytes, have {}",
        cursor,
        len,
        buf.len() - cursor
    );

    *pos = end;
    Ok(Some(&buf[cursor..end]))
}

/// Iterator over the bodies of a container payload.
pub struct BodyIter<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BodyIter<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl<'a> Iterator for BodyIter<'a> {
    type Item = Result<Option<&'a [u8]>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let item = read_tagged(self.buf, &mut self.pos);
        if item.is_err() {
            self.pos = self.buf.len();
        }
        Some(item)
    }
}

/// Splits a container payload into exactly `n` bodies.
pub fn split_bodies(buf: &[u8], n: usize) -> Result<Vec<Option<&[u8]>>> {
    let bodies = BodyIter::new(buf).collect::<Result<Vec<_>>>()?;
    ensure!(
        bodies.len() == n,
        "container holds {} bodies, expected {}",
        bodies.len(),
        n
    );
    Ok(bodies)
}
