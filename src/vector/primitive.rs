//! # Primitive Columns
//!
//! A primitive column is a sequence of optional payloads of one type,
//! stored as tagged bodies (see [`crate::encoding::container`]) split into
//! segments.
//!
//! ## Writing
//!
//! `PrimitiveWriter` appends each body to an in-memory buffer. Once the
//! buffer reaches the spiller's threshold it is spilled as one segment;
//! `flush(true)` spills whatever is left at the end of the column.
//!
//! ## Reading
//!
//! `PrimitiveReader` loads one segment at a time and decodes bodies in
//! order. Every segment must hold exactly the body count recorded in the
//! segmap and no trailing bytes; anything else is reported as corruption.

use std::io::Write;

use bytes::Bytes;
use eyre::{ensure, Result, WrapErr};
use tracing::warn;

use super::segment::Segment;
use super::source::{read_exact_at, ReadAt};
use super::spiller::SharedSpiller;
use crate::config::MAX_SEGMENT_LEN;
use crate::encoding::{append_tagged, read_tagged};
use crate::types::Type;
use crate::value::Value;

/// Layout of a written column: its type and where its segments live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveColumn {
    pub typ: Type,
    pub segmap: Vec<Segment>,
}

impl PrimitiveColumn {
    pub fn new(typ: Type, segmap: Vec<Segment>) -> Self {
        Self { typ, segmap }
    }

    /// Total number of bodies across all segments.
    pub fn len(&self) -> u64 {
        self.segmap.iter().map(|s| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct PrimitiveWriter<W: Write> {
    typ: Type,
    spiller: SharedSpiller<W>,
    threshold: usize,
    bytes: Vec<u8>,
    count: u64,
    segmap: Vec<Segment>,
}

impl<W: Write> PrimitiveWriter<W> {
    pub fn new(typ: Type, spiller: SharedSpiller<W>) -> Self {
        let threshold = spiller.lock().threshold();
        Self {
            typ,
            spiller,
            threshold,
            bytes: Vec::new(),
            count: 0,
            segmap: Vec::new(),
        }
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    /// Appends one body; `None` is a null.
    pub fn write(&mut self, body: Option<&[u8]>) -> Result<()> {
        append_tagged(&mut self.bytes, body);
        self.count += 1;
        if self.bytes.len() >= self.threshold {
            self.spill()?;
        }
        Ok(())
    }

    pub fn write_value(&mut self, val: &Value) -> Result<()> {
        ensure!(
            val.typ() == &self.typ,
            "cannot write {} value to {} column",
            val.typ(),
            self.typ
        );
        self.write(val.bytes())
    }

    /// Spills the buffered tail when `eof` is set.
    pub fn flush(&mut self, eof: bool) -> Result<()> {
        if eof && !self.bytes.is_empty() {
            self.spill()?;
        }
        Ok(())
    }

    pub fn segmap(&self) -> &[Segment] {
        &self.segmap
    }

    /// Column layout as written so far.
    pub fn column(&self) -> PrimitiveColumn {
        PrimitiveColumn::new(self.typ.clone(), self.segmap.clone())
    }

    /// Bytes buffered and not yet spilled.
    pub fn buffered(&self) -> usize {
        self.bytes.len()
    }

    fn spill(&mut self) -> Result<()> {
        let segment = self
            .spiller
            .lock()
            .write(&self.bytes, self.count)
            .wrap_err_with(|| format!("failed to spill {} column", self.typ))?;
        self.segmap.push(segment);
        self.bytes.clear();
        self.count = 0;
        Ok(())
    }
}

pub struct PrimitiveReader<R: ReadAt> {
    typ: Type,
    segmap: Vec<Segment>,
    reader: R,
    next_segment: usize,
    buf: Bytes,
    pos: usize,
    remaining: u64,
}

impl<R: ReadAt> PrimitiveReader<R> {
    pub fn new(column: PrimitiveColumn, reader: R) -> Self {
        Self {
            typ: column.typ,
            segmap: column.segmap,
            reader,
            next_segment: 0,
            buf: Bytes::new(),
            pos: 0,
            remaining: 0,
        }
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    /// Next body of the column: `Ok(None)` at the end, `Ok(Some(None))` for
    /// a null.
    pub fn read_bytes(&mut self) -> Result<Option<Option<Bytes>>> {
        while self.remaining == 0 {
            if self.pos < self.buf.len() {
                return Err(self.corrupt(format!(
                    "{} trailing bytes after the last body",
                    self.buf.len() - self.pos
                )));
            }
            if !self.load_next()? {
                return Ok(None);
            }
        }

        if self.pos >= self.buf.len() {
            return Err(self.corrupt(format!("truncated: {} bodies missing", self.remaining)));
        }

        match read_tagged(&self.buf, &mut self.pos) {
            Ok(body) => {
                let body = body.map(|b| self.buf.slice_ref(b));
                self.remaining -= 1;
                Ok(Some(body))
            }
            Err(err) => {
                let segment = self.next_segment.saturating_sub(1);
                warn!(segment, pos = self.pos, error = %err, "corrupt column body");
                Err(err.wrap_err(format!("corrupt body in segment {} of {} column", segment, self.typ)))
            }
        }
    }

    pub fn read_value(&mut self) -> Result<Option<Value>> {
        Ok(self
            .read_bytes()?
            .map(|body| Value::new(self.typ.clone(), body)))
    }

    fn load_next(&mut self) -> Result<bool> {
        let Some(segment) = self.segmap.get(self.next_segment).copied() else {
            return Ok(false);
        };
        let index = self.next_segment;
        self.next_segment += 1;

        ensure!(
            segment.end().is_some(),
            "segment {} overflows: offset {} length {}",
            index,
            segment.offset,
            segment.length
        );
        if segment.length > MAX_SEGMENT_LEN {
            return Err(self.corrupt(format!(
                "length {} exceeds the {} byte limit",
                segment.length, MAX_SEGMENT_LEN
            )));
        }
        let length = usize::try_from(segment.length)
            .wrap_err_with(|| format!("segment {} length {} too large", index, segment.length))?;
        if length > 0 {
            let mut last = [0u8; 1];
            let end = segment.offset + segment.length;
            if !matches!(self.reader.read_at(&mut last, end - 1), Ok(1)) {
                return Err(self.corrupt(format!(
                    "segment ends at offset {} past the end of the source",
                    end
                )));
            }
        }

        let mut data: Vec<u8> = Vec::new();
        if data.try_reserve_exact(length).is_err() {
            return Err(self.corrupt(format!("cannot allocate {} bytes", length)));
        }
        data.resize(length, 0);
        if let Err(err) = read_exact_at(&self.reader, &mut data, segment.offset) {
            warn!(
                segment = index,
                offset = segment.offset,
                length = segment.length,
                error = %err,
                "failed to load column segment"
            );
            return Err(eyre::Report::new(err).wrap_err(format!(
                "failed to read segment {} at offset {}",
                index, segment.offset
            )));
        }

        self.buf = Bytes::from(data);
        self.pos = 0;
        self.remaining = segment.count;
        Ok(true)
    }

    fn corrupt(&self, detail: String) -> eyre::Report {
        let segment = self.next_segment.saturating_sub(1);
        warn!(segment, detail = %detail, "corrupt column segment");
        eyre::eyre!("segment {} of {} column is corrupt: {}", segment, self.typ, detail)
    }
}
