//! # Spiller
//!
//! The spiller owns the output sink for a set of column writers. Writers
//! buffer tagged bodies in memory and hand a full buffer to the spiller,
//! which appends it to the sink and returns the [`Segment`] describing where
//! it landed.
//!
//! ```text
//! sink:  | col A seg 0 | col B seg 0 | col A seg 1 | ...
//!        ^offset 0     ^offset 120   ^offset 300
//! ```
//!
//! Several writers share one spiller through [`SharedSpiller`]; their
//! segments interleave in the sink and each writer keeps its own segmap.
//!
//! ## Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | threshold | `DEFAULT_SPILL_THRESHOLD` | buffered bytes that trigger a spill |
//! | start_offset | 0 | sink offset of the first byte written |
//!
//! ```ignore
//! let spiller = Spiller::builder()
//!     .threshold(64 * 1024)
//!     .build_shared(File::create(path)?)?;
//! ```

use std::io::Write;
use std::sync::Arc;

use eyre::{ensure, Result, WrapErr};
use parking_lot::Mutex;
use tracing::trace;

use super::segment::Segment;
use crate::config::{DEFAULT_SPILL_THRESHOLD, MIN_SPILL_THRESHOLD};

pub type SharedSpiller<W> = Arc<Mutex<Spiller<W>>>;

pub struct Spiller<W: Write> {
    sink: W,
    offset: u64,
    threshold: usize,
}

impl<W: Write> Spiller<W> {
    pub fn new(sink: W, threshold: usize) -> Result<Self> {
        SpillerBuilder::new().threshold(threshold).build(sink)
    }

    pub fn builder() -> SpillerBuilder {
        SpillerBuilder::new()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Sink offset where the next segment will start.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Appends `bytes`, holding `count` bodies, as one segment.
    pub fn write(&mut self, bytes: &[u8], count: u64) -> Result<Segment> {
        self.sink
            .write_all(bytes)
            .wrap_err_with(|| format!("failed to spill {} bytes at offset {}", bytes.len(), self.offset))?;

        let segment = Segment::new(self.offset, bytes.len() as u64, count);
        self.offset += bytes.len() as u64;

        trace!(
            offset = segment.offset,
            length = segment.length,
            count = segment.count,
            "spilled segment"
        );
        Ok(segment)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().wrap_err("failed to flush spill sink")
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpillerBuilder {
    threshold: usize,
    start_offset: u64,
}

impl Default for SpillerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpillerBuilder {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_SPILL_THRESHOLD,
            start_offset: 0,
        }
    }

    /// Buffered bytes at which a writer spills a segment.
    pub fn threshold(mut self, bytes: usize) -> Self {
        self.threshold = bytes;
        self
    }

    /// Offset of the sink's current position, for sinks that already hold data.
    pub fn start_offset(mut self, offset: u64) -> Self {
        self.start_offset = offset;
        self
    }

    pub fn build<W: Write>(self, sink: W) -> Result<Spiller<W>> {
        ensure!(
            self.threshold >= MIN_SPILL_THRESHOLD,
            "spill threshold must be at least {} byte(s), got {}",
            MIN_SPILL_THRESHOLD,
            self.threshold
        );
        Ok(Spiller {
            sink,
            offset: self.start_offset,
            threshold: self.threshold,
        })
    }

    pub fn build_shared<W: Write>(self, sink: W) -> Result<SharedSpiller<W>> {
        Ok(Arc::new(Mutex::new(self.build(sink)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_contiguous() {
        let mut spiller = Spiller::new(Vec::new(), 16).unwrap();
        let a = spiller.write(b"abc", 2).unwrap();
        let b = spiller.write(b"defgh", 1).unwrap();

        assert_eq!(a, Segment::new(0, 3, 2));
        assert_eq!(b, Segment::new(3, 5, 1));
        assert_eq!(spiller.offset(), 8);
        assert_eq!(spiller.into_inner(), b"abcdefgh");
    }

    #[test]
    fn builder_applies_defaults_and_overrides() {
        let spiller = Spiller::<Vec<u8>>::builder().build(Vec::new()).unwrap();
        assert_eq!(spiller.threshold(), DEFAULT_SPILL_THRESHOLD);
        assert_eq!(spiller.offset(), 0);

        let mut spiller = Spiller::<Vec<u8>>::builder()
            .threshold(1)
            .start_offset(100)
            .build(Vec::new())
            .unwrap();
        assert_eq!(spiller.write(b"x", 1).unwrap().offset, 100);
    }

    #[test]
    fn zero_threshold_is_rejected() {
        assert!(Spiller::new(Vec::new(), 0).is_err());
    }
}
