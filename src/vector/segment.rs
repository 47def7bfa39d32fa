//! # Segments and the Segment Map
//!
//! A segment is one contiguous run of tagged bodies in a spill sink. A
//! column's layout is the ordered list of its segments (its *segmap*).
//!
//! ## Persisted Format
//!
//! ```text
//! Segmap  := Header Record*
//! Header  := magic[8] version:u32 count:u32          (16 bytes)
//! Record  := offset:u64 length:u64 count:u64        (24 bytes)
//! ```
//!
//! All integers are little-endian. Records are read and written through
//! zerocopy views, so decoding never depends on alignment.

use eyre::{ensure, Result};
use zerocopy::little_endian::{U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{SEGMAP_HEADER_SIZE, SEGMAP_MAGIC, SEGMAP_VERSION, SEGMENT_RECORD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    pub offset: u64,
    pub length: u64,
    pub count: u64,
}

impl Segment {
    pub fn new(offset: u64, length: u64, count: u64) -> Self {
        Self {
            offset,
            length,
            count,
        }
    }

    /// Offset one past the last byte of the segment.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct SegmapHeader {
    magic: [u8; 8],
    version: U32,
    count: U32,
}

const _: () = assert!(std::mem::size_of::<SegmapHeader>() == SEGMAP_HEADER_SIZE);

impl SegmapHeader {
    pub fn new(count: u32) -> Self {
        Self {
            magic: *SEGMAP_MAGIC,
            version: U32::new(SEGMAP_VERSION),
            count: U32::new(count),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= SEGMAP_HEADER_SIZE,
            "buffer too small for segmap header: {} < {}",
            bytes.len(),
            SEGMAP_HEADER_SIZE
        );
        let header = Self::ref_from_bytes(&bytes[..SEGMAP_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse segmap header: {:?}", e))?;
        ensure!(&header.magic == SEGMAP_MAGIC, "invalid segmap magic");
        ensure!(
            header.version.get() == SEGMAP_VERSION,
            "unsupported segmap version: {} (expected {})",
            header.version.get(),
            SEGMAP_VERSION
        );
        Ok(header)
    }

    zerocopy_accessors! {
        version: u32,
        count: u32,
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct SegmentRecord {
    offset: U64,
    length: U64,
    count: U64,
}

const _: () = assert!(std::mem::size_of::<SegmentRecord>() == SEGMENT_RECORD_SIZE);

impl SegmentRecord {
    zerocopy_accessors! {
        offset: u64,
        length: u64,
        count: u64,
    }
}

impl From<Segment> for SegmentRecord {
    fn from(seg: Segment) -> Self {
        Self {
            offset: U64::new(seg.offset),
            length: U64::new(seg.length),
            count: U64::new(seg.count),
        }
    }
}

impl From<&SegmentRecord> for Segment {
    fn from(rec: &SegmentRecord) -> Self {
        Segment::new(rec.offset(), rec.length(), rec.count())
    }
}

pub fn encode_segmap(segmap: &[Segment]) -> Result<Vec<u8>> {
    let count = u32::try_from(segmap.len())
        .map_err(|_| eyre::eyre!("too many segments to persist: {}", segmap.len()))?;

    let mut out = Vec::with_capacity(SEGMAP_HEADER_SIZE + segmap.len() * SEGMENT_RECORD_SIZE);
    out.extend_from_slice(SegmapHeader::new(count).as_bytes());
    for seg in segmap {
        out.extend_from_slice(SegmentRecord::from(*seg).as_bytes());
    }
    Ok(out)
}

pub fn decode_segmap(bytes: &[u8]) -> Result<Vec<Segment>> {
    let header = SegmapHeader::from_bytes(bytes)?;
    let count = header.count() as usize;
    let body = &bytes[SEGMAP_HEADER_SIZE..];
    ensure!(
        body.len() == count * SEGMENT_RECORD_SIZE,
        "segmap declares {} segments but holds {} bytes of records",
        count,
        body.len()
    );

    let records = <[SegmentRecord]>::ref_from_bytes(body)
        .map_err(|e| eyre::eyre!("failed to parse segment records: {:?}", e))?;
    Ok(records.iter().map(Segment::from).collect())
}
