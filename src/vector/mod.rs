//! # Columnar Vector Codec
//!
//! Values of one column are written as a stream of tagged bodies, cut into
//! segments, and appended to a shared spill sink. A column is later read
//! back from any positional byte source using only its segment map.
//!
//! ## Module Structure
//!
//! - `segment`: [`Segment`] triples and segment map persistence
//! - `spiller`: [`Spiller`], the shared output sink, and its builder
//! - `source`: the [`ReadAt`] trait for slices, files and memory maps
//! - `primitive`: untyped column writer and reader over raw payloads
//! - `typed`: writer/reader pairs for every primitive's native type
//!
//! ## Data Flow
//!
//! ```text
//! write(v) -> [tag|body][tag|body]... -> threshold reached -> Spiller::write
//!                                                              |
//!                                            Segment{offset,length,count}
//!                                                              |
//! read()   <- decode body <- load segment via ReadAt <- segmap -+
//! ```
//!
//! ## Thread Safety
//!
//! Writers and readers are single-owner. A [`SharedSpiller`] can be cloned
//! into writers on different threads; each spill takes its mutex once.

mod primitive;
mod segment;
mod source;
mod spiller;
mod typed;

pub use primitive::{PrimitiveColumn, PrimitiveReader, PrimitiveWriter};
pub use segment::{decode_segmap, encode_segmap, Segment, SegmapHeader, SegmentRecord};
pub use source::{read_exact_at, ReadAt};
pub use spiller::{SharedSpiller, Spiller, SpillerBuilder};
pub use typed::*;
