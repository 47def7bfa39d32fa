//! # semicore Configuration Constants
//!
//! ## Dependency Graph
//!
//! ```text
//! PRIMITIVE_TYPE_COUNT (20)
//!       │
//!       └─> FIRST_COMPLEX_TYPE_ID (30, must be >=)
//!             Primitive ids and complex ids share one id space inside a
//!             type context. Ids 20..30 are reserved.
//!
//! DEFAULT_SPILL_THRESHOLD (2 MiB)
//!       │
//!       └─> MIN_SPILL_THRESHOLD (1 byte, must be <=)
//!
//! SEGMAP_HEADER_SIZE (16) + n * SEGMENT_RECORD_SIZE (24)
//!       Persisted segment map layout.
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `PRIMITIVE_TYPE_COUNT <= FIRST_COMPLEX_TYPE_ID`
//! 2. `MIN_SPILL_THRESHOLD <= DEFAULT_SPILL_THRESHOLD`
//! 3. `SEGMENT_RECORD_SIZE == 3 * size_of::<u64>()`

// ============================================================================
// Type ids
// ============================================================================

/// Number of primitive types. Primitive ids are `0..PRIMITIVE_TYPE_COUNT`.
pub const PRIMITIVE_TYPE_COUNT: u32 = 20;

/// First id handed out to a complex type registered in a type context.
pub const FIRST_COMPLEX_TYPE_ID: u32 = 30;

const _: () = assert!(PRIMITIVE_TYPE_COUNT <= FIRST_COMPLEX_TYPE_ID);

// ============================================================================
// Column spilling
// ============================================================================

/// Buffered bytes a column writer accumulates before spilling a segment.
pub const DEFAULT_SPILL_THRESHOLD: usize = 2 * 1024 * 1024;

/// Smallest accepted spill threshold.
pub const MIN_SPILL_THRESHOLD: usize = 1;

const _: () = assert!(MIN_SPILL_THRESHOLD <= DEFAULT_SPILL_THRESHOLD);

/// Largest segment a column reader will load. A segmap entry claiming more
/// is treated as corruption.
pub const MAX_SEGMENT_LEN: u64 = 1 << 32;

const _: () = assert!(DEFAULT_SPILL_THRESHOLD as u64 <= MAX_SEGMENT_LEN);

// ============================================================================
// Segment map persistence
// ============================================================================

pub const SEGMAP_MAGIC: &[u8; 8] = b"SCSEGMAP";
pub const SEGMAP_VERSION: u32 = 1;

/// magic (8) + version (4) + segment count (4)
pub const SEGMAP_HEADER_SIZE: usize = 16;

/// offset (8) + length (8) + count (8)
pub const SEGMENT_RECORD_SIZE: usize = 24;

const _: () = assert!(SEGMENT_RECORD_SIZE == 3 * std::mem::size_of::<u64>());

// ============================================================================
// Encodings
// ============================================================================

/// Longest varint produced by [`crate::encoding::put_varint`].
pub const MAX_VARINT_LEN: usize = 9;

// ============================================================================
// Durations, in nanoseconds
// ============================================================================

pub const NANOS_PER_MICRO: i64 = 1_000;
pub const NANOS_PER_MILLI: i64 = 1_000_000;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;
pub const NANOS_PER_WEEK: i64 = 7 * NANOS_PER_DAY;
pub const NANOS_PER_YEAR: i64 = 365 * NANOS_PER_DAY;
