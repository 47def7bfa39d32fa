//! # semicore Configuration Module
//!
//! Centralizes the numeric configuration shared by the type registry, the
//! value encodings and the columnar codec. Interdependent values live next
//! to each other in [`constants`] and are checked at compile time.
//!
//! Runtime knobs (the spill threshold of a column writer, the start offset of
//! a backing file) are set through [`crate::vector::SpillerBuilder`], whose
//! defaults come from here.

pub mod constants;
pub use constants::*;
