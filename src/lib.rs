//! # semicore - Semi-Structured Data Runtime Core
//!
//! semicore holds the pieces a semi-structured query engine needs below its
//! planner:
//!
//! - **Interned types**: a self-describing type system where structurally
//!   equal types share one handle, so type equality is a pointer compare
//! - **Immutable values**: a type handle plus a canonical encoded payload
//! - **Casting**: one caster per primitive target, failures returned as
//!   typed error values instead of aborting a stream
//! - **Columnar codec**: segmented, spillable column files readable from any
//!   positional byte source
//! - **Span algebra**: order-aware closed intervals for range pruning
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use semicore::cast::{lookup_primitive_caster, Evaluator};
//! use semicore::types::{Type, TypeContext};
//! use semicore::value::Value;
//!
//! let ctx = Arc::new(TypeContext::new());
//! let caster = lookup_primitive_caster(&ctx, &Type::INT32).unwrap();
//!
//! let ok = caster.eval(&Value::string("42"));
//! assert_eq!(ok.as_int()?, 42);
//!
//! let bad = caster.eval(&Value::string("not-a-number"));
//! assert!(bad.is_error());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   cast (Caster, NamedCaster)         │
//! ├──────────────────┬──────────────────┤
//! │ extent (Span)    │ resolver         │
//! ├──────────────────┴──────────────────┤
//! │   value (Value, compare, format)     │
//! ├─────────────────────────────────────┤
//! │   types (Primitive, Type, Context)   │
//! ├─────────────────────────────────────┤
//! │   encoding (varint, number, bodies)  │
//! └─────────────────────────────────────┘
//!          vector (columnar codec) sits beside
//!          value and spills to any Write sink
//! ```
//!
//! ## Errors
//!
//! Structural failures (bad registrations, corrupt segments, I/O) are
//! `eyre::Result` errors. Cast failures are ordinary values of error type,
//! detected with [`Value::is_error`].
//!
//! ## Module Overview
//!
//! - [`types`]: primitives, complex types and the [`TypeContext`] registry
//! - [`value`]: values, comparison and canonical text
//! - [`cast`]: coercion helpers and casters
//! - [`extent`]: spans and overlap tests
//! - [`vector`]: column writers, readers and the spiller
//! - [`resolver`]: cross-context type mapping and predicate caching
//! - [`parsing`]: literal and timestamp parsers
//! - [`nano`]: nanosecond durations and timestamps

#[macro_use]
mod macros;

pub mod cast;
pub mod config;
pub mod encoding;
pub mod extent;
pub mod nano;
pub mod order;
pub mod parsing;
pub mod resolver;
pub mod types;
pub mod value;
pub mod vector;

pub use cast::{lookup_primitive_caster, Caster, Evaluator, NamedCaster};
pub use extent::{overlaps, Generic, Span};
pub use order::Order;
pub use resolver::{Filter, Mapper};
pub use types::{Field, Primitive, Type, TypeContext};
pub use value::Value;
