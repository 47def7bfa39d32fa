//! # Type Resolvers
//!
//! Helpers for code that sees values typed by a context it does not own.
//!
//! - [`Mapper`] maps the type ids of one foreign context onto canonical
//!   types of a local context, translating each foreign type at most once.
//! - [`Filter`] evaluates a predicate once per type id and remembers the
//!   outcome for every later value of that type.

mod filter;
mod mapper;

pub use filter::Filter;
pub use mapper::Mapper;
