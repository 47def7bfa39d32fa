//! # Literal Parsing
//!
//! Text-to-native parsing used by the casters when the input is a string.
//!
//! - `literal`: numbers, bools, addresses, prefixes and durations
//! - `time`: permissive timestamp parsing
//!
//! All parsers return `eyre::Result` with the offending text in the message:
//!
//! ```ignore
//! use semicore::parsing::{parse_ip, parse_ts};
//!
//! let ip = parse_ip("10.0.0.1")?;
//! let ts = parse_ts("2024-03-01T12:00:00Z")?;
//! ```

mod literal;
mod time;

pub use literal::{
    parse_bool, parse_duration, parse_float, parse_int, parse_ip, parse_net, parse_uint,
};
pub use time::parse_ts;
