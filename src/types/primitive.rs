//! # Primitive Types
//!
//! The closed set of primitive kinds. Ids are stable and double as the
//! primitive's type id inside every type context.
//!
//! | Ids | Kinds |
//! |-----|-------|
//! | 0-3 | uint8, uint16, uint32, uint64 |
//! | 4-7 | int8, int16, int32, int64 |
//! | 8-9 | duration, time (signed nanoseconds) |
//! | 10-12 | float16, float32, float64 |
//! | 13-19 | bool, bytes, string, ip, net, type, null |

use std::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Uint8 = 0,
    Uint16 = 1,
    Uint32 = 2,
    Uint64 = 3,
    Int8 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    Duration = 8,
    Time = 9,
    Float16 = 10,
    Float32 = 11,
    Float64 = 12,
    Bool = 13,
    Bytes = 14,
    String = 15,
    Ip = 16,
    Net = 17,
    Type = 18,
    Null = 19,
}

impl Primitive {
    pub const ALL: [Primitive; 20] = [
        Primitive::Uint8,
        Primitive::Uint16,
        Primitive::Uint32,
        Primitive::Uint64,
        Primitive::Int8,
        Primitive::Int16,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::Duration,
        Primitive::Time,
        Primitive::Float16,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::Bool,
        Primitive::Bytes,
        Primitive::String,
        Primitive::Ip,
        Primitive::Net,
        Primitive::Type,
        Primitive::Null,
    ];

    #[inline]
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Duration => "duration",
            Primitive::Time => "time",
            Primitive::Float16 => "float16",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Bool => "bool",
            Primitive::Bytes => "bytes",
            Primitive::String => "string",
            Primitive::Ip => "ip",
            Primitive::Net => "net",
            Primitive::Type => "type",
            Primitive::Null => "null",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Primitive::Uint8 | Primitive::Uint16 | Primitive::Uint32 | Primitive::Uint64
        )
    }

    /// Signed integers plus duration and time, which are signed nanosecond counts.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Primitive::Int8
                | Primitive::Int16
                | Primitive::Int32
                | Primitive::Int64
                | Primitive::Duration
                | Primitive::Time
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            Primitive::Float16 | Primitive::Float32 | Primitive::Float64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_unsigned() || self.is_signed()
    }

    pub fn is_number(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Primitives whose textual form needs no type decoration.
    pub fn is_implied(self) -> bool {
        matches!(
            self,
            Primitive::Int64
                | Primitive::Float64
                | Primitive::Bool
                | Primitive::Bytes
                | Primitive::String
                | Primitive::Ip
                | Primitive::Net
                | Primitive::Duration
                | Primitive::Time
                | Primitive::Type
                | Primitive::Null
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Primitive {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Primitive::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| eyre::eyre!("invalid primitive type id: {}", value))
    }
}
