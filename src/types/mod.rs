//! # Self-Describing Type System
//!
//! Every value carries a [`Type`]. Primitive types are global and identified
//! by their [`Primitive`] tag. Complex types (records, arrays, sets, maps,
//! unions, enums, errors and named types) exist only inside a
//! [`TypeContext`], which interns them so that structurally identical
//! descriptions share one canonical handle.
//!
//! ## Identity
//!
//! | Handle | Equality |
//! |--------|----------|
//! | `Type::Primitive(p)` | tag equality |
//! | `Type::Complex(arc)` | pointer equality of the interned record |
//!
//! Comparing two handles is therefore O(1) and never structural. Handles from
//! different contexts are never equal, even when they describe the same
//! shape; use [`TypeContext::translate_type`] or a
//! [`crate::resolver::Mapper`] to move a type across contexts.
//!
//! ## Ids
//!
//! Primitive ids are fixed (`0..20`). Complex ids start at
//! [`crate::config::FIRST_COMPLEX_TYPE_ID`] and grow monotonically per
//! context, so an id is only meaningful together with its context.
//!
//! ## Usage
//!
//! ```ignore
//! use semicore::types::{Field, Type, TypeContext};
//!
//! let ctx = TypeContext::new();
//! let a = ctx.lookup_record(vec![Field::new("x", Type::INT64)])?;
//! let b = ctx.lookup_record(vec![Field::new("x", Type::INT64)])?;
//! assert_eq!(a, b);
//! ```

mod context;
mod primitive;

pub use context::TypeContext;
pub use primitive::Primitive;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use eyre::Result;

/// Canonical type handle.
#[derive(Clone)]
pub enum Type {
    Primitive(Primitive),
    Complex(Arc<ComplexType>),
}

/// Interned complex type record owned by one type context.
pub struct ComplexType {
    id: u32,
    context: u64,
    kind: ComplexKind,
}

#[derive(Debug)]
pub enum ComplexKind {
    Record(Vec<Field>),
    Array(Type),
    Set(Type),
    Map { key: Type, value: Type },
    Union(Vec<Type>),
    Enum(Vec<String>),
    Error(Type),
    Named { name: String, under: Type },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub typ: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, typ: Type) -> Self {
        Self {
            name: name.into(),
            typ,
        }
    }
}

impl ComplexType {
    pub(crate) fn new(id: u32, context: u64, kind: ComplexKind) -> Self {
        Self { id, context, kind }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> &ComplexKind {
        &self.kind
    }
}

impl Type {
    pub const UINT8: Type = Type::Primitive(Primitive::Uint8);
    pub const UINT16: Type = Type::Primitive(Primitive::Uint16);
    pub const UINT32: Type = Type::Primitive(Primitive::Uint32);
    pub const UINT64: Type = Type::Primitive(Primitive::Uint64);
    pub const INT8: Type = Type::Primitive(Primitive::Int8);
    pub const INT16: Type = Type::Primitive(Primitive::Int16);
    pub const INT32: Type = Type::Primitive(Primitive::Int32);
    pub const INT64: Type = Type::Primitive(Primitive::Int64);
    pub const DURATION: Type = Type::Primitive(Primitive::Duration);
    pub const TIME: Type = Type::Primitive(Primitive::Time);
    pub const FLOAT16: Type = Type::Primitive(Primitive::Float16);
    pub const FLOAT32: Type = Type::Primitive(Primitive::Float32);
    pub const FLOAT64: Type = Type::Primitive(Primitive::Float64);
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const BYTES: Type = Type::Primitive(Primitive::Bytes);
    pub const STRING: Type = Type::Primitive(Primitive::String);
    pub const IP: Type = Type::Primitive(Primitive::Ip);
    pub const NET: Type = Type::Primitive(Primitive::Net);
    pub const TYPE: Type = Type::Primitive(Primitive::Type);
    pub const NULL: Type = Type::Primitive(Primitive::Null);

    pub fn id(&self) -> u32 {
        match self {
            Type::Primitive(p) => p.id(),
            Type::Complex(c) => c.id,
        }
    }

    /// The primitive tag of this exact handle (named wrappers are not followed).
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            Type::Primitive(p) => Some(*p),
            Type::Complex(_) => None,
        }
    }

    pub fn kind(&self) -> Option<&ComplexKind> {
        match self {
            Type::Primitive(_) => None,
            Type::Complex(c) => Some(&c.kind),
        }
    }

    /// Context that owns this type, `None` for primitives.
    pub fn context_id(&self) -> Option<u64> {
        match self {
            Type::Primitive(_) => None,
            Type::Complex(c) => Some(c.context),
        }
    }

    /// Strips every named wrapper.
    pub fn under(&self) -> &Type {
        let mut typ = self;
        while let Some(ComplexKind::Named { under, .. }) = typ.kind() {
            typ = under;
        }
        typ
    }

    pub fn under_primitive(&self) -> Option<Primitive> {
        self.under().primitive()
    }

    pub fn is_error(&self) -> bool {
        matches!(self.under().kind(), Some(ComplexKind::Error(_)))
    }

    /// The bound name, when this handle is a named type.
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            Some(ComplexKind::Named { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn enum_symbols(&self) -> Option<&[String]> {
        match self.under().kind() {
            Some(ComplexKind::Enum(symbols)) => Some(symbols),
            _ => None,
        }
    }

    /// Resolves an enum selector to its symbol.
    pub fn symbol(&self, selector: u64) -> Result<&str> {
        let symbols = self
            .enum_symbols()
            .ok_or_else(|| eyre::eyre!("type {} is not an enum", self))?;
        symbols
            .get(selector as usize)
            .map(String::as_str)
            .ok_or_else(|| {
                eyre::eyre!(
                    "enum selector {} out of range for {} symbols",
                    selector,
                    symbols.len()
                )
            })
    }

    pub fn record_fields(&self) -> Option<&[Field]> {
        match self.under().kind() {
            Some(ComplexKind::Record(fields)) => Some(fields),
            _ => None,
        }
    }
}

impl From<Primitive> for Type {
    fn from(p: Primitive) -> Self {
        Type::Primitive(p)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Complex(a), Type::Complex(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Type::Primitive(p) => p.hash(state),
            Type::Complex(c) => (Arc::as_ptr(c) as usize).hash(state),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::value::format_type(self))
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({}#{})", crate::value::format_type(self), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_handles_compare_by_tag() {
        assert_eq!(Type::INT64, Type::from(Primitive::Int64));
        assert_ne!(Type::INT64, Type::INT32);
        assert_eq!(Type::STRING.id(), 15);
    }

    #[test]
    fn under_follows_nested_names() {
        let ctx = TypeContext::new();
        let inner = ctx.lookup_named("port", Type::UINT16).unwrap();
        let outer = ctx.lookup_named("dst_port", inner.clone()).unwrap();

        assert_eq!(outer.under(), &Type::UINT16);
        assert_eq!(outer.name(), Some("dst_port"));
        assert_eq!(inner.under_primitive(), Some(Primitive::Uint16));
    }

    #[test]
    fn enum_symbol_lookup_checks_range() {
        let ctx = TypeContext::new();
        let typ = ctx
            .lookup_enum(vec!["low".into(), "high".into()])
            .unwrap();

        assert_eq!(typ.symbol(1).unwrap(), "high");
        assert!(typ.symbol(2).is_err());
        assert!(Type::STRING.symbol(0).is_err());
    }
}
