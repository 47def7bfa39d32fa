//! # Type Context
//!
//! A registry that interns complex types for one value universe (one reader,
//! one pipeline stage). Registration takes the write lock; lookups of an
//! already interned shape only take the read lock, and a published handle is
//! used without any lock at all.
//!
//! ## Structural Keys
//!
//! Children of a complex type are always canonical handles of the same
//! context, so a shape is keyed by its children's ids:
//!
//! ```text
//! {a:int64,b:[string]}  ->  Record([("a", 7), ("b", 30)])
//! [string]              ->  Array(15)
//! ```
//!
//! Types grow monotonically: nothing is ever removed, so ids stay valid for
//! the context's lifetime.
//!
//! ## Errors
//!
//! Contradictory registrations (duplicate field names, duplicate enum
//! symbols, a name that looks like a type id, a child handle owned by
//! another context) are reported as `eyre` errors. Typed error *values* are
//! built with [`TypeContext::wrap_error`] and [`TypeContext::new_error`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use eyre::{bail, ensure, Result};
use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::debug;

use super::{ComplexKind, ComplexType, Field, Primitive, Type};
use crate::config::{FIRST_COMPLEX_TYPE_ID, PRIMITIVE_TYPE_COUNT};
use crate::encoding::build_container;
use crate::value::Value;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, PartialEq, Eq, Hash)]
enum TypeKey {
    Record(SmallVec<[(String, u32); 8]>),
    Array(u32),
    Set(u32),
    Map(u32, u32),
    Union(SmallVec<[u32; 4]>),
    Enum(Vec<String>),
    Error(u32),
    Named(String, u32),
}

#[derive(Default)]
struct Registry {
    by_key: HashMap<TypeKey, Type>,
    by_id: Vec<Type>,
    named: HashMap<String, Type>,
}

pub struct TypeContext {
    id: u64,
    registry: RwLock<Registry>,
}

impl TypeContext {
    pub fn new() -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of complex types registered so far.
    pub fn len(&self) -> usize {
        self.registry.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type with the given id, primitive or complex.
    pub fn lookup(&self, id: u32) -> Option<Type> {
        if id < PRIMITIVE_TYPE_COUNT {
            return Primitive::try_from(id as u8).ok().map(Type::Primitive);
        }
        let index = id.checked_sub(FIRST_COMPLEX_TYPE_ID)? as usize;
        self.registry.read().by_id.get(index).cloned()
    }

    /// Latest type bound to `name`.
    pub fn lookup_by_name(&self, name: &str) -> Option<Type> {
        self.registry.read().named.get(name).cloned()
    }

    pub fn lookup_record(&self, fields: Vec<Field>) -> Result<Type> {
        let mut key = SmallVec::with_capacity(fields.len());
        {
            let mut seen = HashSet::with_capacity(fields.len());
            for field in &fields {
                ensure!(!field.name.is_empty(), "record field name must not be empty");
                ensure!(
                    seen.insert(field.name.as_str()),
                    "duplicate field '{}' in record type",
                    field.name
                );
                key.push((field.name.clone(), self.local_id(&field.typ)?));
            }
        }
        Ok(self.intern(TypeKey::Record(key), || ComplexKind::Record(fields)))
    }

    pub fn lookup_array(&self, elem: Type) -> Result<Type> {
        let key = TypeKey::Array(self.local_id(&elem)?);
        Ok(self.intern(key, || ComplexKind::Array(elem)))
    }

    pub fn lookup_set(&self, elem: Type) -> Result<Type> {
        let key = TypeKey::Set(self.local_id(&elem)?);
        Ok(self.intern(key, || ComplexKind::Set(elem)))
    }

    pub fn lookup_map(&self, key_type: Type, value_type: Type) -> Result<Type> {
        let key = TypeKey::Map(self.local_id(&key_type)?, self.local_id(&value_type)?);
        Ok(self.intern(key, || ComplexKind::Map {
            key: key_type,
            value: value_type,
        }))
    }

    pub fn lookup_union(&self, members: Vec<Type>) -> Result<Type> {
        ensure!(
            members.len() >= 2,
            "union type needs at least two members, got {}",
            members.len()
        );
        let mut key: SmallVec<[u32; 4]> = SmallVec::with_capacity(members.len());
        for member in &members {
            let id = self.local_id(member)?;
            ensure!(!key.contains(&id), "duplicate member {} in union type", member);
            key.push(id);
        }
        Ok(self.intern(TypeKey::Union(key), || ComplexKind::Union(members)))
    }

    pub fn lookup_enum(&self, symbols: Vec<String>) -> Result<Type> {
        ensure!(!symbols.is_empty(), "enum type needs at least one symbol");
        {
            let mut seen = HashSet::with_capacity(symbols.len());
            for symbol in &symbols {
                ensure!(
                    seen.insert(symbol.as_str()),
                    "duplicate symbol '{}' in enum type",
                    symbol
                );
            }
        }
        Ok(self.intern(TypeKey::Enum(symbols.clone()), || {
            ComplexKind::Enum(symbols)
        }))
    }

    pub fn lookup_error(&self, inner: Type) -> Result<Type> {
        let key = TypeKey::Error(self.local_id(&inner)?);
        Ok(self.intern(key, || ComplexKind::Error(inner)))
    }

    /// Binds `name` to `under`. Rebinding a name to a different type is
    /// allowed; [`TypeContext::lookup_by_name`] then returns the newest binding.
    /// A binding that is already current is confirmed under the read lock.
    pub fn lookup_named(&self, name: &str, under: Type) -> Result<Type> {
        ensure!(!name.is_empty(), "type name must not be empty");
        if name.parse::<i64>().is_ok() {
            bail!("invalid type name '{}': numeric names are reserved for type ids", name);
        }
        let key = TypeKey::Named(name.to_string(), self.local_id(&under)?);
        {
            let registry = self.registry.read();
            if let Some(typ) = registry.by_key.get(&key) {
                if registry.named.get(name) == Some(typ) {
                    return Ok(typ.clone());
                }
            }
        }

        let mut registry = self.registry.write();
        let typ = self.intern_locked(&mut registry, key, || ComplexKind::Named {
            name: name.to_string(),
            under,
        });
        registry.named.insert(name.to_string(), typ.clone());
        Ok(typ)
    }

    /// Recreates a type owned by any context inside this one.
    pub fn translate_type(&self, foreign: &Type) -> Result<Type> {
        let complex = match foreign {
            Type::Primitive(_) => return Ok(foreign.clone()),
            Type::Complex(c) if c.context == self.id => return Ok(foreign.clone()),
            Type::Complex(c) => c,
        };

        match complex.kind() {
            ComplexKind::Record(fields) => {
                let local = fields
                    .iter()
                    .map(|f| Ok(Field::new(f.name.clone(), self.translate_type(&f.typ)?)))
                    .collect::<Result<Vec<_>>>()?;
                self.lookup_record(local)
            }
            ComplexKind::Array(elem) => self.lookup_array(self.translate_type(elem)?),
            ComplexKind::Set(elem) => self.lookup_set(self.translate_type(elem)?),
            ComplexKind::Map { key, value } => {
                self.lookup_map(self.translate_type(key)?, self.translate_type(value)?)
            }
            ComplexKind::Union(members) => {
                let local = members
                    .iter()
                    .map(|m| self.translate_type(m))
                    .collect::<Result<Vec<_>>>()?;
                self.lookup_union(local)
            }
            ComplexKind::Enum(symbols) => self.lookup_enum(symbols.clone()),
            ComplexKind::Error(inner) => self.lookup_error(self.translate_type(inner)?),
            ComplexKind::Named { name, under } => {
                self.lookup_named(name, self.translate_type(under)?)
            }
        }
    }

    /// Builds the typed error value `error({message:string,on:<T>})` wrapping
    /// the offending input.
    pub fn wrap_error(&self, message: &str, val: &Value) -> Value {
        match self.try_wrap_error(message, val) {
            Ok(err) => err,
            Err(_) => self.new_error_message(&format!("{}: {}", message, val)),
        }
    }

    /// Builds the generic error value `error(string)` from a structural error.
    pub fn new_error(&self, err: &eyre::Report) -> Value {
        self.new_error_message(&err.to_string())
    }

    pub fn new_error_message(&self, message: &str) -> Value {
        let typ = self.intern(TypeKey::Error(Primitive::String.id()), || {
            ComplexKind::Error(Type::STRING)
        });
        Value::new(typ, Some(Bytes::copy_from_slice(message.as_bytes())))
    }

    fn try_wrap_error(&self, message: &str, val: &Value) -> Result<Value> {
        let record = self.lookup_record(vec![
            Field::new("message", Type::STRING),
            Field::new("on", val.typ().clone()),
        ])?;
        let typ = self.lookup_error(record)?;
        let payload = build_container([Some(message.as_bytes()), val.bytes()]);
        Ok(Value::new(typ, Some(Bytes::from(payload))))
    }

    fn local_id(&self, typ: &Type) -> Result<u32> {
        match typ.context_id() {
            Some(owner) if owner != self.id => bail!(
                "type {} belongs to context {}, not {}; translate it first",
                typ,
                owner,
                self.id
            ),
            _ => Ok(typ.id()),
        }
    }

    fn intern(&self, key: TypeKey, make: impl FnOnce() -> ComplexKind) -> Type {
        {
            let registry = self.registry.read();
            if let Some(typ) = registry.by_key.get(&key) {
                return typ.clone();
            }
        }

        self.intern_locked(&mut self.registry.write(), key, make)
    }

    fn intern_locked(
        &self,
        registry: &mut Registry,
        key: TypeKey,
        make: impl FnOnce() -> ComplexKind,
    ) -> Type {
        if let Some(typ) = registry.by_key.get(&key) {
            return typ.clone();
        }

        let id = FIRST_COMPLEX_TYPE_ID + registry.by_id.len() as u32;
        let typ = Type::Complex(Arc::new(ComplexType::new(id, self.id, make())));
        registry.by_id.push(typ.clone());
        registry.by_key.insert(key, typ.clone());

        debug!(context = self.id, id, kind = kind_label(&typ), "registered type");
        typ
    }
}

fn kind_label(typ: &Type) -> &'static str {
    match typ.kind() {
        Some(ComplexKind::Record(_)) => "record",
        Some(ComplexKind::Array(_)) => "array",
        Some(ComplexKind::Set(_)) => "set",
        Some(ComplexKind::Map { .. }) => "map",
        Some(ComplexKind::Union(_)) => "union",
        Some(ComplexKind::Enum(_)) => "enum",
        Some(ComplexKind::Error(_)) => "error",
        Some(ComplexKind::Named { .. }) => "named",
        None => "primitive",
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeContext")
            .field("id", &self.id)
            .field("types", &self.len())
            .finish()
    }
}
