//! Foreign-to-local type id mapping.
//!
//! A mapper serves one foreign context: its table is keyed by the foreign
//! type id, so types from two different foreign contexts must not be fed to
//! the same mapper. The local side may be shared by any number of mappers.
//! The table is sparse, so a stray id costs one entry.
//!
//! ```text
//! foreign id   local type
//!     30   ->  {a:int64}#41
//!     31   ->  [string]#42
//!     32   ->  (empty until first seen)
//! ```

use std::sync::Arc;

use eyre::{Result, WrapErr};
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::types::{Type, TypeContext};

pub struct Mapper {
    local: Arc<TypeContext>,
    table: RwLock<HashMap<u32, Type>>,
}

impl Mapper {
    pub fn new(local: Arc<TypeContext>) -> Self {
        Self {
            local,
            table: RwLock::new(HashMap::new()),
        }
    }

    pub fn local_context(&self) -> &Arc<TypeContext> {
        &self.local
    }

    /// Local type already recorded for `foreign_id`.
    pub fn map(&self, foreign_id: u32) -> Option<Type> {
        self.table.read().get(&foreign_id).cloned()
    }

    /// Translates `foreign` into the local context and records it under `id`.
    pub fn enter(&self, id: u32, foreign: &Type) -> Result<Type> {
        let local = self
            .local
            .translate_type(foreign)
            .wrap_err_with(|| format!("failed to translate foreign type {} ({})", id, foreign))?;
        self.enter_type(id, local.clone());
        Ok(local)
    }

    pub fn enter_type(&self, id: u32, typ: Type) {
        debug!(foreign_id = id, local_id = typ.id(), "mapped foreign type");
        self.table.write().insert(id, typ);
    }

    /// Local equivalent of `foreign`, translated on first sight and served
    /// from the table afterwards.
    pub fn translate(&self, foreign: &Type) -> Result<Type> {
        let id = foreign.id();
        if let Some(local) = self.map(id) {
            return Ok(local);
        }
        self.enter(id, foreign)
    }

    /// Number of foreign ids mapped so far.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}
