//! Per-type predicate cache.
//!
//! The predicate must depend only on a value's type: the first value of each
//! type id decides the outcome for every later value of that id.

use hashbrown::HashMap;

use crate::types::Type;
use crate::value::Value;

enum Outcome {
    Match(Type),
    NoMatch,
}

pub struct Filter<P> {
    predicate: P,
    cache: HashMap<u32, Outcome>,
}

impl<P: Fn(&Value) -> bool> Filter<P> {
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            cache: HashMap::new(),
        }
    }

    pub fn matches(&mut self, val: &Value) -> bool {
        let id = val.typ().id();
        if let Some(outcome) = self.cache.get(&id) {
            return matches!(outcome, Outcome::Match(_));
        }
        let outcome = if (self.predicate)(val) {
            Outcome::Match(val.typ().clone())
        } else {
            Outcome::NoMatch
        };
        let matched = matches!(outcome, Outcome::Match(_));
        self.cache.insert(id, outcome);
        matched
    }

    /// Type that matched under `id`, if the predicate accepted it.
    pub fn matched_type(&self, id: u32) -> Option<&Type> {
        match self.cache.get(&id)? {
            Outcome::Match(typ) => Some(typ),
            Outcome::NoMatch => None,
        }
    }

    /// Number of type ids decided so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
