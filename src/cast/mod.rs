//! # Casting
//!
//! Casters convert a value of any type into a value of one target type.
//! A cast never fails with `Err`: when the input cannot be represented the
//! result is an error *value* built by the type context,
//!
//! ```text
//! error({message:"cannot cast to int32",on:"not-a-number"})
//! ```
//!
//! so casts compose inside larger expressions and the failure travels with
//! the data.
//!
//! ## Module Structure
//!
//! - `coerce`: lossy native conversions shared by the casters
//! - `caster`: one [`Caster`] per primitive target, built by
//!   [`lookup_primitive_caster`]
//! - `named`: [`NamedCaster`], which re-tags a cast result with a named type
//!
//! ## Usage
//!
//! ```ignore
//! use semicore::cast::{lookup_primitive_caster, Evaluator};
//!
//! let ctx = Arc::new(TypeContext::new());
//! let caster = lookup_primitive_caster(&ctx, &Type::INT32).unwrap();
//! let out = caster.eval(&Value::string("42"));
//! ```

mod caster;
pub mod coerce;
mod named;

pub use caster::{lookup_primitive_caster, Caster};
pub use named::NamedCaster;

use crate::value::Value;

/// Something that computes a value from an input value.
pub trait Evaluator: Send + Sync {
    fn eval(&self, val: &Value) -> Value;
}

impl<F> Evaluator for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn eval(&self, val: &Value) -> Value {
        self(val)
    }
}

/// Evaluates to its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct This;

impl Evaluator for This {
    fn eval(&self, val: &Value) -> Value {
        val.clone()
    }
}
