//! Cast to a named type: evaluate the inner expression, then bind the name
//! to the underlying type of the result and re-tag its payload.

use std::sync::Arc;

use super::Evaluator;
use crate::types::TypeContext;
use crate::value::Value;

pub struct NamedCaster {
    ctx: Arc<TypeContext>,
    inner: Box<dyn Evaluator>,
    name: String,
}

impl NamedCaster {
    pub fn new(ctx: Arc<TypeContext>, inner: Box<dyn Evaluator>, name: impl Into<String>) -> Self {
        Self {
            ctx,
            inner,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Evaluator for NamedCaster {
    fn eval(&self, this: &Value) -> Value {
        let val = self.inner.eval(this);
        if val.is_error() {
            return val;
        }
        match self.ctx.lookup_named(&self.name, val.typ().under().clone()) {
            Ok(typ) => val.with_type(typ),
            Err(err) => self.ctx.new_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::{lookup_primitive_caster, This};
    use crate::types::{Primitive, Type};

    #[test]
    fn retags_the_cast_result() {
        let ctx = Arc::new(TypeContext::new());
        let inner = lookup_primitive_caster(&ctx, &Type::UINT16).unwrap();
        let caster = NamedCaster::new(Arc::clone(&ctx), Box::new(inner), "port");

        let out = caster.eval(&Value::string("443"));
        assert_eq!(out.typ().name(), Some("port"));
        assert_eq!(out.typ().under(), &Type::UINT16);
        assert_eq!(out.as_uint().unwrap(), 443);
        assert_eq!(ctx.lookup_by_name("port"), Some(out.typ().clone()));
    }

    #[test]
    fn errors_pass_through_untouched() {
        let ctx = Arc::new(TypeContext::new());
        let inner = lookup_primitive_caster(&ctx, &Type::INT8).unwrap();
        let caster = NamedCaster::new(Arc::clone(&ctx), Box::new(inner), "small");

        let out = caster.eval(&Value::int(Primitive::Int64, 1000));
        assert!(out.is_error());
        assert_eq!(out.typ().name(), None);
        assert!(ctx.lookup_by_name("small").is_none());
    }

    #[test]
    fn bad_names_become_error_values() {
        let ctx = Arc::new(TypeContext::new());
        let caster = NamedCaster::new(Arc::clone(&ctx), Box::new(This), "17");
        let out = caster.eval(&Value::int(Primitive::Int64, 1));
        assert!(out.is_error());
        assert!(out.to_string().contains("numeric names are reserved"));
    }

    #[test]
    fn renaming_a_named_value_uses_its_underlying_type() {
        let ctx = Arc::new(TypeContext::new());
        let first = ctx.lookup_named("a", Type::STRING).unwrap();
        let caster = NamedCaster::new(Arc::clone(&ctx), Box::new(This), "b");
        let out = caster.eval(&Value::string("x").with_type(first));
        assert_eq!(out.typ().name(), Some("b"));
        assert_eq!(out.typ().under(), &Type::STRING);
    }
}
