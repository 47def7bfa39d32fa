//! # Resolver Test Suite
//!
//! Cross-context translation through [`Mapper`] and predicate caching
//! through [`Filter`].
//!
//! ## Usage
//!
//! ```sh
//! cargo test --test resolver
//! ```

use std::sync::Arc;
use std::thread;

use semicore::resolver::{Filter, Mapper};
use semicore::types::{ComplexKind, Field, Type, TypeContext};
use semicore::value::Value;

fn nested(ctx: &TypeContext) -> Type {
    let tags = ctx.lookup_set(Type::STRING).unwrap();
    let host = ctx.lookup_named("host", Type::IP).unwrap();
    let level = ctx
        .lookup_enum(vec!["info".into(), "warn".into()])
        .unwrap();
    ctx.lookup_record(vec![
        Field::new("src", host),
        Field::new("tags", tags),
        Field::new("level", level),
        Field::new("attrs", ctx.lookup_map(Type::STRING, Type::INT64).unwrap()),
    ])
    .unwrap()
}

#[test]
fn translation_is_structurally_equivalent() {
    let foreign = TypeContext::new();
    let local = Arc::new(TypeContext::new());
    let mapper = Mapper::new(local.clone());

    let remote = nested(&foreign);
    let translated = mapper.translate(&remote).unwrap();

    assert_ne!(translated, remote);
    assert_eq!(translated.to_string(), remote.to_string());
    assert_eq!(translated, nested(&local));
    assert_eq!(translated.context_id(), Some(local.id()));

    let fields = translated.record_fields().unwrap();
    assert_eq!(fields[0].typ.name(), Some("host"));
    assert!(matches!(fields[2].typ.kind(), Some(ComplexKind::Enum(_))));
}

#[test]
fn translation_is_memoised() {
    let foreign = TypeContext::new();
    let local = Arc::new(TypeContext::new());
    let mapper = Mapper::new(local.clone());

    let remote = foreign.lookup_array(Type::FLOAT64).unwrap();
    let first = mapper.translate(&remote).unwrap();
    let registered = local.len();

    for _ in 0..10 {
        assert_eq!(mapper.translate(&remote).unwrap(), first);
    }
    assert_eq!(local.len(), registered);
    assert_eq!(mapper.map(remote.id()), Some(first));
}

#[test]
fn mappers_share_one_local_context() {
    let local = Arc::new(TypeContext::new());
    let a = TypeContext::new();
    let b = TypeContext::new();
    let via_a = Mapper::new(local.clone())
        .translate(&nested(&a))
        .unwrap();
    let via_b = Mapper::new(local.clone())
        .translate(&nested(&b))
        .unwrap();
    assert_eq!(via_a, via_b);
}

#[test]
fn one_mapper_serves_identical_foreign_handles_from_memory() {
    let foreign = TypeContext::new();
    let local = Arc::new(TypeContext::new());
    let mapper = Mapper::new(local.clone());

    let remote = nested(&foreign);
    let first = mapper.translate(&remote).unwrap();
    let second = mapper.translate(&remote).unwrap();
    let registered = local.len();

    // Same shape registered in the same order: equal id, different handle.
    let twin = nested(&TypeContext::new());
    assert_eq!(twin.id(), remote.id());
    assert_ne!(twin, remote);
    let third = mapper.translate(&twin).unwrap();

    assert_eq!(first, second);
    assert_eq!(third, first);
    assert_eq!(local.len(), registered);
}

#[test]
fn concurrent_translation_agrees() {
    let foreign = Arc::new(TypeContext::new());
    let remote = nested(&foreign);
    let mapper = Arc::new(Mapper::new(Arc::new(TypeContext::new())));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mapper = Arc::clone(&mapper);
            let remote = remote.clone();
            thread::spawn(move || mapper.translate(&remote).unwrap())
        })
        .collect();
    let results: Vec<Type> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn filter_caches_per_type_id() {
    let ctx = TypeContext::new();
    let rec = ctx
        .lookup_record(vec![Field::new("a", Type::INT64)])
        .unwrap();

    let mut filter = Filter::new(|v: &Value| v.typ().record_fields().is_some());

    let row = Value::new(rec.clone(), None);
    assert!(filter.matches(&row));
    assert!(filter.matches(&row));
    assert!(!filter.matches(&Value::string("x")));
    assert_eq!(filter.cached(), 2);
    assert_eq!(filter.matched_type(rec.id()), Some(&rec));
}
