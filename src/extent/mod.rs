//! # Spans
//!
//! A span is the closed interval `[first, last]` over values, where `first`
//! precedes `last` under the span's comparator. The comparator carries the
//! sort direction, so for a descending span `first` is the larger value.
//!
//! Spans drive range pruning: a scan keeps a span of the keys it must see
//! and skips any segment whose own span does not overlap it.
//!
//! ```text
//! asc:   first=1 ........ last=9       before(0)  after(10)
//! desc:  first=9 ........ last=1       before(10) after(0)
//! ```
//!
//! | Operation | Meaning |
//! |-----------|---------|
//! | `before(v)` | `v` sorts strictly before `first` |
//! | `after(v)` | `v` sorts strictly after `last` |
//! | `in_range(v)` | `first <= v <= last` |
//! | `overlaps(a, b)` | `[a, b]` intersects the span |
//! | `crop(s)` | shrink to the intersection, `false` when empty |
//! | `extend(v)` | grow to include `v` |

use std::fmt;

use crate::order::Order;
use crate::value::{format_value, value_compare_fn, CompareFn, Value};

pub trait Span: fmt::Display {
    fn first(&self) -> &Value;
    fn last(&self) -> &Value;
    fn before(&self, val: &Value) -> bool;
    fn after(&self, val: &Value) -> bool;
    fn in_range(&self, val: &Value) -> bool;
    fn overlaps(&self, first: &Value, last: &Value) -> bool;
    /// Intersects this span with `other`. When the intersection is empty the
    /// bounds are left inverted and `false` is returned; such a span should
    /// be discarded.
    fn crop(&mut self, other: &dyn Span) -> bool;
    fn extend(&mut self, val: &Value);
}

/// Whether two spans share at least one point, judged by `b`'s comparator.
pub fn overlaps(a: &dyn Span, b: &dyn Span) -> bool {
    !b.before(a.last()) && !b.after(a.first())
}

pub fn format_span(span: &dyn Span) -> String {
    format!(
        "first {} last {}",
        format_value(span.first()),
        format_value(span.last())
    )
}

/// A span over arbitrary values ordered by a comparator.
#[derive(Clone)]
pub struct Generic {
    first: Value,
    last: Value,
    cmp: CompareFn,
}

impl Generic {
    /// Builds a span from two bounds in either order.
    pub fn new(lower: Value, upper: Value, cmp: CompareFn) -> Self {
        let (first, last) = if cmp(&lower, &upper).is_gt() {
            (upper, lower)
        } else {
            (lower, upper)
        };
        Self { first, last, cmp }
    }

    /// Builds a span whose comparator follows `order`; nulls sort last in
    /// either direction.
    pub fn from_order(first: Value, last: Value, order: Order) -> Self {
        Self::new(first, last, value_compare_fn(order, order.is_asc()))
    }
}

impl Span for Generic {
    fn first(&self) -> &Value {
        &self.first
    }

    fn last(&self) -> &Value {
        &self.last
    }

    fn before(&self, val: &Value) -> bool {
        (self.cmp)(val, &self.first).is_lt()
    }

    fn after(&self, val: &Value) -> bool {
        (self.cmp)(val, &self.last).is_gt()
    }

    fn in_range(&self, val: &Value) -> bool {
        (self.cmp)(val, &self.first).is_ge() && (self.cmp)(val, &self.last).is_le()
    }

    fn overlaps(&self, first: &Value, last: &Value) -> bool {
        if (self.cmp)(first, &self.first).is_ge() {
            return (self.cmp)(first, &self.last).is_le();
        }
        (self.cmp)(last, &self.first).is_ge()
    }

    fn crop(&mut self, other: &dyn Span) -> bool {
        if (self.cmp)(other.first(), &self.first).is_gt() {
            self.first = other.first().clone();
        }
        if (self.cmp)(other.last(), &self.last).is_lt() {
            self.last = other.last().clone();
        }
        (self.cmp)(&self.first, &self.last).is_le()
    }

    fn extend(&mut self, val: &Value) {
        if (self.cmp)(val, &self.first).is_lt() {
            self.first = val.copy();
        } else if (self.cmp)(val, &self.last).is_gt() {
            self.last = val.copy();
        }
    }
}

impl fmt::Display for Generic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_span(self))
    }
}

impl fmt::Debug for Generic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generic({})", format_span(self))
    }
}
