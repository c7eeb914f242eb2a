//! Filter - equality and inclusive-range predicates over document fields.
//!
//! Stores translate a [`Filter`] into their native query form; the in-memory
//! store evaluates it with [`Filter::matches`]. Comparison follows document
//! database rules: numbers compare numerically regardless of integer/float
//! representation, strings compare lexically, and values of different kinds
//! never match a range.

use std::cmp::Ordering;

use serde_json::Value;

use super::Fields;

/// A predicate on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value.
    Eq(Value),
    /// Field lies within the inclusive bounds; a missing bound is open.
    Range {
        gte: Option<Value>,
        lte: Option<Value>,
    },
}

/// A conjunction of field conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Condition::Eq(value.into())));
        self
    }

    /// Require `gte <= field <= lte`. Both bounds absent adds nothing.
    pub fn range(
        mut self,
        field: impl Into<String>,
        gte: Option<Value>,
        lte: Option<Value>,
    ) -> Self {
        if gte.is_some() || lte.is_some() {
            self.clauses
                .push((field.into(), Condition::Range { gte, lte }));
        }
        self
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the filter against a document body.
    pub fn matches(&self, fields: &Fields) -> bool {
        self.clauses.iter().all(|(name, condition)| {
            let Some(actual) = fields.get(name) else {
                return false;
            };
            match condition {
                Condition::Eq(expected) => values_equal(actual, expected),
                Condition::Range { gte, lte } => {
                    let above = gte.as_ref().map_or(true, |low| {
                        matches!(
                            compare(actual, low),
                            Some(Ordering::Greater | Ordering::Equal)
                        )
                    });
                    let below = lte.as_ref().map_or(true, |high| {
                        matches!(
                            compare(actual, high),
                            Some(Ordering::Less | Ordering::Equal)
                        )
                    });
                    above && below
                }
            }
        })
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Order two values of the same kind; `None` when they are not comparable.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
