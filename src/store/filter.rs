//! Equality filters over documents.
//!
//! # Design Decisions
//! - Numbers compare by value, so `5`, `5.0` and `5i64` are equal
//! - An array field matches when any of its elements matches
//! - No operators beyond equality and disjunction

use serde_json::Value;

use crate::store::Document;

/// A document predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Field equals value.
    Eq(String, Value),
    /// Any of the inner filters matches.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, expected) => doc
                .get(field)
                .map(|actual| value_matches(actual, expected))
                .unwrap_or(false),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

fn value_matches(actual: &Value, expected: &Value) -> bool {
    if values_equal(actual, expected) {
        return true;
    }
    match actual {
        Value::Array(items) if !expected.is_array() => {
            items.iter().any(|item| values_equal(item, expected))
        }
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}
