//! Dotted-path lookups into metadata documents.
//!
//! A path such as `"extra.extends"` walks nested mappings one key at a
//! time. Numeric segments index into sequences. A key holding `null`
//! counts as absent, matching how the metadata descriptor treats unset
//! values.

use serde_json::Value;

use crate::{Error, Result};

/// What to return when a dotted path misses.
///
/// `Value(Value::Null)` is a real fallback that happens to be null, which is
/// observably different from `NoFallback`: the former returns `null`, the
/// latter fails with [`Error::MissingKey`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fallback {
    /// A miss is an error
    #[default]
    NoFallback,
    /// A miss returns this value
    Value(Value),
}

impl Fallback {
    /// Fallback to any value convertible into JSON.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Whether the caller supplied a fallback.
    pub fn is_given(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Find the value at `path`, or `None` when any segment is absent.
pub fn find<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;

    for key in path.split('.') {
        if key.is_empty() {
            return None;
        }

        let next = match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };

        match next {
            Some(value) if !value.is_null() => current = value,
            _ => return None,
        }
    }

    Some(current)
}

/// Resolve a lookup against `document`.
///
/// - `path == None` returns the whole document.
/// - A hit returns a copy of the addressed value.
/// - A miss returns the fallback, or fails when there is none.
pub fn resolve(document: &Value, path: Option<&str>, fallback: Fallback) -> Result<Value> {
    let Some(path) = path else {
        return Ok(document.clone());
    };

    match find(document, path) {
        Some(value) => Ok(value.clone()),
        None => match fallback {
            Fallback::Value(value) => Ok(value),
            Fallback::NoFallback => Err(Error::MissingKey {
                key: path.to_string(),
            }),
        },
    }
}

/// Render a scalar as a string.
///
/// Strings are returned as-is; numbers and booleans use their JSON text, so
/// a version written as `1.0` or `"1.0"` yields `"1.0"` either way.
pub fn scalar_to_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::InvalidType {
            key: key.to_string(),
            expected: "string",
        }),
    }
}
