//! The in-memory JSON value tree.

use std::collections::BTreeMap;

/// A decoded JSON value.
///
/// Objects are keyed by their unescaped key text; the map's own (byte) order
/// is irrelevant because the canonicalizer re-sorts keys by UTF-16 code units.
/// Duplicate keys collapse at parse time, the last occurrence winning.
///
/// Numbers are IEEE-754 doubles. The decoder only ever stores finite values;
/// a non-finite `Number` built by hand is rejected by the canonicalizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Look up a member of an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }
}
