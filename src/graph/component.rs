//! Component payload values attached to entities
//!
//! Component payloads are opaque to the history engine: the graph stores,
//! diffs, and reports them by structural value equality without interpreting
//! their contents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single component payload.
///
/// The variants cover the value shapes callers attach in practice; nesting
/// through `Array` and `Map` is unrestricted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Unix timestamp in milliseconds
    DateTime(i64),
    Array(Vec<ComponentValue>),
    Map(HashMap<String, ComponentValue>),
    Null,
}

impl ComponentValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ComponentValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ComponentValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ComponentValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ComponentValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ComponentValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            ComponentValue::DateTime(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ComponentValue]> {
        match self {
            ComponentValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, ComponentValue>> {
        match self {
            ComponentValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Name of the variant, used in change-record detail maps
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentValue::String(_) => "String",
            ComponentValue::Integer(_) => "Integer",
            ComponentValue::Float(_) => "Float",
            ComponentValue::Boolean(_) => "Boolean",
            ComponentValue::DateTime(_) => "DateTime",
            ComponentValue::Array(_) => "Array",
            ComponentValue::Map(_) => "Map",
            ComponentValue::Null => "Null",
        }
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentValue::String(s) => write!(f, "\"{}\"", s),
            ComponentValue::Integer(i) => write!(f, "{}", i),
            ComponentValue::Float(x) => write!(f, "{}", x),
            ComponentValue::Boolean(b) => write!(f, "{}", b),
            ComponentValue::DateTime(ts) => write!(f, "DateTime({})", ts),
            ComponentValue::Array(values) => write!(f, "Array[{} items]", values.len()),
            ComponentValue::Map(map) => write!(f, "Map[{} items]", map.len()),
            ComponentValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for ComponentValue {
    fn from(s: String) -> Self {
        ComponentValue::String(s)
    }
}

impl From<&str> for ComponentValue {
    fn from(s: &str) -> Self {
        ComponentValue::String(s.to_string())
    }
}

impl From<i64> for ComponentValue {
    fn from(i: i64) -> Self {
        ComponentValue::Integer(i)
    }
}

impl From<i32> for ComponentValue {
    fn from(i: i32) -> Self {
        ComponentValue::Integer(i as i64)
    }
}

impl From<f64> for ComponentValue {
    fn from(x: f64) -> Self {
        ComponentValue::Float(x)
    }
}

impl From<bool> for ComponentValue {
    fn from(b: bool) -> Self {
        ComponentValue::Boolean(b)
    }
}

impl From<Vec<ComponentValue>> for ComponentValue {
    fn from(values: Vec<ComponentValue>) -> Self {
        ComponentValue::Array(values)
    }
}

impl From<HashMap<String, ComponentValue>> for ComponentValue {
    fn from(map: HashMap<String, ComponentValue>) -> Self {
        ComponentValue::Map(map)
    }
}

/// Component storage on an entity: component name to payload
pub type ComponentMap = HashMap<String, ComponentValue>;
