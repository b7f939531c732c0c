//! # Attributes
//!
//! Typed attribute values understood by the engine. Rule attributes and
//! encoder options share this representation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single typed attribute value.
///
/// ## Example
///
/// ```rust
/// use cga_engine::{AttributeKind, AttributeValue};
///
/// let height = AttributeValue::from(12.5);
/// assert_eq!(height.kind(), AttributeKind::Float);
/// assert_eq!(height.as_float(), Some(12.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    String(String),
}

/// Kind tag of an [`AttributeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Bool,
    Int,
    Float,
    String,
}

/// Attribute name to value mapping, ordered by name.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

impl AttributeValue {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::String(_) => AttributeKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view: floats as-is, ints widened.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(i) => Some(f64::from(*i)),
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Bool => "bool",
            AttributeKind::Int => "int",
            AttributeKind::Float => "float",
            AttributeKind::String => "string",
        };
        f.write_str(name)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Float(n) => write!(f, "{}", n),
            AttributeValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Int(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Float(n)
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_kind() {
        assert_eq!(AttributeValue::from(true).as_bool(), Some(true));
        assert_eq!(AttributeValue::from(3).as_int(), Some(3));
        assert_eq!(AttributeValue::from("a").as_str(), Some("a"));
        assert_eq!(AttributeValue::from(3).as_float(), None);
    }

    #[test]
    fn test_as_number_widens_ints() {
        assert_eq!(AttributeValue::Int(4).as_number(), Some(4.0));
        assert_eq!(AttributeValue::Float(4.5).as_number(), Some(4.5));
        assert_eq!(AttributeValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AttributeKind::String.to_string(), "string");
        assert_eq!(AttributeValue::Int(7).to_string(), "7");
    }
}
