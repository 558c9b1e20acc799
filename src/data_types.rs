use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Formatter};

pub type IntegerStorage = i64;

/// A value bound to a positional parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(IntegerStorage),
    /// Integers above `IntegerStorage::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) | Self::Unsigned(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<IntegerStorage> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Unsigned(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            structured => {
                let text = serde_json::to_string(structured).map_err(|_| std::fmt::Error)?;
                write!(f, "{}", text)
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<IntegerStorage> for Value {
    fn from(i: IntegerStorage) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i.into())
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match IntegerStorage::try_from(u) {
            Ok(i) => Self::Integer(i),
            Err(_) => Self::Unsigned(u),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_json_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 32, 1.5, "Aliya"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Boolean(true),
                Value::Integer(32),
                Value::Float(1.5),
                Value::from("Aliya")
            ]
        );
    }

    #[test]
    fn object_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"b": 1, "a": [2, "x"]}"#).unwrap();
        assert_eq!(value.type_name(), "object");
        assert_eq!(value.to_string(), r#"{"b":1,"a":[2,"x"]}"#);
    }

    #[test]
    fn large_integers_stay_exact() {
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(value, Value::Unsigned(u64::MAX));
        assert_eq!(value.type_name(), "integer");
        assert_eq!(serde_json::to_string(&value).unwrap(), "18446744073709551615");
        assert_eq!(Value::from(u64::MAX), value);
        assert_eq!(Value::from(7u64), Value::Integer(7));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("Aliya").as_str(), Some("Aliya"));
        assert_eq!(Value::from(32).as_str(), None);
        assert_eq!(Value::from(32).as_integer(), Some(32));
        assert_eq!(Value::Null.as_integer(), None);
    }

    #[test]
    fn option_converts_to_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
