//! Tracking values and argument lists

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Positional arguments for one queue push, wire name first
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<Value>);

impl ArgumentList {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// The wire name (`_trackEvent`, ...)
    pub fn method(&self) -> Option<&str> {
        self.0.first().and_then(Value::as_str)
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    /// JSON array form, as it would appear in `_gaq.push([...])`
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_list_json() {
        let args = ArgumentList::new(vec![
            "_trackEvent".into(),
            "Nav".into(),
            Value::Int(3),
            Value::Bool(true),
            Value::Float(2.5),
        ]);

        assert_eq!(args.to_json(), r#"["_trackEvent","Nav",3,true,2.5]"#);
        assert_eq!(args.method(), Some("_trackEvent"));
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn test_value_deserialize_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"["a", 7, 1.5, false]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Str("a".into()),
                Value::Int(7),
                Value::Float(1.5),
                Value::Bool(false)
            ]
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float(4.25).to_string(), "4.25");
        assert_eq!(Value::from("x").to_string(), "x");
    }
}
