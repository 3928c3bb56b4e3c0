//! Scalar values shared by parameters and extracted response fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed scalar: a parameter value or a field read from a JSON body.
///
/// `Display` renders the form used inside URLs: strings verbatim, numbers in
/// decimal, booleans as `true`/`false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Integral JSON number.
    Integer(i64),
    /// Non-integral JSON number.
    Float(f64),
    /// JSON boolean.
    Boolean(bool),
    /// JSON string.
    String(String),
}

/// Value extracted from a response body at a field path.
pub type ExtractedValue = ScalarValue;

impl ScalarValue {
    /// JSON type name, used in mismatch messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
        }
    }

    /// Converts the scalar into its JSON representation.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(n) => serde_json::Value::from(*n),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_for_urls() {
        assert_eq!(ScalarValue::from(12).to_string(), "12");
        assert_eq!(ScalarValue::from("Rachel").to_string(), "Rachel");
        assert_eq!(ScalarValue::from(true).to_string(), "true");
        assert_eq!(ScalarValue::from(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ScalarValue::from(12).type_name(), "integer");
        assert_eq!(ScalarValue::from(1.5).type_name(), "float");
        assert_eq!(ScalarValue::from("12").type_name(), "string");
    }

    #[test]
    fn test_to_json() {
        assert_eq!(ScalarValue::from(2).to_json(), serde_json::json!(2));
        assert_eq!(
            ScalarValue::from("george.bluth@reqres.in").to_json(),
            serde_json::json!("george.bluth@reqres.in")
        );
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<ScalarValue> = serde_json::from_str(r#"[1, "a", true, 2.5]"#)
            .unwrap_or_default();
        assert_eq!(
            values,
            vec![
                ScalarValue::Integer(1),
                ScalarValue::String("a".to_string()),
                ScalarValue::Boolean(true),
                ScalarValue::Float(2.5),
            ]
        );
    }
}
