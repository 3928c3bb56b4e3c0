//! Response extractor
//!
//! Reads scalar values out of a JSON response body using dotted field paths
//! such as `total_pages`, `data.first_name` or `data.email.0`.
//!
//! Path syntax:
//! - named segments address object keys: `data.first_name`
//! - numeric segments index arrays: `data.0.email`, equivalently `data[0].email`
//! - a named segment applied to an array collects that key from every
//!   element, so `data.email.0` is the first element's email
//! - an optional leading `$` or `$.` is ignored

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::response::ResponseSpec;
use crate::value::{ExtractedValue, ScalarValue};

/// One segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key, or a key collected across array elements.
    Key(String),
    /// Array index.
    Index(usize),
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    source: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parses a field path.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFieldPath`] for an empty path, an empty
    /// segment (`a..b`) or a malformed bracket index (`a[x]`).
    pub fn parse(path: &str) -> DomainResult<Self> {
        let invalid = || DomainError::InvalidFieldPath(path.to_string());

        let trimmed = path.trim();
        let body = trimmed
            .strip_prefix("$.")
            .or_else(|| trimmed.strip_prefix('$'))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        for part in body.split('.') {
            let (name, indices) = match part.find('[') {
                Some(open) => part.split_at(open),
                None => (part, ""),
            };

            if name.is_empty() && indices.is_empty() {
                return Err(invalid());
            }
            if !name.is_empty() {
                segments.push(match name.parse::<usize>() {
                    Ok(idx) => Segment::Index(idx),
                    Err(_) => Segment::Key(name.to_string()),
                });
            }

            let mut rest = indices;
            while !rest.is_empty() {
                let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
                let close = inner.find(']').ok_or_else(invalid)?;
                let idx = inner[..close].trim().parse::<usize>().map_err(|_| invalid())?;
                segments.push(Segment::Index(idx));
                rest = &inner[close + 1..];
            }
        }

        Ok(Self {
            source: path.to_string(),
            segments,
        })
    }

    /// The path as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolves the path against a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FieldNotFound`] if any segment does not resolve.
    pub fn resolve(&self, root: &Value) -> DomainResult<Value> {
        let not_found = || DomainError::FieldNotFound(self.source.clone());
        let mut current = root.clone();

        for segment in &self.segments {
            current = match (segment, &current) {
                (Segment::Key(key), Value::Object(map)) => {
                    map.get(key).cloned().ok_or_else(not_found)?
                }
                (Segment::Key(key), Value::Array(items)) => {
                    let collected: Vec<Option<&Value>> =
                        items.iter().map(|item| item.get(key)).collect();
                    if collected.iter().all(Option::is_none) {
                        return Err(not_found());
                    }
                    Value::Array(
                        collected
                            .into_iter()
                            .map(|v| v.cloned().unwrap_or(Value::Null))
                            .collect(),
                    )
                }
                (Segment::Index(idx), Value::Array(items)) => {
                    items.get(*idx).cloned().ok_or_else(not_found)?
                }
                _ => return Err(not_found()),
            };
        }

        Ok(current)
    }
}

impl FromStr for FieldPath {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Extracts the scalar at `field_path` from the response body.
///
/// # Errors
///
/// - [`DomainError::InvalidFieldPath`] if the path does not parse
/// - [`DomainError::FieldNotFound`] if a segment does not resolve
/// - [`DomainError::UnsupportedType`] if the leaf is an object, array or null
pub fn extract(response: &ResponseSpec, field_path: &str) -> DomainResult<ExtractedValue> {
    extract_from_json(&response.body, field_path)
}

/// Extracts the scalar at `field_path` from a JSON document.
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_from_json(root: &Value, field_path: &str) -> DomainResult<ExtractedValue> {
    let path = FieldPath::parse(field_path)?;
    let leaf = path.resolve(root)?;
    to_scalar(&leaf, field_path)
}

/// Extracts the raw JSON value at `field_path`, scalar or not.
///
/// # Errors
///
/// [`DomainError::InvalidFieldPath`] or [`DomainError::FieldNotFound`].
pub fn extract_json(response: &ResponseSpec, field_path: &str) -> DomainResult<Value> {
    FieldPath::parse(field_path)?.resolve(&response.body)
}

fn to_scalar(value: &Value, path: &str) -> DomainResult<ScalarValue> {
    let unsupported = |found| DomainError::UnsupportedType {
        path: path.to_string(),
        found,
    };

    match value {
        Value::String(s) => Ok(ScalarValue::String(s.clone())),
        Value::Bool(b) => Ok(ScalarValue::Boolean(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ScalarValue::Integer)
            .or_else(|| n.as_f64().map(ScalarValue::Float))
            .ok_or_else(|| unsupported("number")),
        Value::Null => Err(unsupported("null")),
        Value::Array(_) => Err(unsupported("array")),
        Value::Object(_) => Err(unsupported("object")),
    }
}
