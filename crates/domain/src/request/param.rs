//! Path and query parameter types

use serde::{Deserialize, Serialize};

use crate::value::ScalarValue;

/// Where a parameter ends up in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Substituted into a `{name}` placeholder of the path template.
    Path,
    /// Appended to the query string as `name=value`.
    Query,
}

/// A named parameter of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name
    pub name: String,
    /// The parameter value
    pub value: ScalarValue,
    /// Path or query parameter
    pub kind: ParamKind,
}

impl Parameter {
    /// Creates a path parameter.
    #[must_use]
    pub fn path(name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParamKind::Path,
        }
    }

    /// Creates a query parameter.
    #[must_use]
    pub fn query(name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParamKind::Query,
        }
    }

    /// Returns true for path parameters.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.kind == ParamKind::Path
    }

    /// Returns true for query parameters.
    #[must_use]
    pub fn is_query(&self) -> bool {
        self.kind == ParamKind::Query
    }
}
