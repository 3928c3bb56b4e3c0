//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while building requests or reading responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A `{name}` placeholder in the path template has no path parameter.
    #[error("missing path parameter: {0}")]
    MissingParameter(String),

    /// Two parameters of the same kind share a name.
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// The assembled URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A field path is empty or contains an empty segment.
    #[error("invalid field path: {0:?}")]
    InvalidFieldPath(String),

    /// A field path segment did not resolve against the response body.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// The value at a field path is not a scalar.
    #[error("unsupported type at {path}: found {found}")]
    UnsupportedType {
        /// The field path that was extracted.
        path: String,
        /// JSON type found at the leaf.
        found: &'static str,
    },

    /// A step referenced a variable no earlier step bound.
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
