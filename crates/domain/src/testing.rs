//! Response assertions.
//!
//! An [`Assertion`] is a check expressed as data; running it against a
//! response (see [`crate::check`]) yields an [`AssertionResult`]. Failures are
//! results, never errors.

use serde::{Deserialize, Serialize};

use crate::value::ScalarValue;

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// The status code satisfies `expected`.
    StatusCode {
        /// Accepted code, codes or range.
        expected: StatusExpectation,
    },
    /// A header is present with exactly this value.
    Header {
        /// Looked up case-insensitively.
        name: String,
        /// Compared verbatim.
        expected: String,
    },
    /// A header value matches a regular expression.
    HeaderMatches {
        /// Looked up case-insensitively.
        name: String,
        /// `regex` syntax, unanchored.
        pattern: String,
    },
    /// The media type of `Content-Type`.
    ContentType {
        /// Full media type (`application/json`) or its subtype (`json`).
        expected: String,
    },
    /// The scalar at a field path equals a literal.
    Field {
        /// Dotted path such as `data.first_name`.
        path: String,
        /// Literal to compare with.
        expected: ScalarValue,
    },
    /// The value at a field path relates to `value` through `operator`.
    FieldCompare {
        /// Dotted path.
        path: String,
        /// How `value` is compared.
        operator: Comparison,
        /// Right-hand side.
        value: serde_json::Value,
    },
    /// The field path resolves.
    FieldExists {
        /// Dotted path.
        path: String,
    },
    /// The round trip finished within a budget.
    ResponseTime {
        /// Upper bound, inclusive.
        max_ms: u64,
    },
}

impl Assertion {
    /// Status code equals `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Header `name` equals `expected`.
    #[must_use]
    pub fn header(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Header {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Content type is `expected`.
    #[must_use]
    pub fn content_type(expected: impl Into<String>) -> Self {
        Self::ContentType {
            expected: expected.into(),
        }
    }

    /// Field at `path` equals `expected`.
    #[must_use]
    pub fn field(path: impl Into<String>, expected: impl Into<ScalarValue>) -> Self {
        Self::Field {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// The label reported with the result.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.describe()),
            Self::Header { name, expected } => format!("Header '{name}' equals '{expected}'"),
            Self::HeaderMatches { name, pattern } => format!("Header '{name}' matches /{pattern}/"),
            Self::ContentType { expected } => format!("Content-Type is '{expected}'"),
            Self::Field { path, expected } => format!("Field {path} equals {}", expected.to_json()),
            Self::FieldCompare {
                path,
                operator,
                value,
            } => format!("Field {path} {operator} {value}"),
            Self::FieldExists { path } => format!("Field {path} exists"),
            Self::ResponseTime { max_ms } => format!("Response time <= {max_ms}ms"),
        }
    }
}

/// Accepted status codes.
///
/// Serialized untagged: `200`, `[200, 204]` or `{"min": 200, "max": 299}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// A single code.
    Exact(u16),
    /// Inclusive bounds.
    Range {
        /// Lowest accepted code.
        min: u16,
        /// Highest accepted code.
        max: u16,
    },
    /// Any listed code.
    AnyOf(Vec<u16>),
}

impl StatusExpectation {
    /// Any 2xx code.
    #[must_use]
    pub const fn any_2xx() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Whether `status` is accepted.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::Exact(code) => *code == status,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::AnyOf(codes) => codes.contains(&status),
        }
    }

    /// Text used in assertion descriptions, e.g. `= 200` or `in 200-299`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::AnyOf(codes) => {
                let listed = codes
                    .iter()
                    .map(u16::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("in [{listed}]")
            }
        }
    }
}

impl From<u16> for StatusExpectation {
    fn from(code: u16) -> Self {
        Self::Exact(code)
    }
}

/// Operator of a [`Assertion::FieldCompare`].
///
/// Ordering operators only apply to numbers; `contains` works on strings and
/// arrays; `matches` takes a regex string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// Substring or array element.
    Contains,
    /// Regex match on a string.
    Matches,
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Contains => "contains",
            Self::Matches => "matches",
        })
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    /// What was checked.
    pub description: String,
    /// Whether the check passed.
    pub passed: bool,
    /// The observed value, when one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Why the check failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssertionResult {
    fn new(description: impl Into<String>, actual: Option<String>, error: Option<String>) -> Self {
        Self {
            description: description.into(),
            passed: error.is_none(),
            actual,
            error,
        }
    }

    /// A passing result.
    #[must_use]
    pub fn pass(description: impl Into<String>) -> Self {
        Self::new(description, None, None)
    }

    /// A passing result that records what was observed.
    #[must_use]
    pub fn pass_with_value(description: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(description, Some(actual.into()), None)
    }

    /// A failing result with no observed value.
    #[must_use]
    pub fn fail(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(description, None, Some(error.into()))
    }

    /// A failing result that records what was observed.
    #[must_use]
    pub fn fail_with_value(
        description: impl Into<String>,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::new(description, Some(actual.into()), Some(error.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_status() {
        let expected = StatusExpectation::from(200);
        assert!(expected.accepts(200));
        assert!(!expected.accepts(400));
    }

    #[test]
    fn test_2xx_bounds_are_inclusive() {
        let expected = StatusExpectation::any_2xx();
        for status in [200, 250, 299] {
            assert!(expected.accepts(status), "{status}");
        }
        for status in [199, 300, 404] {
            assert!(!expected.accepts(status), "{status}");
        }
    }

    #[test]
    fn test_any_of_status() {
        let expected = StatusExpectation::AnyOf(vec![200, 201, 204]);
        assert!(expected.accepts(204));
        assert!(!expected.accepts(202));
        assert_eq!(expected.describe(), "in [200, 201, 204]");
    }

    #[test]
    fn test_status_expectation_deserializes_untagged() {
        let parsed: Vec<StatusExpectation> =
            serde_json::from_str(r#"[404, [200, 204], {"min": 500, "max": 599}]"#)
                .unwrap_or_default();
        assert_eq!(
            parsed,
            vec![
                StatusExpectation::Exact(404),
                StatusExpectation::AnyOf(vec![200, 204]),
                StatusExpectation::Range { min: 500, max: 599 },
            ]
        );
    }

    #[test]
    fn test_assertion_descriptions() {
        assert_eq!(Assertion::status(200).description(), "Status code = 200");
        assert_eq!(
            Assertion::field("total_pages", 2).description(),
            "Field total_pages equals 2"
        );
        assert_eq!(
            Assertion::field("data.first_name", "Rachel").description(),
            "Field data.first_name equals \"Rachel\""
        );
        assert_eq!(
            Assertion::header("Connection", "keep-alive").description(),
            "Header 'Connection' equals 'keep-alive'"
        );
        let compare = Assertion::FieldCompare {
            path: "total".to_string(),
            operator: Comparison::Ge,
            value: serde_json::json!(12),
        };
        assert_eq!(compare.description(), "Field total >= 12");
    }

    #[test]
    fn test_result_passed_tracks_error() {
        assert!(AssertionResult::pass_with_value("x", "1").passed);
        let failed = AssertionResult::fail("x", "missing");
        assert!(!failed.passed);
        assert_eq!(failed.actual, None);
    }

    #[test]
    fn test_assertion_serde_tagging() {
        let json = serde_json::to_value(Assertion::status(200)).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"type": "status_code", "expected": 200}));
    }
}
