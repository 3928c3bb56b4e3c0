//! Check functions.
//!
//! Each check takes a response and an expected literal and returns an
//! [`AssertionResult`]. Checks are independent of each other and never fail
//! with an error: a missing field or an unparsable pattern is a failed result
//! carrying the message.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Number, Value};

use crate::extract::{extract, extract_json};
use crate::response::ResponseSpec;
use crate::testing::{Assertion, AssertionResult, Comparison, StatusExpectation};
use crate::value::ScalarValue;

/// Runs a single assertion against a response.
#[must_use]
pub fn check(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
    match assertion {
        Assertion::StatusCode { expected } => assert_status(response, expected),
        Assertion::Header { name, expected } => assert_header(response, name, expected),
        Assertion::HeaderMatches { name, pattern } => {
            assert_header_matches(response, name, pattern)
        }
        Assertion::ContentType { expected } => assert_content_type(response, expected),
        Assertion::Field { path, expected } => assert_field(response, path, expected.clone()),
        Assertion::FieldCompare {
            path,
            operator,
            value,
        } => assert_field_compare(response, path, *operator, value),
        Assertion::FieldExists { path } => assert_field_exists(response, path),
        Assertion::ResponseTime { max_ms } => assert_response_time(response, *max_ms),
    }
}

/// Runs every assertion, keeping all results in order.
#[must_use]
pub fn check_all(assertions: &[Assertion], response: &ResponseSpec) -> Vec<AssertionResult> {
    assertions.iter().map(|a| check(a, response)).collect()
}

/// Passes iff `response.status == expected`.
#[must_use]
pub fn assert_status_code(response: &ResponseSpec, expected: u16) -> AssertionResult {
    assert_status(response, &StatusExpectation::Exact(expected))
}

/// Passes iff the status code matches the expectation (exact, range or set).
#[must_use]
pub fn assert_status(response: &ResponseSpec, expected: &StatusExpectation) -> AssertionResult {
    let description = format!("Status code {}", expected.describe());
    let actual = response.status;

    if expected.accepts(actual) {
        AssertionResult::pass_with_value(description, actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            description,
            actual.to_string(),
            format!("Expected status {}, got {actual}", expected.describe()),
        )
    }
}

/// Passes iff header `name` is present and equals `expected`.
#[must_use]
pub fn assert_header(response: &ResponseSpec, name: &str, expected: &str) -> AssertionResult {
    let description = format!("Header '{name}' equals '{expected}'");
    match response.header(name) {
        Some(actual) if actual == expected => {
            AssertionResult::pass_with_value(description, actual)
        }
        Some(actual) => AssertionResult::fail_with_value(
            description,
            actual,
            format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
        ),
        None => AssertionResult::fail(description, format!("Header '{name}' not found")),
    }
}

/// Passes iff header `name` is present and matches the regex `pattern`.
#[must_use]
pub fn assert_header_matches(
    response: &ResponseSpec,
    name: &str,
    pattern: &str,
) -> AssertionResult {
    let description = format!("Header '{name}' matches /{pattern}/");
    let Some(actual) = response.header(name) else {
        return AssertionResult::fail(description, format!("Header '{name}' not found"));
    };

    match Regex::new(pattern) {
        Ok(regex) if regex.is_match(actual) => {
            AssertionResult::pass_with_value(description, actual)
        }
        Ok(_) => AssertionResult::fail_with_value(
            description,
            actual,
            format!("Header '{name}' value '{actual}' does not match pattern '{pattern}'"),
        ),
        Err(e) => {
            AssertionResult::fail(description, format!("Invalid regex pattern '{pattern}': {e}"))
        }
    }
}

/// Passes iff the `Content-Type` media type equals `expected`.
///
/// Parameters such as `charset` and letter case are ignored. The shorthands
/// `json`, `xml`, `html` and `text` accept every media type commonly served
/// for that format (`json` also accepts `text/json` and the javascript types).
#[must_use]
pub fn assert_content_type(response: &ResponseSpec, expected: &str) -> AssertionResult {
    let description = format!("Content-Type is '{expected}'");
    let Some(actual) = response.content_type() else {
        return AssertionResult::fail(description, "No Content-Type header present");
    };

    let accepted = accepted_media_types(expected);
    match actual.parse::<mime::Mime>() {
        Ok(parsed)
            if accepted
                .iter()
                .any(|wanted| parsed.essence_str().eq_ignore_ascii_case(wanted)) =>
        {
            AssertionResult::pass_with_value(description, actual)
        }
        Ok(parsed) => AssertionResult::fail_with_value(
            description,
            actual,
            format!(
                "Media type '{}' is not '{}'",
                parsed.essence_str(),
                accepted.join("' or '")
            ),
        ),
        Err(e) => AssertionResult::fail_with_value(
            description,
            actual,
            format!("Unparsable Content-Type '{actual}': {e}"),
        ),
    }
}

fn accepted_media_types(expected: &str) -> Vec<String> {
    let known: &[&str] = match expected.trim().to_ascii_lowercase().as_str() {
        "json" => &[
            "application/json",
            "application/javascript",
            "text/javascript",
            "text/json",
        ],
        "xml" => &["application/xml", "text/xml", "application/xhtml+xml"],
        "html" => &["text/html"],
        "text" => &["text/plain"],
        other => {
            let essence = other
                .parse::<mime::Mime>()
                .map_or_else(|_| other.to_string(), |m| m.essence_str().to_string());
            return vec![essence];
        }
    };
    known.iter().map(ToString::to_string).collect()
}

/// Extracts the field at `path` and passes iff it equals `expected`.
///
/// Integers and floats compare numerically (`2 == 2.0`). Extraction errors
/// are reported as a failed result.
#[must_use]
pub fn assert_field(
    response: &ResponseSpec,
    path: &str,
    expected: impl Into<ScalarValue>,
) -> AssertionResult {
    let expected = expected.into();
    let description = format!("Field {path} equals {}", expected.to_json());

    match extract(response, path) {
        Ok(actual) if scalars_equal(&actual, &expected) => {
            AssertionResult::pass_with_value(description, actual.to_json().to_string())
        }
        Ok(actual) => AssertionResult::fail_with_value(
            description,
            actual.to_json().to_string(),
            format!(
                "Field {path} value mismatch: expected {} {}, got {} {}",
                expected.type_name(),
                expected.to_json(),
                actual.type_name(),
                actual.to_json()
            ),
        ),
        Err(e) => AssertionResult::fail(description, e.to_string()),
    }
}

fn scalars_equal(actual: &ScalarValue, expected: &ScalarValue) -> bool {
    match (actual, expected) {
        (ScalarValue::Integer(a), ScalarValue::Float(b))
        | (ScalarValue::Float(b), ScalarValue::Integer(a)) => float_equals_integer(*b, *a),
        _ => actual == expected,
    }
}

/// Exact: a float only equals an integer it represents without rounding.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn float_equals_integer(float: f64, integer: i64) -> bool {
    float.fract() == 0.0
        && float >= i64::MIN as f64
        && float < i64::MAX as f64
        && float as i64 == integer
}

/// Passes iff the value at `path` satisfies `operator` against `expected`.
#[must_use]
pub fn assert_field_compare(
    response: &ResponseSpec,
    path: &str,
    operator: Comparison,
    expected: &Value,
) -> AssertionResult {
    let description = format!("Field {path} {operator} {expected}");

    match extract_json(response, path) {
        Ok(actual) if compare_json_values(&actual, operator, expected) => {
            AssertionResult::pass_with_value(description, actual.to_string())
        }
        Ok(actual) => AssertionResult::fail_with_value(
            description,
            actual.to_string(),
            format!("Field {path} comparison failed: {actual} {operator} {expected}"),
        ),
        Err(e) => AssertionResult::fail(description, e.to_string()),
    }
}

/// Passes iff `path` resolves against the body.
#[must_use]
pub fn assert_field_exists(response: &ResponseSpec, path: &str) -> AssertionResult {
    let description = format!("Field {path} exists");
    match extract_json(response, path) {
        Ok(actual) => AssertionResult::pass_with_value(description, actual.to_string()),
        Err(e) => AssertionResult::fail(description, e.to_string()),
    }
}

/// Passes iff the response arrived within `max_ms`.
#[must_use]
pub fn assert_response_time(response: &ResponseSpec, max_ms: u64) -> AssertionResult {
    let description = format!("Response time <= {max_ms}ms");
    let actual_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX);
    if actual_ms <= max_ms {
        AssertionResult::pass_with_value(description, format!("{actual_ms}ms"))
    } else {
        AssertionResult::fail_with_value(
            description,
            format!("{actual_ms}ms"),
            format!("Response took {actual_ms}ms, expected <= {max_ms}ms"),
        )
    }
}

fn compare_json_values(actual: &Value, operator: Comparison, expected: &Value) -> bool {
    match operator {
        Comparison::Eq => json_equal(actual, expected),
        Comparison::Ne => !json_equal(actual, expected),
        Comparison::Gt => compare_numbers(actual, expected).is_some_and(Ordering::is_gt),
        Comparison::Ge => compare_numbers(actual, expected).is_some_and(Ordering::is_ge),
        Comparison::Lt => compare_numbers(actual, expected).is_some_and(Ordering::is_lt),
        Comparison::Le => compare_numbers(actual, expected).is_some_and(Ordering::is_le),
        Comparison::Contains => match (actual, expected) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(items), _) => items.iter().any(|item| json_equal(item, expected)),
            _ => false,
        },
        Comparison::Matches => match (actual, expected) {
            (Value::String(s), Value::String(pattern)) => {
                Regex::new(pattern).is_ok_and(|re| re.is_match(s))
            }
            _ => false,
        },
    }
}

fn json_equal(a: &Value, b: &Value) -> bool {
    compare_numbers(a, b).map_or_else(|| a == b, Ordering::is_eq)
}

/// Orders two JSON numbers. Integers compare exactly; `f64` is only used
/// when either side is a float. `None` when either side is not a number.
fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    let (Value::Number(a), Value::Number(b)) = (a, b) else {
        return None;
    };
    if let (Some(x), Some(y)) = (integer_of(a), integer_of(b)) {
        return Some(x.cmp(&y));
    }
    let (x, y) = (a.as_f64()?, b.as_f64()?);
    if (x - y).abs() < f64::EPSILON {
        Some(Ordering::Equal)
    } else {
        x.partial_cmp(&y)
    }
}

fn integer_of(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}
