//! Restcheck Domain - Core types for REST API checks
//!
//! This crate defines the request builder, response extractor and assertion
//! layer of the restcheck harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod check;
pub mod config;
pub mod error;
pub mod extract;
pub mod request;
pub mod response;
pub mod testing;
pub mod value;

pub use check::{
    assert_content_type, assert_field, assert_field_compare, assert_field_exists, assert_header,
    assert_header_matches, assert_response_time, assert_status, assert_status_code, check,
    check_all,
};
pub use config::ClientConfig;
pub use error::{DomainError, DomainResult};
pub use extract::{FieldPath, extract, extract_from_json, extract_json};
pub use request::{Endpoint, HttpMethod, ParamKind, Parameter, RequestBuilder, RequestDescriptor};
pub use response::ResponseSpec;
pub use testing::{Assertion, AssertionResult, Comparison, StatusExpectation};
pub use value::{ExtractedValue, ScalarValue};
