//! The received response.
//!
//! Bodies are JSON only. A blank body is `null` so field checks against
//! a `204` fail with a missing field instead of a parse error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::{Header, Headers};

/// HTTP response as seen by extractors and checks. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Status code as received.
    pub status: u16,
    /// Headers in received order.
    #[serde(default)]
    pub headers: Headers,
    /// Parsed body.
    pub body: serde_json::Value,
    /// Body text, lossily decoded as UTF-8.
    #[serde(default)]
    pub raw_body: String,
    /// From the request leaving to the last body byte.
    #[serde(rename = "duration_ms", with = "millis")]
    pub duration: Duration,
}

impl ResponseSpec {
    /// Builds a response from what came off the wire.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if a non-blank body is not valid JSON.
    pub fn from_raw(
        status: u16,
        headers: Headers,
        bytes: &[u8],
        duration: Duration,
    ) -> Result<Self, serde_json::Error> {
        let raw_body = String::from_utf8_lossy(bytes).into_owned();
        let body = match raw_body.trim() {
            "" => serde_json::Value::Null,
            text => serde_json::from_str(text)?,
        };
        Ok(Self {
            status,
            headers,
            body,
            raw_body,
            duration,
        })
    }

    /// A canned JSON response, as served by stubs.
    #[must_use]
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        let mut headers = Headers::new();
        headers.add(Header::new("Content-Type", "application/json; charset=utf-8"));
        Self {
            status,
            headers,
            raw_body: body.to_string(),
            body,
            duration: Duration::ZERO,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Overrides the measured duration.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// First header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The raw `Content-Type` value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
