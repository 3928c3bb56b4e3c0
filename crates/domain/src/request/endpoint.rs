//! Endpoint type: a method and a relative path template

use serde::{Deserialize, Serialize};

use super::template::placeholder_names;
use super::{Header, Headers, HttpMethod};

/// A relative path template plus the method and headers to call it with.
///
/// The base URL is not part of the endpoint; it comes from
/// [`ClientConfig`](crate::config::ClientConfig) when the request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Relative path, may contain `{name}` placeholders and a query string
    pub path: String,
    /// Endpoint-specific headers
    #[serde(default)]
    pub headers: Headers,
}

impl Endpoint {
    /// Creates an endpoint with the given method and path template.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
        }
    }

    /// Creates a GET endpoint.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Names of the placeholders in the path template.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        placeholder_names(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_endpoint() {
        let endpoint = Endpoint::get("/api/users/{total}");
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert_eq!(endpoint.placeholders(), vec!["total"]);
    }

    #[test]
    fn test_with_header() {
        let endpoint = Endpoint::get("/api/users").with_header("Accept", "application/json");
        assert_eq!(endpoint.headers.get("accept"), Some("application/json"));
    }
}
