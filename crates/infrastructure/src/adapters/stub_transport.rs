//! In-memory transport with canned responses.
//!
//! Routes are keyed by method and absolute URL, query string included.
//! Every request sent is recorded, matched or not.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use restcheck_application::ports::{Transport, TransportError};
use restcheck_domain::{HttpMethod, RequestDescriptor, ResponseSpec};

/// Transport answering from a fixed route table.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: HashMap<(HttpMethod, String), Result<ResponseSpec, TransportError>>,
    sent: Mutex<Vec<RequestDescriptor>>,
}

impl StubTransport {
    /// Creates a stub with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method url` with `response`.
    #[must_use]
    pub fn route(mut self, method: HttpMethod, url: impl Into<String>, response: ResponseSpec) -> Self {
        self.routes.insert((method, url.into()), Ok(response));
        self
    }

    /// Answers `GET url` with `response`.
    #[must_use]
    pub fn get(self, url: impl Into<String>, response: ResponseSpec) -> Self {
        self.route(HttpMethod::Get, url, response)
    }

    /// Answers `GET url` with a JSON body.
    #[must_use]
    pub fn get_json(self, url: impl Into<String>, status: u16, body: serde_json::Value) -> Self {
        self.get(url, ResponseSpec::json(status, body))
    }

    /// Fails `method url` with `error`.
    #[must_use]
    pub fn fail(mut self, method: HttpMethod, url: impl Into<String>, error: TransportError) -> Self {
        self.routes.insert((method, url.into()), Err(error));
        self
    }

    /// Number of configured routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Requests sent so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs sent so far, in order.
    #[must_use]
    pub fn sent_urls(&self) -> Vec<String> {
        self.sent().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseSpec, TransportError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let key = (request.method, request.url.clone());
        match self.routes.get(&key) {
            Some(outcome) => outcome.clone(),
            None => {
                tracing::warn!(method = %request.method, url = %request.url, "no stub route");
                Err(TransportError::NoRoute {
                    method: request.method.to_string(),
                    url: request.url.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_domain::{ClientConfig, RequestBuilder};
    use serde_json::json;

    fn request(path: &str) -> RequestDescriptor {
        RequestBuilder::get(path)
            .build(&ClientConfig::new("https://reqres.in"))
            .expect("request")
    }

    #[tokio::test]
    async fn test_matched_route_returns_response() {
        let stub = StubTransport::new().get_json(
            "https://reqres.in/api/users/2",
            200,
            json!({"data": {"id": 2}}),
        );

        let response = stub.send(&request("/api/users/2")).await.expect("response");

        assert_eq!(response.status, 200);
        assert_eq!(response.body["data"]["id"], 2);
        assert_eq!(stub.sent_urls(), vec!["https://reqres.in/api/users/2"]);
    }

    #[tokio::test]
    async fn test_unknown_route_is_recorded_and_fails() {
        let stub = StubTransport::new();

        let result = stub.send(&request("/api/unknown")).await;

        assert_eq!(
            result,
            Err(TransportError::NoRoute {
                method: "GET".to_string(),
                url: "https://reqres.in/api/unknown".to_string(),
            })
        );
        assert_eq!(stub.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_method_is_part_of_the_key() {
        let stub = StubTransport::new().route(
            HttpMethod::Delete,
            "https://reqres.in/api/users/2",
            ResponseSpec::json(204u16, serde_json::Value::Null),
        );

        let result = stub.send(&request("/api/users/2")).await;

        assert!(matches!(result, Err(TransportError::NoRoute { .. })));
    }

    #[tokio::test]
    async fn test_failure_route() {
        let stub = StubTransport::new().fail(
            HttpMethod::Get,
            "https://reqres.in/api/users",
            TransportError::Timeout { timeout_ms: 10 },
        );

        let result = stub.send(&request("/api/users")).await;

        assert_eq!(result, Err(TransportError::Timeout { timeout_ms: 10 }));
        assert_eq!(stub.route_count(), 1);
    }
}
