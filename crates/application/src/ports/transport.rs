//! Transport port
//!
//! The runner only ever talks to the network through this trait, so scenarios
//! run unchanged against a live server or a recorded stub.

use async_trait::async_trait;
use restcheck_domain::{RequestDescriptor, ResponseSpec};
use thiserror::Error;

/// Errors raised while exchanging a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No response within the request's timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// Host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be decoded as JSON.
    #[error("response body is not valid JSON: {0}")]
    UnparseableBody(String),

    /// No route is configured for this request.
    #[error("no route for {method} {url}")]
    NoRoute {
        /// Request method.
        method: String,
        /// Request URL.
        url: String,
    },

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for sending a request and receiving its response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and waits for the full response.
    ///
    /// Non-2xx statuses are responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no usable response was received.
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseSpec, TransportError>;
}
