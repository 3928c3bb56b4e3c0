//! Client configuration
//!
//! Holds the base endpoint every relative path is resolved against, plus the
//! per-request defaults applied by the request builder.

use serde::{Deserialize, Serialize};

use crate::request::{Header, Headers};

/// Base URL of the public demo API the bundled suite targets.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration shared by every request in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL prepended to every relative path (e.g. `https://reqres.in`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent sent by the HTTP transport.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers added to every request before endpoint-specific ones.
    #[serde(default)]
    pub default_headers: Headers,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    concat!("restcheck/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            default_headers: Headers::new(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.add(Header::new(name, value));
        self
    }
}
