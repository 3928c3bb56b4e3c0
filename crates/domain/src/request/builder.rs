//! Request builder
//!
//! Turns an [`Endpoint`] and a set of [`Parameter`]s into an absolute
//! [`RequestDescriptor`] ready for a transport. Construction is pure: no
//! network access, no shared state.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::template::{malformed_group, parse_placeholders};
use super::{Endpoint, Headers, HttpMethod, ParamKind, Parameter};
use crate::config::ClientConfig;
use crate::error::{DomainError, DomainResult};
use crate::value::ScalarValue;

/// A fully resolved request: what the transport actually sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: String,
    /// Headers to send
    pub headers: Headers,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Builds a request descriptor from an endpoint and its parameters.
///
/// Path parameters replace matching `{name}` placeholders verbatim; path
/// parameters without a placeholder are ignored. Query parameters are
/// form-urlencoded and appended with `?` or `&` depending on whether the
/// template already carries a query string.
///
/// # Errors
///
/// - [`DomainError::DuplicateParameter`] if two parameters of one kind share a name
/// - [`DomainError::MissingParameter`] if a placeholder has no path parameter
/// - [`DomainError::InvalidUrl`] if the template has a `{...}` group with an
///   invalid name, or the result is not an absolute http(s) URL
pub fn build(
    config: &ClientConfig,
    endpoint: &Endpoint,
    parameters: &[Parameter],
) -> DomainResult<RequestDescriptor> {
    check_unique(parameters)?;

    let path = substitute_path(&endpoint.path, parameters)?;
    let mut url = join_base(&config.base_url, &path);

    let query: Vec<(&str, String)> = parameters
        .iter()
        .filter(|p| p.is_query())
        .map(|p| (p.name.as_str(), p.value.to_string()))
        .collect();
    if !query.is_empty() {
        let encoded = serde_urlencoded::to_string(&query)
            .map_err(|e| DomainError::InvalidUrl(e.to_string()))?;
        match url.find('?') {
            None => url.push('?'),
            Some(idx) if idx + 1 < url.len() && !url.ends_with('&') => url.push('&'),
            Some(_) => {}
        }
        url.push_str(&encoded);
    }

    validate_url(&url)?;

    let mut headers = config.default_headers.clone();
    headers.extend_from(&endpoint.headers);

    Ok(RequestDescriptor {
        method: endpoint.method,
        url,
        headers,
        timeout_ms: config.timeout_ms,
    })
}

fn check_unique(parameters: &[Parameter]) -> DomainResult<()> {
    let mut seen: HashSet<(ParamKind, &str)> = HashSet::new();
    for param in parameters {
        if !seen.insert((param.kind, param.name.as_str())) {
            return Err(DomainError::DuplicateParameter(param.name.clone()));
        }
    }
    Ok(())
}

fn substitute_path(template: &str, parameters: &[Parameter]) -> DomainResult<String> {
    if let Some(group) = malformed_group(template) {
        return Err(DomainError::InvalidUrl(format!(
            "malformed placeholder {group} in {template}"
        )));
    }
    let placeholders = parse_placeholders(template);

    for param in parameters.iter().filter(|p| p.is_path()) {
        if !placeholders.iter().any(|ph| ph.name == param.name) {
            tracing::debug!(name = %param.name, template, "path parameter has no placeholder");
        }
    }

    let mut result = String::with_capacity(template.len());
    let mut last_end = 0;
    for placeholder in &placeholders {
        let value = parameters
            .iter()
            .find(|p| p.is_path() && p.name == placeholder.name)
            .map(|p| &p.value)
            .ok_or_else(|| DomainError::MissingParameter(placeholder.name.clone()))?;

        result.push_str(&template[last_end..placeholder.span.start]);
        result.push_str(&value.to_string());
        last_end = placeholder.span.end;
    }
    result.push_str(&template[last_end..]);

    Ok(result)
}

/// Joins base and path with exactly one `/` between them.
fn join_base(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('?') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn validate_url(url: &str) -> DomainResult<()> {
    let parsed = Url::parse(url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {url}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DomainError::InvalidUrl(format!(
            "unsupported scheme '{other}': {url}"
        ))),
    }
}

/// Fluent builder over [`build`], in the `given().param().get()` style.
///
/// # Example
///
/// ```
/// use restcheck_domain::config::ClientConfig;
/// use restcheck_domain::request::RequestBuilder;
///
/// let config = ClientConfig::new("https://reqres.in");
/// let request = RequestBuilder::get("/api/users/{id}")
///     .path_param("id", 12)
///     .query_param("delay", 1)
///     .build(&config)
///     .unwrap();
/// assert_eq!(request.url, "https://reqres.in/api/users/12?delay=1");
/// ```
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: Endpoint,
    parameters: Vec<Parameter>,
}

impl RequestBuilder {
    /// Starts a builder for the given endpoint.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            parameters: Vec::new(),
        }
    }

    /// Starts a builder for a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Endpoint::get(path))
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.parameters.push(Parameter::path(name, value));
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.parameters.push(Parameter::query(name, value));
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.endpoint = self.endpoint.with_header(name, value);
        self
    }

    /// Builds the descriptor against the given configuration.
    ///
    /// # Errors
    ///
    /// See [`build`].
    pub fn build(&self, config: &ClientConfig) -> DomainResult<RequestDescriptor> {
        build(config, &self.endpoint, &self.parameters)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ClientConfig {
        ClientConfig::new("https://reqres.in")
    }

    #[test]
    fn test_plain_path() {
        let request = build(&config(), &Endpoint::get("/api/users?page=2"), &[]).unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?page=2");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.timeout_ms, 30_000);
    }

    #[test]
    fn test_path_parameter_substitution() {
        let request = build(
            &config(),
            &Endpoint::get("/api/users/{total}"),
            &[Parameter::path("total", 12)],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users/12");
    }

    #[test]
    fn test_path_parameter_with_existing_query() {
        let request = build(
            &config(),
            &Endpoint::get("/api/{path_parameter}?page=2"),
            &[Parameter::path("path_parameter", "users")],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?page=2");
    }

    #[test]
    fn test_query_parameter_appended() {
        let request = build(
            &config(),
            &Endpoint::get("/api/users"),
            &[Parameter::query("page", 1)],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?page=1");
    }

    #[test]
    fn test_query_parameter_after_existing_query() {
        let request = build(
            &config(),
            &Endpoint::get("/api/users?page=2"),
            &[Parameter::query("per_page", 3)],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?page=2&per_page=3");
    }

    #[test]
    fn test_query_values_are_encoded() {
        let request = build(
            &config(),
            &Endpoint::get("/api/users"),
            &[Parameter::query("q", "a b&c")],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?q=a+b%26c");
    }

    #[test]
    fn test_missing_path_parameter() {
        let result = build(&config(), &Endpoint::get("/api/users/{id}"), &[]);
        assert_eq!(result, Err(DomainError::MissingParameter("id".to_string())));
    }

    #[test]
    fn test_query_param_does_not_fill_placeholder() {
        let result = build(
            &config(),
            &Endpoint::get("/api/users/{id}"),
            &[Parameter::query("id", 1)],
        );
        assert_eq!(result, Err(DomainError::MissingParameter("id".to_string())));
    }

    #[test]
    fn test_duplicate_parameter() {
        let result = build(
            &config(),
            &Endpoint::get("/api/users"),
            &[Parameter::query("page", 1), Parameter::query("page", 2)],
        );
        assert_eq!(result, Err(DomainError::DuplicateParameter("page".to_string())));
    }

    #[test]
    fn test_same_name_different_kinds_is_allowed() {
        let request = build(
            &config(),
            &Endpoint::get("/api/{page}"),
            &[Parameter::path("page", "users"), Parameter::query("page", 2)],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?page=2");
    }

    #[test]
    fn test_unused_path_parameter_is_ignored() {
        let request = build(
            &config(),
            &Endpoint::get("/api/users"),
            &[Parameter::path("unused", 1)],
        )
        .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users");
    }

    #[test]
    fn test_slashes_are_normalized() {
        let config = ClientConfig::new("https://reqres.in/");
        let request = build(&config, &Endpoint::get("api/users"), &[]).unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("not a url");
        let result = build(&config, &Endpoint::get("/api/users"), &[]);
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = ClientConfig::new("ftp://reqres.in");
        let result = build(&config, &Endpoint::get("/api/users"), &[]);
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_malformed_placeholder_rejected() {
        let result = build(
            &ClientConfig::default(),
            &Endpoint::get("/api/{user id}"),
            &[Parameter::path("user id", 12)],
        );
        assert_eq!(
            result,
            Err(DomainError::InvalidUrl(
                "malformed placeholder {user id} in /api/{user id}".to_string()
            ))
        );
    }

    #[test]
    fn test_headers_merge_config_first() {
        let config = config().with_default_header("Accept", "application/json");
        let endpoint = Endpoint::get("/api/users").with_header("X-Trace", "abc");
        let request = build(&config, &endpoint, &[]).unwrap();

        let names: Vec<_> = request.headers.iter().map(|h| h.name.clone()).collect();
        assert_eq!(names, vec!["Accept", "X-Trace"]);
    }

    #[test]
    fn test_fluent_builder() {
        let request = RequestBuilder::get("/api/users")
            .query_param("page", 2)
            .header("Accept", "application/json")
            .build(&config())
            .unwrap();
        assert_eq!(request.url, "https://reqres.in/api/users?page=2");
        assert_eq!(request.to_string(), "GET https://reqres.in/api/users?page=2");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_name() -> impl Strategy<Value = String> {
        "[a-z_][a-z0-9_]{0,7}"
    }

    fn arb_value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]{1,8}"
    }

    proptest! {
        /// Every placeholder supplied means no brace survives in the URL.
        #[test]
        fn no_braces_remain(
            names in prop::collection::hash_set(arb_name(), 1..5),
            value in arb_value(),
        ) {
            let template: String = names.iter().map(|n| format!("/seg/{{{n}}}")).collect();
            let params: Vec<_> = names.iter().map(|n| Parameter::path(n.clone(), value.clone())).collect();

            let request = build(&ClientConfig::default(), &Endpoint::get(template), &params).unwrap();
            prop_assert!(!request.url.contains('{'), "brace left in {}", request.url);
        }

        /// Each query parameter appears exactly once whatever the declaration order.
        #[test]
        fn query_params_appear_once(
            pairs in prop::collection::hash_map(arb_name(), arb_value(), 1..6),
            reverse in any::<bool>(),
        ) {
            let mut params: Vec<_> = pairs
                .iter()
                .map(|(k, v)| Parameter::query(k.clone(), v.clone()))
                .collect();
            if reverse {
                params.reverse();
            }

            let request = build(&ClientConfig::default(), &Endpoint::get("/api/users"), &params).unwrap();
            let parsed = Url::parse(&request.url).unwrap();
            let found: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

            prop_assert_eq!(found.len(), pairs.len());
            for (k, v) in &pairs {
                let count = found.iter().filter(|(fk, fv)| fk == k && fv == v).count();
                prop_assert_eq!(count, 1);
            }
        }
    }
}
