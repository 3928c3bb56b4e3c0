//! HTTP transport using reqwest.
//!
//! Implements the `Transport` port for live runs. Every response body is
//! parsed as JSON; a blank body becomes `null`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use restcheck_application::ports::{Transport, TransportError};
use restcheck_domain::request::{Header, Headers};
use restcheck_domain::{ClientConfig, HttpMethod, RequestDescriptor, ResponseSpec};

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport sending the configured User-Agent.
    ///
    /// Redirects are followed up to ten times and TLS verification is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    fn collect_headers(map: &HeaderMap) -> Headers {
        map.iter()
            .map(|(name, value)| {
                Header::new(
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    fn host_of(error: &reqwest::Error) -> String {
        error
            .url()
            .and_then(Url::host_str)
            .unwrap_or("unknown")
            .to_string()
    }

    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::Dns {
                    host: Self::host_of(error),
                    message,
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::Other(format!("more than {MAX_REDIRECTS} redirects"));
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseSpec, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::Other(format!("invalid URL {}: {e}", request.url)))?;
        let timeout_ms = request.timeout_ms;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(Duration::from_millis(timeout_ms));
        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::debug!(error = %e, url = %request.url, "request failed");
            Self::map_error(&e, timeout_ms)
        })?;

        let status = response.status().as_u16();
        let headers = Self::collect_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;
        let duration = start.elapsed();

        tracing::debug!(
            status,
            bytes = body.len(),
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "response received"
        );

        ResponseSpec::from_raw(status, headers, &body, duration)
            .map_err(|e| TransportError::UnparseableBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one raw HTTP response on a local port and returns its base URL.
    async fn serve_once(raw_response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(raw_response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn descriptor(url: String, timeout_ms: u64) -> RequestDescriptor {
        RequestDescriptor {
            method: HttpMethod::Get,
            url,
            headers: Headers::new(),
            timeout_ms,
        }
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&ClientConfig::default()).expect("client")
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Options),
            Method::OPTIONS
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collect_headers() {
        let mut map = HeaderMap::new();
        map.insert("content-type", "application/json".parse().expect("value"));
        map.insert("connection", "keep-alive".parse().expect("value"));

        let headers = ReqwestTransport::collect_headers(&map);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_send_parses_json_response() {
        let base = serve_once(http_response(
            "200 OK",
            "application/json; charset=utf-8",
            r#"{"page":2,"total_pages":2}"#,
        ))
        .await;

        let response = transport()
            .send(&descriptor(format!("{base}/api/users?page=2"), 5_000))
            .await
            .expect("response");

        assert_eq!(response.status, 200);
        assert_eq!(response.body["total_pages"], 2);
        assert_eq!(
            response.header("content-type"),
            Some("application/json; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let base = serve_once(http_response("404 Not Found", "application/json", "{}")).await;

        let response = transport()
            .send(&descriptor(format!("{base}/api/users/23"), 5_000))
            .await
            .expect("response");

        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_non_json_body_is_unparseable() {
        let base = serve_once(http_response("200 OK", "text/html", "<html></html>")).await;

        let result = transport()
            .send(&descriptor(format!("{base}/"), 5_000))
            .await;

        assert!(matches!(result, Err(TransportError::UnparseableBody(_))));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let hold = tokio::spawn(async move {
            let accepted = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(accepted);
        });

        let result = transport()
            .send(&descriptor(format!("http://{addr}/"), 100))
            .await;

        assert_eq!(result, Err(TransportError::Timeout { timeout_ms: 100 }));
        hold.abort();
    }
}
