//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It performs every request the test runner sends.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use apiprobe_application::ports::{HttpClient, HttpClientError};
use apiprobe_domain::{
    request::{HttpMethod, RequestSpec},
    response::ResponseSpec,
};
use reqwest::{Client, Method, Url};
use tracing::trace;

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. Timeouts are applied per request from
/// [`RequestSpec::timeout_ms`].
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: `user_agent`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(user_agent: &str) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Serializes the JSON body, if any.
    fn encode_body(body: Option<&serde_json::Value>) -> Result<Option<Vec<u8>>, HttpClientError> {
        body.map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpClientError::InvalidBody(e.to_string()))
    }

    fn host_of(error: &reqwest::Error) -> String {
        error
            .url()
            .and_then(Url::host_str)
            .unwrap_or("unknown")
            .to_string()
    }

    /// Maps reqwest errors to domain `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: Self::host_of(error),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: Self::host_of(error),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::Other(format!(
                "more than {MAX_REDIRECTS} redirects: {error}"
            ));
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>> {
        let method = request.method;
        let url = request.url.clone();
        let parsed_url = request
            .parse_url()
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")));
        let headers = request.headers.clone();
        let body = Self::encode_body(request.body.as_ref());
        let timeout_ms = request.timeout_ms;

        Box::pin(async move {
            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), parsed_url?)
                .timeout(Duration::from_millis(timeout_ms));

            for header in headers.iter() {
                builder = builder.header(&header.name, &header.value);
            }

            if let Some(bytes) = body? {
                builder = builder.body(bytes);
            }

            trace!(%method, %url, "sending request");
            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();

            let response_headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
                .to_vec();

            let duration = start.elapsed();
            trace!(status, elapsed_ms = duration.as_millis(), "response received");

            Ok(ResponseSpec::new(
                status,
                response_headers,
                body_bytes,
                duration,
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new("apiprobe/test");
        assert!(client.is_ok());
    }

    #[test]
    fn test_encode_body() {
        assert_eq!(ReqwestHttpClient::encode_body(None).unwrap(), None);

        let body = json!({"title": "Construction d'un entrepôt"});
        let bytes = ReqwestHttpClient::encode_body(Some(&body)).unwrap().unwrap();
        assert_eq!(serde_json::from_slice::<serde_json::Value>(&bytes).unwrap(), body);
    }

    #[tokio::test]
    async fn test_invalid_url_is_reported() {
        let client = ReqwestHttpClient::new("apiprobe/test").unwrap();
        let request = RequestSpec::get("Broken", "not a url");

        let result = client.execute(&request).await;

        assert!(matches!(result, Err(HttpClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        let client = ReqwestHttpClient::new("apiprobe/test").unwrap();
        let mut request = RequestSpec::get("Closed port", "http://127.0.0.1:9/api/health");
        request.timeout_ms = 2_000;

        let result = client.execute(&request).await;

        assert!(result.is_err(), "{result:?}");
    }
}
