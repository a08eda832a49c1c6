//! The HTTP transport used by the gateway.
//!
//! [`Transport`] is the seam between the credit logic and the network;
//! [`HttpClient`] is its reqwest-backed implementation.

use std::collections::HashMap;
use std::future::Future;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::GatewayConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sends one request and returns whatever the server answered.
///
/// Implementations return `Ok` for every response that arrives, whatever its
/// status code, so the caller can still read its call-limit header. `Err` is
/// reserved for requests that never produced a response.
pub trait Transport: Send + Sync {
    /// Sends `request` to the absolute `url`.
    fn execute(
        &self,
        url: &str,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// reqwest-backed [`Transport`].
///
/// Holds a connection pool and the headers sent with every request:
/// `User-Agent`, `Accept: application/json` and, when configured,
/// `X-Shopify-Access-Token`.
///
/// `HttpClient` is `Send + Sync`.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn new(config: &GatewayConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Shopify Credit Gateway v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        if let Some(token) = config.access_token() {
            default_headers.insert(
                "X-Shopify-Access-Token".to_string(),
                token.as_ref().to_string(),
            );
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(name.as_str().to_string()).or_default().push(value);
        }
        result
    }
}

impl Transport for HttpClient {
    async fn execute(&self, url: &str, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in self.default_headers.iter().chain(&request.headers) {
            req_builder = req_builder.header(key, value);
        }
        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = request.body_text() {
            req_builder = req_builder.body(body);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(HttpResponse::new(code, headers, body))
    }
}
