//! The rate-limited entry point for Admin API calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResponseError, Transport,
};
use crate::config::{BaseUrl, GatewayConfig};
use crate::credits::{AdmissionController, CreditPool};

/// Sends Admin API requests without exceeding the shop's call limit.
///
/// Every call goes through the same steps:
///
/// 1. `Content-Type: application/json` is set on the request
/// 2. the caller waits for a credit from the shared [`CreditPool`]
/// 3. the transport sends the request to the base URL joined with its path
/// 4. the pool is reset from the response's `X-Shopify-Shop-Api-Call-Limit` header
/// 5. the response is returned, or turned into [`HttpError::Response`] for a non-2xx status
///
/// Only step 2 ever retries. Network failures and error statuses go straight
/// back to the caller.
///
/// Gateways talking to the same shop should share one pool; see
/// [`with_pool`](RequestGateway::with_pool).
///
/// # Example
///
/// ```rust,ignore
/// use shopify_gateway::{GatewayConfig, RequestGateway};
///
/// let config = GatewayConfig::from_env()?;
/// let gateway = RequestGateway::new(&config)?;
///
/// let response = gateway.get("products/1.json").await?;
/// println!("{}", response.body);
/// ```
#[derive(Debug)]
pub struct RequestGateway<T: Transport = HttpClient> {
    transport: T,
    base_url: BaseUrl,
    admission: AdmissionController,
}

// Verify RequestGateway is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestGateway>();
};

impl RequestGateway<HttpClient> {
    /// Creates a gateway with its own full credit pool.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn new(config: &GatewayConfig) -> Result<Self, HttpError> {
        Self::with_pool(config, Arc::new(CreditPool::from_config(config)))
    }

    /// Creates a gateway drawing from an existing credit pool.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn with_pool(config: &GatewayConfig, pool: Arc<CreditPool>) -> Result<Self, HttpError> {
        Ok(Self::with_transport(config, HttpClient::new(config)?, pool))
    }
}

impl<T: Transport> RequestGateway<T> {
    /// Creates a gateway over a custom transport.
    #[must_use]
    pub fn with_transport(config: &GatewayConfig, transport: T, pool: Arc<CreditPool>) -> Self {
        Self {
            transport,
            base_url: config.base_url().clone(),
            admission: AdmissionController::from_config(pool, config),
        }
    }

    /// Returns the credit pool this gateway draws from.
    #[must_use]
    pub const fn pool(&self) -> &Arc<CreditPool> {
        self.admission.pool()
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a request once a credit is available.
    ///
    /// This may wait indefinitely if the shop never reports free credits.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - request validation fails (`InvalidRequest`), before any credit is taken
    /// - the request never gets a response (`Network`)
    /// - the response status is not 2xx (`Response`); the pool is still refreshed
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;
        request
            .headers
            .retain(|key, _| !key.eq_ignore_ascii_case("content-type"));
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());

        self.admission.wait_for_credit().await;

        let url = self.base_url.join(&request.path);
        tracing::debug!(method = %request.http_method, %url, "Sending request");
        let response = self.transport.execute(&url, &request).await?;

        self.pool().refresh_from(response.usage_report());

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                request.path,
                reason
            );
        }

        if !response.is_ok() {
            return Err(HttpError::Response(HttpResponseError {
                code: response.code,
                message: response.serialize_error(),
                error_reference: response.request_id().map(String::from),
            }));
        }

        Ok(response)
    }

    /// Sends a request and decodes the response body as JSON.
    ///
    /// # Errors
    ///
    /// Everything [`send`](Self::send) returns, plus [`HttpError::Json`] if the
    /// body does not match `R`.
    pub async fn send_json<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, HttpError> {
        self.send(request).await?.json()
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::builder(HttpMethod::Get, path).build()?)
            .await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::builder(HttpMethod::Put, path).body(body).build()?)
            .await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::builder(HttpMethod::Post, path).body(body).build()?)
            .await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::builder(HttpMethod::Delete, path).build()?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::{json, Value};
    use tokio_test::{assert_pending, assert_ready, task};

    /// Answers every request with a fixed response and records what it saw.
    struct ScriptedTransport {
        pool: Arc<CreditPool>,
        code: u16,
        call_limit: Option<&'static str>,
        body: &'static str,
        seen: Mutex<Vec<(String, HttpRequest, i64)>>,
    }

    impl ScriptedTransport {
        fn new(pool: &Arc<CreditPool>, code: u16, call_limit: Option<&'static str>) -> Self {
            Self {
                pool: Arc::clone(pool),
                code,
                call_limit,
                body: r#"{"product":{"id":1}}"#,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        async fn execute(&self, url: &str, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
            self.seen.lock().unwrap().push((
                url.to_string(),
                request.clone(),
                self.pool.credits_remaining(),
            ));
            let headers = self
                .call_limit
                .map(|limit| {
                    HashMap::from([(
                        "X-Shopify-Shop-Api-Call-Limit".to_string(),
                        vec![limit.to_string()],
                    )])
                })
                .unwrap_or_default();
            Ok(HttpResponse::new(self.code, headers, self.body))
        }
    }

    fn config() -> GatewayConfig {
        GatewayConfig::builder()
            .base_url(BaseUrl::new("https://shop.example/admin").unwrap())
            .build()
            .unwrap()
    }

    fn gateway(code: u16, call_limit: Option<&'static str>) -> RequestGateway<ScriptedTransport> {
        let pool = Arc::new(CreditPool::new(40, 5));
        let transport = ScriptedTransport::new(&pool, code, call_limit);
        RequestGateway::with_transport(&config(), transport, pool)
    }

    #[tokio::test]
    async fn test_send_takes_credit_before_transport_and_refreshes_after() {
        let gateway = gateway(200, Some("39/40"));

        let response = gateway.get("products/1.json").await.unwrap();

        assert_eq!(response.code, 200);
        let seen = gateway.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "https://shop.example/admin/products/1.json");
        assert_eq!(seen[0].2, 39);
        assert_eq!(gateway.pool().credits_remaining(), 1);
    }

    #[tokio::test]
    async fn test_send_sets_json_content_type() {
        let gateway = gateway(200, Some("1/40"));
        let request = HttpRequest::builder(HttpMethod::Put, "products/1.json")
            .body(json!({"product": {}}))
            .header("content-type", "text/plain")
            .build()
            .unwrap();

        gateway.send(request).await.unwrap();

        let seen = gateway.transport().seen.lock().unwrap();
        let headers = &seen[0].1.headers;
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_call_limit_header_empties_pool() {
        let gateway = gateway(200, None);
        gateway.get("products.json").await.unwrap();
        assert_eq!(gateway.pool().credits_remaining(), 0);
    }

    #[tokio::test]
    async fn test_error_status_refreshes_pool_then_fails() {
        let gateway = gateway(404, Some("12/40"));

        let result = gateway.get("products/999.json").await;

        assert!(matches!(result, Err(HttpError::Response(ref e)) if e.code == 404));
        assert_eq!(gateway.pool().credits_remaining(), 28);
    }

    #[tokio::test]
    async fn test_invalid_request_takes_no_credit() {
        let gateway = gateway(200, Some("0/40"));
        let request = HttpRequest {
            http_method: HttpMethod::Post,
            path: "products.json".to_string(),
            body: None,
            query: None,
            headers: HashMap::new(),
        };

        let result = gateway.send(request).await;

        assert!(matches!(result, Err(HttpError::InvalidRequest(_))));
        assert_eq!(gateway.pool().credits_remaining(), 40);
        assert!(gateway.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_json_decodes_body() {
        let gateway = gateway(200, Some("1/40"));
        let body: Value = gateway
            .send_json(HttpRequest::builder(HttpMethod::Get, "products/1.json").build().unwrap())
            .await
            .unwrap();
        assert_eq!(body["product"]["id"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_pool_blocks_until_refreshed() {
        let gateway = gateway(200, Some("39/40"));
        gateway.get("products/1.json").await.unwrap();
        assert_eq!(gateway.pool().credits_remaining(), 1);

        let mut second = task::spawn(gateway.get("products/1.json"));
        assert_pending!(second.poll());
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_pending!(second.poll());
        assert_eq!(gateway.transport().seen.lock().unwrap().len(), 1);

        gateway.pool().refresh(0, 40);
        tokio::time::advance(Duration::from_secs(10)).await;
        let response = assert_ready!(second.poll()).unwrap();

        assert_eq!(response.code, 200);
        assert_eq!(gateway.transport().seen.lock().unwrap().len(), 2);
        assert_eq!(gateway.pool().credits_remaining(), 1);
    }

    #[test]
    fn test_gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequestGateway>();
        assert_send_sync::<RequestGateway<ScriptedTransport>>();
    }
}
