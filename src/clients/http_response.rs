//! HTTP response types for the gateway.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::clients::errors::HttpError;
use crate::credits::{UsageReport, CALL_LIMIT_HEADER};

/// An HTTP response from the Admin API.
///
/// The body is kept as received; decoding it is up to the caller (see
/// [`json`](Self::json)). Header names are stored lower-cased and may carry
/// several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, lower-casing header names.
    #[must_use]
    pub fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: impl Into<String>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(key, values)| (key.to_lowercase(), values))
            .fold(HashMap::new(), |mut acc: HashMap<String, Vec<String>>, (key, values)| {
                acc.entry(key).or_default().extend(values);
                acc
            });

        Self {
            code,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Returns the call-limit usage reported by this response.
    ///
    /// A missing or malformed `X-Shopify-Shop-Api-Call-Limit` header reads as
    /// `0/0`.
    #[must_use]
    pub fn usage_report(&self) -> UsageReport {
        UsageReport::parse(self.header(CALL_LIMIT_HEADER))
    }

    /// Decodes the body as JSON. An empty body decodes as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Json`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        let body = if self.body.trim().is_empty() {
            "{}"
        } else {
            self.body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }

    /// Serializes the error fields of the body to a JSON message.
    pub(crate) fn serialize_error(&self) -> String {
        let parsed: serde_json::Value = self.json().unwrap_or_else(|_| {
            if self.code >= 500 {
                serde_json::json!({ "errors": self.body })
            } else {
                serde_json::json!({})
            }
        });

        let mut error_body = serde_json::Map::new();
        if let Some(errors) = parsed.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }
        if let Some(error) = parsed.get("error") {
            error_body.insert("error".to_string(), error.clone());
            if let Some(desc) = parsed.get("error_description") {
                error_body.insert("error_description".to_string(), desc.clone());
            }
        }
        if let Some(request_id) = self.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::Value::Object(error_body).to_string()
    }
}
