//! HTTP-specific error types for the gateway.
//!
//! - [`HttpResponseError`]: non-2xx HTTP responses from the API
//! - [`InvalidHttpRequestError`]: a request that fails validation before sending
//! - [`HttpError`]: unified error type for everything a gateway call can return
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_gateway::clients::HttpError;
//!
//! match gateway.send(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(HttpError::Json(e)) => println!("Unexpected body: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// The message is a JSON object holding whichever of `errors`, `error`,
/// `error_description` the response carried, plus an `error_reference` built
/// from the `X-Request-Id` header.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path is empty.
    #[error("Invalid request path '{path}'. A path relative to the base URL is required.")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },
}

/// Unified error type for gateway calls.
///
/// Only the credit wait is ever retried; every error here is returned to the
/// caller as soon as it happens.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A JSON payload could not be encoded, or a response body could not be
    /// decoded into the requested type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
