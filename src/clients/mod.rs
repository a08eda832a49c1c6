//! HTTP transport types for Admin API communication.
//!
//! # Overview
//!
//! - [`Transport`]: sends one request, returning any response that arrives
//! - [`HttpClient`]: the reqwest-backed transport
//! - [`HttpRequest`]: a request to be sent through the gateway
//! - [`HttpResponse`]: a response with its raw body and headers
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`HttpError`]: the error type of every gateway call
//!
//! Rate limiting does not happen here. A transport sends exactly what it is
//! given, exactly once; the [`RequestGateway`](crate::RequestGateway) decides
//! when.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, Transport, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
