//! # Shopify Credit Gateway
//!
//! A client gateway to the Shopify Admin API that keeps every caller in a
//! process under the shop's call limit.
//!
//! ## Overview
//!
//! Shopify gives each shop a bucket of API call credits and reports the
//! bucket's state on every response. This crate keeps a shared local copy of
//! that state and makes every request take a credit before it is sent:
//!
//! - [`CreditPool`]: the shared, mutex-protected credit counter
//! - [`AdmissionController`]: waits until a credit can be taken
//! - [`UsageReport`]: the `used/total` figures parsed from a response
//! - [`RequestGateway`]: gates, sends, and resynchronizes one call at a time
//! - [`GatewayConfig`]: base URL, credit policy and credentials
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_gateway::{BaseUrl, GatewayConfig};
//!
//! let config = GatewayConfig::builder()
//!     .base_url(BaseUrl::new("https://my-store.myshopify.com/admin").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_gateway::{CreditPool, GatewayConfig, RequestGateway};
//!
//! let config = GatewayConfig::from_env()?;
//!
//! // One pool per shop, shared by every gateway in the process.
//! let pool = Arc::new(CreditPool::from_config(&config));
//! let gateway = RequestGateway::with_pool(&config, Arc::clone(&pool))?;
//!
//! let response = gateway.get("products/1.json").await?;
//! println!("{} credits left", pool.credits_remaining());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the credit pool is an ordinary value shared by `Arc`
//! - **Cooperative limiting**: requests wait for a credit instead of being rejected
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: waiting suspends the task on the Tokio timer

pub mod clients;
pub mod config;
pub mod credits;
pub mod error;
pub mod gateway;
pub mod products;

pub use config::{
    AccessToken, BaseUrl, GatewayConfig, GatewayConfigBuilder, DEFAULT_MAX_CREDITS,
    DEFAULT_RETRY_INTERVAL, DEFAULT_SAFETY_BUFFER,
};
pub use credits::{AdmissionController, CreditPool, UsageReport, CALL_LIMIT_HEADER};
pub use error::ConfigError;
pub use gateway::RequestGateway;
pub use products::{StringMetafield, VariantInventory};

pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, Transport,
};
