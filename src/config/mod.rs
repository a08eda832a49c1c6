//! Configuration types for the Shopify credit gateway.
//!
//! # Overview
//!
//! - [`GatewayConfig`]: all gateway settings (base URL, credit policy, credentials)
//! - [`GatewayConfigBuilder`]: a builder for constructing [`GatewayConfig`] instances
//! - [`BaseUrl`]: a validated Admin API base URL
//! - [`AccessToken`]: an access token with masked debug output
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopify_gateway::{BaseUrl, GatewayConfig};
//!
//! let config = GatewayConfig::builder()
//!     .base_url(BaseUrl::new("https://my-store.myshopify.com/admin").unwrap())
//!     .retry_interval(Duration::from_secs(2))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_credits(), 40);
//! assert_eq!(config.safety_buffer(), 5);
//! ```

mod newtypes;

pub use newtypes::{AccessToken, BaseUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Size of the shop's call-limit bucket.
pub const DEFAULT_MAX_CREDITS: u32 = 40;

/// Credits that must remain before another request is admitted.
pub const DEFAULT_SAFETY_BUFFER: u32 = 5;

/// Pause between admission attempts while the pool is exhausted.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Environment variable holding the Admin API base URL.
pub const BASE_URL_ENV: &str = "SHOPIFY_URL";

/// Environment variable holding an optional Admin API access token.
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ACCESS_TOKEN";

/// Configuration for a [`RequestGateway`](crate::RequestGateway).
///
/// `GatewayConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    base_url: BaseUrl,
    max_credits: u32,
    safety_buffer: u32,
    retry_interval: Duration,
    access_token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
}

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads [`BASE_URL_ENV`] (required) and [`ACCESS_TOKEN_ENV`] (optional).
    /// All credit settings take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the base URL is not set, or
    /// [`ConfigError::InvalidBaseUrl`] if it does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), with a caller-supplied variable lookup.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV).ok_or(ConfigError::MissingEnvVar {
            name: BASE_URL_ENV,
        })?;

        let mut builder = GatewayConfigBuilder::new().base_url(BaseUrl::new(base_url)?);
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).and_then(AccessToken::new) {
            builder = builder.access_token(token);
        }
        builder.build()
    }

    /// Returns the Admin API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the size of the call-limit bucket.
    #[must_use]
    pub const fn max_credits(&self) -> u32 {
        self.max_credits
    }

    /// Returns the number of credits held back from admission.
    #[must_use]
    pub const fn safety_buffer(&self) -> u32 {
        self.safety_buffer
    }

    /// Returns the pause between admission attempts.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

/// Builder for constructing [`GatewayConfig`] instances.
///
/// `base_url` is the only required field.
///
/// # Defaults
///
/// - `max_credits`: [`DEFAULT_MAX_CREDITS`] (40)
/// - `safety_buffer`: [`DEFAULT_SAFETY_BUFFER`] (5)
/// - `retry_interval`: [`DEFAULT_RETRY_INTERVAL`] (10 seconds)
/// - `access_token`: `None`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    base_url: Option<BaseUrl>,
    max_credits: Option<u32>,
    safety_buffer: Option<u32>,
    retry_interval: Option<Duration>,
    access_token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
}

impl GatewayConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Admin API base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the size of the call-limit bucket.
    #[must_use]
    pub const fn max_credits(mut self, credits: u32) -> Self {
        self.max_credits = Some(credits);
        self
    }

    /// Sets the number of credits held back from admission.
    #[must_use]
    pub const fn safety_buffer(mut self, buffer: u32) -> Self {
        self.safety_buffer = Some(buffer);
        self
    }

    /// Sets the pause between admission attempts.
    #[must_use]
    pub const fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
        self
    }

    /// Sets the access token sent as `X-Shopify-Access-Token`.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`GatewayConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::InvalidRetryInterval`] for a zero retry interval.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let retry_interval = self.retry_interval.unwrap_or(DEFAULT_RETRY_INTERVAL);
        if retry_interval.is_zero() {
            return Err(ConfigError::InvalidRetryInterval);
        }

        Ok(GatewayConfig {
            base_url,
            max_credits: self.max_credits.unwrap_or(DEFAULT_MAX_CREDITS),
            safety_buffer: self.safety_buffer.unwrap_or(DEFAULT_SAFETY_BUFFER),
            retry_interval,
            access_token: self.access_token,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
