//! Validated newtype wrappers for configuration values.
//!
//! Invalid values are rejected on construction with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated base URL for the shop's Admin API.
///
/// Every request path is joined onto this URL. It must carry a scheme and a
/// non-empty host; any path component (e.g. `/admin` or `/admin/api/2024-10`)
/// is kept as the prefix of every request.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::BaseUrl;
///
/// let url = BaseUrl::new("https://my-store.myshopify.com/admin/").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "my-store.myshopify.com");
/// assert_eq!(
///     url.join("products/1.json"),
///     "https://my-store.myshopify.com/admin/products/1.json"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url: String = url.into();
        let url = url.trim().to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let authority_start = scheme_end + 3;
        let remainder = url.get(authority_start..).unwrap_or_default();
        let authority = remainder
            .find(['/', '?', '#'])
            .map_or(remainder, |i| &remainder[..i]);

        // Credentials embedded as `user:pass@host` are allowed; the host follows the `@`.
        let host_offset = authority.rfind('@').map_or(0, |at| at + 1);
        let host_len = authority[host_offset..]
            .find(':')
            .unwrap_or(authority.len() - host_offset);
        let host_start = authority_start + host_offset;
        let host_end = host_start + host_len;

        if host_len == 0 {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins a request path onto this base URL.
    ///
    /// Exactly one `/` separates the two, however many the base ends with
    /// or the path starts with.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A Shopify Admin API access token.
///
/// The `Debug` implementation masks the value so it never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token. Returns `None` for an empty string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}
