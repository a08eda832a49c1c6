//! Error types for the Shopify credit gateway.
//!
//! This module contains the configuration error type. HTTP errors live in
//! [`crate::clients`].
//!
//! # Example
//!
//! ```rust
//! use shopify_gateway::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not-a-url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building a gateway configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Environment variable '{name}' is not set. It must hold the shop's Admin API base URL.")]
    MissingEnvVar {
        /// The name of the variable.
        name: &'static str,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme (e.g., 'https://my-store.myshopify.com/admin').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The admission retry interval cannot be zero.
    #[error("Invalid retry interval: the wait between credit attempts must be greater than zero.")]
    InvalidRetryInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_missing_env_var_error_message() {
        let error = ConfigError::MissingEnvVar {
            name: "SHOPIFY_URL",
        };
        assert!(error.to_string().contains("SHOPIFY_URL"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "bad url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad url"));
        assert!(message.contains("scheme"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::InvalidRetryInterval;
        let _: &dyn std::error::Error = &error;
    }
}
