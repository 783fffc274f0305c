//! Configuration error types for the Shopify client.
//!
//! Every validated newtype and the [`ClientConfigBuilder`](crate::ClientConfigBuilder)
//! return `Result<T, ConfigError>` so invalid settings are rejected before a
//! single request is sent.
//!
//! # Example
//!
//! ```rust
//! use shopify_client::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid Shopify Admin API access token.")]
    EmptyAccessToken,

    /// Host name is invalid.
    #[error("Invalid host name '{host}'. Expected a domain such as 'shop-name.myshopify.com', optionally with ':port', without scheme or path.")]
    InvalidHostName {
        /// The invalid host name that was provided.
        host: String,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://proxy.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Request timeout must be greater than zero.
    #[error("Request timeout must be greater than zero.")]
    InvalidTimeout,

    /// Retry policy must allow at least one attempt.
    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// Why the policy was rejected.
        reason: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to initialise HTTP client: {reason}")]
    HttpClientInit {
        /// Message reported by the HTTP stack.
        reason: String,
    },
}
