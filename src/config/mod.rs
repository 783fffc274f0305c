//! Configuration types for the Shopify client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: everything a [`ShopifyClient`](crate::ShopifyClient) needs
//! - [`ClientConfigBuilder`]: builder for [`ClientConfig`]
//! - [`Credentials`]: the immutable host/token pair
//! - [`HostName`], [`AccessToken`], [`HostUrl`]: validated newtypes
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopify_client::{AccessToken, ClientConfig, Credentials, HostName, RetryPolicy};
//!
//! let config = ClientConfig::builder()
//!     .credentials(Credentials::new(
//!         HostName::new("my-store.myshopify.com").unwrap(),
//!         AccessToken::new("shpat_123").unwrap(),
//!     ))
//!     .timeout(Duration::from_secs(5))
//!     .retry_policy(RetryPolicy::new(3, Duration::from_millis(500)).unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retry_policy().max_attempts(), 3);
//! ```

mod newtypes;

pub use newtypes::{AccessToken, Credentials, HostName, HostUrl};

use std::time::Duration;

use crate::clients::{PacingPolicy, RetryPolicy};
use crate::error::ConfigError;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`ShopifyClient`](crate::ShopifyClient).
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    credentials: Credentials,
    api_host: Option<HostUrl>,
    timeout: Duration,
    retry_policy: RetryPolicy,
    pacing: Option<PacingPolicy>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API host override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy applied to throttled requests.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the proactive pacing policy, if enabled.
    #[must_use]
    pub const fn pacing(&self) -> Option<&PacingPolicy> {
        self.pacing.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `timeout`: 10 seconds
/// - `retry_policy`: [`RetryPolicy::default`] (5 attempts, 500 ms apart)
/// - `pacing`: disabled
/// - `api_host`: `None`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    credentials: Option<Credentials>,
    api_host: Option<HostUrl>,
    timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    pacing: Option<PacingPolicy>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credentials (required).
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sends requests to `api_host` instead of `https://{host_name}`.
    ///
    /// The store host is still announced in the `Host` header.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry policy for throttled (429) responses.
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Enables proactive pacing based on the observed call limit.
    #[must_use]
    pub const fn pacing(mut self, policy: PacingPolicy) -> Self {
        self.pacing = Some(policy);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if credentials are not set
    /// and [`ConfigError::InvalidTimeout`] if the timeout is zero.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let credentials = self
            .credentials
            .ok_or(ConfigError::MissingRequiredField {
                field: "credentials",
            })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(ClientConfig {
            credentials,
            api_host: self.api_host,
            timeout,
            retry_policy: self.retry_policy.unwrap_or_default(),
            pacing: self.pacing,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
