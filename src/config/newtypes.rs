//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify Admin API access token.
///
/// The token is sent in the `X-Shopify-Access-Token` header on every request.
///
/// # Security
///
/// The `Debug` implementation masks the token, displaying only
/// `AccessToken(*****)` so it never leaks into logs.
///
/// # Example
///
/// ```rust
/// use shopify_client::AccessToken;
///
/// let token = AccessToken::new("shpat_123").unwrap();
/// assert_eq!(token.as_ref(), "shpat_123");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
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

/// A validated store host name, without scheme or path.
///
/// The host is used verbatim (after trimming and lower-casing) to build
/// `https://{host_name}/admin/{path}`. An explicit `:port` is allowed.
///
/// # Example
///
/// ```rust
/// use shopify_client::HostName;
///
/// let host = HostName::new("My-Store.myshopify.com").unwrap();
/// assert_eq!(host.as_ref(), "my-store.myshopify.com");
///
/// let host = HostName::new("admin.example.com:8443").unwrap();
/// assert_eq!(host.as_ref(), "admin.example.com:8443");
///
/// assert!(HostName::new("https://my-store.myshopify.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostName(String);

impl HostName {
    /// Creates a new validated host name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostName`] if the host is empty, carries a
    /// scheme or path, has a malformed port, or contains characters outside a
    /// DNS label.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into().trim().to_lowercase();

        let (domain, port) = match host.split_once(':') {
            Some((domain, port)) => (domain, Some(port)),
            None => (host.as_str(), None),
        };

        let port_ok = port.map_or(true, |p| p.parse::<u16>().is_ok_and(|p| p > 0));

        if !port_ok || !domain.split('.').all(Self::is_valid_label) {
            return Err(ConfigError::InvalidHostName { host });
        }

        Ok(Self(host))
    }

    fn is_valid_label(label: &str) -> bool {
        if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
            return false;
        }

        label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for HostName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for HostName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HostName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated base URL overriding the default `https://{host_name}` target.
///
/// Useful when requests must go through a proxy or a local test server.
///
/// # Example
///
/// ```rust
/// use shopify_client::HostUrl;
///
/// let url = HostUrl::new("http://localhost:3000/").unwrap();
/// assert_eq!(url.as_ref(), "http://localhost:3000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
}

impl HostUrl {
    /// Creates a new validated host URL. A trailing `/` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] unless the value looks like
    /// `scheme://host[:port][/path]`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();

        let valid = url.split_once("://").is_some_and(|(scheme, rest)| {
            !scheme.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphabetic())
                && !rest.is_empty()
                && !rest.starts_with([':', '/', '?', '#'])
        });

        if valid {
            Ok(Self { url })
        } else {
            Err(ConfigError::InvalidHostUrl { url })
        }
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// The host and token pair every request is authenticated with.
///
/// Credentials are immutable once constructed and are shared read-only by
/// all in-flight requests of a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// The store host requests are sent to.
    pub host_name: HostName,
    /// The Admin API access token.
    pub access_token: AccessToken,
}

impl Credentials {
    /// Bundles a host name and access token.
    #[must_use]
    pub const fn new(host_name: HostName, access_token: AccessToken) -> Self {
        Self {
            host_name,
            access_token,
        }
    }
}
