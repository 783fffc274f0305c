//! The caller-facing Admin API client.
//!
//! [`ShopifyClient`] is the entry point resource helpers build on: each
//! helper picks a verb, a relative path and a payload, calls
//! [`invoke`](ShopifyClient::invoke) and unwraps the one top-level property
//! it expects with [`extract_field`].

use serde_json::Value;

use crate::clients::dispatcher::RequestDispatcher;
use crate::clients::errors::{ApiError, MissingFieldError};
use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::{ApiCallLimit, ApiResponse};
use crate::clients::retry::{RetryPolicy, RetryingInvoker};
use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Admin REST API client for one store.
///
/// The client holds only immutable credentials plus the shared call-limit
/// observation, so it can be wrapped in an `Arc` and used from many tasks at
/// once. Concurrent calls are neither queued nor ordered.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_client::{AccessToken, ClientConfig, Credentials, HostName, ShopifyClient};
///
/// let config = ClientConfig::builder()
///     .credentials(Credentials::new(
///         HostName::new("my-store.myshopify.com")?,
///         AccessToken::new("shpat_123")?,
///     ))
///     .build()?;
///
/// let client = ShopifyClient::new(config)?;
/// let shop = client.invoke_field(HttpMethod::Get, "shop.json", json!({}), "shop").await?;
/// ```
#[derive(Debug)]
pub struct ShopifyClient {
    config: ClientConfig,
    invoker: RetryingInvoker,
}

// Verify ShopifyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyClient>();
};

impl ShopifyClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if the HTTP stack cannot start.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let dispatcher = RequestDispatcher::new(&config)?;
        let invoker = RetryingInvoker::new(
            dispatcher,
            *config.retry_policy(),
            config.pacing().copied(),
        );

        Ok(Self { config, invoker })
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the retry policy in effect.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        self.invoker.policy()
    }

    /// Returns the single-request dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &RequestDispatcher {
        self.invoker.dispatcher()
    }

    /// Returns the most recent call-limit observation across all calls.
    #[must_use]
    pub fn last_call_limit(&self) -> Option<ApiCallLimit> {
        self.invoker.limiter().last()
    }

    /// Sends one logical call, retrying on 429.
    ///
    /// `payload` becomes the JSON body for POST/PUT and the query string for
    /// GET/DELETE.
    ///
    /// # Errors
    ///
    /// See [`RetryingInvoker::invoke_spec`].
    pub async fn invoke(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Value,
    ) -> Result<ApiResponse, ApiError> {
        self.invoker.invoke(method, path, payload).await
    }

    /// Sends one logical call and unwraps the top-level `field` of its body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] if the body lacks `field`, otherwise
    /// the errors of [`invoke`](Self::invoke).
    pub async fn invoke_field(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Value,
        field: &str,
    ) -> Result<Value, ApiError> {
        let response = self.invoke(method, path, payload).await?;
        Ok(extract_field(response.body, field)?)
    }

    /// Sends a GET request with no query parameters.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.invoke(HttpMethod::Get, path, Value::Null).await
    }

    /// Sends a GET request with `query` flattened into the query string.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub async fn get_with_query(&self, path: &str, query: Value) -> Result<ApiResponse, ApiError> {
        self.invoke(HttpMethod::Get, path, query).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.invoke(HttpMethod::Post, path, body).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.invoke(HttpMethod::Put, path, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.invoke(HttpMethod::Delete, path, Value::Null).await
    }
}

/// Takes the top-level property `field` out of a response body.
///
/// # Errors
///
/// Returns [`MissingFieldError`] naming `field` and the properties that were
/// present. A non-object body has none.
///
/// # Example
///
/// ```rust
/// use shopify_client::clients::extract_field;
/// use serde_json::json;
///
/// let shop = extract_field(json!({"shop": {"id": 1}}), "shop").unwrap();
/// assert_eq!(shop, json!({"id": 1}));
///
/// let err = extract_field(json!({"errors": "Not Found"}), "shop").unwrap_err();
/// assert_eq!(err.available, vec!["errors".to_string()]);
/// ```
pub fn extract_field(body: Value, field: &str) -> Result<Value, MissingFieldError> {
    match body {
        Value::Object(mut map) => map.remove(field).ok_or_else(|| MissingFieldError {
            field: field.to_string(),
            available: map.keys().cloned().collect(),
        }),
        _ => Err(MissingFieldError {
            field: field.to_string(),
            available: Vec::new(),
        }),
    }
}
