//! Single-request dispatch against the Shopify Admin API.
//!
//! [`RequestDispatcher`] issues exactly one HTTP call per [`send`](RequestDispatcher::send)
//! and normalizes the outcome. It never retries; that is the job of
//! [`RetryingInvoker`](crate::clients::RetryingInvoker).

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::{ApiError, HttpResponseError};
use crate::clients::http_request::{EncodedPayload, HttpMethod, RequestSpec};
use crate::clients::http_response::{ApiResponse, ResponseEnvelope};
use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Issues one authenticated HTTP request and normalizes its result.
///
/// The dispatcher owns:
/// - Base URI construction (`https://{host_name}` or the configured `api_host`)
/// - Default headers (access token, JSON content negotiation, User-Agent)
/// - Payload placement (body for POST/PUT, query string for GET/DELETE)
/// - Response decoding and call-limit extraction
///
/// Non-2xx responses become [`ApiError::Http`]; failures below HTTP become
/// [`ApiError::Transport`].
pub struct RequestDispatcher {
    client: reqwest::Client,
    base_uri: String,
    default_headers: HashMap<String, String>,
}

// Verify RequestDispatcher is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestDispatcher>();
};

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&str> = self.default_headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();
        f.debug_struct("RequestDispatcher")
            .field("base_uri", &self.base_uri)
            .field("default_headers", &header_names)
            .finish_non_exhaustive()
    }
}

impl RequestDispatcher {
    /// Creates a dispatcher from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if the underlying HTTP client
    /// cannot be built (e.g. TLS backend initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let credentials = config.credentials();
        let host_name = credentials.host_name.as_ref();

        let base_uri = config.api_host().map_or_else(
            || format!("https://{host_name}"),
            |host| host.as_ref().to_string(),
        );

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}shopify-admin-client v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert(
            ACCESS_TOKEN_HEADER.to_string(),
            credentials.access_token.as_ref().to_string(),
        );

        // Proxy scenario: the store is still named in the Host header
        if config.api_host().is_some() {
            default_headers.insert("Host".to_string(), host_name.to_string());
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClientInit {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_uri,
            default_headers,
        })
    }

    /// Returns the base URI for this dispatcher.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers attached to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Builds the absolute URL for a relative API path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/admin/{}", self.base_uri, path.trim_start_matches('/'))
    }

    /// Sends a single request.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidRequest`] if the request fails validation
    /// - [`ApiError::Transport`] on DNS, connect, timeout or read failures
    /// - [`ApiError::Http`] for any non-2xx response, carrying status and body
    pub async fn send(&self, spec: &RequestSpec) -> Result<ApiResponse, ApiError> {
        let payload = spec.encode()?;
        let method = spec.method();
        let url = self.url_for(spec.path());

        tracing::debug!("{} {}", method, url);

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        req_builder = match payload {
            EncodedPayload::Body(body) => req_builder.body(body.to_string()),
            EncodedPayload::Query(pairs) if pairs.is_empty() => req_builder,
            EncodedPayload::Query(pairs) => req_builder.query(&pairs),
        };

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let envelope = ResponseEnvelope::new(code, headers, Self::parse_body(&body_text));

        if let Some(reason) = envelope.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                spec.path(),
                reason
            );
        }

        tracing::debug!(
            "Call Limit: {:?} ({} {})",
            envelope.api_call_limit(),
            code,
            spec.path()
        );

        if envelope.is_ok() {
            return Ok(envelope.into_api_response());
        }

        let error_reference = envelope.request_id().map(String::from);
        let api_call_limit = envelope.api_call_limit();
        Err(ApiError::Http(HttpResponseError {
            code,
            body: envelope.body,
            error_reference,
            api_call_limit,
        }))
    }

    /// Parses response headers into a `HashMap` keyed by lower-case name.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Decodes a body as JSON; empty bodies become `{}` and anything that is
    /// not JSON is kept verbatim under `raw_body`.
    fn parse_body(text: &str) -> serde_json::Value {
        if text.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw_body": text }))
    }
}
