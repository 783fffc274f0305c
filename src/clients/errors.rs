//! Error types for dispatching requests to the Shopify Admin API.
//!
//! Failures are split by where they happen so callers can pattern-match
//! instead of guessing at a shape:
//!
//! - [`TransportError`]: the server was never heard from (DNS, connect, timeout)
//! - [`HttpResponseError`]: a non-2xx response, with its status and parsed body
//! - [`RetryExhaustedError`]: the retry ceiling was hit while still throttled
//! - [`InvalidHttpRequestError`]: the request was rejected before sending
//! - [`MissingFieldError`]: a response lacked the expected top-level property
//! - [`ApiError`]: unified error encompassing all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_client::ApiError;
//!
//! match client.get("products/42.json").await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(e) if e.is_not_found() => println!("no such product"),
//!     Err(ApiError::RetryExhausted(e)) => println!("throttled {} times", e.attempts),
//!     Err(ApiError::Transport(e)) => println!("network: {e}"),
//!     Err(e) => return Err(e),
//! }
//! ```

use crate::clients::http_response::ApiCallLimit;
use thiserror::Error;

/// Classification of a transport-level failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The attempt exceeded the configured timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// Any other I/O or protocol failure.
    Other,
}

/// Error returned when no HTTP response was received.
///
/// Transport errors are never retried by the client.
#[derive(Debug, Error)]
#[error("Transport error ({kind:?}): {source}")]
pub struct TransportError {
    /// What kind of failure occurred.
    pub kind: TransportErrorKind,
    /// The underlying HTTP stack error.
    #[source]
    pub source: reqwest::Error,
}

impl From<reqwest::Error> for TransportError {
    fn from(source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            TransportErrorKind::Timeout
        } else if source.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self { kind, source }
    }
}

/// Error returned when the API answers with a non-2xx status.
///
/// # Example
///
/// ```rust
/// use shopify_client::HttpResponseError;
/// use serde_json::json;
///
/// let error = HttpResponseError {
///     code: 404,
///     body: json!({"errors": "Not Found"}),
///     error_reference: Some("abc-123".to_string()),
///     api_call_limit: None,
/// };
///
/// assert_eq!(error.to_string(), r#"HTTP 404: {"errors":"Not Found"}"#);
/// ```
#[derive(Debug, Error)]
#[error("HTTP {code}: {body}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Reference ID for error reporting (from `X-Request-Id` header).
    pub error_reference: Option<String>,
    /// Call limit reported alongside the failure, if any.
    pub api_call_limit: Option<ApiCallLimit>,
}

/// Error returned when a request is still throttled after every allowed attempt.
///
/// # Example
///
/// ```rust
/// use shopify_client::RetryExhaustedError;
/// use serde_json::json;
///
/// let error = RetryExhaustedError {
///     attempts: 3,
///     code: 429,
///     body: json!({"errors": "Exceeded 2 calls per second for api client."}),
///     error_reference: None,
/// };
///
/// assert!(error.to_string().starts_with("Exceeded maximum attempt count of 3"));
/// ```
#[derive(Debug, Error)]
#[error("Exceeded maximum attempt count of {attempts}. Last response: HTTP {code}: {body}")]
pub struct RetryExhaustedError {
    /// The number of attempts made.
    pub attempts: u32,
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The parsed body of the last response.
    pub body: serde_json::Value,
    /// Reference ID for error reporting (from `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not one of the supported methods.
    #[error("Invalid Http method {method}.")]
    InvalidMethod {
        /// The invalid method that was provided.
        method: String,
    },

    /// The path is empty once leading slashes are removed.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// A GET or DELETE payload that cannot be expressed as a query string.
    #[error("Cannot encode a non-object payload as query parameters for {method}.")]
    UnsupportedQueryPayload {
        /// The HTTP method the payload was given to.
        method: String,
    },
}

/// Error returned when a response body lacks the expected top-level property.
///
/// # Example
///
/// ```rust
/// use shopify_client::MissingFieldError;
///
/// let error = MissingFieldError {
///     field: "shop".to_string(),
///     available: vec!["errors".to_string()],
/// };
///
/// assert_eq!(error.to_string(), "No such property to access: shop, only: errors");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("No such property to access: {field}, only: {}", .available.join(","))]
pub struct MissingFieldError {
    /// The property that was expected.
    pub field: String,
    /// The properties that were actually present.
    pub available: Vec<String>,
}

/// Unified error type for every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or timeout failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-2xx response.
    #[error(transparent)]
    Http(#[from] HttpResponseError),

    /// Throttled on every allowed attempt.
    #[error(transparent)]
    RetryExhausted(#[from] RetryExhaustedError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Expected response property absent.
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.into())
    }
}

impl ApiError {
    /// Returns the HTTP status of the last response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => Some(e.code),
            Self::RetryExhausted(e) => Some(e.code),
            _ => None,
        }
    }

    /// Returns `true` for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Returns `true` when the failure is due to throttling.
    #[must_use]
    pub const fn is_throttled(&self) -> bool {
        matches!(self.status(), Some(429))
    }
}
