//! HTTP plumbing for the Shopify Admin REST API.
//!
//! Every call funnels through the same pipeline:
//!
//! ```text
//! ShopifyClient::invoke -> RetryingInvoker -> RequestDispatcher::send (once per attempt)
//! ```
//!
//! # Overview
//!
//! - [`ShopifyClient`]: caller-facing client with verb helpers and field extraction
//! - [`RetryingInvoker`]: retries 429 responses under a [`RetryPolicy`]
//! - [`RequestDispatcher`]: issues exactly one authenticated request
//! - [`RateLimiter`] / [`PacingPolicy`]: optional proactive pacing
//! - [`RequestSpec`], [`HttpMethod`]: what to send
//! - [`ApiResponse`], [`ApiCallLimit`], [`ResponseEnvelope`]: what came back
//! - [`ApiError`] and friends: how it failed
//!
//! # Retry Behavior
//!
//! - **429 (Too Many Requests)**: retried after a fixed delay (500 ms by
//!   default) until [`RetryPolicy::max_attempts`] is reached, then
//!   [`ApiError::RetryExhausted`]
//! - **Any other non-2xx**: returned immediately as [`ApiError::Http`]
//! - **Network failures and timeouts**: returned immediately as
//!   [`ApiError::Transport`]

mod client;
mod dispatcher;
mod errors;
mod http_request;
mod http_response;
mod rate_limiter;
mod retry;

pub use client::{extract_field, ShopifyClient};
pub use dispatcher::{RequestDispatcher, ACCESS_TOKEN_HEADER, SDK_VERSION};
pub use errors::{
    ApiError, HttpResponseError, InvalidHttpRequestError, MissingFieldError, RetryExhaustedError,
    TransportError, TransportErrorKind,
};
pub use http_request::{encode_query, EncodedPayload, HttpMethod, RequestSpec};
pub use http_response::{ApiCallLimit, ApiResponse, ResponseEnvelope, CALL_LIMIT_HEADER};
pub use rate_limiter::{PacingPolicy, RateLimiter, DEFAULT_PACING_DELAY};
pub use retry::{
    RetryPolicy, RetryingInvoker, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, THROTTLED_STATUS,
};
