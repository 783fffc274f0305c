//! # Shopify Admin Client
//!
//! A rate-limit aware Rust client for the Shopify Admin REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the store host and access token
//! - A single-request [`RequestDispatcher`] that authenticates, encodes the
//!   payload per verb and reads the `X-Shopify-Shop-Api-Call-Limit` header
//! - A [`RetryingInvoker`] retrying throttled (429) calls with a fixed delay
//!   and a bounded attempt count
//! - Optional proactive pacing from the observed call limit
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_client::{AccessToken, ClientConfig, Credentials, HostName, ShopifyClient};
//!
//! let config = ClientConfig::builder()
//!     .credentials(Credentials::new(
//!         HostName::new("my-store.myshopify.com").unwrap(),
//!         AccessToken::new("shpat_123").unwrap(),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let client = ShopifyClient::new(config).unwrap();
//! assert_eq!(client.dispatcher().base_uri(), "https://my-store.myshopify.com");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use serde_json::json;
//! use shopify_client::HttpMethod;
//!
//! // GET /admin/orders.json?limit=250&status=any
//! let orders = client
//!     .invoke_field(HttpMethod::Get, "orders.json", json!({"limit": 250, "status": "any"}), "orders")
//!     .await?;
//!
//! // POST /admin/webhooks.json with a JSON body
//! let response = client
//!     .post("webhooks.json", json!({"webhook": {"topic": "orders/create", "address": "https://example.com/hook", "format": "json"}}))
//!     .await?;
//!
//! // 404 is surfaced, not retried
//! match client.get("products/1.json").await {
//!     Err(e) if e.is_not_found() => println!("gone"),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: clients are plain values owned by the caller
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;

pub use config::{
    AccessToken, ClientConfig, ClientConfigBuilder, Credentials, HostName, HostUrl,
};
pub use error::ConfigError;

pub use clients::{
    ApiCallLimit, ApiError, ApiResponse, HttpMethod, HttpResponseError, InvalidHttpRequestError,
    MissingFieldError, PacingPolicy, RateLimiter, RequestDispatcher, RequestSpec,
    ResponseEnvelope, RetryExhaustedError, RetryPolicy, RetryingInvoker, ShopifyClient,
    TransportError, TransportErrorKind,
};
