//! Response types for the Shopify Admin API.
//!
//! [`ResponseEnvelope`] is the raw status/headers/body triple read off the
//! wire. [`ApiResponse`] is what callers get back from a successful call: the
//! decoded body plus the call-limit observation that came with it.

use std::collections::HashMap;

/// Header carrying the leaky-bucket call counter.
pub const CALL_LIMIT_HEADER: &str = "x-shopify-shop-api-call-limit";

/// Rate limit information parsed from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// The header format is `"used/limit"`.
///
/// # Example
///
/// ```rust
/// use shopify_client::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("39/40").unwrap();
/// assert_eq!(limit.used, 39);
/// assert_eq!(limit.limit, 40);
/// assert_eq!(limit.remaining(), 1);
/// assert!(ApiCallLimit::parse("abc/40").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// Calls currently counted against the bucket.
    pub used: u32,
    /// Bucket size.
    pub limit: u32,
}

impl ApiCallLimit {
    /// Parses the header value, returning `None` for anything malformed.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (used, limit) = header_value.split_once('/')?;
        let used = used.trim().parse().ok()?;
        let limit = limit.trim().parse().ok()?;

        Some(Self { used, limit })
    }

    /// Calls left before the bucket is full.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// A raw HTTP response: status code, lower-cased headers and decoded body.
#[derive(Clone, Debug)]
pub struct ResponseEnvelope {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers keyed by lower-case name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl ResponseEnvelope {
    /// Creates a new envelope.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, by lower-case name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Parses the call-limit header. Absent or malformed headers yield `None`.
    #[must_use]
    pub fn api_call_limit(&self) -> Option<ApiCallLimit> {
        self.header(CALL_LIMIT_HEADER).and_then(ApiCallLimit::parse)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Consumes the envelope into the caller-facing response.
    #[must_use]
    pub fn into_api_response(self) -> ApiResponse {
        let api_call_limit = self.api_call_limit();
        ApiResponse {
            body: self.body,
            api_call_limit,
        }
    }
}

/// The result of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// The decoded JSON body.
    pub body: serde_json::Value,
    /// The call-limit observation, if the header was present and well formed.
    pub api_call_limit: Option<ApiCallLimit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers_with(name: &str, value: &str) -> HashMap<String, Vec<String>> {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), vec![value.to_string()]);
        headers
    }

    #[test]
    fn test_is_ok_only_for_2xx() {
        assert!(ResponseEnvelope::new(200, HashMap::new(), json!({})).is_ok());
        assert!(ResponseEnvelope::new(201, HashMap::new(), json!({})).is_ok());
        assert!(ResponseEnvelope::new(299, HashMap::new(), json!({})).is_ok());
        assert!(!ResponseEnvelope::new(302, HashMap::new(), json!({})).is_ok());
        assert!(!ResponseEnvelope::new(404, HashMap::new(), json!({})).is_ok());
        assert!(!ResponseEnvelope::new(429, HashMap::new(), json!({})).is_ok());
        assert!(!ResponseEnvelope::new(500, HashMap::new(), json!({})).is_ok());
    }

    #[test]
    fn test_api_call_limit_parsing() {
        assert_eq!(
            ApiCallLimit::parse("39/40"),
            Some(ApiCallLimit { used: 39, limit: 40 })
        );
        assert_eq!(
            ApiCallLimit::parse(" 1 / 80 "),
            Some(ApiCallLimit { used: 1, limit: 80 })
        );

        assert!(ApiCallLimit::parse("").is_none());
        assert!(ApiCallLimit::parse("40").is_none());
        assert!(ApiCallLimit::parse("40/").is_none());
        assert!(ApiCallLimit::parse("/80").is_none());
        assert!(ApiCallLimit::parse("abc/def").is_none());
        assert!(ApiCallLimit::parse("1/2/3").is_none());
        assert!(ApiCallLimit::parse("-1/40").is_none());
    }

    #[test]
    fn test_remaining_saturates() {
        assert_eq!(ApiCallLimit { used: 45, limit: 40 }.remaining(), 0);
    }

    #[test]
    fn test_envelope_reads_call_limit_header() {
        let response = ResponseEnvelope::new(200, headers_with(CALL_LIMIT_HEADER, "39/40"), json!({}));
        assert_eq!(
            response.api_call_limit(),
            Some(ApiCallLimit { used: 39, limit: 40 })
        );
    }

    #[test]
    fn test_missing_or_malformed_call_limit_is_none() {
        let response = ResponseEnvelope::new(200, HashMap::new(), json!({}));
        assert!(response.api_call_limit().is_none());

        let response =
            ResponseEnvelope::new(200, headers_with(CALL_LIMIT_HEADER, "lots/40"), json!({}));
        assert!(response.api_call_limit().is_none());
    }

    #[test]
    fn test_request_id_and_deprecation_extraction() {
        let mut headers = headers_with("x-request-id", "abc-123-xyz");
        headers.insert(
            "x-shopify-api-deprecated-reason".to_string(),
            vec!["This endpoint is deprecated".to_string()],
        );

        let response = ResponseEnvelope::new(200, headers, json!({}));
        assert_eq!(response.request_id(), Some("abc-123-xyz"));
        assert_eq!(
            response.deprecation_reason(),
            Some("This endpoint is deprecated")
        );
    }

    #[test]
    fn test_into_api_response_keeps_body_and_limit() {
        let response = ResponseEnvelope::new(
            200,
            headers_with(CALL_LIMIT_HEADER, "3/40"),
            json!({"shop": {"id": 1}}),
        )
        .into_api_response();

        assert_eq!(response.body, json!({"shop": {"id": 1}}));
        assert_eq!(
            response.api_call_limit,
            Some(ApiCallLimit { used: 3, limit: 40 })
        );
    }
}
