//! Request types for the Shopify Admin API.
//!
//! A [`RequestSpec`] bundles the verb, relative path and payload of a single
//! logical call. The verb decides how the payload travels: POST and PUT send
//! it as a JSON body, GET and DELETE flatten it into query parameters.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods supported by the Admin REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` when the payload is sent as a request body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidHttpRequestError;

    /// Parses a method name case-insensitively.
    ///
    /// ```rust
    /// use shopify_client::HttpMethod;
    ///
    /// assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
    /// assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    /// assert!("patch".parse::<HttpMethod>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(InvalidHttpRequestError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// How a payload is attached to the outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodedPayload {
    /// JSON request body.
    Body(Value),
    /// Flattened query parameters.
    Query(Vec<(String, String)>),
}

/// A single logical API call: verb, relative path and payload.
///
/// # Example
///
/// ```rust
/// use shopify_client::{HttpMethod, RequestSpec};
/// use serde_json::json;
///
/// let spec = RequestSpec::new(HttpMethod::Get, "/orders.json")
///     .payload(json!({"status": "any", "limit": 250}));
///
/// assert_eq!(spec.path(), "orders.json");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    method: HttpMethod,
    path: String,
    payload: Value,
}

impl RequestSpec {
    /// Creates a request with an empty payload.
    ///
    /// Leading slashes are stripped from `path`.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            path: path.trim_start_matches('/').to_string(),
            payload: Value::Object(serde_json::Map::new()),
        }
    }

    /// Replaces the payload.
    #[must_use]
    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the normalized relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload_value(&self) -> &Value {
        &self.payload
    }

    /// Validates the request and encodes its payload for the wire.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::EmptyPath`] if the path is empty and
    /// [`InvalidHttpRequestError::UnsupportedQueryPayload`] if a GET/DELETE
    /// payload is neither an object nor `null`.
    pub fn encode(&self) -> Result<EncodedPayload, InvalidHttpRequestError> {
        if self.path.is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if self.method.has_body() {
            let body = match &self.payload {
                Value::Null => Value::Object(serde_json::Map::new()),
                other => other.clone(),
            };
            return Ok(EncodedPayload::Body(body));
        }

        match &self.payload {
            Value::Null => Ok(EncodedPayload::Query(Vec::new())),
            Value::Object(_) => Ok(EncodedPayload::Query(encode_query(&self.payload))),
            _ => Err(InvalidHttpRequestError::UnsupportedQueryPayload {
                method: self.method.to_string(),
            }),
        }
    }
}

/// Flattens a JSON object into query pairs using bracket notation.
///
/// Nested objects become `key[sub]`, arrays become `key[]`, `null` becomes an
/// empty value. Non-object roots yield no pairs.
///
/// ```rust
/// use shopify_client::clients::encode_query;
/// use serde_json::json;
///
/// let pairs = encode_query(&json!({"ids": [1, 2], "filter": {"vendor": "Acme"}}));
/// assert!(pairs.contains(&("ids[]".to_string(), "1".to_string())));
/// assert!(pairs.contains(&("filter[vendor]".to_string(), "Acme".to_string())));
/// ```
#[must_use]
pub fn encode_query(payload: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = payload {
        for (key, value) in map {
            push_pairs(&mut pairs, key.clone(), value);
        }
    }
    pairs
}

fn push_pairs(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => pairs.push((key, String::new())),
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for item in items {
                push_pairs(pairs, format!("{key}[]"), item);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                push_pairs(pairs, format!("{key}[{sub}]"), item);
            }
        }
    }
}
