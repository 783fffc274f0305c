//! Integration tests for single-request dispatch.
//!
//! These tests run the dispatcher against a local mock server and verify
//! authentication, payload placement, call-limit parsing and error shapes.

use std::time::Duration;

use serde_json::json;
use shopify_client::{
    AccessToken, ApiCallLimit, ApiError, ClientConfig, Credentials, HostName, HostUrl,
    HttpMethod, RequestDispatcher, RequestSpec, TransportErrorKind,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "shpat_test_token";

fn create_dispatcher(base_uri: &str, timeout: Duration) -> RequestDispatcher {
    let config = ClientConfig::builder()
        .credentials(Credentials::new(
            HostName::new("test-shop.myshopify.com").unwrap(),
            AccessToken::new(TOKEN).unwrap(),
        ))
        .api_host(HostUrl::new(base_uri).unwrap())
        .timeout(timeout)
        .build()
        .unwrap();
    RequestDispatcher::new(&config).unwrap()
}

async fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ============================================================================
// Authentication and URL Tests
// ============================================================================

#[tokio::test]
async fn test_access_token_header_sent_for_every_verb() {
    let server = MockServer::start().await;
    Mock::given(header("X-Shopify-Access-Token", TOKEN))
        .and(path("/admin/things.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(4)
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    for verb in [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ] {
        let response = dispatcher
            .send(&RequestSpec::new(verb, "things.json"))
            .await
            .unwrap();
        assert_eq!(response.body, json!({"ok": true}));
    }
}

#[tokio::test]
async fn test_json_content_negotiation_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/shop.json"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"shop": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "/shop.json"))
        .await
        .unwrap();
}

// ============================================================================
// Payload Encoding Tests
// ============================================================================

#[tokio::test]
async fn test_get_payload_travels_as_query_string_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/orders.json"))
        .and(query_param("a", "1"))
        .and(query_param("b", "x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let spec = RequestSpec::new(HttpMethod::Get, "orders.json").payload(json!({"a": 1, "b": "x"}));
    dispatcher.send(&spec).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let mut decoded: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    decoded.sort();
    assert_eq!(
        decoded,
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "x".to_string())
        ]
    );
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_delete_payload_travels_as_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/script_tags/9.json"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let spec =
        RequestSpec::new(HttpMethod::Delete, "script_tags/9.json").payload(json!({"force": true}));
    let response = dispatcher.send(&spec).await.unwrap();

    // Empty bodies decode to an empty object
    assert_eq!(response.body, json!({}));
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_post_and_put_payload_travels_as_body_only() {
    let server = MockServer::start().await;
    let payload = json!({"product": {"title": "ESO fancy hats", "published": false}});

    Mock::given(path("/admin/products.json"))
        .and(body_json(payload.clone()))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"product": {"id": 9679840897u64}})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    for verb in [HttpMethod::Post, HttpMethod::Put] {
        let spec = RequestSpec::new(verb, "products.json").payload(payload.clone());
        dispatcher.send(&spec).await.unwrap();
    }

    for request in server.received_requests().await.unwrap() {
        assert!(request.url.query().is_none());
    }
}

// ============================================================================
// Call Limit Tests
// ============================================================================

#[tokio::test]
async fn test_call_limit_header_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "39/40")
                .set_body_json(json!({"shop": {"id": 1}})),
        )
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let response = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap();

    assert_eq!(
        response.api_call_limit,
        Some(ApiCallLimit { used: 39, limit: 40 })
    );
}

#[tokio::test]
async fn test_absent_call_limit_header_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"shop": {}})))
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let response = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap();

    assert!(response.api_call_limit.is_none());
}

#[tokio::test]
async fn test_malformed_call_limit_header_does_not_fail_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "many/40")
                .set_body_json(json!({"shop": {}})),
        )
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let response = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap();

    assert!(response.api_call_limit.is_none());
    assert_eq!(response.body, json!({"shop": {}}));
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn test_non_2xx_becomes_http_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Request-Id", "req-404")
                .set_body_json(json!({"errors": "Not Found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let error = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "products/1.json"))
        .await
        .unwrap_err();

    match error {
        ApiError::Http(e) => {
            assert_eq!(e.code, 404);
            assert_eq!(e.body, json!({"errors": "Not Found"}));
            assert_eq!(e.error_reference.as_deref(), Some("req-404"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_throttled_error_carries_call_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("X-Shopify-Shop-Api-Call-Limit", "40/40")
                .set_body_json(json!({"errors": "Exceeded 2 calls per second for api client."})),
        )
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let error = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap_err();

    let ApiError::Http(e) = error else {
        panic!("expected Http error");
    };
    assert_eq!(e.code, 429);
    assert_eq!(e.api_call_limit, Some(ApiCallLimit { used: 40, limit: 40 }));
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_raw() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_secs(5));
    let error = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(502));
    let ApiError::Http(e) = error else {
        panic!("expected Http error");
    };
    assert_eq!(e.body, json!({"raw_body": "Bad Gateway"}));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let dispatcher = create_dispatcher(&closed_port_uri().await, Duration::from_secs(5));
    let error = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap_err();

    match error {
        ApiError::Transport(e) => assert_eq!(e.kind, TransportErrorKind::Connect),
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let dispatcher = create_dispatcher(&server.uri(), Duration::from_millis(100));
    let error = dispatcher
        .send(&RequestSpec::new(HttpMethod::Get, "shop.json"))
        .await
        .unwrap_err();

    match error {
        ApiError::Transport(e) => assert_eq!(e.kind, TransportErrorKind::Timeout),
        other => panic!("expected Transport timeout, got {other:?}"),
    }
}
