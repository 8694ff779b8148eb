//! Mocks rendered from the exchanges in `tests/rendered_source_test.rs`.
//!
//! Regenerate with `MOCKSCRIBE_BLESS=1 cargo test --test rendered_source_test`.

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};
use wiremock::MockServer;

pub async fn mount(mock_server: &MockServer) {
// GET http://example.com/items
Mock::given(method("GET"))
    .and(path("/items"))
    .and(mockscribe::matchers::query_params([("page", "2"), ("q", "rust")]))
    .and(mockscribe::matchers::header_exact("x-tags", "a, b"))
    .respond_with(
        ResponseTemplate::new(200)
            .append_header("set-cookie", "a=1")
            .append_header("set-cookie", "b=2")
            .set_body_json(serde_json::from_str::<serde_json::Value>(r#"[0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17,18,19,20,21,22,23,24,25,26,27,28,29,30,31,32,33,34,35,36,37,38,39]"#).unwrap()),
    )
    .mount(&mock_server)
    .await;

// POST http://example.com/post
Mock::given(method("POST"))
    .and(path("/post"))
    .and(body_json(serde_json::json!({"Hello": "World"})))
    .and(header("content-type", "application/json"))
    .respond_with(
        ResponseTemplate::new(400)
            .set_body_raw(r#"{"title":"bad"}"#, "application/problem+json"),
    )
    .mount(&mock_server)
    .await;

// POST http://example.com/form
Mock::given(method("POST"))
    .and(path("/form"))
    .and(mockscribe::matchers::form_params([("Hello", "World")]))
    .and(header("content-type", "application/x-www-form-urlencoded"))
    .respond_with(
        ResponseTemplate::new(201)
            .set_body_raw(b"created\n".to_vec(), "text/plain"),
    )
    .mount(&mock_server)
    .await;

// GET http://example.com/down
Mock::given(method("GET"))
    .and(path("/down"))
    .respond_with(
        ResponseTemplate::new(502)
            .set_body_string("connection refused"),
    )
    .mount(&mock_server)
    .await;

// GET http://example.com/slow
Mock::given(method("GET"))
    .and(path("/slow"))
    .respond_with(
        ResponseTemplate::new(200)
            .set_delay(std::time::Duration::from_millis(700)),
    )
    .mount(&mock_server)
    .await;
}
