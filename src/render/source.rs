//! wiremock source serializer

use std::time::Duration;

use tracing::warn;

use super::descriptor::{
    needs_exact_header_match, CapturedResponse, MatcherSpec, MockDescriptor, ResponseBody,
    ResponseSpec,
};
use super::literal::{bytes_literal, json_literal, raw_str_literal, str_literal};
use super::RenderOptions;

/// Imports the rendered source expects to be in scope.
///
/// The source also names `serde_json` and `mockscribe::matchers` by path,
/// so both crates must be dependencies of the code it is pasted into.
pub const SOURCE_PRELUDE: &str = "\
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};
";

/// Status served in place of a send that failed without a response
pub const FAILED_SEND_STATUS: u16 = 502;

/// Extra delay added past a captured timeout so replays time out too
pub const TIMEOUT_REPLAY_MARGIN: Duration = Duration::from_millis(500);

const INDENT: &str = "    ";

/// Render a descriptor as a wiremock registration statement.
///
/// The output is a single statement with fixed four-space indentation,
/// mounting onto `options.server_binding`.
#[must_use]
pub fn to_wiremock_source(descriptor: &MockDescriptor, options: &RenderOptions) -> String {
    let mut lines = vec![
        format!("// {} {}", descriptor.method, descriptor.url),
        format!("Mock::given(method({}))", str_literal(&descriptor.method)),
        format!("{INDENT}.and(path({}))", str_literal(&descriptor.path)),
    ];

    for matcher in &descriptor.matchers {
        render_matcher(matcher, &mut lines);
    }

    lines.push(format!("{INDENT}.respond_with("));
    lines.push(format!("{INDENT}{INDENT}{}", response_template(&descriptor.response)));
    lines.push(format!("{INDENT})"));
    lines.push(format!("{INDENT}.mount(&{})", options.server_binding));
    lines.push(format!("{INDENT}.await;"));

    lines.join("\n")
}

fn render_matcher(matcher: &MatcherSpec, lines: &mut Vec<String>) {
    match matcher {
        MatcherSpec::JsonBody(value) => {
            lines.push(format!("{INDENT}.and(body_json({}))", json_literal(value)));
        }
        MatcherSpec::FormParams(pairs) => {
            lines.push(format!(
                "{INDENT}.and(mockscribe::matchers::form_params({}))",
                pairs_literal(pairs)
            ));
        }
        MatcherSpec::QueryParams(pairs) => {
            lines.push(format!(
                "{INDENT}.and(mockscribe::matchers::query_params({}))",
                pairs_literal(pairs)
            ));
        }
        MatcherSpec::Headers(headers) => {
            for (name, value) in headers {
                let constructor = if needs_exact_header_match(value) {
                    "mockscribe::matchers::header_exact"
                } else {
                    "header"
                };
                lines.push(format!(
                    "{INDENT}.and({constructor}({}, {}))",
                    str_literal(&name.to_ascii_lowercase()),
                    str_literal(value)
                ));
            }
        }
        MatcherSpec::RequestOptions(send_options) => {
            warn!(
                "Request options {send_options:?} are not visible to a mock server, \
                 leaving them out of the rendered source"
            );
        }
    }
}

fn pairs_literal(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return "Vec::<(String, String)>::new()".to_string();
    }

    let items: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("({}, {})", str_literal(k), str_literal(v)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Render the `ResponseTemplate` expression, continuation lines included
fn response_template(response: &ResponseSpec) -> String {
    let continuation = format!("\n{INDENT}{INDENT}{INDENT}");
    let mut parts = Vec::new();

    match response {
        ResponseSpec::Captured(captured) => {
            parts.push(format!("ResponseTemplate::new({})", captured.status));
            for (name, value) in captured.template_headers() {
                parts.push(format!(
                    ".append_header({}, {})",
                    str_literal(&name.to_ascii_lowercase()),
                    str_literal(value)
                ));
            }
            if let Some(body) = body_call(captured) {
                parts.push(body);
            }
        }
        ResponseSpec::Failed { failure } => match failure.timeout {
            Some(timeout) if failure.is_timeout() => {
                let delay = timeout + TIMEOUT_REPLAY_MARGIN;
                parts.push("ResponseTemplate::new(200)".to_string());
                parts.push(format!(
                    ".set_delay(std::time::Duration::from_millis({}))",
                    delay.as_millis()
                ));
            }
            _ => {
                parts.push(format!("ResponseTemplate::new({FAILED_SEND_STATUS})"));
                parts.push(format!(
                    ".set_body_string({})",
                    str_literal(&failure.message)
                ));
            }
        },
    }

    let mut rendered = parts.remove(0);
    for part in parts {
        rendered.push_str(&continuation);
        rendered.push_str(&part);
    }
    rendered.push(',');
    rendered
}

fn body_call(response: &CapturedResponse) -> Option<String> {
    match &response.body {
        ResponseBody::Json(value) => Some(match response.json_content_type_override() {
            Some(content_type) => format!(
                ".set_body_raw({}, {})",
                raw_str_literal(&value.to_string()),
                str_literal(content_type)
            ),
            None => format!(".set_body_json({})", json_literal(value)),
        }),
        ResponseBody::Bytes(bytes) if bytes.is_empty() => None,
        ResponseBody::Bytes(bytes) => Some(match response.content_type() {
            Some(content_type) => format!(
                ".set_body_raw({}.to_vec(), {})",
                bytes_literal(bytes),
                str_literal(content_type)
            ),
            None => format!(".set_body_bytes({}.to_vec())", bytes_literal(bytes)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, TransportFailure};
    use crate::exchange::SendOptions;
    use serde_json::json;

    fn descriptor(response: ResponseSpec, matchers: Vec<MatcherSpec>) -> MockDescriptor {
        MockDescriptor {
            method: "POST".to_string(),
            url: "http://example.com/post".to_string(),
            path: "/post".to_string(),
            response,
            matchers,
            warnings: vec![],
        }
    }

    fn json_response() -> ResponseSpec {
        ResponseSpec::Captured(CapturedResponse {
            status: 200,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Server".to_string(), "gunicorn".to_string()),
            ],
            body: ResponseBody::Json(json!({"ok": true})),
        })
    }

    #[test]
    fn test_render_full_registration() {
        let descriptor = descriptor(
            json_response(),
            vec![
                MatcherSpec::JsonBody(json!({"Hello": "World"})),
                MatcherSpec::QueryParams(vec![("page".to_string(), "2".to_string())]),
                MatcherSpec::Headers(vec![
                    ("Authorization".to_string(), "Bearer 123".to_string()),
                    ("Accept".to_string(), "application/json, text/plain".to_string()),
                ]),
            ],
        );

        let expected = r#"// POST http://example.com/post
Mock::given(method("POST"))
    .and(path("/post"))
    .and(body_json(serde_json::json!({"Hello": "World"})))
    .and(mockscribe::matchers::query_params([("page", "2")]))
    .and(header("authorization", "Bearer 123"))
    .and(mockscribe::matchers::header_exact("accept", "application/json, text/plain"))
    .respond_with(
        ResponseTemplate::new(200)
            .append_header("server", "gunicorn")
            .set_body_json(serde_json::json!({"ok": true})),
    )
    .mount(&mock_server)
    .await;"#;

        assert_eq!(to_wiremock_source(&descriptor, &RenderOptions::default()), expected);
    }

    #[test]
    fn test_render_repeated_response_headers_appended() {
        let response = ResponseSpec::Captured(CapturedResponse {
            status: 200,
            headers: vec![
                ("set-cookie".to_string(), "a=1".to_string()),
                ("set-cookie".to_string(), "b=2".to_string()),
            ],
            body: ResponseBody::Bytes(vec![]),
        });
        let source = to_wiremock_source(&descriptor(response, vec![]), &RenderOptions::default());

        assert!(source.contains(r#".append_header("set-cookie", "a=1")"#));
        assert!(source.contains(r#".append_header("set-cookie", "b=2")"#));
        assert!(!source.contains("insert_header"));
    }

    #[test]
    fn test_render_json_body_keeps_custom_content_type() {
        let response = ResponseSpec::Captured(CapturedResponse {
            status: 400,
            headers: vec![(
                "content-type".to_string(),
                "application/problem+json".to_string(),
            )],
            body: ResponseBody::Json(json!({"title": "bad"})),
        });
        let source = to_wiremock_source(&descriptor(response, vec![]), &RenderOptions::default());

        assert!(source.contains(
            r##".set_body_raw(r#"{"title":"bad"}"#, "application/problem+json"),"##
        ));
    }

    #[test]
    fn test_render_large_json_without_macro() {
        let response = ResponseSpec::Captured(CapturedResponse {
            status: 200,
            headers: vec![],
            body: ResponseBody::Json(json!((0..300).collect::<Vec<u32>>())),
        });
        let source = to_wiremock_source(&descriptor(response, vec![]), &RenderOptions::default());

        assert!(!source.contains("json!"));
        assert!(source.contains(".set_body_json(serde_json::from_str::<serde_json::Value>(r#\"[0,1,2,"));
    }

    #[test]
    fn test_render_form_matcher_and_raw_body() {
        let response = ResponseSpec::Captured(CapturedResponse {
            status: 201,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: ResponseBody::Bytes(b"created\n".to_vec()),
        });
        let descriptor = descriptor(
            response,
            vec![MatcherSpec::FormParams(vec![(
                "Hello".to_string(),
                "World".to_string(),
            )])],
        );
        let options = RenderOptions {
            server_binding: "server".to_string(),
            ..RenderOptions::default()
        };

        let source = to_wiremock_source(&descriptor, &options);
        assert!(source.contains(
            r#"    .and(mockscribe::matchers::form_params([("Hello", "World")]))"#
        ));
        assert!(source.contains(r#".set_body_raw(b"created\n".to_vec(), "text/plain"),"#));
        assert!(source.contains("    .mount(&server)"));
    }

    #[test]
    fn test_render_request_options_omitted() {
        let descriptor = descriptor(
            json_response(),
            vec![MatcherSpec::RequestOptions(SendOptions::default())],
        );

        let source = to_wiremock_source(&descriptor, &RenderOptions::default());
        assert_eq!(source.matches(".and(").count(), 1);
    }

    #[test]
    fn test_render_timeout_failure_as_delay() {
        let failure = TransportFailure::timed_out(Duration::from_secs(1));
        let descriptor = descriptor(ResponseSpec::Failed { failure }, vec![]);

        let source = to_wiremock_source(&descriptor, &RenderOptions::default());
        assert!(source.contains("ResponseTemplate::new(200)"));
        assert!(source.contains(".set_delay(std::time::Duration::from_millis(1500)),"));
    }

    #[test]
    fn test_render_connect_failure_as_bad_gateway() {
        let failure = TransportFailure::new(FailureKind::Connect, "connection refused");
        let descriptor = descriptor(ResponseSpec::Failed { failure }, vec![]);

        let source = to_wiremock_source(&descriptor, &RenderOptions::default());
        assert!(source.contains("ResponseTemplate::new(502)"));
        assert!(source.contains(r#".set_body_string("connection refused"),"#));
    }

    #[test]
    fn test_render_empty_body_without_body_call() {
        let response = ResponseSpec::Captured(CapturedResponse {
            status: 204,
            headers: vec![],
            body: ResponseBody::Bytes(vec![]),
        });
        let source = to_wiremock_source(&descriptor(response, vec![]), &RenderOptions::default());

        assert!(source.contains("        ResponseTemplate::new(204),\n"));
    }
}
