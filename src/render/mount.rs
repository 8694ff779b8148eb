//! Build live wiremock mocks from descriptors

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockBuilder, ResponseTemplate};

use crate::matchers::{form_params, header_exact, query_params};

use super::descriptor::{
    needs_exact_header_match, CapturedResponse, MatcherSpec, MockDescriptor, ResponseBody,
    ResponseSpec,
};
use super::source::{FAILED_SEND_STATUS, TIMEOUT_REPLAY_MARGIN};

/// Build the `wiremock::Mock` that the rendered source registers.
///
/// Mount it with `mock_server.register(mock).await` or
/// `mock.mount(&mock_server).await`.
#[must_use]
pub fn to_mock(descriptor: &MockDescriptor) -> Mock {
    let mut builder = Mock::given(method(descriptor.method.as_str()))
        .and(path(descriptor.path.as_str()));

    for matcher in &descriptor.matchers {
        builder = add_matcher(builder, matcher);
    }

    builder.respond_with(response_template(&descriptor.response))
}

fn add_matcher(builder: MockBuilder, matcher: &MatcherSpec) -> MockBuilder {
    match matcher {
        MatcherSpec::JsonBody(value) => builder.and(body_json(value)),
        MatcherSpec::FormParams(pairs) => builder.and(form_params(pairs.iter().cloned())),
        MatcherSpec::QueryParams(pairs) => builder.and(query_params(pairs.iter().cloned())),
        MatcherSpec::Headers(headers) => headers.iter().fold(builder, |b, (k, v)| {
            let name = k.to_ascii_lowercase();
            if needs_exact_header_match(v) {
                b.and(header_exact(name, v.as_str()))
            } else {
                b.and(header(name.as_str(), v.as_str()))
            }
        }),
        MatcherSpec::RequestOptions(_) => builder,
    }
}

fn response_template(response: &ResponseSpec) -> ResponseTemplate {
    match response {
        ResponseSpec::Captured(captured) => captured_template(captured),
        ResponseSpec::Failed { failure } => match failure.timeout {
            Some(timeout) if failure.is_timeout() => {
                ResponseTemplate::new(200).set_delay(timeout + TIMEOUT_REPLAY_MARGIN)
            }
            _ => ResponseTemplate::new(FAILED_SEND_STATUS).set_body_string(failure.message.clone()),
        },
    }
}

fn captured_template(captured: &CapturedResponse) -> ResponseTemplate {
    let mut template = ResponseTemplate::new(captured.status);
    for (name, value) in captured.template_headers() {
        template = template.append_header(name.to_ascii_lowercase().as_str(), value.as_str());
    }

    match &captured.body {
        ResponseBody::Json(value) => match captured.json_content_type_override() {
            Some(content_type) => template.set_body_raw(value.to_string(), content_type),
            None => template.set_body_json(value),
        },
        ResponseBody::Bytes(bytes) if bytes.is_empty() => template,
        ResponseBody::Bytes(bytes) => match captured.content_type() {
            Some(content_type) => template.set_body_raw(bytes.clone(), content_type),
            None => template.set_body_bytes(bytes.clone()),
        },
    }
}
