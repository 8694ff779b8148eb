//! Matcher inference from a captured exchange

use serde_json::Value;
use tracing::warn;

use crate::client::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::exchange::{CapturedExchange, Request, Response};

use super::descriptor::{
    media_type, CapturedResponse, MatcherSpec, MockDescriptor, RenderWarning, ResponseBody,
    ResponseSpec,
};
use super::headers::strip_default_headers;
use super::RenderOptions;

/// Build the mock descriptor for one exchange.
///
/// Matchers come out in a fixed order: body, query, headers, request
/// options. Problems with individual matchers are logged and collected in
/// [`MockDescriptor::warnings`]; they never abort the description.
#[must_use]
pub fn describe(exchange: &CapturedExchange, options: &RenderOptions) -> MockDescriptor {
    let request = exchange.request();
    let mut warnings = Vec::new();
    let mut matchers = Vec::new();

    let mut base_url = request.url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    let response = match exchange.outcome() {
        Ok(response) => ResponseSpec::Captured(describe_response(response, options)),
        Err(failure) => ResponseSpec::Failed {
            failure: failure.clone(),
        },
    };

    if options.match_body {
        match body_matcher(request) {
            Ok(Some(matcher)) => matchers.push(matcher),
            Ok(None) => {}
            Err(warning) => {
                warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    if options.match_query {
        let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        if !query.is_empty() {
            matchers.push(MatcherSpec::QueryParams(query));
        }
    }

    if options.match_headers {
        let headers = strip_default_headers(&request.headers);
        if !headers.is_empty() {
            matchers.push(MatcherSpec::Headers(headers));
        }
    }

    if options.match_request_options {
        matchers.push(MatcherSpec::RequestOptions(exchange.options().clone()));
    }

    MockDescriptor {
        method: request.method.clone(),
        url: base_url.to_string(),
        path: request.url.path().to_string(),
        response,
        matchers,
        warnings,
    }
}

fn describe_response(response: &Response, options: &RenderOptions) -> CapturedResponse {
    let headers = response
        .headers
        .iter()
        .filter(|(name, _)| options.include_response_date || !name.eq_ignore_ascii_case("date"))
        .cloned()
        .collect();

    let body = match serde_json::from_slice::<Value>(&response.body) {
        Ok(json) => ResponseBody::Json(json),
        Err(_) => ResponseBody::Bytes(response.body.to_vec()),
    };

    CapturedResponse {
        status: response.status,
        headers,
        body,
    }
}

/// Pick the body matcher for the request's content type
fn body_matcher(request: &Request) -> Result<Option<MatcherSpec>, RenderWarning> {
    let Some(content_type) = request.header("content-type") else {
        return Ok(None);
    };
    if request.body.is_empty() {
        return Ok(None);
    }

    let media_type = media_type(content_type);

    match media_type.as_str() {
        FORM_CONTENT_TYPE => {
            let pairs = url::form_urlencoded::parse(&request.body)
                .into_owned()
                .collect();
            Ok(Some(MatcherSpec::FormParams(pairs)))
        }
        JSON_CONTENT_TYPE => serde_json::from_slice(&request.body)
            .map(|value| Some(MatcherSpec::JsonBody(value)))
            .map_err(|e| RenderWarning::InvalidJsonBody(e.to_string())),
        _ => Err(RenderWarning::UnsupportedContentType(media_type)),
    }
}
