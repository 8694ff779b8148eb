//! Structured description of a mock registration

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::client::JSON_CONTENT_TYPE;
use crate::error::TransportFailure;
use crate::exchange::SendOptions;
use crate::Result;

/// Response headers wiremock computes itself; rendering them would
/// conflict with the generated body
const FRAMEWORK_MANAGED_HEADERS: &[&str] = &["content-length", "transfer-encoding", "connection"];

/// Lowercased media type of a `Content-Type` value, parameters dropped
pub(crate) fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a header value has to be matched by
/// [`crate::matchers::header_exact`] rather than wiremock's `header`
pub(crate) fn needs_exact_header_match(value: &str) -> bool {
    value.contains(',')
}

/// Everything needed to register one mock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockDescriptor {
    /// Request method to match
    pub method: String,
    /// Request URL without query string
    pub url: String,
    /// Request path to match
    pub path: String,
    /// What the mock answers with
    pub response: ResponseSpec,
    /// Additional request matchers, in render order
    pub matchers: Vec<MatcherSpec>,
    /// Problems found while describing; never fatal
    #[serde(skip)]
    pub warnings: Vec<RenderWarning>,
}

impl MockDescriptor {
    /// Whether any matcher inspects the request body
    #[must_use]
    pub fn has_body_matcher(&self) -> bool {
        self.matchers.iter().any(MatcherSpec::is_body)
    }

    /// Header matchers in this descriptor
    pub fn header_matchers(&self) -> impl Iterator<Item = &[(String, String)]> {
        self.matchers.iter().filter_map(|m| match m {
            MatcherSpec::Headers(headers) => Some(headers.as_slice()),
            _ => None,
        })
    }
}

/// The response a mock serves
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSpec {
    /// Replay a captured response
    Captured(CapturedResponse),
    /// The captured send failed
    Failed {
        /// The captured failure
        failure: TransportFailure,
    },
}

/// A captured response prepared for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedResponse {
    /// HTTP status code
    pub status: u16,
    /// Headers to reproduce
    pub headers: Vec<(String, String)>,
    /// Body to reproduce
    pub body: ResponseBody,
}

impl CapturedResponse {
    /// The captured `Content-Type`, if any
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Content type a JSON body must be served with instead of the one
    /// `set_body_json` applies, e.g. `application/problem+json`
    #[must_use]
    pub fn json_content_type_override(&self) -> Option<&str> {
        if !matches!(self.body, ResponseBody::Json(_)) {
            return None;
        }
        self.content_type()
            .filter(|content_type| media_type(content_type) != JSON_CONTENT_TYPE)
    }

    /// Headers to set explicitly on the response template.
    ///
    /// The content type travels with a non-empty body instead.
    pub fn template_headers(&self) -> impl Iterator<Item = &(String, String)> {
        let body_carries_type = !self.body.is_empty();
        self.headers.iter().filter(move |(name, _)| {
            let lower = name.to_ascii_lowercase();
            !FRAMEWORK_MANAGED_HEADERS.contains(&lower.as_str())
                && !(body_carries_type && lower == "content-type")
        })
    }
}

/// Response body, decoded as JSON when possible
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Body parsed as JSON
    Json(Value),
    /// Body that is not JSON, byte for byte
    Bytes(Vec<u8>),
}

impl ResponseBody {
    /// Whether the body is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Bytes(bytes) if bytes.is_empty())
    }
}

/// One request matcher
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum MatcherSpec {
    /// Form-encoded body with exactly these pairs
    FormParams(Vec<(String, String)>),
    /// JSON body equal to this value
    JsonBody(Value),
    /// Query string containing these pairs
    QueryParams(Vec<(String, String)>),
    /// Request carrying these headers
    Headers(Vec<(String, String)>),
    /// Request sent with these options
    RequestOptions(SendOptions),
}

impl MatcherSpec {
    /// Whether this matcher inspects the request body
    #[must_use]
    pub fn is_body(&self) -> bool {
        matches!(self, Self::FormParams(_) | Self::JsonBody(_))
    }
}

/// Non-fatal problem found while describing an exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// Body matching is not supported for this content type
    UnsupportedContentType(String),
    /// The body claimed to be JSON but did not parse
    InvalidJsonBody(String),
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedContentType(content_type) => write!(
                f,
                "Unsupported Content-Type for request body matching: {content_type}"
            ),
            Self::InvalidJsonBody(error) => {
                write!(f, "Request body is not valid JSON, skipping body matching: {error}")
            }
        }
    }
}

/// Serialize a descriptor as language-agnostic JSON
///
/// # Errors
///
/// Returns error if the descriptor cannot be represented as JSON
pub fn to_json(descriptor: &MockDescriptor) -> Result<Value> {
    Ok(serde_json::to_value(descriptor)?)
}
