//! Request, response and captured exchange types

use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use url::Url;

use crate::error::TransportFailure;

/// Default response body size limit
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 256 * 1024 * 1024; // 256 MB

/// A prepared outbound request, exactly as handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method (e.g., "GET", "POST")
    pub method: String,
    /// Absolute URL including any query string
    pub url: Url,
    /// Headers in the order they will be sent
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Bytes,
}

impl Request {
    /// Look up a header value by case-insensitive name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response received from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Look up a header value by case-insensitive name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Returns error if the body is not valid JSON
    pub fn json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Extra options passed alongside a request for a single send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendOptions {
    /// Abort the send if it takes longer than this
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::duration_serde"
    )]
    pub timeout: Option<Duration>,
    /// Largest response body accepted, in bytes
    pub max_response_size: usize,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

/// One intercepted send: the request, its options, and how it ended
#[derive(Debug, Clone)]
pub struct CapturedExchange {
    request: Request,
    options: SendOptions,
    outcome: Result<Response, TransportFailure>,
}

impl CapturedExchange {
    /// Create an exchange from a finished send
    #[must_use]
    pub fn new(
        request: Request,
        options: SendOptions,
        outcome: Result<Response, TransportFailure>,
    ) -> Self {
        Self {
            request,
            options,
            outcome,
        }
    }

    /// The prepared request
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The options the send was made with
    #[must_use]
    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    /// The response, if the send succeeded
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.outcome.as_ref().ok()
    }

    /// The failure, if the send failed
    #[must_use]
    pub fn failure(&self) -> Option<&TransportFailure> {
        self.outcome.as_ref().err()
    }

    /// The full outcome
    #[must_use]
    pub fn outcome(&self) -> Result<&Response, &TransportFailure> {
        self.outcome.as_ref()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
