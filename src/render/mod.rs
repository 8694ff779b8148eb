//! Rendering captured exchanges as wiremock registrations
//!
//! Rendering happens in two steps. [`describe`] turns an exchange into a
//! [`MockDescriptor`]: the response to serve plus the matchers a request
//! has to satisfy. A serializer then turns the descriptor into Rust source
//! ([`to_wiremock_source`]), JSON ([`to_json`]) or a live
//! [`wiremock::Mock`] ([`to_mock`]).

mod describe;
mod descriptor;
mod headers;
mod literal;
mod mount;
mod source;

use serde::{Deserialize, Serialize};

use crate::exchange::CapturedExchange;

pub use describe::describe;
pub use descriptor::{
    to_json, CapturedResponse, MatcherSpec, MockDescriptor, RenderWarning, ResponseBody,
    ResponseSpec,
};
pub use headers::strip_default_headers;
pub use mount::to_mock;
pub use source::{to_wiremock_source, SOURCE_PRELUDE};

/// Binding the rendered source mounts mocks onto by default
pub const DEFAULT_SERVER_BINDING: &str = "mock_server";

/// Toggles controlling which matchers are rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
    /// Match on the request body (form and JSON content types only)
    pub match_body: bool,
    /// Match on query parameters
    pub match_query: bool,
    /// Match on headers other than the client's defaults
    pub match_headers: bool,
    /// Record the send options the request was made with
    pub match_request_options: bool,
    /// Keep the response `Date` header
    pub include_response_date: bool,
    /// Variable holding the `wiremock::MockServer` in rendered source
    pub server_binding: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            match_body: true,
            match_query: true,
            match_headers: true,
            match_request_options: false,
            include_response_date: false,
            server_binding: DEFAULT_SERVER_BINDING.to_string(),
        }
    }
}

/// Describe an exchange and render it as wiremock source in one step
#[must_use]
pub fn render(exchange: &CapturedExchange, options: &RenderOptions) -> String {
    to_wiremock_source(&describe(exchange, options), options)
}
