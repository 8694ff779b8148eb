//! HTTP client that prepares requests and hands them to a transport

use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::exchange::{Request, Response, SendOptions};
use crate::transport::{HyperTransport, Transport};
use crate::{Result, ScribeError};

/// Content type set by [`RequestBuilder::json`]
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type set by [`RequestBuilder::form`]
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Headers the client adds to every request unless the caller overrides them.
///
/// They carry no information about the request itself, so rendered mocks
/// do not match on them.
#[must_use]
pub fn default_headers() -> Vec<(String, String)> {
    vec![
        (
            "user-agent".to_string(),
            concat!("mockscribe/", env!("CARGO_PKG_VERSION")).to_string(),
        ),
        ("accept-encoding".to_string(), "identity".to_string()),
        ("accept".to_string(), "*/*".to_string()),
        ("connection".to_string(), "keep-alive".to_string()),
    ]
}

/// HTTP client over a pluggable transport
pub struct Client<T = HyperTransport> {
    transport: T,
    default_headers: Vec<(String, String)>,
    options: SendOptions,
}

impl Client<HyperTransport> {
    /// Create a client over a plain-HTTP hyper transport
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HyperTransport::new())
    }

    /// Create a client whose transport and send options follow the config
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_transport(HyperTransport::from_limits(&config.limits))
            .with_options(config.limits.send_options())
    }
}

impl Default for Client<HyperTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over the given transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            default_headers: default_headers(),
            options: SendOptions::default(),
        }
    }

    /// Replace the send options used when a request sets none of its own
    #[must_use]
    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder<'_, T> {
        self.request("GET", url)
    }

    /// Start a POST request
    pub fn post(&self, url: &str) -> RequestBuilder<'_, T> {
        self.request("POST", url)
    }

    /// Start a PUT request
    pub fn put(&self, url: &str) -> RequestBuilder<'_, T> {
        self.request("PUT", url)
    }

    /// Start a PATCH request
    pub fn patch(&self, url: &str) -> RequestBuilder<'_, T> {
        self.request("PATCH", url)
    }

    /// Start a DELETE request
    pub fn delete(&self, url: &str) -> RequestBuilder<'_, T> {
        self.request("DELETE", url)
    }

    /// Start a request with an arbitrary method
    pub fn request(&self, method: &str, url: &str) -> RequestBuilder<'_, T> {
        RequestBuilder {
            client: self,
            method: method.to_uppercase(),
            url: url.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout: None,
            error: None,
        }
    }

    /// Send an already prepared request
    ///
    /// # Errors
    ///
    /// Returns the transport's failure unchanged, wrapped in
    /// [`ScribeError::Transport`]
    pub async fn execute(&self, request: &Request, options: &SendOptions) -> Result<Response> {
        let response = self.transport.send(request, options).await?;
        debug!("{} {} -> {}", request.method, request.url, response.status);
        Ok(response)
    }
}

/// Builder for a single request
pub struct RequestBuilder<'a, T> {
    client: &'a Client<T>,
    method: String,
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<(Bytes, Option<&'static str>)>,
    timeout: Option<Duration>,
    error: Option<ScribeError>,
}

impl<T: Transport> RequestBuilder<'_, T> {
    /// Append query parameters
    #[must_use]
    pub fn query<K: AsRef<str>, V: AsRef<str>>(mut self, pairs: &[(K, V)]) -> Self {
        self.query.extend(
            pairs
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Set a header, replacing any default header with the same name
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Send a raw body
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some((body.into(), None));
        self
    }

    /// Send a JSON body and set the JSON content type
    #[must_use]
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.body = Some((Bytes::from(bytes), Some(JSON_CONTENT_TYPE))),
            Err(e) => self.error = Some(ScribeError::Json(e)),
        }
        self
    }

    /// Send a form-encoded body and set the form content type
    #[must_use]
    pub fn form<K: AsRef<str>, V: AsRef<str>>(mut self, pairs: &[(K, V)]) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
            .finish();
        self.body = Some((Bytes::from(encoded), Some(FORM_CONTENT_TYPE)));
        self
    }

    /// Abort the send if it takes longer than `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Prepare the request and its send options without sending
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the body could not be encoded
    pub fn build(self) -> Result<(Request, SendOptions)> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut url = Url::parse(&self.url)
            .map_err(|e| ScribeError::InvalidRequest(format!("Invalid URL '{}': {e}", self.url)))?;
        append_query(&mut url, &self.query);

        let mut headers = self.client.default_headers.clone();
        for (name, value) in self.headers {
            merge_header(&mut headers, name, value);
        }

        let body = match self.body {
            Some((body, content_type)) => {
                if let Some(content_type) = content_type {
                    if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                        headers.push(("content-type".to_string(), content_type.to_string()));
                    }
                }
                body
            }
            None => Bytes::new(),
        };

        let mut options = self.client.options.clone();
        if let Some(timeout) = self.timeout {
            options.timeout = Some(timeout);
        }

        let request = Request {
            method: self.method,
            url,
            headers,
            body,
        };

        Ok((request, options))
    }

    /// Prepare and send the request
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be prepared or the send fails
    pub async fn send(self) -> Result<Response> {
        let client = self.client;
        let (request, options) = self.build()?;
        client.execute(&request, &options).await
    }
}

/// Append percent-encoded pairs to the URL's query string
fn append_query(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        return;
    }

    let mut query = url.query().unwrap_or_default().to_string();
    for (key, value) in pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&urlencoding::encode(key));
        query.push('=');
        query.push_str(&urlencoding::encode(value));
    }

    url.set_query(Some(&query));
}

/// Set a header, overriding an existing one with the same name in place
fn merge_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some(existing) => *existing = (name, value),
        None => headers.push((name, value)),
    }
}
