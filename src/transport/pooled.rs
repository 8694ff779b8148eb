//! HTTP transport backed by the hyper-util pooled client

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request as HttpRequest, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use crate::config::LimitsConfig;
use crate::error::{FailureKind, TransportFailure};
use crate::exchange::{Request, Response, SendOptions};

use super::{Transport, POOL_IDLE_TIMEOUT_SECS, POOL_MAX_IDLE_PER_HOST};

/// Plain-HTTP transport using a pooled hyper client
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    /// Create a transport with default pool settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_pool(
            Duration::from_secs(POOL_IDLE_TIMEOUT_SECS),
            POOL_MAX_IDLE_PER_HOST,
        )
    }

    /// Create a transport with pool settings taken from the limits config
    #[must_use]
    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self::with_pool(
            Duration::from_secs(limits.pool_idle_timeout_secs),
            limits.pool_max_idle_per_host,
        )
    }

    fn with_pool(idle_timeout: Duration, max_idle_per_host: usize) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(idle_timeout)
            .pool_max_idle_per_host(max_idle_per_host)
            .build_http();

        Self { client }
    }

    async fn send_inner(
        &self,
        request: &Request,
        max_response_size: usize,
    ) -> Result<Response, TransportFailure> {
        let http_request = build_request(request)?;

        let response = self.client.request(http_request).await.map_err(|e| {
            let kind = if e.is_connect() {
                FailureKind::Connect
            } else {
                FailureKind::Other
            };
            TransportFailure::new(kind, format!("Request failed: {e}"))
        })?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or("<invalid>").to_string(),
                )
            })
            .collect();

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| {
                TransportFailure::new(
                    FailureKind::Other,
                    format!("Failed to read response body: {e}"),
                )
            })?
            .to_bytes();

        if body.len() > max_response_size {
            return Err(TransportFailure::new(
                FailureKind::TooLarge,
                format!(
                    "Response body too large: {} bytes exceeds limit of {max_response_size} bytes",
                    body.len()
                ),
            ));
        }

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(
        &self,
        request: &Request,
        options: &SendOptions,
    ) -> Result<Response, TransportFailure> {
        debug!("Sending {} {}", request.method, request.url);

        let send = self.send_inner(request, options.max_response_size);
        let result = match options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, send)
                .await
                .unwrap_or_else(|_| Err(TransportFailure::timed_out(timeout))),
            None => send.await,
        };

        if let Err(ref failure) = result {
            warn!("{} {} failed: {failure}", request.method, request.url);
        }

        result
    }
}

/// Convert a prepared request into a hyper request
fn build_request(request: &Request) -> Result<HttpRequest<Full<Bytes>>, TransportFailure> {
    let method = request.method.parse::<Method>().map_err(|e| {
        TransportFailure::new(
            FailureKind::Invalid,
            format!("Invalid HTTP method '{}': {e}", request.method),
        )
    })?;

    let uri = request.url.as_str().parse::<Uri>().map_err(|e| {
        TransportFailure::new(
            FailureKind::Invalid,
            format!("Invalid URI '{}': {e}", request.url),
        )
    })?;

    let mut builder = HttpRequest::builder().method(method).uri(uri);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(request.body.clone()))
        .map_err(|e| {
            TransportFailure::new(FailureKind::Invalid, format!("Failed to build request: {e}"))
        })
}
