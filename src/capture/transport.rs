//! Transport decorator that records every send

use crate::error::TransportFailure;
use crate::exchange::{CapturedExchange, Request, Response, SendOptions};
use crate::transport::Transport;

use super::Capturer;

/// Wraps a transport and records each send into a [`Capturer`].
///
/// Arguments, responses and failures pass through untouched.
pub struct CapturingTransport<T> {
    inner: T,
    capturer: Capturer,
}

impl<T: Transport> CapturingTransport<T> {
    /// Wrap `inner`, recording into `capturer`
    pub fn new(inner: T, capturer: Capturer) -> Self {
        Self { inner, capturer }
    }

    /// The capturer sends are recorded into
    pub fn capturer(&self) -> &Capturer {
        &self.capturer
    }

    /// The wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for CapturingTransport<T> {
    async fn send(
        &self,
        request: &Request,
        options: &SendOptions,
    ) -> Result<Response, TransportFailure> {
        let outcome = self.inner.send(request, options).await;

        self.capturer.record(CapturedExchange::new(
            request.clone(),
            options.clone(),
            outcome.clone(),
        ));

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use url::Url;

    /// Replays queued outcomes in order
    struct ScriptedTransport {
        outcomes: Mutex<Vec<Result<Response, TransportFailure>>>,
    }

    impl ScriptedTransport {
        fn new(mut outcomes: Vec<Result<Response, TransportFailure>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
            }
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            _request: &Request,
            _options: &SendOptions,
        ) -> Result<Response, TransportFailure> {
            self.outcomes
                .lock()
                .pop()
                .unwrap_or_else(|| Err(TransportFailure::new(FailureKind::Other, "exhausted")))
        }
    }

    fn request(method: &str) -> Request {
        Request {
            method: method.to_string(),
            url: Url::parse("http://example.com/api").unwrap(),
            headers: vec![],
            body: Bytes::new(),
        }
    }

    fn ok(status: u16) -> Result<Response, TransportFailure> {
        Ok(Response {
            status,
            headers: vec![],
            body: Bytes::new(),
        })
    }

    #[tokio::test]
    async fn test_success_passes_through_and_is_recorded() {
        let capturer = Capturer::new();
        capturer.start();
        let transport =
            CapturingTransport::new(ScriptedTransport::new(vec![ok(201)]), capturer.clone());

        let response = transport
            .send(&request("POST"), &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        let dump = capturer.dump();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].request().method, "POST");
        assert_eq!(dump[0].response(), Some(&response));
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_returned_unchanged() {
        let failure = TransportFailure::new(FailureKind::Connect, "connection refused");
        let capturer = Capturer::new();
        capturer.start();
        let transport = CapturingTransport::new(
            ScriptedTransport::new(vec![Err(failure.clone())]),
            capturer.clone(),
        );

        let returned = transport
            .send(&request("GET"), &SendOptions::default())
            .await
            .unwrap_err();

        assert_eq!(returned, failure);
        let dump = capturer.dump();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].failure(), Some(&failure));
        assert!(dump[0].response().is_none());
    }

    #[tokio::test]
    async fn test_inactive_capturer_still_forwards() {
        let capturer = Capturer::new();
        let transport =
            CapturingTransport::new(ScriptedTransport::new(vec![ok(200)]), capturer.clone());

        let response = transport
            .send(&request("GET"), &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(capturer.is_empty());
    }

    #[tokio::test]
    async fn test_sequence_recorded_in_send_order() {
        let capturer = Capturer::new();
        capturer.start();
        let transport = CapturingTransport::new(
            ScriptedTransport::new(vec![ok(200), ok(201), ok(202)]),
            capturer.clone(),
        );

        for method in ["GET", "POST", "PUT"] {
            transport
                .send(&request(method), &SendOptions::default())
                .await
                .unwrap();
        }

        let methods: Vec<_> = capturer
            .dump()
            .iter()
            .map(|e| e.request().method.clone())
            .collect();
        assert_eq!(methods, ["GET", "POST", "PUT"]);
    }
}
