//! Capture history and activation state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::exchange::CapturedExchange;

/// Shared, append-only history of captured exchanges.
///
/// Cloning a `Capturer` yields another handle onto the same history, which
/// is how the capturing transport and the test code share it.
#[derive(Debug, Clone, Default)]
pub struct Capturer {
    inner: Arc<CapturerInner>,
}

#[derive(Debug, Default)]
struct CapturerInner {
    active: AtomicBool,
    history: Mutex<Vec<Arc<CapturedExchange>>>,
}

impl Capturer {
    /// Create an inactive capturer with an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording. Starting an active capturer does nothing.
    pub fn start(&self) {
        if !self.inner.active.swap(true, Ordering::AcqRel) {
            info!("Capture started");
        }
    }

    /// Stop recording. The history is kept.
    pub fn stop(&self) {
        if self.inner.active.swap(false, Ordering::AcqRel) {
            info!("Capture stopped ({} exchanges)", self.len());
        }
    }

    /// Whether sends are currently recorded
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Start recording until the returned guard is dropped
    #[must_use = "capture stops as soon as the session guard is dropped"]
    pub fn session(&self) -> CaptureSession {
        self.start();
        CaptureSession {
            capturer: self.clone(),
        }
    }

    /// The exchanges captured so far, in send order.
    ///
    /// The entries are shared with the history, not deep copies.
    #[must_use]
    pub fn dump(&self) -> Vec<Arc<CapturedExchange>> {
        self.inner.history.lock().clone()
    }

    /// Number of captured exchanges
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.history.lock().len()
    }

    /// Whether nothing has been captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all captured exchanges
    pub fn clear(&self) {
        self.inner.history.lock().clear();
    }

    /// Append an exchange if recording is active
    pub(crate) fn record(&self, exchange: CapturedExchange) {
        if !self.is_active() {
            return;
        }

        let mut history = self.inner.history.lock();
        history.push(Arc::new(exchange));
        debug!("Captured exchange #{}", history.len());
    }
}

/// Guard returned by [`Capturer::session`]; stops the capturer on drop
#[derive(Debug)]
pub struct CaptureSession {
    capturer: Capturer,
}

impl CaptureSession {
    /// The capturer this session drives
    #[must_use]
    pub fn capturer(&self) -> &Capturer {
        &self.capturer
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.capturer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{Request, Response, SendOptions};
    use bytes::Bytes;
    use url::Url;

    fn exchange(path: &str) -> CapturedExchange {
        let request = Request {
            method: "GET".to_string(),
            url: Url::parse(&format!("http://example.com{path}")).unwrap(),
            headers: vec![],
            body: Bytes::new(),
        };
        let response = Response {
            status: 200,
            headers: vec![],
            body: Bytes::new(),
        };
        CapturedExchange::new(request, SendOptions::default(), Ok(response))
    }

    #[test]
    fn test_inactive_capturer_records_nothing() {
        let capturer = Capturer::new();
        capturer.record(exchange("/a"));

        assert!(capturer.is_empty());
    }

    #[test]
    fn test_records_in_order_while_active() {
        let capturer = Capturer::new();
        capturer.start();
        capturer.start();

        for i in 0..5 {
            capturer.record(exchange(&format!("/api/test/{i}")));
        }

        let dump = capturer.dump();
        assert_eq!(dump.len(), 5);
        for (i, entry) in dump.iter().enumerate() {
            assert_eq!(entry.request().url.path(), format!("/api/test/{i}"));
        }
    }

    #[test]
    fn test_stop_keeps_history() {
        let capturer = Capturer::new();
        capturer.start();
        capturer.record(exchange("/a"));
        capturer.stop();
        capturer.record(exchange("/b"));

        assert!(!capturer.is_active());
        assert_eq!(capturer.len(), 1);
    }

    #[test]
    fn test_dump_shares_entries() {
        let capturer = Capturer::new();
        capturer.start();
        capturer.record(exchange("/a"));

        let first = capturer.dump();
        let second = capturer.dump();
        assert!(Arc::ptr_eq(&first[0], &second[0]));
    }

    #[test]
    fn test_session_guard_stops_on_drop() {
        let capturer = Capturer::new();
        {
            let session = capturer.session();
            assert!(session.capturer().is_active());
            capturer.record(exchange("/a"));
        }

        assert!(!capturer.is_active());
        assert_eq!(capturer.len(), 1);
    }

    #[test]
    fn test_clear() {
        let capturer = Capturer::new();
        capturer.start();
        capturer.record(exchange("/a"));
        capturer.clear();

        assert!(capturer.is_empty());
        assert!(capturer.is_active());
    }
}
