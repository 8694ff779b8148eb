//! Capture of outbound HTTP exchanges
//!
//! A [`Capturer`] owns the history; a [`CapturingTransport`] wraps the real
//! transport and records every send into the capturer while it is active.
//! The capturer is handed to the transport explicitly, so nothing outside
//! the wrapped client is affected.

mod capturer;
mod transport;

pub use capturer::{CaptureSession, Capturer};
pub use transport::CapturingTransport;
