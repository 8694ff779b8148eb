//! Transport layer for Mockscribe
//!
//! A [`Transport`] performs one send. The client talks to a transport, and
//! decorators such as [`crate::capture::CapturingTransport`] wrap one.

mod pooled;

use std::future::Future;

use crate::error::TransportFailure;
use crate::exchange::{Request, Response, SendOptions};

pub use pooled::HyperTransport;

/// Idle pooled connections are closed after this many seconds
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Maximum idle pooled connections kept per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Sends a prepared request and returns the response
pub trait Transport: Send + Sync {
    /// Send a request
    ///
    /// # Errors
    ///
    /// Returns the failure if the send cannot be completed
    fn send(
        &self,
        request: &Request,
        options: &SendOptions,
    ) -> impl Future<Output = Result<Response, TransportFailure>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send(
        &self,
        request: &Request,
        options: &SendOptions,
    ) -> impl Future<Output = Result<Response, TransportFailure>> + Send {
        (**self).send(request, options)
    }
}
