//! Mockscribe - capture live HTTP exchanges and render them as wiremock mocks
//!
//! Send requests through a [`Client`] whose transport is wrapped in a
//! [`capture::CapturingTransport`], then turn each captured exchange into a
//! ready-to-paste `wiremock` registration with [`render::render`].

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions
)]

pub mod capture;
pub mod client;
pub mod config;
mod duration_serde;
pub mod error;
pub mod exchange;
pub mod matchers;
pub mod render;
pub mod transport;

pub use capture::{CapturingTransport, Capturer};
pub use client::Client;
pub use error::{Result, ScribeError, TransportFailure};
pub use exchange::{CapturedExchange, Request, Response, SendOptions};
pub use render::{render, RenderOptions};
