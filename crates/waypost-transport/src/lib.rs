//! HTTP transport pipeline for Waypost.
//!
//! Every outbound API call flows through [`ApiTransport`], which wraps a
//! pluggable [`HttpBackend`] with the client's interception rules:
//!
//! - **Outbound**: attach the session credential as a bearer header
//! - **Inbound, 2xx**: unwrap the server's response [`Envelope`] and hand
//!   the payload to the caller, or surface the server's business-failure
//!   message
//! - **Inbound, 401**: the single designated trigger for forced logout —
//!   clear the session, redirect to the login view with a return target,
//!   and fail with a fixed session-expired message
//! - **Inbound, anything else**: extract the most specific message
//!   available, notify the user, and fail the call
//!
//! The contract for callers: every call either resolves with the
//! unwrapped payload or fails with a [`TransportError`] carrying a
//! human-readable message. Callers never see the envelope, and no
//! failure is silently swallowed.
//!
//! # Feature Flags
//!
//! - `reqwest-client` (default) — production [`ReqwestBackend`] via `reqwest`

#![allow(async_fn_in_trait)]

mod envelope;
mod error;
mod http;
pub mod mock;
mod pipeline;
#[cfg(feature = "reqwest-client")]
mod reqwest_backend;
mod sink;

pub use envelope::Envelope;
pub use error::TransportError;
pub use http::{BackendError, Body, HttpBackend, HttpRequest, HttpResponse, Method};
pub use pipeline::{
    ApiTransport, CallClass, TransportConfig, LOGIN_PATH, SESSION_EXPIRED_MESSAGE,
};
#[cfg(feature = "reqwest-client")]
pub use reqwest_backend::ReqwestBackend;
pub use sink::{
    Navigator, Notice, Notifier, Severity, TracingNavigator, TracingNotifier,
    NOTICE_DURATION,
};
