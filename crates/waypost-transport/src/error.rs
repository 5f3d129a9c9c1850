//! Error types for the transport pipeline.
//!
//! Every variant carries (or is) a human-readable message — callers can
//! show `err.to_string()` directly, and the pipeline has already pushed
//! the same text through the notification sink before failing the call.

/// Errors that a call through [`ApiTransport`](crate::ApiTransport) can
/// fail with.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered 401: the credential is expired or invalid.
    /// By the time this is returned, the pipeline has already cleared
    /// the session and redirected to the login view — this variant is
    /// the fixed message, never the server's own text.
    #[error("session expired, please sign in again")]
    SessionExpired,

    /// HTTP 2xx but `success: false` in the envelope — an
    /// application-level failure. The message is the server's.
    #[error("{0}")]
    Api(String),

    /// A non-2xx status outside the 401 path.
    #[error("http {status}: {message}")]
    Status { status: u16, message: String },

    /// Failure below HTTP: connection problems and timeouts alike.
    #[error("network error: {0}")]
    Network(String),

    /// The request payload could not be serialized.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The response body was not the shape the caller expected.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
