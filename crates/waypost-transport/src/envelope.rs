//! The server's uniform response envelope.
//!
//! Every JSON endpoint wraps its payload as
//! `{ "success": bool, "data": ..., "message": ... }`. The pipeline
//! unwraps this so callers only ever see the payload type; `message` is
//! the server's human-readable explanation when `success` is false (and
//! the first place the pipeline looks for error text on non-2xx
//! responses too).

use serde::Deserialize;

/// Decoded transport envelope.
///
/// `data` stays a raw [`serde_json::Value`] here; the pipeline
/// deserializes it into the caller's concrete type only after the
/// success checks pass.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Application-level verdict. HTTP 2xx with `success: false` is a
    /// business failure, not a transport one.
    pub success: bool,

    /// Server-supplied human-readable message, usually present on
    /// failures.
    #[serde(default)]
    pub message: Option<String>,

    /// The actual payload. Absent is legal for calls that return
    /// nothing.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// Parses an envelope from a raw response body.
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Best-effort extraction of a server message from a response body
    /// that may or may not be envelope-shaped. Used on non-2xx
    /// responses, where proxies and gateways sometimes answer with
    /// plain text or HTML.
    pub fn extract_message(body: &[u8]) -> Option<String> {
        Self::decode(body).ok().and_then(|e| e.message)
    }
}
