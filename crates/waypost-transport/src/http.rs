//! Backend-neutral request/response shapes and the [`HttpBackend`] trait.
//!
//! The pipeline never talks to `reqwest` directly — it builds an
//! [`HttpRequest`], hands it to whatever implements [`HttpBackend`], and
//! gets back an [`HttpResponse`] (or a [`BackendError`] for failures
//! below the HTTP layer). This is the same seam discipline as hiding a
//! concrete socket library behind a transport trait: production plugs in
//! the real client, tests plug in a scripted one, and the interception
//! logic is identical for both.

use std::fmt;
use std::time::Duration;

/// HTTP method for an outbound call.
///
/// Only the verbs the API surface actually uses — this is not a general
/// HTTP library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// The canonical wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for an outbound call.
#[derive(Debug, Clone)]
pub enum Body {
    /// No body (GET, DELETE).
    Empty,

    /// A JSON document, serialized by the backend.
    Json(serde_json::Value),

    /// Raw bytes with an explicit content type (file uploads).
    Bytes {
        data: Vec<u8>,
        content_type: &'static str,
    },
}

/// A fully prepared outbound request.
///
/// By the time one of these reaches a backend, the pipeline has already
/// made every decision: absolute URL, credential (or not), and the
/// timeout budget for the call class.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Bearer token to attach, when the session is authenticated.
    pub bearer: Option<String>,
    pub body: Body,
    pub timeout: Duration,
}

/// A raw inbound response.
///
/// Note that a 4xx/5xx status is still a *response* — backend errors are
/// reserved for failures below HTTP (DNS, refused connection, timeout).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// `true` for statuses in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors from below the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The call exceeded its timeout budget.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("network error: {0}")]
    Network(String),
}

/// Executes one prepared request.
pub trait HttpBackend: Send + Sync + 'static {
    /// Sends the request and returns the raw response.
    ///
    /// Implementations must return `Ok` for any response the server
    /// produced, whatever its status — classification is the pipeline's
    /// job, not the backend's.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BackendError>> + Send;
}

/// A shared backend is still a backend. Lets callers keep their own
/// handle to the backend they hand the pipeline (tests inspect the
/// recorded requests this way).
impl<B: HttpBackend> HttpBackend for std::sync::Arc<B> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BackendError> {
        (**self).execute(request).await
    }
}
