//! The request pipeline: where the interception rules live.
//!
//! [`ApiTransport`] is the one object every API call goes through. The
//! flow for a JSON call:
//!
//! ```text
//!   caller ──→ build HttpRequest (bearer, timeout budget)
//!                 │
//!                 ▼
//!              backend.execute()
//!                 │
//!        ┌────────┼─────────────┬──────────────┐
//!        ▼        ▼             ▼              ▼
//!    backend    401        other non-2xx      2xx
//!     error      │              │              │
//!        │   forced logout   extract msg   unwrap envelope
//!        │   + redirect      + notify      success? → payload
//!        ▼        ▼             ▼          failure? → notify + Api
//!     notify   notify(fixed)  Status
//!     Network  SessionExpired
//! ```
//!
//! Exactly one of those terminal outcomes happens per call, and every
//! failing one both notifies the user and fails the returned future.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use waypost_session::SessionStore;

use crate::{
    BackendError, Body, Envelope, HttpBackend, HttpRequest, HttpResponse, Method,
    Navigator, Notice, Notifier, TransportError,
};

/// Where a forced logout sends the client.
pub const LOGIN_PATH: &str = "/login";

/// The fixed message shown when a 401 forces the session closed. The
/// server's own error text is deliberately ignored on this path.
pub const SESSION_EXPIRED_MESSAGE: &str = "session expired, please sign in again";

/// Fallback when a business failure carries no server message.
const GENERIC_API_ERROR: &str = "Error";

/// Timeout class for a call.
///
/// Most calls use the short default; moving file payloads gets an
/// extended budget. A blown budget surfaces like any other network
/// failure — timeouts are not treated specially past their message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass {
    Default,
    Upload,
    Download,
}

/// Transport configuration: base URL and per-class timeout budgets.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API root, e.g. `https://api.example.com/api`. Call paths are
    /// appended to it.
    pub base_url: String,
    /// Budget for ordinary JSON calls.
    pub timeout: Duration,
    /// Budget for uploads.
    pub upload_timeout: Duration,
    /// Budget for downloads (the largest payloads).
    pub download_timeout: Duration,
}

impl TransportConfig {
    /// Config with the standard budgets: 5 s default, 60 s upload,
    /// 600 s download.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
            upload_timeout: Duration::from_secs(60),
            download_timeout: Duration::from_secs(600),
        }
    }

    /// The budget for a call class.
    pub fn budget(&self, class: CallClass) -> Duration {
        match class {
            CallClass::Default => self.timeout,
            CallClass::Upload => self.upload_timeout,
            CallClass::Download => self.download_timeout,
        }
    }
}

/// The shared request pipeline.
///
/// Cheap to clone — backend and sinks sit behind `Arc`s. The session
/// store is passed in at construction (never looked up ambiently) and is
/// the same instance the guard consults.
pub struct ApiTransport<B: HttpBackend> {
    backend: Arc<B>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    config: TransportConfig,
}

impl<B: HttpBackend> Clone for ApiTransport<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            session: Arc::clone(&self.session),
            notifier: Arc::clone(&self.notifier),
            navigator: Arc::clone(&self.navigator),
            config: self.config.clone(),
        }
    }
}

impl<B: HttpBackend> ApiTransport<B> {
    /// Builds a pipeline over the given backend and sinks.
    pub fn new(
        backend: B,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        config: TransportConfig,
    ) -> Self {
        Self {
            backend: Arc::new(backend),
            session,
            notifier,
            navigator,
            config,
        }
    }

    /// GET with envelope unwrapping.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.call(Method::Get, path, Body::Empty, CallClass::Default)
            .await
    }

    /// POST a JSON payload with envelope unwrapping.
    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = Self::json_body(payload)?;
        self.call(Method::Post, path, body, CallClass::Default).await
    }

    /// PUT a JSON payload with envelope unwrapping.
    pub async fn put<T, P>(&self, path: &str, payload: &P) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = Self::json_body(payload)?;
        self.call(Method::Put, path, body, CallClass::Default).await
    }

    /// PATCH a JSON payload with envelope unwrapping.
    pub async fn patch<T, P>(&self, path: &str, payload: &P) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = Self::json_body(payload)?;
        self.call(Method::Patch, path, body, CallClass::Default)
            .await
    }

    /// DELETE with envelope unwrapping.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.call(Method::Delete, path, Body::Empty, CallClass::Default)
            .await
    }

    /// POST raw bytes under the upload budget, with envelope unwrapping.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &'static str,
    ) -> Result<T, TransportError> {
        self.call(
            Method::Post,
            path,
            Body::Bytes { data, content_type },
            CallClass::Upload,
        )
        .await
    }

    /// GET raw bytes under the download budget.
    ///
    /// No envelope here — downloads are the one call shape whose 2xx
    /// body is the payload itself. Status classification (401 included)
    /// is identical to JSON calls.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .dispatch(Method::Get, path, Body::Empty, CallClass::Download)
            .await?;
        Ok(response.body)
    }

    fn json_body<P: Serialize + ?Sized>(payload: &P) -> Result<Body, TransportError> {
        serde_json::to_value(payload)
            .map(Body::Json)
            .map_err(TransportError::Encode)
    }

    /// Full JSON call: dispatch, then unwrap the envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        class: CallClass,
    ) -> Result<T, TransportError> {
        let response = self.dispatch(method, path, body, class).await?;

        let envelope = match Envelope::decode(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.fail(GENERIC_API_ERROR);
                return Err(TransportError::Decode(e));
            }
        };

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| GENERIC_API_ERROR.to_string());
            self.fail(&message);
            return Err(TransportError::Api(message));
        }

        serde_json::from_value(envelope.data.unwrap_or(serde_json::Value::Null)).map_err(|e| {
            self.fail(GENERIC_API_ERROR);
            TransportError::Decode(e)
        })
    }

    /// Dispatch: build the request, run the backend, classify the result.
    /// Returns only 2xx responses; everything else becomes an error here.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Body,
        class: CallClass,
    ) -> Result<HttpResponse, TransportError> {
        let request = HttpRequest {
            method,
            url: self.absolute_url(path),
            // Outbound interception: attach the credential when the
            // session reports authenticated. Never blocks, never fails.
            bearer: self.session.credential(),
            body,
            timeout: self.config.budget(class),
        };

        tracing::debug!(%method, url = %request.url, "dispatching request");

        let response = match self.backend.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let message = match e {
                    BackendError::Timeout => "request timed out".to_string(),
                    BackendError::Network(msg) => msg,
                };
                self.fail(&message);
                return Err(TransportError::Network(message));
            }
        };

        if response.status == 401 {
            // The one designated trigger for forced logout. This path
            // bypasses normal message extraction.
            self.force_logout();
            return Err(TransportError::SessionExpired);
        }

        if !response.is_success() {
            let message = Envelope::extract_message(&response.body)
                .unwrap_or_else(|| format!("request failed with status {}", response.status));
            self.fail(&message);
            return Err(TransportError::Status {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }

    /// Clears the session and sends the whole client to the login view,
    /// encoding the current location as the post-login return target.
    fn force_logout(&self) {
        self.session.logout();

        let current = self.navigator.current_path();
        let target = format!(
            "{LOGIN_PATH}?redirect={}",
            urlencoding::encode(&current)
        );
        tracing::warn!(path = %current, "credential rejected (401), session cleared");

        self.navigator.redirect(&target);
        self.notifier.notify(Notice::error(SESSION_EXPIRED_MESSAGE));
    }

    /// Notifies the user about a failing call.
    fn fail(&self, message: &str) {
        tracing::debug!(%message, "call failed");
        self.notifier.notify(Notice::error(message));
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}
