//! Scripted backend and recording sinks for tests and development.
//!
//! [`MockBackend`] answers requests from a queue of scripted responses
//! and records every request it saw; [`RecordingNotifier`] and
//! [`RecordingNavigator`] capture what the pipeline pushed at the user.
//! Together they let the whole interception stack run without a network
//! or a UI.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{
    BackendError, HttpBackend, HttpRequest, HttpResponse, Navigator, Notice, Notifier,
};

/// An [`HttpBackend`] that replays scripted responses in order.
#[derive(Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<HttpResponse, BackendError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw scripted result.
    pub fn enqueue(&self, result: Result<HttpResponse, BackendError>) {
        self.responses.lock().expect("poisoned").push_back(result);
    }

    /// Queues a response with the given status and body bytes.
    pub fn enqueue_response(&self, status: u16, body: &[u8]) {
        self.enqueue(Ok(HttpResponse {
            status,
            body: body.to_vec(),
        }));
    }

    /// Queues a 200 envelope-success response wrapping `data`.
    pub fn enqueue_success(&self, data: serde_json::Value) {
        let body = serde_json::json!({ "success": true, "data": data });
        self.enqueue_response(200, body.to_string().as_bytes());
    }

    /// Queues a 200 envelope-failure response with a server message.
    pub fn enqueue_api_failure(&self, message: &str) {
        let body = serde_json::json!({ "success": false, "message": message });
        self.enqueue_response(200, body.to_string().as_bytes());
    }

    /// Every request the backend has executed, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("poisoned").clone()
    }
}

impl HttpBackend for MockBackend {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BackendError> {
        self.requests.lock().expect("poisoned").push(request);
        self.responses
            .lock()
            .expect("poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(BackendError::Network(
                    "mock backend: no scripted response left".to_string(),
                ))
            })
    }
}

/// A [`Notifier`] that stores notices for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("poisoned").push(notice);
    }
}

/// A [`Navigator`] with a fixed current path that records redirects.
pub struct RecordingNavigator {
    path: String,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator whose `current_path` reports `path`.
    pub fn at(path: &str) -> Self {
        Self {
            path: path.to_string(),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().expect("poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn redirect(&self, target: &str) {
        self.redirects.lock().expect("poisoned").push(target.to_string());
    }
}
