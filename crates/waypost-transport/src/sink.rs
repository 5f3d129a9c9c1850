//! Outward-facing side channels: user notifications and navigation.
//!
//! The transport pipeline is a library embedded in a host shell; it does
//! not own a screen. When it needs to tell the user something ("session
//! expired") or move the whole client somewhere ("/login?redirect=..."),
//! it goes through these two traits. The host supplies real
//! implementations; the tracing-backed defaults make headless use and
//! development work out of the box.

use std::time::Duration;

/// How long a notice should stay on screen.
pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A fire-and-forget user-visible message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    /// Bounded display duration — notices expire, they don't accumulate.
    pub duration: Duration,
}

impl Notice {
    /// An error notice with the standard display duration.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            duration: NOTICE_DURATION,
        }
    }

    /// An info notice with the standard display duration.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            duration: NOTICE_DURATION,
        }
    }
}

/// Receives user-visible notices.
///
/// Fire-and-forget: implementations must not block and cannot fail. The
/// notice is a side channel, never part of a call's return value.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notice: Notice);
}

/// A shared notifier is still a notifier.
impl<N: Notifier> Notifier for std::sync::Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// A [`Notifier`] that writes notices to the log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => tracing::info!(message = %notice.message, "notice"),
            Severity::Error => tracing::error!(message = %notice.message, "notice"),
        }
    }
}

/// Performs whole-client navigation.
///
/// `current_path` is read when building the `redirect` return target for
/// a forced logout; `redirect` replaces the client's location.
pub trait Navigator: Send + Sync + 'static {
    /// The path (with query) the client is currently showing.
    fn current_path(&self) -> String;

    /// Navigates the whole client to the given target.
    fn redirect(&self, target: &str);
}

/// A shared navigator is still a navigator.
impl<N: Navigator> Navigator for std::sync::Arc<N> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn redirect(&self, target: &str) {
        (**self).redirect(target);
    }
}

/// A [`Navigator`] for headless use: reports the root path and logs
/// redirects instead of performing them.
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn current_path(&self) -> String {
        "/".to_string()
    }

    fn redirect(&self, target: &str) {
        tracing::info!(%target, "redirect requested");
    }
}
