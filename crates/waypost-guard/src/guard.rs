//! The per-navigation decision state machine.
//!
//! ```text
//! check(target)
//!   │
//!   ├─ policy has no auth requirement ───────────────→ Allow
//!   ├─ not authenticated ────────────→ RedirectToLogin { redirect: target }
//!   ├─ profile hydrated ──→ privilege ok? ──→ Allow
//!   │                            └─ no ────→ RedirectToHome
//!   └─ profile unhydrated ──→ await hydrate() once
//!             ├─ ok ──→ privilege check (fresh state, as above)
//!             └─ err ─→ RedirectToLogin { redirect: target }
//!                        (the store has already logged itself out)
//! ```
//!
//! Exactly one outcome per attempt — the return type makes issuing two
//! impossible. The only suspension point is the single hydration await;
//! session state is re-read after it, never carried across it.

use std::sync::Arc;

use waypost_session::{Profile, SessionError, SessionStore};

use crate::{AccessPolicy, RouteTable};

/// Fetches the profile for the current session.
///
/// The guard doesn't know about transports — the facade implements this
/// by routing [`SessionStore::hydrate_profile`] through the HTTP
/// pipeline, and tests implement it with canned results. On failure the
/// implementation must leave the store logged out (which
/// `hydrate_profile` already guarantees).
pub trait ProfileHydrator: Send + Sync + 'static {
    /// Hydrates and returns the profile, or fails after logging the
    /// session out.
    fn hydrate(&self) -> impl Future<Output = Result<Profile, SessionError>> + Send;
}

/// The decision for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Enter the target view.
    Allow,

    /// Send the client to the login view; `redirect` is the attempted
    /// target (full path, query included) to return to after sign-in.
    RedirectToLogin { redirect: String },

    /// Authenticated but not privileged enough: send the client home,
    /// not to login — the credential is still valid.
    RedirectToHome,
}

/// Intercepts every in-app navigation.
pub struct NavigationGuard<H: ProfileHydrator> {
    session: Arc<SessionStore>,
    routes: RouteTable,
    hydrator: H,
}

impl<H: ProfileHydrator> NavigationGuard<H> {
    /// Builds a guard over the shared session store and route policy.
    pub fn new(session: Arc<SessionStore>, routes: RouteTable, hydrator: H) -> Self {
        Self {
            session,
            routes,
            hydrator,
        }
    }

    /// Decides one navigation attempt.
    pub async fn check(&self, target: &str) -> GuardOutcome {
        let policy = self.routes.resolve(target);

        if !policy.requires_auth {
            return GuardOutcome::Allow;
        }

        if !self.session.is_authenticated() {
            tracing::debug!(%target, "unauthenticated, redirecting to login");
            return GuardOutcome::RedirectToLogin {
                redirect: target.to_string(),
            };
        }

        if self.session.profile().is_some() {
            return self.evaluate_privilege(target, policy);
        }

        // Authenticated but unhydrated: the one suspension point.
        match self.hydrator.hydrate().await {
            Ok(_) => self.evaluate_privilege(target, policy),
            Err(e) => {
                // The store has self-logged-out; this attempt ends at
                // the login view with its return target preserved.
                tracing::debug!(%target, error = %e, "hydration failed during navigation");
                GuardOutcome::RedirectToLogin {
                    redirect: target.to_string(),
                }
            }
        }
    }

    /// Privilege step. Reads the session fresh — after a hydration
    /// await this must not rely on any pre-await snapshot.
    fn evaluate_privilege(&self, target: &str, policy: AccessPolicy) -> GuardOutcome {
        if policy.requires_privilege && !self.session.is_privileged() {
            tracing::debug!(%target, "insufficient privilege, redirecting home");
            GuardOutcome::RedirectToHome
        } else {
            GuardOutcome::Allow
        }
    }
}
