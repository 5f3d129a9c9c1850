//! The session store: credential, profile, and the hydration gate.
//!
//! One instance exists per client and is shared as `Arc<SessionStore>`
//! with the transport layer (which reads the credential on every call and
//! forces `logout()` on expiry) and the navigation guard (which consults
//! the derived flags and triggers hydration).
//!
//! # State machine
//!
//! ```text
//!            set_credential()           hydrate_profile() ok
//!   Empty ─────────────────→ Credentialed ─────────────────→ Hydrated
//!     ↑                           │                             │
//!     │                           │ hydrate_profile() err       │
//!     └───────── logout() ────────┴──────── logout() ───────────┘
//! ```
//!
//! Invariant: a profile is never present without a credential. The two
//! fields are cleared together by `logout()`, never independently.
//!
//! # Concurrency
//!
//! Plain state lives behind a `std::sync::Mutex` that is never held
//! across an await. Hydration additionally holds a `tokio::sync::Mutex`
//! across its fetch await on purpose: concurrent callers queue on the
//! gate, and whoever arrives second finds the profile already hydrated
//! and skips the fetch. That puts request coalescing on the store itself
//! rather than trusting every caller to deduplicate.

use std::sync::{Arc, Mutex};

use crate::{CredentialStore, Profile, SessionError};

/// Mutable session fields, grouped so they move together under one lock.
#[derive(Default)]
struct SessionState {
    credential: Option<String>,
    profile: Option<Profile>,
}

/// Owns the credential token and the authenticated-user profile.
pub struct SessionStore {
    state: Mutex<SessionState>,
    persist: Arc<dyn CredentialStore>,
    /// Hydration gate. Held across the profile fetch so concurrent
    /// hydration attempts coalesce onto a single underlying request.
    hydration: tokio::sync::Mutex<()>,
}

impl SessionStore {
    /// Creates a store, seeding the credential from persistence.
    ///
    /// A malformed or unreadable persisted record is treated as "no
    /// credential" (logged at `warn`) — startup never fails over a
    /// rotten cache file. The profile always starts empty; it is
    /// re-hydrated fresh each run.
    pub fn new(persist: Arc<dyn CredentialStore>) -> Self {
        let credential = match persist.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable persisted credential");
                None
            }
        };
        if credential.is_some() {
            tracing::info!("session credential restored from persistence");
        }
        Self {
            state: Mutex::new(SessionState {
                credential,
                profile: None,
            }),
            persist,
            hydration: tokio::sync::Mutex::new(()),
        }
    }

    /// Stores and persists a credential token.
    ///
    /// The token is opaque — no validation of its contents.
    pub fn set_credential(&self, token: &str) -> Result<(), SessionError> {
        self.persist.store(token)?;
        self.state.lock().expect("poisoned").credential = Some(token.to_string());
        tracing::info!("credential set");
        Ok(())
    }

    /// Stores the hydrated profile. Does not touch the credential.
    pub fn set_profile(&self, profile: Profile) {
        self.state.lock().expect("poisoned").profile = Some(profile);
    }

    /// Clears credential and profile together and removes the persisted
    /// record. Idempotent, and deliberately infallible: logout runs on
    /// error paths (expired token detected mid-flight), so a persistence
    /// failure is logged rather than propagated.
    pub fn logout(&self) {
        {
            let mut state = self.state.lock().expect("poisoned");
            state.credential = None;
            state.profile = None;
        }
        if let Err(e) = self.persist.clear() {
            tracing::warn!(error = %e, "failed to remove persisted credential");
        }
        tracing::info!("session logged out");
    }

    /// Returns `true` if a credential is present.
    ///
    /// Note this says nothing about the credential's validity — it may
    /// have gone stale on the server. Staleness is only discovered when
    /// a call comes back 401 and the transport layer forces [`logout`].
    ///
    /// [`logout`]: Self::logout
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().expect("poisoned").credential.is_some()
    }

    /// Returns `true` if the hydrated profile carries the elevated role.
    ///
    /// Always `false` while the profile is unhydrated, even if a cached
    /// credential suggests a returning privileged user — guards must
    /// hydrate before trusting privilege.
    pub fn is_privileged(&self) -> bool {
        self.state
            .lock()
            .expect("poisoned")
            .profile
            .as_ref()
            .is_some_and(Profile::is_privileged)
    }

    /// Returns a copy of the current credential, if any.
    pub fn credential(&self) -> Option<String> {
        self.state.lock().expect("poisoned").credential.clone()
    }

    /// Returns a copy of the hydrated profile, if any.
    pub fn profile(&self) -> Option<Profile> {
        self.state.lock().expect("poisoned").profile.clone()
    }

    /// Fetches and caches the profile for an already-credentialed session.
    ///
    /// The actual network call is injected by the caller (the facade
    /// routes it through the transport layer); the store contributes the
    /// lifecycle rules:
    ///
    /// - no credential → [`SessionError::MissingCredential`] (caller error)
    /// - concurrent calls coalesce: the gate admits one fetch, and late
    ///   arrivals return the freshly cached profile without fetching
    /// - success → profile cached via [`set_profile`](Self::set_profile)
    /// - failure → the session is logged out and the failure re-signaled;
    ///   callers must treat it as "no session". The underlying cause is
    ///   logged at `warn` before the logout, which is the only place the
    ///   distinction between "token rejected" and "network blip" survives.
    pub async fn hydrate_profile<F, Fut>(&self, fetch: F) -> Result<Profile, SessionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Profile, SessionError>>,
    {
        if !self.is_authenticated() {
            return Err(SessionError::MissingCredential);
        }

        let _gate = self.hydration.lock().await;

        // Re-read under the gate: a concurrent attempt may have finished
        // hydration (return it) or logged the session out (give up)
        // while this caller was queued.
        if let Some(profile) = self.profile() {
            return Ok(profile);
        }
        if !self.is_authenticated() {
            return Err(SessionError::MissingCredential);
        }

        match fetch().await {
            Ok(profile) => {
                self.set_profile(profile.clone());
                tracing::info!(user = %profile.username, "profile hydrated");
                Ok(profile)
            }
            Err(e) => {
                // Telemetry keeps the real cause; callers only see
                // "hydration failed, session gone".
                tracing::warn!(error = %e, "profile hydration failed, logging out");
                self.logout();
                Err(SessionError::HydrationFailed(e.to_string()))
            }
        }
    }
}
