//! Session state for Waypost.
//!
//! This crate owns the authenticated-session state machine:
//!
//! 1. **Credential** — the opaque bearer token proving identity
//!    (persisted across reloads via the [`CredentialStore`] trait)
//! 2. **Profile** — the hydrated user record, fetched *after* the
//!    credential is known ([`SessionStore::hydrate_profile`])
//! 3. **Derived flags** — [`is_authenticated`](SessionStore::is_authenticated)
//!    and [`is_privileged`](SessionStore::is_privileged), which the guard
//!    and transport layers consult
//!
//! # How it fits in the stack
//!
//! ```text
//! Guard Layer (above)      ← asks "who is this? may they enter?"
//!     ↕
//! Session Layer (this crate)  ← owns credential + profile
//!     ↕
//! Transport Layer (beside)    ← reads the credential on every call,
//!                               forces logout() on expiry
//! ```
//!
//! The store is shared by reference (`Arc<SessionStore>`) — it is handed
//! to the transport and guard constructors at startup, never looked up
//! ambiently.

#![allow(async_fn_in_trait)]

mod error;
mod persist;
mod profile;
mod store;

pub use error::{PersistError, SessionError};
pub use persist::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use profile::{Profile, ADMIN_USER_TYPE};
pub use store::SessionStore;
