//! # Waypost
//!
//! Client-side core for the Waypost service-request platform: the
//! session/authorization state machine, the HTTP transport pipeline, the
//! navigation guard, and the lazy region index cache, wired together
//! behind one [`Client`].
//!
//! The host shell supplies the surfaces Waypost deliberately does not
//! own — rendering, the notification toast, and actual location changes
//! — through the [`Notifier`] and [`Navigator`] traits.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use waypost::{Client, GuardOutcome};
//!
//! # async fn run() -> Result<(), waypost::WaypostError> {
//! let client = Client::<waypost::ReqwestBackend>::builder("https://api.example.com/api").build();
//!
//! client.login("alice", "secret").await?;
//!
//! match client.navigate("/admin/stats").await {
//!     GuardOutcome::Allow => { /* render the view */ }
//!     GuardOutcome::RedirectToLogin { .. } => { /* go sign in */ }
//!     GuardOutcome::RedirectToHome => { /* not privileged */ }
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod error;

pub use api::{ApiHydrator, ApiRegionSource, UploadedFile};
pub use client::{default_routes, Client, ClientBuilder};
pub use error::WaypostError;

// The pieces hosts interact with directly, re-exported so simple
// embeddings need only this crate.
pub use waypost_guard::{GuardOutcome, NavigationGuard, Route, RouteTable};
pub use waypost_region::{RegionCatalog, RegionId, RegionPath, RegionTree};
pub use waypost_session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, Profile, SessionStore,
};
pub use waypost_transport::{
    ApiTransport, HttpBackend, Navigator, Notice, Notifier, Severity, TransportConfig,
    TransportError,
};
#[cfg(feature = "reqwest-client")]
pub use waypost_transport::ReqwestBackend;
