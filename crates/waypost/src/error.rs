//! Unified error type for the Waypost client.

use waypost_region::RegionError;
use waypost_session::{PersistError, SessionError};
use waypost_transport::TransportError;

/// Anything a [`Client`](crate::Client) call can fail with.
///
/// Each layer keeps its own error enum; this one exists so hosts can
/// write `Result<_, WaypostError>` against the facade and let `?` lift
/// layer errors into it. Transparent wrapping means the display text is
/// always the underlying error's own message.
#[derive(Debug, thiserror::Error)]
pub enum WaypostError {
    /// A session-level error (missing credential, failed hydration).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A transport-level error (network, status, envelope, expiry).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A region-cache error (tree fetch failed).
    #[error(transparent)]
    Region(#[from] RegionError),

    /// A credential-persistence error.
    #[error(transparent)]
    Persist(#[from] PersistError),
}
