//! Error types for the session layer.

/// Errors from the credential persistence seam.
///
/// Persistence is deliberately simple — one string-valued record — so
/// the only things that can go wrong are I/O and encoding.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the backing record failed.
    #[error("credential storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted record was present but not decodable.
    /// Treated by callers as "no persisted credential".
    #[error("persisted credential is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `hydrate_profile` was invoked with no credential present.
    /// This is a caller error — the guard checks `is_authenticated`
    /// before asking for hydration.
    #[error("no credential present, cannot hydrate profile")]
    MissingCredential,

    /// The profile fetch failed. The store has already logged the
    /// session out by the time this is returned; callers must treat
    /// it as "no session". The message carries the underlying cause
    /// (also logged at `warn` before the logout), but callers cannot
    /// distinguish an expired token from a transient network failure.
    #[error("profile hydration failed: {0}")]
    HydrationFailed(String),

    /// Persisting or removing the credential record failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydration_failed_carries_cause() {
        let err = SessionError::HydrationFailed("http 500".into());
        assert!(err.to_string().contains("http 500"));
    }

    #[test]
    fn test_persist_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SessionError = PersistError::from(io).into();
        assert!(matches!(err, SessionError::Persist(_)));
    }
}
