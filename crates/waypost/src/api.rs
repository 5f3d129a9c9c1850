//! The typed API surface the core itself needs, plus the trait bridges
//! that plug the transport into the session store and the region
//! catalog. The wider CRUD catalog (service requests, responses, stats)
//! is view glue and lives with the views, not here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use waypost_guard::ProfileHydrator;
use waypost_region::{RegionError, RegionSource, RegionTree};
use waypost_session::{Profile, SessionError, SessionStore};
use waypost_transport::{ApiTransport, HttpBackend};

pub(crate) const LOGIN_ENDPOINT: &str = "/auth/login";
pub(crate) const PROFILE_ENDPOINT: &str = "/auth/me";
pub(crate) const REGIONS_ENDPOINT: &str = "/requests/regions";
pub(crate) const UPLOAD_ENDPOINT: &str = "/files/upload";
pub(crate) const DOWNLOAD_ENDPOINT: &str = "/files/download";

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

/// Result of a file upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Server-assigned name to download the file by.
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// Runs profile hydration through the transport pipeline.
///
/// The store contributes coalescing and the logout-on-failure rule; the
/// transport contributes the credentialed fetch. A transport failure is
/// collapsed into [`SessionError::HydrationFailed`] — deliberately, the
/// caller cannot tell an expired token from a network blip (the cause
/// survives only in the logs).
pub(crate) async fn hydrate<B: HttpBackend>(
    session: &SessionStore,
    transport: &ApiTransport<B>,
) -> Result<Profile, SessionError> {
    session
        .hydrate_profile(|| async {
            transport
                .get::<Profile>(PROFILE_ENDPOINT)
                .await
                .map_err(|e| SessionError::HydrationFailed(e.to_string()))
        })
        .await
}

/// The [`ProfileHydrator`] the navigation guard uses: session store plus
/// a handle on the shared pipeline.
pub struct ApiHydrator<B: HttpBackend> {
    session: Arc<SessionStore>,
    transport: ApiTransport<B>,
}

impl<B: HttpBackend> ApiHydrator<B> {
    pub fn new(session: Arc<SessionStore>, transport: ApiTransport<B>) -> Self {
        Self { session, transport }
    }
}

impl<B: HttpBackend> ProfileHydrator for ApiHydrator<B> {
    async fn hydrate(&self) -> Result<Profile, SessionError> {
        hydrate(&self.session, &self.transport).await
    }
}

/// The [`RegionSource`] the region catalog uses.
pub struct ApiRegionSource<B: HttpBackend> {
    transport: ApiTransport<B>,
}

impl<B: HttpBackend> ApiRegionSource<B> {
    pub fn new(transport: ApiTransport<B>) -> Self {
        Self { transport }
    }
}

impl<B: HttpBackend> RegionSource for ApiRegionSource<B> {
    async fn fetch(&self) -> Result<RegionTree, RegionError> {
        self.transport
            .get::<RegionTree>(REGIONS_ENDPOINT)
            .await
            .map_err(|e| RegionError::Fetch(e.to_string()))
    }
}
