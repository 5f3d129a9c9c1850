//! `Client` builder and wiring.
//!
//! This is the entry point for embedding Waypost. It ties together all
//! the layers: one shared `SessionStore`, the transport pipeline over
//! it, the navigation guard, and the region catalog — constructed once
//! at startup and handed around by reference, never looked up ambiently.

use std::sync::Arc;

use waypost_guard::{GuardOutcome, NavigationGuard, Route, RouteTable};
use waypost_region::RegionCatalog;
use waypost_session::{
    CredentialStore, MemoryCredentialStore, Profile, SessionStore,
};
use waypost_transport::{
    ApiTransport, HttpBackend, Navigator, Notifier, TracingNavigator, TracingNotifier,
    TransportConfig,
};
#[cfg(feature = "reqwest-client")]
use waypost_transport::ReqwestBackend;

use crate::api::{
    self, ApiHydrator, ApiRegionSource, LoginRequest, LoginResponse, UploadedFile,
    DOWNLOAD_ENDPOINT, LOGIN_ENDPOINT, UPLOAD_ENDPOINT,
};
use crate::WaypostError;

/// The client's route access policy.
///
/// Public: home, auth views, and request detail pages. `/user/**`
/// requires a session; `/admin/**` additionally requires the elevated
/// role. Requirements propagate to children, so new child views under
/// `/user` or `/admin` inherit protection automatically.
pub fn default_routes() -> RouteTable {
    RouteTable::new()
        .route(Route::new("/"))
        .route(Route::new("/login"))
        .route(Route::new("/register"))
        .route(Route::new("/request/:id"))
        .route(
            Route::new("/user")
                .requires_auth()
                .child(Route::new(""))
                .child(Route::new("profile"))
                .child(Route::new("requests"))
                .child(Route::new("responses")),
        )
        .route(
            Route::new("/admin")
                .requires_auth()
                .requires_privilege()
                .child(Route::new(""))
                .child(Route::new("stats")),
        )
}

/// Builder for configuring and wiring a [`Client`].
pub struct ClientBuilder {
    config: TransportConfig,
    persist: Option<Arc<dyn CredentialStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    routes: Option<RouteTable>,
}

impl ClientBuilder {
    /// Creates a builder for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: TransportConfig::new(base_url),
            persist: None,
            notifier: None,
            navigator: None,
            routes: None,
        }
    }

    /// Overrides the transport timeouts.
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets where the credential survives restarts. Defaults to an
    /// in-memory store (nothing survives).
    pub fn credential_store(mut self, store: impl CredentialStore) -> Self {
        self.persist = Some(Arc::new(store));
        self
    }

    /// Sets the host's notification surface. Defaults to the log.
    pub fn notifier(mut self, notifier: impl Notifier) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Sets the host's navigation surface. Defaults to the log.
    pub fn navigator(mut self, navigator: impl Navigator) -> Self {
        self.navigator = Some(Arc::new(navigator));
        self
    }

    /// Replaces the route access policy. Defaults to
    /// [`default_routes`].
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Builds the client over the production HTTP backend.
    #[cfg(feature = "reqwest-client")]
    pub fn build(self) -> Client<ReqwestBackend> {
        self.build_with(ReqwestBackend::new())
    }

    /// Builds the client over a caller-supplied backend (tests use the
    /// scripted mock here).
    pub fn build_with<B: HttpBackend>(self, backend: B) -> Client<B> {
        let persist = self
            .persist
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(TracingNavigator));
        let routes = self.routes.unwrap_or_else(default_routes);

        let session = Arc::new(SessionStore::new(persist));
        let transport = ApiTransport::new(
            backend,
            Arc::clone(&session),
            notifier,
            navigator,
            self.config,
        );
        let guard = NavigationGuard::new(
            Arc::clone(&session),
            routes,
            ApiHydrator::new(Arc::clone(&session), transport.clone()),
        );
        let regions = RegionCatalog::new(ApiRegionSource::new(transport.clone()));

        Client {
            session,
            transport,
            guard,
            regions,
        }
    }
}

/// A wired Waypost client.
pub struct Client<B: HttpBackend> {
    session: Arc<SessionStore>,
    transport: ApiTransport<B>,
    guard: NavigationGuard<ApiHydrator<B>>,
    regions: RegionCatalog<ApiRegionSource<B>>,
}

impl<B: HttpBackend> Client<B> {
    /// Creates a new builder.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// The shared session store (credential, profile, derived flags).
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The request pipeline, for callers wiring additional endpoints.
    pub fn transport(&self) -> &ApiTransport<B> {
        &self.transport
    }

    /// The region catalog.
    pub fn regions(&self) -> &RegionCatalog<ApiRegionSource<B>> {
        &self.regions
    }

    /// Signs in: exchanges credentials for a token, persists it, then
    /// hydrates and returns the profile.
    pub async fn login(&self, username: &str, password: &str) -> Result<Profile, WaypostError> {
        let response: LoginResponse = self
            .transport
            .post(LOGIN_ENDPOINT, &LoginRequest { username, password })
            .await?;
        self.session.set_credential(&response.token)?;
        let profile = api::hydrate(&self.session, &self.transport).await?;
        tracing::info!(username = %profile.username, "signed in");
        Ok(profile)
    }

    /// Signs out locally: clears the session and the persisted token.
    pub fn logout(&self) {
        tracing::info!("signed out");
        self.session.logout();
    }

    /// The current user's profile, hydrating it first if needed.
    /// Fails with a session error when no credential is present.
    pub async fn current_user(&self) -> Result<Profile, WaypostError> {
        Ok(api::hydrate(&self.session, &self.transport).await?)
    }

    /// Runs the navigation guard for a target path.
    pub async fn navigate(&self, target: &str) -> GuardOutcome {
        self.guard.check(target).await
    }

    /// Uploads a file under the extended upload budget.
    pub async fn upload_file(
        &self,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<UploadedFile, WaypostError> {
        let path = format!(
            "{UPLOAD_ENDPOINT}?filename={}",
            urlencoding::encode(file_name)
        );
        Ok(self
            .transport
            .upload(&path, data, "application/octet-stream")
            .await?)
    }

    /// Downloads a file under the extended download budget.
    pub async fn download_file(&self, file_name: &str) -> Result<Vec<u8>, WaypostError> {
        let path = format!(
            "{DOWNLOAD_ENDPOINT}/{}",
            urlencoding::encode(file_name)
        );
        Ok(self.transport.download(&path).await?)
    }
}
