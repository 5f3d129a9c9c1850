//! The catalog: coalesced loading and the memoized index.

use std::sync::{Arc, Mutex};

use crate::{RegionId, RegionIndex, RegionPath, RegionTree};

/// Label shown while the tree has not arrived yet.
pub const LOADING_LABEL: &str = "loading...";

/// Label shown for an id the loaded tree does not contain.
pub const UNKNOWN_REGION_LABEL: &str = "unknown region";

/// Errors from the region layer.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// The tree fetch failed. The catalog holds no partial tree — the
    /// next [`ensure_loaded`](crate::RegionCatalog::ensure_loaded) will
    /// retry from scratch.
    #[error("region fetch failed: {0}")]
    Fetch(String),
}

/// Fetches the nested region tree.
///
/// The facade implements this over the HTTP pipeline; tests implement
/// it with canned trees.
pub trait RegionSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<RegionTree, RegionError>> + Send;
}

/// Plain state under one lock: the tree, its generation, and the index
/// derived from some generation.
#[derive(Default)]
struct CatalogState {
    tree: Option<Arc<RegionTree>>,
    /// Bumped every time a tree is installed. Generation 0 means "never
    /// loaded".
    generation: u64,
    index: Option<Arc<RegionIndex>>,
}

impl CatalogState {
    /// The index for the *current* tree, building it if the memoized
    /// one is missing or was built from an older generation.
    fn current_index(&mut self) -> Option<Arc<RegionIndex>> {
        let tree = self.tree.as_ref()?;
        match &self.index {
            Some(index) if index.generation() == self.generation => Some(Arc::clone(index)),
            _ => {
                let built = Arc::new(RegionIndex::build(tree, self.generation));
                self.index = Some(Arc::clone(&built));
                Some(built)
            }
        }
    }
}

/// Lazily loads the region tree and serves flat lookups from it.
///
/// Loading is demand-driven and coalesced: however many callers hit
/// [`ensure_loaded`](Self::ensure_loaded) while a fetch is in flight,
/// exactly one request goes out, and all callers observe the same
/// eventual state.
pub struct RegionCatalog<S: RegionSource> {
    source: S,
    state: Mutex<CatalogState>,
    /// Load gate, held across the fetch await. Doubles as the "loading"
    /// flag: queued callers re-check the tree once they acquire it.
    load: tokio::sync::Mutex<()>,
}

impl<S: RegionSource> RegionCatalog<S> {
    /// An empty catalog. Nothing is fetched until first demand.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(CatalogState::default()),
            load: tokio::sync::Mutex::new(()),
        }
    }

    /// `true` once a tree is installed.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().expect("poisoned").tree.is_some()
    }

    /// Fetches the tree if it is absent.
    ///
    /// No-op when the tree is already present. Concurrent callers
    /// coalesce behind the load gate. A failed fetch leaves the catalog
    /// empty (no partial tree) and retryable; success installs the tree
    /// and eagerly builds the derived index so the first label lookup
    /// is already cheap.
    pub async fn ensure_loaded(&self) -> Result<(), RegionError> {
        if self.is_loaded() {
            return Ok(());
        }

        let _gate = self.load.lock().await;
        // A queued caller arrives here after the winner finished.
        if self.is_loaded() {
            return Ok(());
        }

        let tree = self.source.fetch().await.inspect_err(|e| {
            tracing::warn!(error = %e, "region tree fetch failed");
        })?;

        self.install(tree);
        Ok(())
    }

    /// Refetches unconditionally, replacing the current tree.
    ///
    /// The generation bump invalidates the memoized index as a whole —
    /// both derived maps are rebuilt together from the new tree, never
    /// one without the other.
    pub async fn refresh(&self) -> Result<(), RegionError> {
        let _gate = self.load.lock().await;
        let tree = self.source.fetch().await?;
        self.install(tree);
        Ok(())
    }

    fn install(&self, tree: RegionTree) {
        let mut state = self.state.lock().expect("poisoned");
        state.tree = Some(Arc::new(tree));
        state.generation += 1;
        // Build eagerly; also drops any index from an older generation.
        let index = state.current_index();
        tracing::info!(
            generation = state.generation,
            regions = index.map(|i| i.len()).unwrap_or(0),
            "region tree installed"
        );
    }

    /// Human-readable label for an id: [`LOADING_LABEL`] while the tree
    /// is absent, [`UNKNOWN_REGION_LABEL`] when the id is not found.
    pub fn label_for(&self, id: &RegionId) -> String {
        let mut state = self.state.lock().expect("poisoned");
        match state.current_index() {
            None => LOADING_LABEL.to_string(),
            Some(index) => index
                .label(id)
                .unwrap_or(UNKNOWN_REGION_LABEL)
                .to_string(),
        }
    }

    /// Structured path for an id; `None` while the tree is absent or
    /// when the id is not found.
    pub fn path_for(&self, id: &RegionId) -> Option<RegionPath> {
        let mut state = self.state.lock().expect("poisoned");
        state.current_index()?.path(id).cloned()
    }

    /// All leaf ids under a province; empty when the tree is absent or
    /// the province unknown.
    pub fn ids_for_province(&self, province: &str) -> Vec<RegionId> {
        self.state
            .lock()
            .expect("poisoned")
            .tree
            .as_ref()
            .map(|tree| tree.ids_for_province(province))
            .unwrap_or_default()
    }

    /// All leaf ids under a city; empty when the tree is absent or the
    /// prefix unknown.
    pub fn ids_for_city(&self, province: &str, city: &str) -> Vec<RegionId> {
        self.state
            .lock()
            .expect("poisoned")
            .tree
            .as_ref()
            .map(|tree| tree.ids_for_city(province, city))
            .unwrap_or_default()
    }
}
