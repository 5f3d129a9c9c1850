//! Integration tests for the region catalog: lazy loading, request
//! coalescing, failure recovery, and the derived index.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use waypost_region::{
    RegionCatalog, RegionError, RegionId, RegionPath, RegionSource, RegionTree,
    LOADING_LABEL, UNKNOWN_REGION_LABEL,
};

// =========================================================================
// Fixtures
// =========================================================================

fn small_tree() -> RegionTree {
    serde_json::from_str(r#"{ "A": { "B": { "C": "id1" } } }"#).unwrap()
}

fn bigger_tree() -> RegionTree {
    serde_json::from_str(
        r#"{
            "A": { "B": { "C": "id1", "D": "id2" } },
            "X": { "Y": { "Z": "id9" } }
        }"#,
    )
    .unwrap()
}

/// Source that counts fetches and can be told to fail, stall, or serve
/// a different tree mid-test.
struct ScriptedSource {
    tree: Arc<std::sync::Mutex<RegionTree>>,
    fetches: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    delay: Duration,
}

impl ScriptedSource {
    fn new(tree: RegionTree) -> Self {
        Self {
            tree: Arc::new(std::sync::Mutex::new(tree)),
            fetches: Arc::new(AtomicUsize::new(0)),
            fail: Arc::new(AtomicBool::new(false)),
            delay: Duration::ZERO,
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl RegionSource for ScriptedSource {
    async fn fetch(&self) -> Result<RegionTree, RegionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(RegionError::Fetch("http 500".into()));
        }
        Ok(self.tree.lock().unwrap().clone())
    }
}

// =========================================================================
// Lazy loading and sentinels
// =========================================================================

#[tokio::test]
async fn test_nothing_fetched_before_first_demand() {
    let source = ScriptedSource::new(small_tree());
    let fetches = Arc::clone(&source.fetches);
    let catalog = RegionCatalog::new(source);

    assert!(!catalog.is_loaded());
    assert_eq!(catalog.label_for(&"id1".into()), LOADING_LABEL);
    assert_eq!(catalog.path_for(&"id1".into()), None);
    assert!(catalog.ids_for_province("A").is_empty());
    assert_eq!(fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_loaded_tree_serves_labels_paths_and_ranges() {
    let catalog = RegionCatalog::new(ScriptedSource::new(small_tree()));
    catalog.ensure_loaded().await.unwrap();

    assert_eq!(catalog.label_for(&"id1".into()), "A B C");
    assert_eq!(
        catalog.path_for(&"id1".into()),
        Some(RegionPath {
            province: "A".into(),
            city: "B".into(),
            district: "C".into(),
        })
    );
    assert_eq!(
        catalog.ids_for_province("A"),
        vec![RegionId::from("id1")]
    );
    assert_eq!(
        catalog.ids_for_city("A", "B"),
        vec![RegionId::from("id1")]
    );
}

#[tokio::test]
async fn test_unknown_id_once_loaded() {
    let catalog = RegionCatalog::new(ScriptedSource::new(small_tree()));
    catalog.ensure_loaded().await.unwrap();

    assert_eq!(catalog.label_for(&"id99".into()), UNKNOWN_REGION_LABEL);
    assert_eq!(catalog.path_for(&"id99".into()), None);
}

#[tokio::test]
async fn test_missing_prefixes_yield_empty() {
    let catalog = RegionCatalog::new(ScriptedSource::new(small_tree()));
    catalog.ensure_loaded().await.unwrap();

    assert!(catalog.ids_for_province("Q").is_empty());
    assert!(catalog.ids_for_city("A", "Q").is_empty());
    assert!(catalog.ids_for_city("Q", "B").is_empty());
}

// =========================================================================
// Coalescing and idempotence
// =========================================================================

#[tokio::test]
async fn test_ensure_loaded_is_idempotent() {
    let source = ScriptedSource::new(small_tree());
    let fetches = Arc::clone(&source.fetches);
    let catalog = RegionCatalog::new(source);

    catalog.ensure_loaded().await.unwrap();
    catalog.ensure_loaded().await.unwrap();
    catalog.ensure_loaded().await.unwrap();

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_ensure_loaded_coalesces_to_one_fetch() {
    let source = ScriptedSource::new(small_tree()).slow(Duration::from_millis(20));
    let fetches = Arc::clone(&source.fetches);
    let catalog = Arc::new(RegionCatalog::new(source));

    let a = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move { catalog.ensure_loaded().await })
    };
    let b = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move { catalog.ensure_loaded().await })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert!(catalog.is_loaded());
}

// =========================================================================
// Failure handling
// =========================================================================

#[tokio::test]
async fn test_failed_fetch_leaves_catalog_empty_and_retryable() {
    let source = ScriptedSource::new(small_tree());
    let fetches = Arc::clone(&source.fetches);
    let fail = Arc::clone(&source.fail);
    let catalog = RegionCatalog::new(source);

    fail.store(true, Ordering::SeqCst);
    assert!(matches!(
        catalog.ensure_loaded().await,
        Err(RegionError::Fetch(_))
    ));
    assert!(!catalog.is_loaded());
    assert_eq!(catalog.label_for(&"id1".into()), LOADING_LABEL);

    // The next demand retries and succeeds.
    fail.store(false, Ordering::SeqCst);
    catalog.ensure_loaded().await.unwrap();
    assert_eq!(catalog.label_for(&"id1".into()), "A B C");
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

// =========================================================================
// Refresh and generation stamping
// =========================================================================

#[tokio::test]
async fn test_refresh_replaces_tree_and_rebuilds_both_maps() {
    let source = ScriptedSource::new(small_tree());
    let tree = Arc::clone(&source.tree);
    let fetches = Arc::clone(&source.fetches);
    let catalog = RegionCatalog::new(source);

    catalog.ensure_loaded().await.unwrap();
    assert_eq!(catalog.label_for(&"id9".into()), UNKNOWN_REGION_LABEL);

    // The server now serves a different tree; force a refetch.
    *tree.lock().unwrap() = bigger_tree();
    catalog.refresh().await.unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    // Label and path answers come from the same (new) tree — no partial
    // staleness between the two derived maps.
    assert_eq!(catalog.label_for(&"id9".into()), "X Y Z");
    assert_eq!(
        catalog.path_for(&"id9".into()),
        Some(RegionPath {
            province: "X".into(),
            city: "Y".into(),
            district: "Z".into(),
        })
    );
    assert_eq!(
        catalog.ids_for_province("A"),
        vec![RegionId::from("id1"), RegionId::from("id2")]
    );
}
