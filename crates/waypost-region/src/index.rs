//! The derived flat index: id → label and id → structured path.

use std::collections::HashMap;

use crate::{RegionId, RegionPath, RegionTree};

/// Flat lookup maps derived from one tree instance.
///
/// Both maps are built together in one pass — there is no way to end up
/// with a label map from one tree and a path map from another. The
/// `generation` field records which tree instance this index was built
/// from; the catalog compares it against the tree's current generation
/// and rebuilds on mismatch instead of ever patching in place.
#[derive(Debug)]
pub struct RegionIndex {
    labels: HashMap<RegionId, String>,
    paths: HashMap<RegionId, RegionPath>,
    generation: u64,
}

impl RegionIndex {
    /// Builds both maps from the tree in a single traversal.
    pub fn build(tree: &RegionTree, generation: u64) -> Self {
        let mut labels = HashMap::new();
        let mut paths = HashMap::new();

        for (province, city, district, id) in tree.leaves() {
            let path = RegionPath {
                province: province.to_string(),
                city: city.to_string(),
                district: district.to_string(),
            };
            labels.insert(id.clone(), path.label());
            paths.insert(id.clone(), path);
        }

        tracing::debug!(regions = labels.len(), generation, "region index built");
        Self {
            labels,
            paths,
            generation,
        }
    }

    /// The tree generation this index was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of indexed leaf regions.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label lookup: `"province city district"`.
    pub fn label(&self, id: &RegionId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Structured path lookup.
    pub fn path(&self, id: &RegionId) -> Option<&RegionPath> {
        self.paths.get(id)
    }
}
