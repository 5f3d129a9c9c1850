//! The raw region tree and its leaf types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque server-assigned region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The structured location of one region id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPath {
    pub province: String,
    pub city: String,
    pub district: String,
}

impl RegionPath {
    /// The display label: `"province city district"`.
    pub fn label(&self) -> String {
        format!("{} {} {}", self.province, self.city, self.district)
    }
}

/// The nested `province → city → district → id` mapping, exactly as the
/// server sends it. Immutable once loaded; a refetch replaces the whole
/// tree (and bumps the catalog's generation), never patches it.
///
/// `BTreeMap` keeps iteration deterministic, which keeps derived
/// orderings (e.g. [`ids_for_province`](crate::RegionCatalog::ids_for_province))
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionTree(pub BTreeMap<String, BTreeMap<String, BTreeMap<String, RegionId>>>);

impl RegionTree {
    /// Iterates every `(province, city, district, id)` leaf.
    pub fn leaves(&self) -> impl Iterator<Item = (&str, &str, &str, &RegionId)> {
        self.0.iter().flat_map(|(province, cities)| {
            cities.iter().flat_map(move |(city, districts)| {
                districts.iter().map(move |(district, id)| {
                    (province.as_str(), city.as_str(), district.as_str(), id)
                })
            })
        })
    }

    /// All leaf ids under a province, in tree order. Empty if the
    /// province is unknown.
    pub fn ids_for_province(&self, province: &str) -> Vec<RegionId> {
        self.0
            .get(province)
            .map(|cities| {
                cities
                    .values()
                    .flat_map(|districts| districts.values().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All leaf ids under a city, in tree order. Empty if either level
    /// is unknown.
    pub fn ids_for_city(&self, province: &str, city: &str) -> Vec<RegionId> {
        self.0
            .get(province)
            .and_then(|cities| cities.get(city))
            .map(|districts| districts.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> RegionTree {
        serde_json::from_str(
            r#"{
                "A": { "B": { "C": "id1", "D": "id2" }, "E": { "F": "id3" } },
                "G": { "H": { "I": "id4" } }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserializes_nested_shape() {
        let t = tree();
        assert_eq!(t.leaves().count(), 4);
    }

    #[test]
    fn test_ids_for_province_flattens_all_cities() {
        let t = tree();
        assert_eq!(
            t.ids_for_province("A"),
            vec!["id1".into(), "id2".into(), "id3".into()]
        );
        assert!(t.ids_for_province("Z").is_empty());
    }

    #[test]
    fn test_ids_for_city() {
        let t = tree();
        assert_eq!(t.ids_for_city("A", "B"), vec!["id1".into(), "id2".into()]);
        assert!(t.ids_for_city("A", "Z").is_empty());
        assert!(t.ids_for_city("Z", "B").is_empty());
    }

    #[test]
    fn test_path_label() {
        let p = RegionPath {
            province: "A".into(),
            city: "B".into(),
            district: "C".into(),
        };
        assert_eq!(p.label(), "A B C");
    }
}
