//! Lazy region index cache for Waypost.
//!
//! The server exposes one nested geographic tree
//! (`province → city → district → region-id`). Display logic wants the
//! opposite direction: given an id, what's the label? This crate owns
//! that derivation:
//!
//! 1. **[`RegionTree`]** — the raw nested mapping, fetched on first
//!    demand through the [`RegionSource`] seam
//! 2. **[`RegionIndex`]** — the flat id→label and id→path maps, built
//!    from the tree exactly once per tree instance (generation-stamped)
//! 3. **[`RegionCatalog`]** — the cache itself: coalesced loading,
//!    memoized index, range queries
//!
//! The catalog is an isolated display-data component — the navigation
//! guard never consults it.

#![allow(async_fn_in_trait)]

mod catalog;
mod index;
mod tree;

pub use catalog::{RegionCatalog, RegionError, RegionSource, LOADING_LABEL, UNKNOWN_REGION_LABEL};
pub use index::RegionIndex;
pub use tree::{RegionId, RegionPath, RegionTree};
