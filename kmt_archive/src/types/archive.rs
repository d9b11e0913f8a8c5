//! Collection-level types for a whole archive run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ReactionRecord;

/// URL of one "reaction data" collection, as linked from the archive root.
pub type CollectionRef = String;

/// URL of one reaction detail page within a collection.
pub type DetailLinkRef = String;

/// Records of a run, grouped by collection.
///
/// Collections keep the order they were discovered in; records keep crawl
/// order (page order, then link order within a page). Serializes as a plain
/// JSON object keyed by collection URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveResult {
    collections: IndexMap<CollectionRef, Vec<ReactionRecord>>,
}

impl ArchiveResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the records crawled for `collection`.
    ///
    /// A collection crawled twice keeps its original position and its latest
    /// records, so no record is ever listed under two collections.
    pub fn insert(&mut self, collection: CollectionRef, records: Vec<ReactionRecord>) {
        self.collections.insert(collection, records);
    }

    pub fn get(&self, collection: &str) -> Option<&[ReactionRecord]> {
        self.collections.get(collection).map(Vec::as_slice)
    }

    /// Number of collections in the result.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Number of records across all collections.
    pub fn total_records(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CollectionRef, &Vec<ReactionRecord>)> {
        self.collections.iter()
    }
}
