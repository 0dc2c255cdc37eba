//! Global Node Index
//!
//! One table shared by every content type of a store. Entries are keyed by
//! node `uid` with a secondary unique index on `path`, which is what enforces
//! path uniqueness across content types. Each entry also carries the node's
//! belongs-to map so reverse reference lookups never touch node fields.
//!
//! All mutations go through `insert`, `update` and `remove`; each checks its
//! constraints before changing anything, so a failed call leaves the index
//! untouched.

use crate::db::error::StoreError;
use crate::models::{BelongsTo, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entry kind stored for content nodes
pub const NODE_ENTRY_TYPE: &str = "node";

/// Globally unique record of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Always `"node"`
    #[serde(rename = "type")]
    pub entry_type: String,

    pub path: String,

    pub type_name: String,

    pub uid: String,

    pub id: String,

    /// References held by the node's fields
    pub belongs_to: BelongsTo,
}

impl IndexEntry {
    /// Build the entry for a node
    pub fn for_node(node: &Node, belongs_to: BelongsTo) -> Self {
        Self {
            entry_type: NODE_ENTRY_TYPE.to_string(),
            path: node.path.clone(),
            type_name: node.type_name.clone(),
            uid: node.uid.clone(),
            id: node.id.clone(),
            belongs_to,
        }
    }
}

/// Arena of index entries keyed by uid, plus a unique path index.
#[derive(Debug, Default)]
pub struct NodeIndex {
    /// uid → entry
    entries: HashMap<String, IndexEntry>,

    /// path → uid
    paths: HashMap<String, String>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry.
    ///
    /// # Errors
    ///
    /// - `DuplicateUid` if the uid is already indexed
    /// - `DuplicatePath` if another entry owns the path
    pub fn insert(&mut self, entry: IndexEntry) -> Result<(), StoreError> {
        if self.entries.contains_key(&entry.uid) {
            return Err(StoreError::duplicate_uid(&entry.uid));
        }
        if let Some(owner) = self.paths.get(&entry.path) {
            return Err(StoreError::duplicate_path(&entry.path, owner));
        }

        self.paths.insert(entry.path.clone(), entry.uid.clone());
        self.entries.insert(entry.uid.clone(), entry);
        Ok(())
    }

    /// Replace the path and belongs-to map of an existing entry.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the uid is not indexed
    /// - `DuplicatePath` if a different entry owns the new path
    pub fn update(
        &mut self,
        uid: &str,
        path: String,
        belongs_to: BelongsTo,
    ) -> Result<(), StoreError> {
        if let Some(owner) = self.paths.get(&path) {
            if owner != uid {
                return Err(StoreError::duplicate_path(&path, owner));
            }
        }

        let entry = self
            .entries
            .get_mut(uid)
            .ok_or_else(|| StoreError::entry_not_found(uid))?;

        if entry.path != path {
            self.paths.remove(&entry.path);
            self.paths.insert(path.clone(), uid.to_string());
            entry.path = path;
        }
        entry.belongs_to = belongs_to;
        Ok(())
    }

    /// Remove an entry, returning it if it existed
    pub fn remove(&mut self, uid: &str) -> Option<IndexEntry> {
        let entry = self.entries.remove(uid)?;
        self.paths.remove(&entry.path);
        Some(entry)
    }

    pub fn get(&self, uid: &str) -> Option<&IndexEntry> {
        self.entries.get(uid)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.paths.get(path).and_then(|uid| self.entries.get(uid))
    }

    /// Entries whose belongs-to map references `type_name` / `id`, ordered by
    /// path.
    pub fn referencing(&self, type_name: &str, id: &str) -> Vec<&IndexEntry> {
        let mut entries: Vec<&IndexEntry> = self
            .entries
            .values()
            .filter(|entry| entry.belongs_to.contains(type_name, id))
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(uid: &str, path: &str) -> IndexEntry {
        IndexEntry {
            entry_type: NODE_ENTRY_TYPE.to_string(),
            path: path.to_string(),
            type_name: "Post".to_string(),
            uid: uid.to_string(),
            id: uid.to_string(),
            belongs_to: BelongsTo::new(),
        }
    }

    #[test]
    fn test_insert_rejects_duplicate_path() {
        let mut index = NodeIndex::new();
        index.insert(entry("a", "/same")).unwrap();

        let err = index.insert(entry("b", "/same")).unwrap_err();
        assert_eq!(err, StoreError::duplicate_path("/same", "a"));
        assert_eq!(index.len(), 1);
        assert!(index.get("b").is_none());
    }

    #[test]
    fn test_insert_rejects_duplicate_uid() {
        let mut index = NodeIndex::new();
        index.insert(entry("a", "/one")).unwrap();

        let err = index.insert(entry("a", "/two")).unwrap_err();
        assert_eq!(err, StoreError::duplicate_uid("a"));
        assert!(index.find_by_path("/two").is_none());
    }

    #[test]
    fn test_update_moves_path() {
        let mut index = NodeIndex::new();
        index.insert(entry("a", "/old")).unwrap();

        let mut belongs_to = BelongsTo::new();
        belongs_to.add("Author", "1");
        index.update("a", "/new".to_string(), belongs_to).unwrap();

        assert!(index.find_by_path("/old").is_none());
        let updated = index.find_by_path("/new").unwrap();
        assert_eq!(updated.uid, "a");
        assert!(updated.belongs_to.contains("Author", "1"));
    }

    #[test]
    fn test_update_rejects_taken_path_without_changes() {
        let mut index = NodeIndex::new();
        index.insert(entry("a", "/a")).unwrap();
        index.insert(entry("b", "/b")).unwrap();

        let err = index
            .update("a", "/b".to_string(), BelongsTo::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePath { .. }));
        assert_eq!(index.find_by_path("/a").unwrap().uid, "a");
        assert_eq!(index.find_by_path("/b").unwrap().uid, "b");
    }

    #[test]
    fn test_update_unknown_uid() {
        let mut index = NodeIndex::new();
        let err = index
            .update("missing", "/x".to_string(), BelongsTo::new())
            .unwrap_err();
        assert_eq!(err, StoreError::entry_not_found("missing"));
    }

    #[test]
    fn test_remove_frees_path() {
        let mut index = NodeIndex::new();
        index.insert(entry("a", "/a")).unwrap();

        assert!(index.remove("a").is_some());
        assert!(index.remove("a").is_none());
        assert!(index.is_empty());
        index.insert(entry("b", "/a")).unwrap();
    }

    #[test]
    fn test_referencing_filters_by_belongs_to() {
        let mut index = NodeIndex::new();
        let mut referencing = entry("a", "/z");
        referencing.belongs_to.add("Author", "1");
        let mut other = entry("b", "/y");
        other.belongs_to.add("Author", "1");
        index.insert(referencing).unwrap();
        index.insert(other).unwrap();
        index.insert(entry("c", "/x")).unwrap();

        let uids: Vec<&str> = index
            .referencing("Author", "1")
            .into_iter()
            .map(|entry| entry.uid.as_str())
            .collect();
        assert_eq!(uids, vec!["b", "a"]);
    }
}
