//! Store Error Types
//!
//! This module defines error types for the in-memory node collections and
//! the global node index.

use thiserror::Error;

/// Storage operation errors
///
/// Covers uniqueness violations and missing entries. Higher-level failures
/// are handled by service-layer error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another node already owns this path
    #[error("Path '{path}' is already taken by node {uid}")]
    DuplicatePath { path: String, uid: String },

    /// An index entry with this uid already exists
    #[error("Duplicate node uid: {uid}")]
    DuplicateUid { uid: String },

    /// A node with this id already exists in the collection
    #[error("Duplicate id '{id}' in collection {type_name}")]
    DuplicateId { type_name: String, id: String },

    /// No index entry for this uid
    #[error("Index entry not found: {uid}")]
    EntryNotFound { uid: String },

    /// No node with this id in the collection
    #[error("Node '{id}' not found in collection {type_name}")]
    NodeNotFound { type_name: String, id: String },
}

impl StoreError {
    /// Create a duplicate path error
    pub fn duplicate_path(path: impl Into<String>, uid: impl Into<String>) -> Self {
        Self::DuplicatePath {
            path: path.into(),
            uid: uid.into(),
        }
    }

    /// Create a duplicate uid error
    pub fn duplicate_uid(uid: impl Into<String>) -> Self {
        Self::DuplicateUid { uid: uid.into() }
    }

    /// Create a duplicate id error
    pub fn duplicate_id(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    /// Create an entry not found error
    pub fn entry_not_found(uid: impl Into<String>) -> Self {
        Self::EntryNotFound { uid: uid.into() }
    }

    /// Create a node not found error
    pub fn node_not_found(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            type_name: type_name.into(),
            id: id.into(),
        }
    }
}
