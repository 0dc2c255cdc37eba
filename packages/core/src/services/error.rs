//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for lifecycle and configuration failures.

use crate::db::StoreError;
use thiserror::Error;

/// Service operation errors
///
/// Duplicate paths and ids on `add_node` are not represented here: they are
/// logged and reported as "no node" instead of failing the ingestion run.
#[derive(Error, Debug)]
pub enum NodeServiceError {
    /// Node not found by id within its content type
    #[error("Node not found: {type_name}/{id}")]
    NodeNotFound { type_name: String, id: String },

    /// A node declared a mime type nobody can parse
    #[error("No transformer is registered for mime type '{mime_type}'")]
    MissingTransformer { mime_type: String },

    /// The transformer failed to parse raw content
    #[error("Transformer for '{mime_type}' failed: {source}")]
    TransformFailed {
        mime_type: String,
        #[source]
        source: anyhow::Error,
    },

    /// An update moved a node onto a path owned by another node
    #[error("Path already taken by another node: {path}")]
    PathConflict { path: String },

    /// A content type with this name is already registered
    #[error("Content type already exists: {0}")]
    ContentTypeExists(String),

    /// No content type with this name is registered
    #[error("Content type not found: {0}")]
    ContentTypeNotFound(String),

    /// Route pattern could not be compiled
    #[error("Invalid route '{route}': {reason}")]
    InvalidRoute { route: String, reason: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Store operation failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl NodeServiceError {
    /// Create a node not found error
    pub fn node_not_found(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    /// Create a missing transformer error
    pub fn missing_transformer(mime_type: impl Into<String>) -> Self {
        Self::MissingTransformer {
            mime_type: mime_type.into(),
        }
    }

    /// Create a transform failed error
    pub fn transform_failed(mime_type: impl Into<String>, source: anyhow::Error) -> Self {
        Self::TransformFailed {
            mime_type: mime_type.into(),
            source,
        }
    }

    /// Create a path conflict error
    pub fn path_conflict(path: impl Into<String>) -> Self {
        Self::PathConflict { path: path.into() }
    }

    /// Create a content type exists error
    pub fn content_type_exists(type_name: impl Into<String>) -> Self {
        Self::ContentTypeExists(type_name.into())
    }

    /// Create a content type not found error
    pub fn content_type_not_found(type_name: impl Into<String>) -> Self {
        Self::ContentTypeNotFound(type_name.into())
    }

    /// Create an invalid route error
    pub fn invalid_route(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoute {
            route: route.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
