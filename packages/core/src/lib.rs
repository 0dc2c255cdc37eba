//! contentgraph Core Node Store
//!
//! This crate provides the content graph at the heart of a static-site
//! build: node ingestion from arbitrary sources, field normalization,
//! cross-type reference tracking, routed output paths and schema inference.
//!
//! # Architecture
//!
//! - **Universal Node**: every content type stores the same `Node` struct with
//!   free-form `fields`
//! - **Normalized Fields**: keys are sanitized and `{ typeName, id }` objects
//!   are tracked as references on ingestion
//! - **Store-wide Index**: node paths are unique across all content types of a
//!   store
//! - **Inferred Schema**: field types are derived from the data, not declared
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeOptions, references, field types)
//! - [`services`] - Lifecycle, normalization, routing, transformers, inference
//! - [`db`] - In-memory node collections, node index and change events
//! - [`config`] - Store and content type configuration
//! - [`utils`] - Slugs, fingerprints, file paths and dates

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::{ContentTypeOptions, StoreConfig};
pub use db::NodeEvent;
pub use models::*;
pub use services::*;
