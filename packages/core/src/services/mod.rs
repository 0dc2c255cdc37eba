//! Business Services
//!
//! This module contains the node lifecycle and schema services:
//!
//! - `ContentStore` - Owns content types, the node index and the event channel
//! - `ContentTypeCollection` - Create, update and remove nodes of one type
//! - `FieldNormalizer` - Key sanitation, reference detection, path resolution
//! - `RouteTemplate` / path generation - Output paths from route patterns
//! - `TransformerRegistry` - Raw content parsing by mime type
//! - Type inference - Structural field types from sampled nodes
//!
//! Services coordinate between the storage layer and callers, implementing
//! the lifecycle rules (unique paths, reference tracking, change events).

pub mod content_store;
pub mod content_type;
pub mod error;
pub mod field_normalizer;
pub mod path_generator;
pub mod transformers;
pub mod type_inference;

pub use content_store::{ContentStore, SharedState};
pub use content_type::{ContentTypeCollection, CreatedNode};
pub use error::NodeServiceError;
pub use field_normalizer::{sanitize_key, FieldNormalizer, NormalizedFields};
pub use path_generator::{generate_path, RouteParams, RouteTemplate, DEFAULT_ROUTE};
pub use transformers::{
    ContentTransformer, JsonTransformer, MarkdownTransformer, ParsedContent, TransformContext,
    TransformerRegistry,
};
pub use type_inference::{infer_types, infer_types_with};
