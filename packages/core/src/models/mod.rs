//! Data Models
//!
//! This module contains the core data structures used throughout contentgraph:
//!
//! - `Node` - Universal node model for all content types
//! - `NodeOptions` - Caller input for creating and updating nodes
//! - `Reference` / `BelongsTo` - Typed cross-node references
//! - `FieldValue` - Classified view of a raw field value
//! - `FieldType` - Inferred structural field types

mod field_type;
mod field_value;
mod node;
mod reference;

pub use field_type::{FieldType, ObjectType};
pub use field_value::{value_to_string, FieldValue};
pub(crate) use node::display_value;
pub use node::{InternalOptions, Node, NodeInternal, NodeOptions};
pub use reference::{id_string, BelongsTo, Reference, ID_KEY, TYPE_NAME_KEY};
