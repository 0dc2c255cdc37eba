//! Storage Layer
//!
//! In-memory storage primitives the lifecycle services build on:
//!
//! - `NodeCollection` - nodes of one content type, unique by id
//! - `NodeIndex` - store-wide index entries, unique by uid and by path
//! - `NodeEvent` - change notifications
//!
//! # Architecture
//!
//! Persistence is out of scope: every structure lives in memory for the
//! duration of a build. Constraint checks happen before mutation so a rejected
//! insert or update leaves the structures unchanged.

pub mod collection;
mod error;
pub mod events;
pub mod node_index;

pub use collection::NodeCollection;
pub use error::StoreError;
pub use events::NodeEvent;
pub use node_index::{IndexEntry, NodeIndex, NODE_ENTRY_TYPE};
