//! Node Change Events
//!
//! This module defines the events emitted when nodes of any content type are
//! created, updated or removed. Events follow the observer pattern so that
//! collaborators (a schema rebuild trigger, a dev server) can react to
//! changes without the store knowing about them.
//!
//! # Architecture
//!
//! Events are sent on a tokio broadcast channel owned by the content store.
//! Sending is synchronous, so events of one content type arrive in exactly the
//! order the lifecycle operations were invoked.
//!
//! # Event Flow
//!
//! 1. A content type collection completes an add, update or remove
//! 2. A `NodeEvent` carrying the new and/or old node is sent
//! 3. Every subscriber receives it (`recv().await` or `try_recv()`)

use crate::models::Node;

/// Node change notification
///
/// Carries the `(new, old)` node pair: creation has no old node, removal has
/// no new node, updates carry both (the old one is a full snapshot taken
/// before the update).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    /// A node was added to its content type
    Created { node: Node },

    /// A node was updated in place
    Updated { node: Node, old_node: Node },

    /// A node was removed
    Removed { node: Node },
}

impl NodeEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            NodeEvent::Created { .. } => "node:created",
            NodeEvent::Updated { .. } => "node:updated",
            NodeEvent::Removed { .. } => "node:removed",
        }
    }

    /// The node after the change, if it still exists
    pub fn new_node(&self) -> Option<&Node> {
        match self {
            NodeEvent::Created { node } | NodeEvent::Updated { node, .. } => Some(node),
            NodeEvent::Removed { .. } => None,
        }
    }

    /// The node before the change, if it existed
    pub fn old_node(&self) -> Option<&Node> {
        match self {
            NodeEvent::Created { .. } => None,
            NodeEvent::Updated { old_node, .. } => Some(old_node),
            NodeEvent::Removed { node } => Some(node),
        }
    }

    /// Content type of the changed node
    pub fn type_name(&self) -> &str {
        match self {
            NodeEvent::Created { node }
            | NodeEvent::Updated { node, .. }
            | NodeEvent::Removed { node } => &node.type_name,
        }
    }
}
