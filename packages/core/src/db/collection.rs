//! Per-type node collection
//!
//! Holds the nodes of one content type with a unique index on `id`.
//! Iteration follows insertion order, which type inference relies on for its
//! last-write-wins rule.

use crate::db::error::StoreError;
use crate::models::Node;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
pub struct NodeCollection {
    name: String,

    /// insertion sequence → node
    nodes: BTreeMap<u64, Node>,

    /// id → insertion sequence
    ids: HashMap<String, u64>,

    next_seq: u64,
}

impl NodeCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: BTreeMap::new(),
            ids: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a node with an id not yet present
    pub fn insert(&mut self, node: Node) -> Result<(), StoreError> {
        if self.ids.contains_key(&node.id) {
            return Err(StoreError::duplicate_id(&self.name, &node.id));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.ids.insert(node.id.clone(), seq);
        self.nodes.insert(seq, node);
        Ok(())
    }

    /// Replace the node with the same id, keeping its position.
    ///
    /// Returns the previous node.
    pub fn replace(&mut self, node: Node) -> Result<Node, StoreError> {
        let Some(&seq) = self.ids.get(&node.id) else {
            return Err(StoreError::node_not_found(&self.name, &node.id));
        };

        let id = node.id.clone();
        self.nodes
            .insert(seq, node)
            .ok_or_else(|| StoreError::node_not_found(&self.name, id))
    }

    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let seq = self.ids.remove(id)?;
        self.nodes.remove(&seq)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.ids.get(id).and_then(|seq| self.nodes.get(seq))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
