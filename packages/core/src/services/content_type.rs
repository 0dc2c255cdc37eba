//! Content Type Collection - Node Lifecycle
//!
//! A `ContentTypeCollection` owns the nodes of one content type and runs
//! their lifecycle:
//!
//! - create (transform raw content, normalize fields, derive display fields
//!   and path)
//! - add / update / remove, keeping the store-wide node index in sync
//! - change events on the store's broadcast channel
//!
//! # Path Uniqueness
//!
//! Paths are unique across every content type of a store. The node index is
//! shared between all collections of one store and every lifecycle operation
//! checks and mutates it under a single lock, so a rejected operation leaves
//! both the index and the collection untouched.
//!
//! A duplicate path on `add_node` is not an error: the node is dropped with a
//! warning and `Ok(None)` is returned, so one bad record does not abort a
//! whole ingestion run.

use crate::config::ContentTypeOptions;
use crate::db::{IndexEntry, NodeCollection, NodeEvent, StoreError};
use crate::models::{display_value, BelongsTo, FieldType, Node, NodeInternal, NodeOptions};
use crate::services::content_store::{lock_state, SharedState};
use crate::services::error::NodeServiceError;
use crate::services::field_normalizer::FieldNormalizer;
use crate::services::path_generator::{generate_path, normalize_path, RouteTemplate, DEFAULT_ROUTE};
use crate::services::transformers::{ParsedContent, TransformContext, TransformerRegistry};
use crate::services::type_inference;
use crate::utils::{fingerprint, now_iso, slugify, PathResolver};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Store-wide collaborators shared by every content type of one store
#[derive(Clone)]
pub(crate) struct StoreHandles {
    pub state: Arc<Mutex<SharedState>>,
    pub transformers: Arc<TransformerRegistry>,
    pub path_resolver: Arc<dyn PathResolver>,
    pub event_tx: broadcast::Sender<NodeEvent>,
    pub resolve_absolute_paths: bool,
}

/// A node built by [`ContentTypeCollection::create_node`], not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedNode {
    pub node: Node,

    /// References found while normalizing the node's fields
    pub belongs_to: BelongsTo,
}

/// Display fields and field data a node is built from, after transformer
/// output and options were merged
struct NodeSource {
    internal: NodeInternal,
    title: Option<String>,
    slug: Option<String>,
    path: Option<String>,
    date: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    fields: Map<String, Value>,
}

/// Nodes of one content type.
pub struct ContentTypeCollection {
    type_name: String,
    description: Option<String>,
    refs: BTreeMap<String, String>,
    route: RouteTemplate,
    resolve_absolute_paths: bool,
    collection: NodeCollection,
    handles: StoreHandles,
}

impl ContentTypeCollection {
    pub(crate) fn new(
        options: &ContentTypeOptions,
        handles: StoreHandles,
    ) -> Result<Self, NodeServiceError> {
        options.validate().map_err(NodeServiceError::invalid_config)?;

        let route = RouteTemplate::from_pattern(options.route.as_deref().unwrap_or(DEFAULT_ROUTE))?;

        Ok(Self {
            type_name: options.type_name.clone(),
            description: options.description.clone(),
            refs: options.refs.clone(),
            route,
            resolve_absolute_paths: options
                .resolve_absolute_paths
                .unwrap_or(handles.resolve_absolute_paths),
            collection: NodeCollection::new(&options.type_name),
            handles,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn route(&self) -> &RouteTemplate {
        &self.route
    }

    /// Declared reference fields (`field → typeName`)
    pub fn refs(&self) -> &BTreeMap<String, String> {
        &self.refs
    }

    /// Replace the route with a compiled pattern.
    ///
    /// Existing node paths are not regenerated.
    pub fn set_route(&mut self, pattern: &str) -> Result<(), NodeServiceError> {
        self.route = RouteTemplate::from_pattern(pattern)?;
        Ok(())
    }

    /// Replace the route with a custom template
    pub fn set_route_template(&mut self, route: RouteTemplate) {
        self.route = route;
    }

    /// Declare a field whose values always reference `type_name`.
    ///
    /// Legacy API: prefer `{ typeName, id }` objects in field data.
    pub fn add_reference(&mut self, field_name: impl Into<String>, type_name: impl Into<String>) {
        self.refs.insert(field_name.into(), type_name.into());
    }

    /// Subscribe to node events of the whole store
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<NodeEvent> {
        self.handles.event_tx.subscribe()
    }

    /// Emit a node event. Having no subscribers is not an error.
    fn emit_event(&self, event: NodeEvent) {
        let _ = self.handles.event_tx.send(event);
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.collection.get(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.collection.iter()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Infer the field types of all nodes of this content type
    pub fn infer_types(&self) -> BTreeMap<String, FieldType> {
        type_inference::infer_types(self.collection.iter(), &self.type_name)
    }

    /// Create and store a node.
    ///
    /// Returns `Ok(None)` when the node collides with one already stored:
    /// another node of the store owns the generated path, or a node with the
    /// same id (and therefore the same uid) exists. The collision is logged
    /// and nothing is stored.
    ///
    /// # Errors
    ///
    /// - `MissingTransformer` if a mime type is set that no transformer handles
    /// - `TransformFailed` for unparseable raw content
    pub fn add_node(&mut self, options: NodeOptions) -> Result<Option<Node>, NodeServiceError> {
        let CreatedNode { node, belongs_to } = self.create_node(options)?;

        {
            let mut state = lock_state(&self.handles.state);

            match state.index.insert(IndexEntry::for_node(&node, belongs_to)) {
                Ok(()) => {}
                Err(StoreError::DuplicatePath { path, uid }) => {
                    tracing::warn!(
                        "Skipping {} node '{}': path '{}' already belongs to node {}",
                        self.type_name,
                        node.id,
                        path,
                        uid
                    );
                    return Ok(None);
                }
                Err(StoreError::DuplicateUid { uid }) => {
                    tracing::warn!(
                        "Skipping {} node '{}': node {} is already stored",
                        self.type_name,
                        node.id,
                        uid
                    );
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }

            match self.collection.insert(node.clone()) {
                Ok(()) => {}
                Err(StoreError::DuplicateId { .. }) => {
                    state.index.remove(&node.uid);
                    tracing::warn!(
                        "Skipping {} node '{}': id is already taken",
                        self.type_name,
                        node.id
                    );
                    return Ok(None);
                }
                Err(e) => {
                    state.index.remove(&node.uid);
                    return Err(e.into());
                }
            }

            if let Some(mime_type) = &node.internal.mime_type {
                state
                    .mime_types
                    .entry(mime_type.clone())
                    .or_insert_with(|| self.type_name.clone());
            }
        }

        tracing::debug!("Added {} node '{}' at {}", self.type_name, node.id, node.path);
        self.emit_event(NodeEvent::Created { node: node.clone() });

        Ok(Some(node))
    }

    /// Build a node from options without storing it.
    ///
    /// # Display Field Precedence
    ///
    /// explicit option → transformer output → normalized field → default
    /// (`id`, current time, slugified title, empty string).
    pub fn create_node(&self, options: NodeOptions) -> Result<CreatedNode, NodeServiceError> {
        let id = match options.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => fingerprint(serde_json::to_string(&options)?),
        };

        let internal = NodeInternal::from_options(&options.internal);
        let source = self.node_source(options, internal)?;
        let (fields, belongs_to) = self.normalize_fields(&source);

        let title = display_value(&source.title, &fields, "title").unwrap_or_else(|| id.clone());
        let date = display_value(&source.date, &fields, "date").unwrap_or_else(now_iso);
        let slug = display_value(&source.slug, &fields, "slug").unwrap_or_else(|| slugify(&title));
        let content = display_value(&source.content, &fields, "content").unwrap_or_default();
        let excerpt = display_value(&source.excerpt, &fields, "excerpt").unwrap_or_default();

        let mut node = Node {
            uid: fingerprint(format!("{}{}", self.type_name, id)),
            id,
            type_name: self.type_name.clone(),
            title,
            date,
            slug,
            content,
            excerpt,
            path: String::new(),
            fields,
            internal: source.internal,
        };
        node.path = self.node_path(&node, source.path.as_deref());

        Ok(CreatedNode { node, belongs_to })
    }

    /// Update a stored node.
    ///
    /// Fields are replaced by the normalized option fields. Display fields
    /// absent from options and fields keep their previous values, internals
    /// absent from options keep theirs. The path is regenerated unless given.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if no node has this id
    /// - `PathConflict` if another node owns the resulting path; nothing is
    ///   changed
    pub fn update_node(
        &mut self,
        id: &str,
        options: NodeOptions,
    ) -> Result<Node, NodeServiceError> {
        let old_node = self
            .collection
            .get(id)
            .cloned()
            .ok_or_else(|| NodeServiceError::node_not_found(&self.type_name, id))?;

        let previous = &old_node.internal;
        let mut internal = NodeInternal::from_options(&options.internal);
        internal.origin = internal.origin.or_else(|| previous.origin.clone());
        internal.mime_type = internal.mime_type.or_else(|| previous.mime_type.clone());
        internal.content = internal.content.or_else(|| previous.content.clone());

        let source = self.node_source(options, internal)?;
        let (fields, belongs_to) = self.normalize_fields(&source);

        let title = display_value(&source.title, &fields, "title")
            .unwrap_or_else(|| old_node.title.clone());
        let mut node = Node {
            id: old_node.id.clone(),
            type_name: self.type_name.clone(),
            uid: old_node.uid.clone(),
            date: display_value(&source.date, &fields, "date")
                .unwrap_or_else(|| old_node.date.clone()),
            slug: display_value(&source.slug, &fields, "slug")
                .unwrap_or_else(|| old_node.slug.clone()),
            content: display_value(&source.content, &fields, "content")
                .unwrap_or_else(|| old_node.content.clone()),
            excerpt: display_value(&source.excerpt, &fields, "excerpt")
                .unwrap_or_else(|| old_node.excerpt.clone()),
            title,
            path: String::new(),
            fields,
            internal: source.internal,
        };
        node.path = self.node_path(&node, source.path.as_deref());

        {
            let mut state = lock_state(&self.handles.state);

            match state.index.update(&node.uid, node.path.clone(), belongs_to) {
                Ok(()) => {}
                Err(StoreError::DuplicatePath { path, .. }) => {
                    return Err(NodeServiceError::path_conflict(path));
                }
                Err(e) => return Err(e.into()),
            }

            self.collection.replace(node.clone())?;
        }

        tracing::debug!("Updated {} node '{}' at {}", self.type_name, node.id, node.path);
        self.emit_event(NodeEvent::Updated {
            node: node.clone(),
            old_node,
        });

        Ok(node)
    }

    /// Remove a node and its index entry.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if no node has this id.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, NodeServiceError> {
        let node = {
            let mut state = lock_state(&self.handles.state);

            let node = self
                .collection
                .remove(id)
                .ok_or_else(|| NodeServiceError::node_not_found(&self.type_name, id))?;
            state.index.remove(&node.uid);
            node
        };

        tracing::debug!("Removed {} node '{}'", self.type_name, node.id);
        self.emit_event(NodeEvent::Removed { node: node.clone() });

        Ok(node)
    }

    /// Merge transformer output with options; options win key by key
    fn node_source(
        &self,
        options: NodeOptions,
        internal: NodeInternal,
    ) -> Result<NodeSource, NodeServiceError> {
        let parsed = self.apply_transformer(&internal)?.unwrap_or_default();

        let mut fields = parsed.fields;
        fields.extend(options.fields);

        let pick = |explicit: Option<String>, parsed: Option<String>| {
            explicit.filter(|value| !value.is_empty()).or(parsed)
        };

        Ok(NodeSource {
            internal,
            title: pick(options.title, parsed.title),
            slug: pick(options.slug, parsed.slug),
            path: pick(options.path, parsed.path),
            date: pick(options.date, parsed.date),
            content: pick(options.content, parsed.content),
            excerpt: pick(options.excerpt, parsed.excerpt),
            fields,
        })
    }

    /// Run the transformer registered for the node's mime type.
    ///
    /// A mime type must have a registered transformer; content is parsed only
    /// when raw content is present too.
    fn apply_transformer(
        &self,
        internal: &NodeInternal,
    ) -> Result<Option<ParsedContent>, NodeServiceError> {
        let Some(mime_type) = &internal.mime_type else {
            return Ok(None);
        };

        let transformer = self
            .handles
            .transformers
            .get(mime_type)
            .ok_or_else(|| NodeServiceError::missing_transformer(mime_type))?;

        let Some(content) = &internal.content else {
            return Ok(None);
        };

        tracing::debug!("Transforming {} content as {}", self.type_name, mime_type);

        let ctx = TransformContext {
            type_name: &self.type_name,
            origin: internal.origin.as_deref(),
        };
        transformer
            .parse(content, &ctx)
            .map(Some)
            .map_err(|e| NodeServiceError::transform_failed(mime_type, e))
    }

    fn normalize_fields(&self, source: &NodeSource) -> (Map<String, Value>, BelongsTo) {
        let normalized = FieldNormalizer::new(self.handles.path_resolver.as_ref())
            .with_origin(source.internal.origin.as_deref())
            .resolve_absolute_paths(self.resolve_absolute_paths)
            .with_declared_refs(&self.refs)
            .normalize(&source.fields);
        (normalized.fields, normalized.belongs_to)
    }

    /// Explicit path, normalized, or the route's path for the node
    fn node_path(&self, node: &Node, explicit: Option<&str>) -> String {
        match explicit.filter(|path| !path.is_empty()) {
            Some(path) => normalize_path(path),
            None => generate_path(node, &self.route),
        }
    }
}

impl std::fmt::Debug for ContentTypeCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTypeCollection")
            .field("type_name", &self.type_name)
            .field("route", &self.route)
            .field("refs", &self.refs)
            .field("len", &self.collection.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "content_type_test.rs"]
mod content_type_test;
