//! Content Store
//!
//! The `ContentStore` owns every content type of one build, the store-wide
//! node index and the mime type registry, and the broadcast channel node
//! events are sent on.
//!
//! # Examples
//!
//! ```rust
//! use contentgraph_core::config::ContentTypeOptions;
//! use contentgraph_core::models::NodeOptions;
//! use contentgraph_core::services::ContentStore;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = ContentStore::new();
//! let posts = store.add_content_type(
//!     ContentTypeOptions::new("Post").with_route("/blog/:year/:slug"),
//! )?;
//!
//! let node = posts
//!     .add_node(
//!         NodeOptions::new()
//!             .with_id("hello")
//!             .with_date("2024-03-05")
//!             .with_fields(json!({ "Title": "Hello World" })),
//!     )?
//!     .expect("path is free");
//!
//! assert_eq!(node.path, "/blog/2024/hello-world");
//! assert!(store.get_node_by_path("/blog/2024/hello-world").is_some());
//! # Ok(())
//! # }
//! ```

use crate::config::{ContentTypeOptions, StoreConfig};
use crate::db::{IndexEntry, NodeEvent, NodeIndex};
use crate::models::{FieldType, Node};
use crate::services::content_type::{ContentTypeCollection, StoreHandles};
use crate::services::error::NodeServiceError;
use crate::services::transformers::TransformerRegistry;
use crate::utils::{DefaultPathResolver, PathResolver};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

/// State shared by all content types of one store
#[derive(Debug, Default)]
pub struct SharedState {
    pub index: NodeIndex,

    /// mime type → content type that first stored a node of it
    pub mime_types: HashMap<String, String>,
}

/// Lock the shared state.
///
/// Every mutation of the state completes before its guard is released, so
/// a poisoned lock still holds consistent data.
pub(crate) fn lock_state(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// All content types of one build.
pub struct ContentStore {
    content_types: BTreeMap<String, ContentTypeCollection>,
    handles: StoreHandles,
}

impl ContentStore {
    /// Store with the default configuration, transformers and path resolver
    pub fn new() -> Self {
        let config = StoreConfig::default();
        Self::with_handles(
            &config,
            TransformerRegistry::with_defaults(),
            Arc::new(DefaultPathResolver::new(config.assets_context.clone())),
        )
    }

    /// Store from configuration, with the configured content types
    /// registered.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation, `InvalidRoute`
    /// if a content type route does not compile.
    pub fn from_config(config: StoreConfig) -> Result<Self, NodeServiceError> {
        let resolver = Arc::new(DefaultPathResolver::new(config.assets_context.clone()));
        Self::with_collaborators(config, TransformerRegistry::with_defaults(), resolver)
    }

    /// Store with custom transformers and path resolver
    pub fn with_collaborators(
        config: StoreConfig,
        transformers: TransformerRegistry,
        path_resolver: Arc<dyn PathResolver>,
    ) -> Result<Self, NodeServiceError> {
        config.validate().map_err(NodeServiceError::invalid_config)?;

        let mut store = Self::with_handles(&config, transformers, path_resolver);
        for options in config.content_types {
            store.add_content_type(options)?;
        }
        Ok(store)
    }

    fn with_handles(
        config: &StoreConfig,
        transformers: TransformerRegistry,
        path_resolver: Arc<dyn PathResolver>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);

        Self {
            content_types: BTreeMap::new(),
            handles: StoreHandles {
                state: Arc::new(Mutex::new(SharedState::default())),
                transformers: Arc::new(transformers),
                path_resolver,
                event_tx,
                resolve_absolute_paths: config.resolve_absolute_paths,
            },
        }
    }

    /// Register a content type.
    ///
    /// # Errors
    ///
    /// `ContentTypeExists` if the name is taken, `InvalidConfig` or
    /// `InvalidRoute` for bad options.
    pub fn add_content_type(
        &mut self,
        options: ContentTypeOptions,
    ) -> Result<&mut ContentTypeCollection, NodeServiceError> {
        if self.content_types.contains_key(&options.type_name) {
            return Err(NodeServiceError::content_type_exists(&options.type_name));
        }

        let collection = ContentTypeCollection::new(&options, self.handles.clone())?;
        tracing::info!(
            "Registered content type '{}' with route {:?}",
            options.type_name,
            collection.route().pattern()
        );

        Ok(self
            .content_types
            .entry(options.type_name)
            .or_insert(collection))
    }

    pub fn get_content_type(&self, type_name: &str) -> Option<&ContentTypeCollection> {
        self.content_types.get(type_name)
    }

    pub fn get_content_type_mut(&mut self, type_name: &str) -> Option<&mut ContentTypeCollection> {
        self.content_types.get_mut(type_name)
    }

    /// Content types ordered by name
    pub fn content_types(&self) -> impl Iterator<Item = &ContentTypeCollection> {
        self.content_types.values()
    }

    /// Copy of the index entry for a uid
    pub fn index_entry(&self, uid: &str) -> Option<IndexEntry> {
        lock_state(&self.handles.state).index.get(uid).cloned()
    }

    pub fn get_node_by_uid(&self, uid: &str) -> Option<&Node> {
        let entry = self.index_entry(uid)?;
        self.node(&entry.type_name, &entry.id)
    }

    pub fn get_node_by_path(&self, path: &str) -> Option<&Node> {
        let (type_name, id) = {
            let state = lock_state(&self.handles.state);
            let entry = state.index.find_by_path(path)?;
            (entry.type_name.clone(), entry.id.clone())
        };
        self.node(&type_name, &id)
    }

    /// Nodes whose fields reference `type_name` / `id`, ordered by path
    pub fn find_referencing(&self, type_name: &str, id: &str) -> Vec<&Node> {
        let owners: Vec<(String, String)> = lock_state(&self.handles.state)
            .index
            .referencing(type_name, id)
            .into_iter()
            .map(|entry| (entry.type_name.clone(), entry.id.clone()))
            .collect();

        owners
            .iter()
            .filter_map(|(type_name, id)| self.node(type_name, id))
            .collect()
    }

    /// Content type registered for a mime type
    pub fn mime_type_owner(&self, mime_type: &str) -> Option<String> {
        lock_state(&self.handles.state)
            .mime_types
            .get(mime_type)
            .cloned()
    }

    /// Number of nodes across all content types
    pub fn node_count(&self) -> usize {
        lock_state(&self.handles.state).index.len()
    }

    /// Subscribe to node events of every content type
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<NodeEvent> {
        self.handles.event_tx.subscribe()
    }

    /// Infer the field types of one content type
    pub fn infer_types(
        &self,
        type_name: &str,
    ) -> Result<BTreeMap<String, FieldType>, NodeServiceError> {
        self.content_types
            .get(type_name)
            .map(ContentTypeCollection::infer_types)
            .ok_or_else(|| NodeServiceError::content_type_not_found(type_name))
    }

    pub fn transformers(&self) -> &TransformerRegistry {
        &self.handles.transformers
    }

    fn node(&self, type_name: &str, id: &str) -> Option<&Node> {
        self.content_types.get(type_name)?.get_node(id)
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("content_types", &self.content_types.keys().collect::<Vec<_>>())
            .field("transformers", &self.handles.transformers)
            .finish_non_exhaustive()
    }
}
