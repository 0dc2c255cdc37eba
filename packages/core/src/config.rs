//! Store Configuration
//!
//! `StoreConfig` and `ContentTypeOptions` are plain serde structures so a
//! build tool can load them from its own configuration file (camelCase keys,
//! every key optional except `typeName`).
//!
//! ```rust
//! use contentgraph_core::config::StoreConfig;
//! use serde_json::json;
//!
//! let config: StoreConfig = serde_json::from_value(json!({
//!     "resolveAbsolutePaths": true,
//!     "contentTypes": [{ "typeName": "Post", "route": "/blog/:slug" }]
//! }))
//! .unwrap();
//!
//! assert_eq!(config.event_channel_capacity, 1024);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Default capacity of the node event channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Upper bound accepted for the event channel capacity
const MAX_EVENT_CHANNEL_CAPACITY: usize = 1 << 20;

/// Configuration of a content store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Events a lagging subscriber may fall behind before losing some
    pub event_channel_capacity: usize,

    /// Resolve absolute file paths in fields against `assets_context`
    pub resolve_absolute_paths: bool,

    /// Directory absolute file paths are resolved against
    pub assets_context: Option<PathBuf>,

    /// Content types registered when the store is built
    pub content_types: Vec<ContentTypeOptions>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            resolve_absolute_paths: false,
            assets_context: None,
            content_types: Vec::new(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.event_channel_capacity == 0 {
            return Err("eventChannelCapacity must be greater than 0".to_string());
        }
        if self.event_channel_capacity > MAX_EVENT_CHANNEL_CAPACITY {
            return Err(format!(
                "eventChannelCapacity must be at most {}",
                MAX_EVENT_CHANNEL_CAPACITY
            ));
        }

        let mut seen = HashSet::new();
        for options in &self.content_types {
            options.validate()?;
            if !seen.insert(options.type_name.as_str()) {
                return Err(format!("content type '{}' is declared twice", options.type_name));
            }
        }

        Ok(())
    }
}

/// Options of one content type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeOptions {
    pub type_name: String,

    /// Route pattern such as `/blog/:year/:slug`; `/:typeName/:slug` when
    /// absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Fields whose values always reference a content type
    /// (`field → typeName`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub refs: BTreeMap<String, String>,

    /// Overrides the store-wide setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_absolute_paths: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContentTypeOptions {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_ref(mut self, field_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.refs.insert(field_name.into(), type_name.into());
        self
    }

    pub fn with_resolve_absolute_paths(mut self, resolve: bool) -> Self {
        self.resolve_absolute_paths = Some(resolve);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.type_name.trim().is_empty() {
            return Err("typeName must not be empty".to_string());
        }
        if let Some((field, _)) = self.refs.iter().find(|(_, target)| target.trim().is_empty()) {
            return Err(format!(
                "reference field '{}' of '{}' has no target type",
                field, self.type_name
            ));
        }
        Ok(())
    }
}
