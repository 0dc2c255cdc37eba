//! Node Data Structures
//!
//! This module defines the `Node` struct stored by every content type, plus
//! the `NodeOptions` callers use to create or update one.
//!
//! # Architecture
//!
//! - **Universal Node**: one struct represents every content type
//! - **Normalized Fields**: caller data lives in `fields` with sanitized keys
//! - **Derived Display Fields**: `title`, `date`, `slug`, `content` and
//!   `excerpt` are resolved from explicit options, then fields, then defaults
//! - **Internal Metadata**: provenance and raw content live in `internal` and
//!   never reach the generated schema
//!
//! # Examples
//!
//! ```rust
//! use contentgraph_core::models::NodeOptions;
//! use serde_json::json;
//!
//! let options = NodeOptions::new()
//!     .with_id("hello")
//!     .with_fields(json!({ "Title": "Hello World", "tags": ["intro"] }))
//!     .with_origin("/content/posts/hello.md");
//!
//! assert_eq!(options.id.as_deref(), Some("hello"));
//! assert_eq!(options.internal.origin.as_deref(), Some("/content/posts/hello.md"));
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field_value::value_to_string;

/// A content record of one content type.
///
/// # Fields
///
/// - `id`: unique within the content type (explicit or content fingerprint)
/// - `type_name`: owning content type
/// - `uid`: fingerprint of `type_name + id`, unique across the store
/// - `title`, `date`, `slug`, `content`, `excerpt`: derived display fields
/// - `path`: output path, unique across every content type of a store
/// - `fields`: normalized caller data
/// - `internal`: provenance and raw content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    pub type_name: String,

    pub uid: String,

    pub title: String,

    /// ISO-8601 date string
    pub date: String,

    pub slug: String,

    pub content: String,

    pub excerpt: String,

    /// Always starts with exactly one `/`
    pub path: String,

    /// Normalized, arbitrarily nested field data
    pub fields: Map<String, Value>,

    pub internal: NodeInternal,
}

impl Node {
    /// Look up a field by its normalized key
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a nested field by key path (`["author", "name"]`)
    pub fn field_at(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut value = self.fields.get(*first)?;
        for key in rest {
            value = value.as_object()?.get(*key)?;
        }
        Some(value)
    }

    /// Top-level node attribute by its public (camelCase) name.
    ///
    /// Used by route parameters that are not found in `fields`.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => &self.id,
            "typeName" => &self.type_name,
            "uid" => &self.uid,
            "title" => &self.title,
            "date" => &self.date,
            "slug" => &self.slug,
            "content" => &self.content,
            "excerpt" => &self.excerpt,
            "path" => &self.path,
            _ => return None,
        };
        Some(Value::String(value.clone()))
    }
}

/// Provenance and raw-content metadata of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInternal {
    /// File or source the node came from
    pub origin: Option<String>,

    /// Mime type of `content`, selects the transformer
    pub mime_type: Option<String>,

    /// Raw, untransformed content
    pub content: Option<String>,

    /// Ingestion time in epoch milliseconds
    pub timestamp: i64,
}

impl NodeInternal {
    /// Build internals from caller options, stamped with the current time
    pub fn from_options(options: &InternalOptions) -> Self {
        Self {
            origin: options.origin.clone(),
            mime_type: options.mime_type.clone(),
            content: options.content.clone(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Caller-supplied internal metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl InternalOptions {
    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.mime_type.is_none() && self.content.is_none()
    }
}

/// Options for creating or updating a node.
///
/// All display fields are optional: absent (or empty) values fall back to
/// the matching key in `fields`, then to a computed default.
///
/// The serialized form of these options is what a missing `id` is
/// fingerprinted from, so equal options always yield the same id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Explicit output path; generated from the route when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Raw field data, normalized on ingestion
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,

    #[serde(default, skip_serializing_if = "InternalOptions::is_empty")]
    pub internal: InternalOptions,
}

impl NodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replace all fields. Non-object values clear the fields.
    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Set a single raw field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.internal.origin = Some(origin.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.internal.mime_type = Some(mime_type.into());
        self
    }

    /// Raw content handed to the transformer registered for the mime type
    pub fn with_raw_content(mut self, content: impl Into<String>) -> Self {
        self.internal.content = Some(content.into());
        self
    }
}

/// Resolve a display field: explicit option, then a non-empty scalar field
/// value. Empty strings count as absent.
pub(crate) fn display_value(
    explicit: &Option<String>,
    fields: &Map<String, Value>,
    key: &str,
) -> Option<String> {
    if let Some(value) = explicit.as_deref().filter(|value| !value.is_empty()) {
        return Some(value.to_string());
    }

    match fields.get(key)? {
        value @ (Value::String(_) | Value::Number(_)) => {
            Some(value_to_string(value)).filter(|value| !value.is_empty())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_node() -> Node {
        Node {
            id: "a".to_string(),
            type_name: "Post".to_string(),
            uid: "uid-a".to_string(),
            title: "Hello".to_string(),
            date: "2024-01-01T00:00:00.000Z".to_string(),
            slug: "hello".to_string(),
            content: String::new(),
            excerpt: String::new(),
            path: "/post/hello".to_string(),
            fields: json!({ "author": { "name": "Jane" } })
                .as_object()
                .cloned()
                .unwrap(),
            internal: NodeInternal::default(),
        }
    }

    #[test]
    fn test_field_at_walks_nested_objects() {
        let node = sample_node();
        assert_eq!(node.field_at(&["author", "name"]), Some(&json!("Jane")));
        assert_eq!(node.field_at(&["author", "missing"]), None);
        assert_eq!(node.field_at(&[]), None);
    }

    #[test]
    fn test_attribute_lookup() {
        let node = sample_node();
        assert_eq!(node.attribute("typeName"), Some(json!("Post")));
        assert_eq!(node.attribute("slug"), Some(json!("hello")));
        assert_eq!(node.attribute("fields"), None);
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let value = serde_json::to_value(sample_node()).unwrap();
        assert_eq!(value["typeName"], "Post");
        assert!(value["internal"].get("mimeType").is_some());
    }

    #[test]
    fn test_options_builder() {
        let options = NodeOptions::new()
            .with_title("Hi")
            .with_field("count", json!(3))
            .with_mime_type("text/markdown")
            .with_raw_content("# Hi");

        assert_eq!(options.title.as_deref(), Some("Hi"));
        assert_eq!(options.fields.get("count"), Some(&json!(3)));
        assert_eq!(options.internal.mime_type.as_deref(), Some("text/markdown"));
        assert!(!options.internal.is_empty());
    }

    #[test]
    fn test_options_serialization_skips_absent_values() {
        let value = serde_json::to_value(NodeOptions::new().with_id("x")).unwrap();
        assert_eq!(value, json!({ "id": "x" }));
    }

    #[test]
    fn test_display_value_precedence() {
        let fields = json!({ "title": "From Field", "count": 3, "empty": "" })
            .as_object()
            .cloned()
            .unwrap();

        assert_eq!(
            display_value(&Some("Explicit".to_string()), &fields, "title").as_deref(),
            Some("Explicit")
        );
        assert_eq!(
            display_value(&Some(String::new()), &fields, "title").as_deref(),
            Some("From Field")
        );
        assert_eq!(display_value(&None, &fields, "count").as_deref(), Some("3"));
        assert_eq!(display_value(&None, &fields, "empty"), None);
        assert_eq!(display_value(&None, &fields, "missing"), None);
    }
}
