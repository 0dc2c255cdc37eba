//! Field Normalizer
//!
//! Walks raw node field data and produces the normalized field map stored on
//! the node, plus the belongs-to map of every reference found along the way.
//!
//! # Rules
//!
//! - Keys are sanitized to `[A-Za-z0-9_]`, camel-cased and prefixed with `_`
//!   when they would start with a digit
//! - Keys starting with `__` are internal: kept byte for byte, values untouched
//! - `{ typeName, id }` objects are references: recorded, then normalized like
//!   any other object so their shape is preserved
//! - Path-like strings are resolved against the node origin
//! - Declared reference fields are recorded whatever their value shape
//!
//! Normalization never fails; unexpected shapes pass through unchanged.

use crate::models::{id_string, BelongsTo, FieldValue};
use crate::utils::PathResolver;
use convert_case::{Case, Casing};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Prefix marking internal keys that are never normalized
pub const INTERNAL_KEY_PREFIX: &str = "__";

/// Result of normalizing a node's fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFields {
    pub fields: Map<String, Value>,
    pub belongs_to: BelongsTo,
}

/// Sanitize a field key.
///
/// ```
/// use contentgraph_core::services::field_normalizer::sanitize_key;
///
/// assert_eq!(sanitize_key("Title"), "title");
/// assert_eq!(sanitize_key("first name"), "firstName");
/// assert_eq!(sanitize_key("cover-image"), "coverImage");
/// assert_eq!(sanitize_key("__meta"), "__meta");
/// assert!(sanitize_key("1st place").starts_with("_1"));
/// assert_eq!(sanitize_key("---"), "_x2d2d2d");
/// ```
///
/// Keys with no letters or digits left after camel-casing become `_x`
/// followed by the hex bytes of the original key.
pub fn sanitize_key(key: &str) -> String {
    if key.starts_with(INTERNAL_KEY_PREFIX) {
        return key.to_string();
    }

    let replaced: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let sanitized = replaced.to_case(Case::Camel);
    if sanitized.is_empty() {
        return format!("_x{}", hex::encode(key));
    }

    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}

/// Normalizes the fields of one node.
pub struct FieldNormalizer<'a> {
    resolver: &'a dyn PathResolver,
    origin: Option<&'a str>,
    resolve_absolute_paths: bool,
    declared_refs: Option<&'a BTreeMap<String, String>>,
}

impl<'a> FieldNormalizer<'a> {
    pub fn new(resolver: &'a dyn PathResolver) -> Self {
        Self {
            resolver,
            origin: None,
            resolve_absolute_paths: false,
            declared_refs: None,
        }
    }

    /// File the node came from; path-like values resolve against it
    pub fn with_origin(mut self, origin: Option<&'a str>) -> Self {
        self.origin = origin;
        self
    }

    pub fn resolve_absolute_paths(mut self, resolve: bool) -> Self {
        self.resolve_absolute_paths = resolve;
        self
    }

    /// Legacy `field → typeName` declarations of always-a-reference fields
    pub fn with_declared_refs(mut self, refs: &'a BTreeMap<String, String>) -> Self {
        self.declared_refs = Some(refs);
        self
    }

    pub fn normalize(&self, fields: &Map<String, Value>) -> NormalizedFields {
        let mut belongs_to = BelongsTo::new();
        self.collect_declared_refs(fields, &mut belongs_to);
        let fields = self.normalize_object(fields, &mut belongs_to);
        NormalizedFields { fields, belongs_to }
    }

    fn collect_declared_refs(&self, fields: &Map<String, Value>, belongs_to: &mut BelongsTo) {
        let Some(refs) = self.declared_refs else {
            return;
        };

        for (field_name, type_name) in refs {
            match fields.get(field_name) {
                Some(Value::Array(ids)) => {
                    for id in ids.iter().filter_map(id_string) {
                        belongs_to.add(type_name.as_str(), id);
                    }
                }
                Some(value) => {
                    if let Some(id) = id_string(value) {
                        belongs_to.add(type_name.as_str(), id);
                    }
                }
                None => {}
            }
        }
    }

    fn normalize_object(
        &self,
        object: &Map<String, Value>,
        belongs_to: &mut BelongsTo,
    ) -> Map<String, Value> {
        let mut normalized = Map::new();
        for (key, value) in object {
            if key.starts_with(INTERNAL_KEY_PREFIX) {
                normalized.insert(key.clone(), value.clone());
                continue;
            }
            normalized.insert(sanitize_key(key), self.normalize_value(value, belongs_to));
        }
        normalized
    }

    fn normalize_value(&self, value: &Value, belongs_to: &mut BelongsTo) -> Value {
        match FieldValue::classify(value) {
            FieldValue::Reference(object, reference) => {
                belongs_to.add_reference(&reference);
                Value::Object(self.normalize_object(object, belongs_to))
            }
            FieldValue::Object(object) => Value::Object(self.normalize_object(object, belongs_to)),
            FieldValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.normalize_value(item, belongs_to))
                    .collect(),
            ),
            FieldValue::Scalar(Value::String(s)) if self.resolver.is_resolvable_path(s) => {
                Value::String(self.resolver.resolve_file_path(
                    self.origin,
                    s,
                    self.resolve_absolute_paths,
                ))
            }
            FieldValue::Scalar(scalar) => scalar.clone(),
        }
    }
}
