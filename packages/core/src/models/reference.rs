//! Typed references between nodes
//!
//! A reference is any nested field object with exactly the two keys
//! `typeName` and `id`. Detected references are accumulated per node into a
//! [`BelongsTo`] map, which is copied into the global index entry so reverse
//! lookups never have to re-scan node fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Key naming the referenced content type(s)
pub const TYPE_NAME_KEY: &str = "typeName";

/// Key holding the referenced id(s)
pub const ID_KEY: &str = "id";

/// A typed pointer from a node field to one or more other nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Referenced content types (one entry unless `typeName` was a list)
    pub type_names: Vec<String>,

    /// Referenced ids, stringified
    pub ids: Vec<String>,

    /// Whether `id` was a list
    pub many: bool,
}

impl Reference {
    /// Interpret an object as a reference.
    ///
    /// Any object with exactly the keys `typeName` and `id` is a reference,
    /// whatever their values. Type names and ids are extracted best-effort:
    /// non-string type names and non-scalar ids are skipped.
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        if object.len() != 2 {
            return None;
        }

        let type_names = match object.get(TYPE_NAME_KEY)? {
            Value::String(type_name) => vec![type_name.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        let (ids, many): (Vec<String>, bool) = match object.get(ID_KEY)? {
            Value::Array(items) => (items.iter().filter_map(id_string).collect(), true),
            other => (id_string(other).into_iter().collect(), false),
        };

        Some(Self {
            type_names,
            ids,
            many,
        })
    }

    /// The single referenced id, when `id` was not a list
    pub fn id(&self) -> Option<&str> {
        if self.many {
            None
        } else {
            self.ids.first().map(String::as_str)
        }
    }
}

/// String form of a scalar id; `None` for other shapes.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Wire shape of a belongs-to map: `{ "Post": { "42": true } }`
type RawBelongsTo = BTreeMap<String, BTreeMap<String, bool>>;

/// Per-node map of referenced `typeName → ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawBelongsTo", from = "RawBelongsTo")]
pub struct BelongsTo(BTreeMap<String, BTreeSet<String>>);

impl BelongsTo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the node references `type_name` / `id`
    pub fn add(&mut self, type_name: impl Into<String>, id: impl Into<String>) {
        self.0.entry(type_name.into()).or_default().insert(id.into());
    }

    /// Record every `(type, id)` pair of a reference
    pub fn add_reference(&mut self, reference: &Reference) {
        for type_name in &reference.type_names {
            for id in &reference.ids {
                self.add(type_name.as_str(), id.as_str());
            }
        }
    }

    /// Merge another map into this one
    pub fn merge(&mut self, other: BelongsTo) {
        for (type_name, ids) in other.0 {
            self.0.entry(type_name).or_default().extend(ids);
        }
    }

    pub fn contains(&self, type_name: &str, id: &str) -> bool {
        self.0.get(type_name).is_some_and(|ids| ids.contains(id))
    }

    /// Ids referenced for one type
    pub fn ids(&self, type_name: &str) -> Option<&BTreeSet<String>> {
        self.0.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(type_name, ids)| (type_name.as_str(), ids))
    }
}

impl From<BelongsTo> for RawBelongsTo {
    fn from(belongs_to: BelongsTo) -> Self {
        belongs_to
            .0
            .into_iter()
            .map(|(type_name, ids)| (type_name, ids.into_iter().map(|id| (id, true)).collect()))
            .collect()
    }
}

impl From<RawBelongsTo> for BelongsTo {
    fn from(raw: RawBelongsTo) -> Self {
        let mut belongs_to = BelongsTo::new();
        for (type_name, ids) in raw {
            for (id, present) in ids {
                if present {
                    belongs_to.add(type_name.as_str(), id);
                }
            }
        }
        belongs_to
    }
}
