//! Type Inference Engine
//!
//! Derives a structural schema for a content type by sampling the normalized
//! fields of its nodes. Every node is sampled; for each key the last non-empty
//! inference wins. Keys starting with `__` are internal and skipped.
//!
//! # Examples
//!
//! ```rust
//! use contentgraph_core::models::{FieldType, Node};
//! use contentgraph_core::services::type_inference::infer_types;
//! # use contentgraph_core::models::NodeInternal;
//! # use serde_json::json;
//! # let node = Node {
//! #     id: "1".into(), type_name: "Post".into(), uid: "u".into(), title: String::new(),
//! #     date: String::new(), slug: String::new(), content: String::new(),
//! #     excerpt: String::new(), path: "/".into(),
//! #     fields: json!({ "views": 10, "tags": [] }).as_object().cloned().unwrap(),
//! #     internal: NodeInternal::default(),
//! # };
//!
//! let types = infer_types([&node], "Post");
//! assert_eq!(types.get("views"), Some(&FieldType::Int));
//! assert_eq!(types.get("tags"), None);
//! ```

use crate::models::{FieldType, FieldValue, Node, ObjectType};
use crate::services::field_normalizer::INTERNAL_KEY_PREFIX;
use crate::utils::is_date;
use convert_case::{Case, Casing};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Infer field types with the default ISO-8601 date predicate
pub fn infer_types<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    type_name: &str,
) -> BTreeMap<String, FieldType> {
    infer_types_with(nodes, type_name, is_date)
}

/// Infer field types with a custom date predicate
pub fn infer_types_with<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    type_name: &str,
    is_date: impl Fn(&Value) -> bool,
) -> BTreeMap<String, FieldType> {
    let mut types = BTreeMap::new();
    for node in nodes {
        merge_object_types(&mut types, &node.fields, type_name, &is_date);
    }
    types
}

/// Infer the type of a single field value.
///
/// `owner` is the type name of the object holding the field; nested object
/// types are named after it.
pub fn infer_field_type(
    value: &Value,
    key: &str,
    owner: &str,
    is_date: &dyn Fn(&Value) -> bool,
) -> Option<FieldType> {
    if is_falsy(value) {
        return None;
    }

    match FieldValue::classify(value) {
        FieldValue::List(items) => {
            let first = items.first()?;
            infer_field_type(first, key, owner, is_date).map(FieldType::list_of)
        }
        _ if is_date(value) => Some(FieldType::Date),
        FieldValue::Reference(_, reference) => {
            let field_type = FieldType::Reference {
                type_names: reference.type_names,
            };
            Some(if reference.many {
                FieldType::list_of(field_type)
            } else {
                field_type
            })
        }
        FieldValue::Object(object) => {
            let name = nested_type_name(owner, key);
            if name.is_empty() {
                return None;
            }

            let mut fields = BTreeMap::new();
            merge_object_types(&mut fields, object, &name, is_date);
            (!fields.is_empty()).then_some(FieldType::Object(ObjectType { name, fields }))
        }
        FieldValue::Scalar(Value::String(_)) => Some(FieldType::String),
        FieldValue::Scalar(Value::Bool(_)) => Some(FieldType::Boolean),
        FieldValue::Scalar(Value::Number(number)) => Some(if is_int32(number) {
            FieldType::Int
        } else {
            FieldType::Float
        }),
        FieldValue::Scalar(_) => None,
    }
}

/// Type name of an object nested under `key` of `owner`.
///
/// ```
/// use contentgraph_core::services::type_inference::nested_type_name;
///
/// assert_eq!(nested_type_name("Post", "author"), "PostAuthor");
/// assert_eq!(nested_type_name("BlogPost", "cover_image"), "BlogPostCoverImage");
/// ```
pub fn nested_type_name(owner: &str, key: &str) -> String {
    format!("{owner} {key}").to_case(Case::Pascal)
}

fn merge_object_types(
    types: &mut BTreeMap<String, FieldType>,
    object: &Map<String, Value>,
    owner: &str,
    is_date: &dyn Fn(&Value) -> bool,
) {
    for (key, value) in object {
        if key.starts_with(INTERNAL_KEY_PREFIX) {
            continue;
        }
        if let Some(field_type) = infer_field_type(value, key, owner, is_date) {
            types.insert(key.clone(), field_type);
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn is_int32(number: &Number) -> bool {
    if let Some(int) = number.as_i64() {
        return i32::try_from(int).is_ok();
    }
    number.as_f64().is_some_and(|float| {
        float.fract() == 0.0 && float >= f64::from(i32::MIN) && float <= f64::from(i32::MAX)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeInternal;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(fields: Value) -> Node {
        Node {
            id: "1".to_string(),
            type_name: "Post".to_string(),
            uid: "uid".to_string(),
            title: String::new(),
            date: String::new(),
            slug: String::new(),
            content: String::new(),
            excerpt: String::new(),
            path: "/".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
            internal: NodeInternal::default(),
        }
    }

    fn infer_one(fields: Value) -> BTreeMap<String, FieldType> {
        let node = node(fields);
        infer_types([&node], "Post")
    }

    #[test]
    fn test_falsy_values_infer_nothing() {
        let types = infer_one(json!({
            "tags": [],
            "count": 0,
            "draft": false,
            "subtitle": "",
            "cover": null
        }));
        assert!(types.is_empty(), "{types:?}");
    }

    #[test]
    fn test_scalars() {
        let types = infer_one(json!({
            "title": "Hi",
            "featured": true,
            "views": 12,
            "big": 3_000_000_000_i64,
            "rating": 4.5,
            "whole": 2.0,
            "published": "2024-01-01"
        }));

        assert_eq!(types["title"], FieldType::String);
        assert_eq!(types["featured"], FieldType::Boolean);
        assert_eq!(types["views"], FieldType::Int);
        assert_eq!(types["big"], FieldType::Float);
        assert_eq!(types["rating"], FieldType::Float);
        assert_eq!(types["whole"], FieldType::Int);
        assert_eq!(types["published"], FieldType::Date);
    }

    #[test]
    fn test_lists_use_first_element() {
        let types = infer_one(json!({ "scores": [1, "two"], "dates": ["2024-01-01"] }));
        assert_eq!(types["scores"], FieldType::list_of(FieldType::Int));
        assert_eq!(types["dates"], FieldType::list_of(FieldType::Date));
    }

    #[test]
    fn test_references() {
        let types = infer_one(json!({
            "author": { "typeName": "Author", "id": "1" },
            "tags": { "typeName": "Tag", "id": ["a", "b"] },
            "related": [{ "typeName": ["Post", "Page"], "id": 3 }]
        }));

        let author = FieldType::Reference {
            type_names: vec!["Author".to_string()],
        };
        let tag = FieldType::Reference {
            type_names: vec!["Tag".to_string()],
        };
        let related = FieldType::Reference {
            type_names: vec!["Post".to_string(), "Page".to_string()],
        };

        assert_eq!(types["author"], author);
        assert_eq!(types["tags"], FieldType::list_of(tag));
        assert_eq!(types["related"], FieldType::list_of(related));
    }

    #[test]
    fn test_reference_keys_win_over_value_shapes() {
        let types = infer_one(json!({
            "rel": { "typeName": "Post", "id": true },
            "odd": { "typeName": 7, "id": "1" }
        }));

        assert_eq!(
            types["rel"],
            FieldType::Reference {
                type_names: vec!["Post".to_string()],
            }
        );
        assert_eq!(types["odd"], FieldType::Reference { type_names: vec![] });
    }

    #[test]
    fn test_nested_objects_are_named_after_owner() {
        let types = infer_one(json!({
            "author": { "name": "Jane", "social": { "handle": "@jane" }, "empty": "" }
        }));

        let FieldType::Object(author) = &types["author"] else {
            panic!("expected object, got {:?}", types["author"]);
        };
        assert_eq!(author.name, "PostAuthor");
        assert_eq!(author.fields["name"], FieldType::String);
        assert!(!author.fields.contains_key("empty"));

        let FieldType::Object(social) = &author.fields["social"] else {
            panic!("expected object");
        };
        assert_eq!(social.name, "PostAuthorSocial");
    }

    #[test]
    fn test_empty_objects_infer_nothing() {
        let types = infer_one(json!({ "meta": {}, "blank": { "a": null } }));
        assert!(types.is_empty());
    }

    #[test]
    fn test_internal_keys_are_skipped() {
        let types = infer_one(json!({ "__raw": "x", "title": "t" }));
        assert_eq!(types.keys().collect::<Vec<_>>(), ["title"]);
    }

    #[test]
    fn test_last_write_wins_and_empty_values_do_not_erase() {
        let first = node(json!({ "value": "text", "kept": 1 }));
        let second = node(json!({ "value": 2.5, "kept": null }));

        let types = infer_types([&first, &second], "Post");
        assert_eq!(types["value"], FieldType::Float);
        assert_eq!(types["kept"], FieldType::Int);
    }

    #[test]
    fn test_custom_date_predicate() {
        let node = node(json!({ "published": "2024-01-01", "stamp": "yesterday" }));
        let types = infer_types_with([&node], "Post", |value| value == "yesterday");

        assert_eq!(types["published"], FieldType::String);
        assert_eq!(types["stamp"], FieldType::Date);
    }

    #[test]
    fn test_inference_is_deterministic() {
        let nodes: Vec<Node> = (0..5)
            .map(|i| node(json!({ "n": i, "s": format!("s{i}"), "o": { "x": i } })))
            .collect();

        let first = infer_types(&nodes, "Post");
        let second = infer_types(&nodes, "Post");
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
