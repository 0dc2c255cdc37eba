//! Inferred field types
//!
//! Output of type inference: a structural description of each field of a
//! content type, consumed by schema generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Structural type of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldType {
    String,
    Boolean,
    /// Integral and representable as a 32-bit signed integer
    Int,
    Float,
    /// ISO-8601 date strings
    Date,

    /// Pointer to nodes of the listed content types
    #[serde(rename_all = "camelCase")]
    Reference { type_names: Vec<String> },

    /// Nested object with its own synthesized type name
    Object(ObjectType),

    /// List whose element type was taken from the first element
    List { of: Box<FieldType> },
}

/// A named nested object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Pascal-cased name derived from the owning type and field path
    pub name: String,

    pub fields: BTreeMap<String, FieldType>,
}

impl FieldType {
    /// Wrap a type in a list
    pub fn list_of(of: FieldType) -> Self {
        FieldType::List { of: Box::new(of) }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List { .. })
    }

    /// Resolve a stored value for this type.
    ///
    /// List fields never fail on non-iterable data: anything that is not an
    /// array resolves to an empty list. Other types return the value as is.
    ///
    /// ```
    /// use contentgraph_core::models::FieldType;
    /// use serde_json::json;
    ///
    /// let tags = FieldType::list_of(FieldType::String);
    /// assert_eq!(tags.resolve(&json!("oops")), json!([]));
    /// assert_eq!(tags.resolve(&json!(["a"])), json!(["a"]));
    /// ```
    pub fn resolve(&self, value: &Value) -> Value {
        match self {
            FieldType::List { .. } if !value.is_array() => Value::Array(Vec::new()),
            _ => value.clone(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("String"),
            FieldType::Boolean => f.write_str("Boolean"),
            FieldType::Int => f.write_str("Int"),
            FieldType::Float => f.write_str("Float"),
            FieldType::Date => f.write_str("Date"),
            FieldType::Reference { type_names } => f.write_str(&type_names.join(" | ")),
            FieldType::Object(object) => f.write_str(&object.name),
            FieldType::List { of } => write!(f, "[{}]", of),
        }
    }
}
