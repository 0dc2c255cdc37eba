//! Field value classification
//!
//! Every field value is classified into exactly one variant before it is
//! normalized, routed or inferred, so the rest of the crate matches on a
//! closed set of shapes instead of probing JSON objects ad hoc.

use super::reference::Reference;
use serde_json::{Map, Value};

/// Classified view of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Strings, numbers, booleans and `null`
    Scalar(&'a Value),

    /// Arrays, element types unconstrained
    List(&'a [Value]),

    /// An object with exactly `typeName` and `id`
    Reference(&'a Map<String, Value>, Reference),

    /// Any other object
    Object(&'a Map<String, Value>),
}

impl<'a> FieldValue<'a> {
    /// Classify a value.
    ///
    /// ```
    /// use contentgraph_core::models::FieldValue;
    /// use serde_json::json;
    ///
    /// let value = json!({ "typeName": "Author", "id": "1" });
    /// assert!(matches!(FieldValue::classify(&value), FieldValue::Reference(..)));
    ///
    /// let value = json!({ "name": "Jane" });
    /// assert!(matches!(FieldValue::classify(&value), FieldValue::Object(_)));
    /// ```
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::List(items),
            Value::Object(object) => match Reference::from_object(object) {
                Some(reference) => FieldValue::Reference(object, reference),
                None => FieldValue::Object(object),
            },
            scalar => FieldValue::Scalar(scalar),
        }
    }

    /// The reference, if this value is one
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            FieldValue::Reference(_, reference) => Some(reference),
            _ => None,
        }
    }
}

/// JavaScript-style string form used for route parameters and display
/// fields: strings verbatim, `null` empty, arrays comma-joined.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_scalars_and_lists() {
        assert!(matches!(FieldValue::classify(&json!("a")), FieldValue::Scalar(_)));
        assert!(matches!(FieldValue::classify(&json!(1)), FieldValue::Scalar(_)));
        assert!(matches!(FieldValue::classify(&json!(null)), FieldValue::Scalar(_)));
        assert!(matches!(FieldValue::classify(&json!([1, 2])), FieldValue::List(items) if items.len() == 2));
    }

    #[test]
    fn test_classify_reference_only_with_exact_keys() {
        let reference = json!({ "typeName": "Post", "id": "1" });
        let classified = FieldValue::classify(&reference);
        assert_eq!(classified.as_reference().unwrap().id(), Some("1"));

        let object = json!({ "typeName": "Post", "id": "1", "title": "x" });
        assert!(FieldValue::classify(&object).as_reference().is_none());
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("Hello")), "Hello");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!(["a", 1])), "a,1");
    }
}
