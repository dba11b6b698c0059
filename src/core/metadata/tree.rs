use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::error::{LauncherError, LauncherResult};

/// A decoded metadata document.
///
/// `serde_json::Value` already is the tagged union the launcher needs
/// (`Null`, `Bool`, `Number`, `String`, `Array`, `Object`); this module only
/// adds lookups that fail on a wrong shape instead of silently defaulting.
pub type MetadataTree = Value;

/// Shape of a metadata node, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Bool,
            Value::Number(_) => NodeKind::Number,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "a boolean",
            NodeKind::Number => "a number",
            NodeKind::String => "a string",
            NodeKind::Array => "an array",
            NodeKind::Object => "an object",
        };
        f.write_str(name)
    }
}

/// Parse raw document text into a tree.
pub fn parse_document(raw: &str) -> LauncherResult<MetadataTree> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode a tree into a typed document. Wrong shapes are errors.
pub fn decode<T: DeserializeOwned>(tree: MetadataTree) -> LauncherResult<T> {
    Ok(serde_json::from_value(tree)?)
}

/// Decode a typed document straight from its text. Maps in `T` see the
/// keys in document order, which a `MetadataTree` does not keep.
pub fn decode_str<T: DeserializeOwned>(raw: &str) -> LauncherResult<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Dotted-path lookups (`"downloads.client.url"`) over a metadata tree.
///
/// Paths address fixed schema fields only; keys that may themselves contain
/// dots (asset names) must be read through the typed documents.
pub trait MetadataExt {
    fn kind(&self) -> NodeKind;

    /// Returns `None` when any segment is absent or the parent is not an object.
    fn lookup(&self, path: &str) -> Option<&Value>;

    fn require(&self, path: &str) -> LauncherResult<&Value> {
        self.lookup(path)
            .ok_or_else(|| LauncherError::MetadataMissing(path.to_string()))
    }

    fn require_str(&self, path: &str) -> LauncherResult<&str> {
        let node = self.require(path)?;
        node.as_str().ok_or_else(|| shape_error(path, NodeKind::String, node))
    }

    fn require_array(&self, path: &str) -> LauncherResult<&Vec<Value>> {
        let node = self.require(path)?;
        node.as_array()
            .ok_or_else(|| shape_error(path, NodeKind::Array, node))
    }

    fn require_object(&self, path: &str) -> LauncherResult<&Map<String, Value>> {
        let node = self.require(path)?;
        node.as_object()
            .ok_or_else(|| shape_error(path, NodeKind::Object, node))
    }

    /// Absent or `null` is `Ok(None)`; any other non-string is an error.
    fn optional_str(&self, path: &str) -> LauncherResult<Option<&str>> {
        match self.lookup(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(shape_error(path, NodeKind::String, other)),
        }
    }
}

impl MetadataExt for Value {
    fn kind(&self) -> NodeKind {
        NodeKind::of(self)
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self, |node, segment| node.as_object()?.get(segment))
    }
}

fn shape_error(path: &str, expected: NodeKind, found: &Value) -> LauncherError {
    LauncherError::MetadataShape {
        field: path.to_string(),
        expected,
        found: NodeKind::of(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_nested_objects() {
        let tree = json!({"downloads": {"client": {"url": "https://example.com/c.jar"}}});
        assert_eq!(
            tree.require_str("downloads.client.url").unwrap(),
            "https://example.com/c.jar"
        );
        assert!(tree.lookup("downloads.server.url").is_none());
    }

    #[test]
    fn wrong_shape_is_an_error_not_a_default() {
        let tree = json!({"mainClass": 42});
        let err = tree.require_str("mainClass").unwrap_err();
        match err {
            LauncherError::MetadataShape {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "mainClass");
                assert_eq!(expected, NodeKind::String);
                assert_eq!(found, NodeKind::Number);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_field_reports_path() {
        let tree = json!({});
        let err = tree.require_array("libraries").unwrap_err();
        assert!(err.to_string().contains("libraries"));
    }

    #[test]
    fn optional_str_accepts_null_and_rejects_arrays() {
        let tree = json!({"a": null, "b": ["x"], "c": "ok"});
        assert_eq!(tree.optional_str("a").unwrap(), None);
        assert_eq!(tree.optional_str("missing").unwrap(), None);
        assert_eq!(tree.optional_str("c").unwrap(), Some("ok"));
        assert!(tree.optional_str("b").is_err());
    }

    #[test]
    fn lookup_through_non_object_is_absent() {
        let tree = json!({"a": "scalar"});
        assert!(tree.lookup("a.b").is_none());
        assert_eq!(tree.kind(), NodeKind::Object);
    }
}
