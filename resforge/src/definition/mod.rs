//! Resource definition model and the structured (JSON/YAML) loader

pub mod features;
pub mod field;
pub mod loader;
pub mod resource;

pub use features::{Feature, Features};
pub use field::{FieldDefinition, Relation, RelationKind, RELATION_TYPE};
pub use loader::DefinitionLoader;
pub use resource::{
    ApiDefinition, AppDefinition, ResourceDefinition, SecurityDefinition, StorageDefinition,
    TestsDefinition,
};

use serde_json::Value;

/// Loose boolean coercion for definition values; `null` yields `default`
pub(crate) fn flag(value: &Value, default: bool) -> bool {
    match value {
        Value::Null => default,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Scalar-to-string coercion; non-scalars yield `None`
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
