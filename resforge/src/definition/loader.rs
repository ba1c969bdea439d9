//! Structured definition loader
//!
//! Hydrates a [`ResourceDefinition`] from a JSON or YAML document. Relation
//! shape is taken as given on each field; nothing is inferred.
//!
//! # Example
//!
//! ```json
//! {
//!   "entity": "Tag",
//!   "table": "tags",
//!   "features": { "tenant": false },
//!   "fields": [{ "name": "label", "type": "string" }]
//! }
//! ```

use super::features::{Feature, Features};
use super::field::{FieldDefinition, Relation, RelationKind, RELATION_TYPE};
use super::resource::{
    ApiDefinition, AppDefinition, ResourceDefinition, SecurityDefinition, StorageDefinition,
    TestsDefinition,
};
use super::{flag, text};
use crate::error::{ResforgeError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const KNOWN_ROOT_KEYS: [&str; 11] = [
    "entity", "table", "driver", "module", "api", "features", "tests", "fields", "storage",
    "security", "app",
];

const SYSTEM_COLUMNS: [&str; 5] = ["id", "created_at", "updated_at", "deleted_at", "tenant_id"];

/// Input formats accepted by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// `.json`
    Json,
    /// `.yml` / `.yaml`
    Yaml,
}

impl DefinitionFormat {
    /// Detect from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            other => Err(ResforgeError::UnsupportedExtension(other.to_string())),
        }
    }
}

/// Loads structured resource definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Create a loader
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Load and hydrate a definition file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The extension is not `json`, `yml` or `yaml`
    /// - The content does not parse or its root is not a mapping
    /// - `entity` or `table` is missing
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ResourceDefinition> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ResforgeError::DefinitionNotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = DefinitionFormat::from_extension(ext)?;
        let content = fs::read_to_string(path)?;

        tracing::debug!(path = %path.display(), ?format, "loading definition");
        self.load_str(&content, format)
    }

    /// Parse and hydrate definition text in the given format
    pub fn load_str(&self, content: &str, format: DefinitionFormat) -> Result<ResourceDefinition> {
        let raw: Value = match format {
            DefinitionFormat::Json => serde_json::from_str(content)?,
            DefinitionFormat::Yaml => serde_yaml::from_str(content)?,
        };
        self.hydrate(&raw)
    }

    /// Build a definition from an already-parsed document
    ///
    /// # Errors
    ///
    /// Returns [`ResforgeError::MalformedRoot`] for non-mapping input and
    /// [`ResforgeError::MissingRequiredKey`] when `entity` or `table` is empty.
    #[allow(clippy::unused_self)]
    pub fn hydrate(&self, raw: &Value) -> Result<ResourceDefinition> {
        let Some(root) = raw.as_object() else {
            return Err(ResforgeError::MalformedRoot(
                "expected object at root".to_string(),
            ));
        };

        let entity = string_or(root, "entity", "");
        let table = string_or(root, "table", "");
        if entity.is_empty() {
            return Err(ResforgeError::MissingRequiredKey("entity"));
        }
        if table.is_empty() {
            return Err(ResforgeError::MissingRequiredKey("table"));
        }

        let api = hydrate_api(object(root, "api"), &entity);
        let features = root
            .get("features")
            .map_or_else(Features::default, Features::from_value);
        let tests = hydrate_tests(object(root, "tests"));
        let fields = hydrate_fields(root.get("fields"));
        let storage = hydrate_storage(object(root, "storage"), &table, &fields, &features);

        let extra: IndexMap<String, Value> = root
            .iter()
            .filter(|(key, _)| !KNOWN_ROOT_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(ResourceDefinition {
            driver: string_or(root, "driver", "eloquent"),
            module: root.get("module").and_then(text),
            security: root.get("security").and_then(Value::as_object).map(hydrate_security),
            app: root.get("app").and_then(Value::as_object).map(|app| AppDefinition {
                stack: app.get("stack").and_then(text),
            }),
            entity,
            table,
            api,
            features,
            tests,
            fields,
            storage,
            extra,
            raw: raw.clone(),
        })
    }
}

fn object<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

fn string_or(map: &Map<String, Value>, key: &str, default: &str) -> String {
    map.get(key)
        .and_then(text)
        .unwrap_or_else(|| default.to_string())
}

fn flag_or(map: &Map<String, Value>, key: &str, default: bool) -> bool {
    map.get(key).map_or(default, |v| flag(v, default))
}

fn hydrate_api(raw: Option<&Map<String, Value>>, entity: &str) -> ApiDefinition {
    let empty = Map::new();
    let raw = raw.unwrap_or(&empty);
    let lower = entity.to_lowercase();

    ApiDefinition {
        uri_prefix: string_or(raw, "uriPrefix", &format!("/{lower}s")),
        groups_read: string_or(raw, "groupsRead", &format!("{lower}:read")),
        groups_write: string_or(raw, "groupsWrite", &format!("{lower}:write")),
        uuid: flag_or(raw, "uuid", true),
    }
}

fn hydrate_tests(raw: Option<&Map<String, Value>>) -> TestsDefinition {
    let defaults = TestsDefinition::default();
    let Some(raw) = raw else {
        return defaults;
    };

    TestsDefinition {
        enabled: flag_or(raw, "enabled", defaults.enabled),
        framework: string_or(raw, "framework", &defaults.framework),
        auth: string_or(raw, "auth", &defaults.auth),
    }
}

fn hydrate_security(raw: &Map<String, Value>) -> SecurityDefinition {
    SecurityDefinition {
        enabled: raw.get("enabled").map(|v| flag(v, false)),
        prefix: raw.get("prefix").and_then(text),
        module_code: raw.get("moduleCode").and_then(text),
    }
}

fn hydrate_fields(raw: Option<&Value>) -> Vec<FieldDefinition> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(hydrate_field)
        .collect()
}

fn hydrate_field(raw: &Map<String, Value>) -> Option<FieldDefinition> {
    let name = raw.get("name").and_then(text).filter(|n| !n.is_empty());
    let Some(name) = name else {
        tracing::debug!("dropping field without a name");
        return None;
    };

    let mut field = FieldDefinition::new(name, string_or(raw, "type", "string"));
    field.nullable = flag_or(raw, "nullable", false);
    field.hidden = flag_or(raw, "hidden", false);
    field.fillable = flag_or(raw, "fillable", true);
    field.cast = raw.get("cast").and_then(text);
    field.format = raw.get("format").and_then(text);

    let kind = raw
        .get("relationKind")
        .and_then(Value::as_str)
        .and_then(|k| k.parse::<RelationKind>().ok());
    if let Some(kind) = kind {
        let relation = Relation {
            kind,
            target_entity: string_or(raw, "targetEntity", ""),
            is_collection: flag_or(raw, "isCollection", false),
            mapped_by: raw.get("mappedBy").and_then(text),
            inversed_by: raw.get("inversedBy").and_then(text),
            is_owning_side: flag_or(raw, "isOwningSide", false),
        };
        field.field_type = RELATION_TYPE.to_string();
        field.fillable = field.fillable && !relation.is_collection;
        field.relation = Some(relation);
    }

    Some(field)
}

fn hydrate_storage(
    raw: Option<&Map<String, Value>>,
    table: &str,
    fields: &[FieldDefinition],
    features: &Features,
) -> StorageDefinition {
    let empty = Map::new();
    let raw = raw.unwrap_or(&empty);

    StorageDefinition {
        table: string_or(raw, "table", table),
        fillable: resolve_fillable(raw.get("fillable"), fields, features),
        hidden: resolve_hidden(raw.get("hidden"), features),
        casts: resolve_casts(raw.get("casts"), fields),
    }
}

fn unique_strings(items: &[Value]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for name in items.iter().filter_map(text) {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

fn push_unique(items: &mut Vec<String>, name: &str) {
    if !items.iter().any(|existing| existing == name) {
        items.push(name.to_string());
    }
}

fn resolve_fillable(
    explicit: Option<&Value>,
    fields: &[FieldDefinition],
    features: &Features,
) -> Vec<String> {
    if let Some(list) = explicit.and_then(Value::as_array).filter(|l| !l.is_empty()) {
        return unique_strings(list);
    }

    let mut items = Vec::new();
    if features.is_enabled(Feature::Tenant) {
        items.push("tenant_id".to_string());
    }

    for field in fields.iter().filter(|f| f.fillable) {
        if SYSTEM_COLUMNS.contains(&field.name.as_str()) {
            continue;
        }
        push_unique(&mut items, &field.name);
    }

    if features.is_enabled(Feature::Audit) {
        push_unique(&mut items, "created_by");
        push_unique(&mut items, "updated_by");
    }

    items
}

fn resolve_hidden(explicit: Option<&Value>, features: &Features) -> Vec<String> {
    if let Some(list) = explicit.and_then(Value::as_array) {
        return unique_strings(list);
    }

    if features.is_enabled(Feature::Tenant) {
        vec!["tenant_id".to_string()]
    } else {
        Vec::new()
    }
}

fn resolve_casts(explicit: Option<&Value>, fields: &[FieldDefinition]) -> IndexMap<String, String> {
    if let Some(map) = explicit.and_then(Value::as_object).filter(|m| !m.is_empty()) {
        return map
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.clone(), text(value).unwrap_or_default()))
            .collect();
    }

    fields
        .iter()
        .filter_map(|f| {
            f.cast
                .as_ref()
                .filter(|c| !c.is_empty())
                .map(|c| (f.name.clone(), c.clone()))
        })
        .collect()
}
