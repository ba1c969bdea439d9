//! The normalized resource model shared by both input paths

use super::features::{Feature, Features};
use super::field::FieldDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// API exposure settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    /// Route prefix for the resource collection
    pub uri_prefix: String,
    /// Serialization group for reads
    pub groups_read: String,
    /// Serialization group for writes
    pub groups_write: String,
    /// UUID primary key instead of auto-increment
    pub uuid: bool,
}

/// Generated test suite settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestsDefinition {
    /// Generate tests at all
    pub enabled: bool,
    /// Test framework tag (`auto`, `pest`, `phpunit`, ...)
    pub framework: String,
    /// Authentication mode used by generated tests
    pub auth: String,
}

impl Default for TestsDefinition {
    fn default() -> Self {
        Self {
            enabled: true,
            framework: "auto".to_string(),
            auth: "none".to_string(),
        }
    }
}

/// Physical storage mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDefinition {
    /// Table name
    pub table: String,
    /// Mass-assignable columns, ordered and unique
    pub fillable: Vec<String>,
    /// Columns hidden from serialization
    pub hidden: Vec<String>,
    /// Column -> cast kind
    pub casts: IndexMap<String, String>,
}

/// Per-resource security overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityDefinition {
    /// Explicit switch, `None` defers to configuration
    pub enabled: Option<bool>,
    /// Permission prefix override
    pub prefix: Option<String>,
    /// Module code used in permission names
    pub module_code: Option<String>,
}

/// Target application shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    /// Application stack (`api-platform`, `native`, ...)
    pub stack: Option<String>,
}

/// One generated resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// `StudlyCase` entity name
    pub entity: String,
    /// Storage table
    pub table: String,
    /// Persistence driver tag (`eloquent`, `doctrine`, `orm`)
    pub driver: String,
    /// Optional module the resource belongs to
    pub module: Option<String>,
    /// API settings
    pub api: ApiDefinition,
    /// Feature switches
    pub features: Features,
    /// Test generation settings
    pub tests: TestsDefinition,
    /// Ordered fields; order drives generated property order
    pub fields: Vec<FieldDefinition>,
    /// Storage mapping
    pub storage: StorageDefinition,
    /// Security overrides (structured input only)
    pub security: Option<SecurityDefinition>,
    /// Application shape (structured input only)
    pub app: Option<AppDefinition>,
    /// Unrecognized top-level keys, kept verbatim
    pub extra: IndexMap<String, serde_json::Value>,
    /// Source document (structured input only)
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl ResourceDefinition {
    /// Feature lookup by name
    #[must_use]
    pub fn feature(&self, name: &str) -> bool {
        self.features.enabled(name)
    }

    /// Typed feature lookup
    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    /// Field by storage name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Non-relation fields, in order
    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| !f.is_relation())
    }

    /// Whether any field carries file content
    #[must_use]
    pub fn has_files(&self) -> bool {
        self.fields.iter().any(FieldDefinition::carries_file)
    }

    /// Application stack tag, if given
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.app.as_ref().and_then(|a| a.stack.as_deref())
    }
}
