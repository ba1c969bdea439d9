//! Parse tree for the JDL-style definition language
//!
//! These types are transient: they exist between [`super::JdlParser`] and
//! [`super::JdlToResourceMapper`] and are discarded afterwards.

use crate::definition::RelationKind;
use indexmap::IndexMap;
use serde::Serialize;

/// Values from the `config { ... }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct JdlConfig {
    /// Target framework (`symfony`, `laravel`)
    pub framework: String,
    /// Persistence driver
    pub driver: String,
    /// Route prefix prepended to every resource
    pub uri_prefix: String,
    /// UUID primary keys
    pub uuid: bool,
    /// Parsed but not applied to resource features
    pub tenant: bool,
    /// Parsed but not applied to resource features
    pub soft_deletes: bool,
    /// Parsed but not applied to resource features
    pub audit: bool,
    /// Parsed but not applied to resource features
    pub factory: bool,
}

impl Default for JdlConfig {
    fn default() -> Self {
        Self {
            framework: "symfony".to_string(),
            driver: "doctrine".to_string(),
            uri_prefix: "/v1".to_string(),
            uuid: true,
            tenant: false,
            soft_deletes: false,
            audit: false,
            factory: false,
        }
    }
}

/// `<name> <type> [required]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdlField {
    /// Declared field name
    pub name: String,
    /// Declared type, as written
    pub field_type: String,
    /// Trailing `required` keyword present
    pub required: bool,
}

/// `entity <Name> { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdlEntity {
    /// Declared name, not case-normalized
    pub name: String,
    /// Well-formed field lines, in order
    pub fields: Vec<JdlField>,
}

/// `enum <Name> { A, B }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdlEnum {
    /// Declared name
    pub name: String,
    /// Non-empty trimmed values
    pub values: Vec<String>,
}

/// One `From[{hint}] to To[{hint}]` line of a relationship block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdlRelation {
    /// Block kind
    pub kind: RelationKind,
    /// Left entity, as written
    pub from_entity: String,
    /// Field hint on the left entity
    pub from_field: Option<String>,
    /// Right entity, as written
    pub to_entity: String,
    /// Field hint on the right entity
    pub to_field: Option<String>,
}

/// A parsed JDL document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JdlDocument {
    /// Config block, or defaults
    pub config: JdlConfig,
    /// Entities by declared name, in first-seen order
    pub entities: IndexMap<String, JdlEntity>,
    /// Enums by declared name, in first-seen order
    pub enums: IndexMap<String, JdlEnum>,
    /// Relation lines in document order
    pub relations: Vec<JdlRelation>,
}
