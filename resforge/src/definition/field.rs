//! Field definitions: scalar attributes and relation endpoints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag used for relation fields
pub const RELATION_TYPE: &str = "relation";

const FILE_TYPES: [&str; 9] = [
    "file", "files", "blob", "anyblob", "imageblob", "textblob", "binary", "document", "image",
];
const FILE_FORMATS: [&str; 3] = ["binary", "base64", "byte"];

/// The four relation shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Many rows of this entity point at one target
    ManyToOne,
    /// One-to-one, foreign key on the owning side
    OneToOne,
    /// One entity holds a collection of the target
    OneToMany,
    /// Join table between both entities
    ManyToMany,
}

impl RelationKind {
    /// Keyword as written in definitions
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManyToOne => "ManyToOne",
            Self::OneToOne => "OneToOne",
            Self::OneToMany => "OneToMany",
            Self::ManyToMany => "ManyToMany",
        }
    }

    /// Whether this side of the relation holds a collection
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ManyToOne" => Ok(Self::ManyToOne),
            "OneToOne" => Ok(Self::OneToOne),
            "OneToMany" => Ok(Self::OneToMany),
            "ManyToMany" => Ok(Self::ManyToMany),
            other => Err(format!("unknown relation kind: {other}")),
        }
    }
}

/// Relation attributes of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Relation shape seen from this field
    pub kind: RelationKind,
    /// `StudlyCase` name of the other entity
    pub target_entity: String,
    /// Field holds many targets
    pub is_collection: bool,
    /// Field on the owning side this inverse field is mapped by
    pub mapped_by: Option<String>,
    /// Field on the inverse side this owning field is inversed by
    pub inversed_by: Option<String>,
    /// Holds the foreign key / join table
    pub is_owning_side: bool,
}

impl Relation {
    /// Owning side pointing at `target`
    #[must_use]
    pub fn owning(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target_entity: target.into(),
            is_collection: false,
            mapped_by: None,
            inversed_by: None,
            is_owning_side: true,
        }
    }

    /// Inverse side pointing at `target`, mapped by `mapped_by`
    #[must_use]
    pub fn inverse(
        kind: RelationKind,
        target: impl Into<String>,
        mapped_by: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            target_entity: target.into(),
            is_collection: false,
            mapped_by: Some(mapped_by.into()),
            inversed_by: None,
            is_owning_side: false,
        }
    }

    /// Mark as collection-valued
    #[must_use]
    pub const fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    /// Set the inverse field name on the other side
    #[must_use]
    pub fn inversed_by(mut self, field: impl Into<String>) -> Self {
        self.inversed_by = Some(field.into());
        self
    }
}

/// One attribute of a resource
///
/// A field has either scalar semantics (`relation == None`) or relation
/// semantics (`type == "relation"` and `relation` set), never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Storage name (`snake_case`)
    pub name: String,
    /// Domain type tag (string, int, bigint, bool, decimal, datetime, date, uuid, relation, ...)
    #[serde(rename = "type")]
    pub field_type: String,
    /// Column accepts null
    pub nullable: bool,
    /// Excluded from serialized output
    pub hidden: bool,
    /// Mass-assignable
    pub fillable: bool,
    /// Storage cast override
    pub cast: Option<String>,
    /// Wire format hint (`binary`, `base64`, `email`, ...)
    pub format: Option<String>,
    /// Relation attributes, for relation fields only
    pub relation: Option<Relation>,
}

impl FieldDefinition {
    /// Scalar field with default flags (not nullable, visible, fillable)
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nullable: false,
            hidden: false,
            fillable: true,
            cast: None,
            format: None,
            relation: None,
        }
    }

    /// Relation field; collections are never fillable
    #[must_use]
    pub fn relation(
        name: impl Into<String>,
        relation: Relation,
        nullable: bool,
        fillable: bool,
    ) -> Self {
        let fillable = fillable && !relation.is_collection;
        Self {
            name: name.into(),
            field_type: RELATION_TYPE.to_string(),
            nullable,
            hidden: false,
            fillable,
            cast: None,
            format: None,
            relation: Some(relation),
        }
    }

    /// Set nullability
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the cast override
    #[must_use]
    pub fn with_cast(mut self, cast: Option<String>) -> Self {
        self.cast = cast;
        self
    }

    /// Whether this is a relation endpoint
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        self.relation.is_some()
    }

    /// Whether this is a collection-valued relation endpoint
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.relation.as_ref().is_some_and(|r| r.is_collection)
    }

    /// Owning, single-valued relation that needs a foreign key column
    #[must_use]
    pub fn has_foreign_key(&self) -> bool {
        self.relation.as_ref().is_some_and(|r| {
            r.is_owning_side
                && !r.is_collection
                && matches!(r.kind, RelationKind::ManyToOne | RelationKind::OneToOne)
        })
    }

    /// Lowercased, trimmed type tag
    #[must_use]
    pub fn normalized_type(&self) -> String {
        self.field_type.trim().to_lowercase()
    }

    /// Scalar holding file content, by type tag or wire format
    #[must_use]
    pub fn carries_file(&self) -> bool {
        if self.is_relation() {
            return false;
        }
        FILE_TYPES.contains(&self.normalized_type().as_str())
            || self
                .format
                .as_deref()
                .map(|fmt| fmt.trim().to_lowercase())
                .is_some_and(|fmt| FILE_FORMATS.contains(&fmt.as_str()))
    }
}
