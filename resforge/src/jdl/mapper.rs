//! Maps a parsed [`JdlDocument`] to resource definitions
//!
//! Scalar fields are mapped first; the relation pass then synthesizes the
//! owning and inverse relation fields on both entities of each relation.

use super::document::{JdlDocument, JdlRelation};
use crate::definition::{
    ApiDefinition, FieldDefinition, Features, Relation, RelationKind, ResourceDefinition,
    StorageDefinition, TestsDefinition,
};
use crate::naming::Naming;
use indexmap::IndexMap;

/// Converts a [`JdlDocument`] into ordered [`ResourceDefinition`]s
pub struct JdlToResourceMapper;

impl JdlToResourceMapper {
    /// Map every entity, then apply relations
    ///
    /// Output order is first-seen entity declaration order. Entity names are
    /// normalized to `StudlyCase`, so `book` and `Book` resolve to the same
    /// resource.
    #[must_use]
    pub fn map(doc: &JdlDocument) -> Vec<ResourceDefinition> {
        let mut resources: IndexMap<String, ResourceDefinition> = IndexMap::new();

        for (name, entity) in &doc.entities {
            let studly = Naming::studly(name);
            let snake = Naming::snake(&studly);
            let table = Naming::plural(&snake);

            let fields: Vec<FieldDefinition> = entity
                .fields
                .iter()
                .map(|f| {
                    FieldDefinition::new(Naming::snake(&f.name), map_type(&f.field_type))
                        .nullable(!f.required)
                        .with_cast(Some(map_cast(&f.field_type)))
                })
                .collect();

            let storage = StorageDefinition {
                table: table.clone(),
                fillable: fields.iter().map(|f| f.name.clone()).collect(),
                hidden: Vec::new(),
                casts: fields
                    .iter()
                    .filter_map(|f| {
                        f.cast
                            .as_ref()
                            .filter(|c| !c.is_empty())
                            .map(|c| (f.name.clone(), c.clone()))
                    })
                    .collect(),
            };

            let api = ApiDefinition {
                uri_prefix: format!(
                    "{}/{}",
                    doc.config.uri_prefix.trim_end_matches('/'),
                    Naming::plural(&snake)
                ),
                groups_read: format!("{}:read", snake.to_lowercase()),
                groups_write: format!("{}:write", snake.to_lowercase()),
                uuid: doc.config.uuid,
            };

            let resource = ResourceDefinition {
                entity: studly.clone(),
                table,
                driver: doc.config.driver.clone(),
                module: None,
                api,
                features: Features::default(),
                tests: TestsDefinition::default(),
                fields,
                storage,
                security: None,
                app: None,
                extra: IndexMap::new(),
                raw: serde_json::Value::Null,
            };

            resources.insert(studly, resource);
        }

        for relation in &doc.relations {
            apply_relation(&mut resources, relation);
        }

        resources.into_values().collect()
    }
}

/// JDL type to storage type; unknown types pass through unchanged
#[must_use]
pub fn map_type(jdl_type: &str) -> String {
    match jdl_type.to_lowercase().as_str() {
        "string" | "text" => "string",
        "integer" | "int" => "int",
        "long" => "bigint",
        "boolean" | "bool" => "bool",
        "float" | "double" | "bigdecimal" | "decimal" => "decimal",
        "instant" | "zoneddatetime" | "datetime" => "datetime",
        "localdate" | "date" => "date",
        "uuid" => "uuid",
        _ => jdl_type,
    }
    .to_string()
}

/// JDL type to storage cast; unknown types pass through unchanged
#[must_use]
pub fn map_cast(jdl_type: &str) -> String {
    match jdl_type.to_lowercase().as_str() {
        "integer" | "int" | "long" => "int",
        "boolean" | "bool" => "bool",
        "float" | "double" | "bigdecimal" | "decimal" => "float",
        "instant" | "zoneddatetime" | "datetime" => "datetime",
        "localdate" | "date" => "date",
        _ => jdl_type,
    }
    .to_string()
}

/// Plural `snake_case` collection name for an entity
fn collection_name(entity: &str) -> String {
    Naming::plural(&Naming::snake(&Naming::studly(entity)))
}

/// Trimmed hint in camelCase, or the fallback when blank
fn sanitize(hint: Option<&str>, fallback: &str) -> String {
    match hint.map(str::trim) {
        Some(h) if !h.is_empty() => Naming::camel(h),
        _ => fallback.to_string(),
    }
}

#[allow(clippy::too_many_lines)]
fn apply_relation(resources: &mut IndexMap<String, ResourceDefinition>, relation: &JdlRelation) {
    let from = Naming::studly(&relation.from_entity);
    let to = Naming::studly(&relation.to_entity);

    if !resources.contains_key(&from) || !resources.contains_key(&to) {
        tracing::debug!(%from, %to, kind = %relation.kind, "skipping relation to unknown entity");
        return;
    }

    let from_field = relation
        .from_field
        .clone()
        .unwrap_or_else(|| Naming::camel(&to));
    let to_field = relation.to_field.as_deref();

    match relation.kind {
        RelationKind::ManyToOne => {
            push(
                resources,
                &from,
                FieldDefinition::relation(
                    Naming::snake(&from_field),
                    Relation::owning(RelationKind::ManyToOne, &to),
                    true,
                    true,
                ),
            );
        }
        RelationKind::OneToOne => {
            let mut owning = Relation::owning(RelationKind::OneToOne, &to);
            owning.inversed_by = to_field.map(Naming::camel);
            push(
                resources,
                &from,
                FieldDefinition::relation(Naming::snake(&from_field), owning, true, true),
            );

            if let Some(to_field) = to_field {
                push(
                    resources,
                    &to,
                    FieldDefinition::relation(
                        Naming::snake(to_field),
                        Relation::inverse(
                            RelationKind::OneToOne,
                            &from,
                            Naming::camel(&from_field),
                        ),
                        true,
                        false,
                    ),
                );
            }
        }
        RelationKind::OneToMany => {
            // Without an inverse hint the foreign key owner cannot be named.
            let Some(to_field) = to_field else {
                tracing::debug!(
                    %from,
                    %to,
                    "OneToMany without inverse field hint produces no fields"
                );
                return;
            };

            push(
                resources,
                &to,
                FieldDefinition::relation(
                    Naming::snake(to_field),
                    Relation::owning(RelationKind::ManyToOne, &from),
                    true,
                    true,
                ),
            );
            push(
                resources,
                &from,
                FieldDefinition::relation(
                    collection_name(&to),
                    Relation::inverse(RelationKind::OneToMany, &to, Naming::camel(to_field))
                        .collection(),
                    false,
                    false,
                ),
            );
        }
        RelationKind::ManyToMany => {
            let left = sanitize(relation.from_field.as_deref(), &collection_name(&to));
            let right = sanitize(to_field, &collection_name(&from));

            push(
                resources,
                &from,
                FieldDefinition::relation(
                    Naming::snake(&left),
                    Relation::owning(RelationKind::ManyToMany, &to)
                        .collection()
                        .inversed_by(Naming::camel(&right)),
                    false,
                    false,
                ),
            );
            push(
                resources,
                &to,
                FieldDefinition::relation(
                    Naming::snake(&right),
                    Relation::inverse(RelationKind::ManyToMany, &from, Naming::camel(&left))
                        .collection(),
                    false,
                    false,
                ),
            );
        }
    }
}

fn push(
    resources: &mut IndexMap<String, ResourceDefinition>,
    entity: &str,
    field: FieldDefinition,
) {
    if let Some(resource) = resources.get_mut(entity) {
        resource.fields.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jdl::JdlParser;

    fn map(src: &str) -> Vec<ResourceDefinition> {
        JdlToResourceMapper::map(&JdlParser::parse(src))
    }

    fn relation(field: &FieldDefinition) -> &Relation {
        field.relation.as_ref().unwrap()
    }

    #[test]
    fn test_scalar_mapping() {
        let resources = map(
            "entity BookTag {\n labelText String required\n weight BigDecimal\n seen Instant\n}",
        );
        let tag = &resources[0];

        assert_eq!(tag.entity, "BookTag");
        assert_eq!(tag.table, "book_tags");
        assert_eq!(tag.api.uri_prefix, "/v1/book_tags");
        assert_eq!(tag.api.groups_read, "book_tag:read");
        assert_eq!(tag.driver, "doctrine");

        assert_eq!(tag.fields[0].name, "label_text");
        assert_eq!(tag.fields[0].field_type, "string");
        assert!(!tag.fields[0].nullable);
        assert_eq!(tag.fields[1].field_type, "decimal");
        assert_eq!(tag.fields[1].cast.as_deref(), Some("float"));
        assert_eq!(tag.fields[2].field_type, "datetime");

        assert_eq!(tag.storage.fillable, vec!["label_text", "weight", "seen"]);
        assert_eq!(tag.storage.casts["label_text"], "String");
    }

    #[test]
    fn test_irregular_entity_plural() {
        let resources = map(
            "entity Person { name String }\nentity Team { label String }\nrelationship ManyToMany { Team to Person }",
        );
        let person = &resources[0];
        assert_eq!(person.table, "people");
        assert_eq!(person.api.uri_prefix, "/v1/people");

        let team = &resources[1];
        let partner = team.fields.last().unwrap();
        assert_eq!(partner.name, "people");
        assert_eq!(relation(partner).target_entity, "Person");
        assert_eq!(relation(&person.fields[1]).mapped_by.as_deref(), Some("people"));
    }

    #[test]
    fn test_unknown_type_passes_through() {
        assert_eq!(map_type("Status"), "Status");
        assert_eq!(map_cast("Status"), "Status");
        assert_eq!(map_type("LONG"), "bigint");
        assert_eq!(map_cast("Long"), "int");
    }

    #[test]
    fn test_uri_prefix_trailing_slash() {
        let resources = map("config {\n uriPrefix /api/\n}\nentity Book { title string }");
        assert_eq!(resources[0].api.uri_prefix, "/api/books");
    }

    #[test]
    fn test_many_to_one_default_name() {
        let resources = map(
            "entity Book { title string }\nentity Author { name string }\nrelationship ManyToOne { Book to Author }",
        );
        let field = resources[0].fields.last().unwrap();
        assert_eq!(field.name, "author");
        assert!(field.nullable);
        assert!(field.fillable);
        assert!(relation(field).is_owning_side);
        assert_eq!(resources[1].fields.len(), 1);
    }

    #[test]
    fn test_relation_fields_not_in_storage_fillable() {
        let resources = map(
            "entity Book { title string }\nentity Author { name string }\nrelationship ManyToOne { Book to Author }",
        );
        assert_eq!(resources[0].storage.fillable, vec!["title"]);
    }

    #[test]
    fn test_one_to_one_with_inverse() {
        let resources = map(
            "entity User { email string }\nentity Profile { bio string }\nrelationship OneToOne { User{profile} to Profile{user} }",
        );
        let owning = resources[0].fields.last().unwrap();
        assert_eq!(owning.name, "profile");
        assert_eq!(relation(owning).inversed_by.as_deref(), Some("user"));

        let inverse = resources[1].fields.last().unwrap();
        assert_eq!(inverse.name, "user");
        assert!(!inverse.fillable);
        assert!(!relation(inverse).is_owning_side);
        assert_eq!(relation(inverse).mapped_by.as_deref(), Some("profile"));
    }

    #[test]
    fn test_one_to_one_without_hint_is_owning_only() {
        let resources = map(
            "entity User { email string }\nentity Profile { bio string }\nrelationship OneToOne { User to Profile }",
        );
        assert_eq!(resources[0].fields.len(), 2);
        assert_eq!(resources[1].fields.len(), 1);
        assert!(relation(&resources[0].fields[1]).inversed_by.is_none());
    }

    #[test]
    fn test_one_to_many_with_hint() {
        let resources = map(
            "entity Author { name string }\nentity Book { title string }\nrelationship OneToMany { Author to Book{writer} }",
        );

        let collection = resources[0].fields.last().unwrap();
        assert_eq!(collection.name, "books");
        assert!(collection.is_collection());
        assert!(!collection.fillable);
        assert!(!collection.nullable);
        assert_eq!(relation(collection).mapped_by.as_deref(), Some("writer"));
        assert_eq!(relation(collection).kind, RelationKind::OneToMany);

        let owning = resources[1].fields.last().unwrap();
        assert_eq!(owning.name, "writer");
        assert_eq!(relation(owning).kind, RelationKind::ManyToOne);
        assert_eq!(relation(owning).target_entity, "Author");
    }

    #[test]
    fn test_one_to_many_without_inverse_hint_is_a_no_op() {
        let resources = map(
            "entity Author { name string }\nentity Book { title string }\nrelationship OneToMany { Author{books} to Book }",
        );
        assert_eq!(resources[0].fields.len(), 1);
        assert_eq!(resources[1].fields.len(), 1);
    }

    #[test]
    fn test_many_to_many_conventions() {
        let resources = map(
            "entity Post { title string }\nentity Tag { label string }\nrelationship ManyToMany { Post to Tag }",
        );
        let left = resources[0].fields.last().unwrap();
        let right = resources[1].fields.last().unwrap();

        assert_eq!(left.name, "tags");
        assert_eq!(right.name, "posts");
        assert!(relation(left).is_owning_side);
        assert!(!relation(right).is_owning_side);
        assert_eq!(relation(left).inversed_by.as_deref(), Some("posts"));
        assert_eq!(relation(right).mapped_by.as_deref(), Some("tags"));
        assert!(!left.fillable && !right.fillable);
    }

    #[test]
    fn test_many_to_many_hints_win() {
        let resources = map(
            "entity Post { title string }\nentity Tag { label string }\nrelationship ManyToMany { Post{labels} to Tag{articles} }",
        );
        let left = resources[0].fields.last().unwrap();
        let right = resources[1].fields.last().unwrap();

        assert_eq!(left.name, "labels");
        assert_eq!(right.name, "articles");
        assert_eq!(relation(left).inversed_by.as_deref(), Some("articles"));
        assert_eq!(relation(right).mapped_by.as_deref(), Some("labels"));
    }

    #[test]
    fn test_unknown_entity_relation_skipped() {
        let resources =
            map("entity Book { title string }\nrelationship ManyToOne { Book to Ghost }");
        assert_eq!(resources[0].fields.len(), 1);
    }

    #[test]
    fn test_case_insensitive_entity_merge() {
        let resources = map(
            "entity book { a string }\nentity Author { n string }\nentity Book { b string }",
        );
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].entity, "Book");
        assert_eq!(resources[0].fields[0].name, "b");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(Some("  "), "tags"), "tags");
        assert_eq!(sanitize(Some(" my_tags "), "tags"), "myTags");
        assert_eq!(sanitize(None, "tags"), "tags");
    }
}
