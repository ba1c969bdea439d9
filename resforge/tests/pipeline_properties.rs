//! Integration tests for the parse / resolve / render pipeline
//!
//! Covers determinism, ordering, many-to-many symmetry, lenient parsing and
//! the template section semantics.

use proptest::prelude::*;
use resforge::jdl::{JdlParser, JdlToResourceMapper};
use resforge::{RelationKind, ResourceDefinition, TemplateRenderer};
use serde_json::json;

fn resolve(source: &str) -> Vec<ResourceDefinition> {
    JdlToResourceMapper::map(&JdlParser::parse(source))
}

const LIBRARY: &str = r"
/** Library domain */
config {
  framework symfony
  uriPrefix /v1
}

entity Zeta {
  omega String required
  alpha Integer
}

entity Author {
  name String required
  born LocalDate
}

entity Book {
  title String required
  price BigDecimal
  published Instant
}

enum Status { DRAFT, PUBLISHED }

relationship ManyToOne {
  Book{author} to Author
}

relationship ManyToMany {
  Book{shelves} to Zeta{books}
}
";

#[test]
fn test_resolution_is_deterministic() {
    let first = resolve(LIBRARY);
    let second = resolve(LIBRARY);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_entity_and_field_order_preserved() {
    let resources = resolve(LIBRARY);

    let entities: Vec<&str> = resources.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(entities, vec!["Zeta", "Author", "Book"]);

    let zeta: Vec<&str> = resources[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(zeta, vec!["omega", "alpha", "books"]);

    let book: Vec<&str> = resources[2].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(book, vec!["title", "price", "published", "author", "shelves"]);
}

#[test]
fn test_many_to_many_sides_reference_each_other() {
    let source = concat!(
        "entity Post { title string }\nentity Tag { label string }\nentity Topic { name string }\n",
        "relationship ManyToMany {\n Post to Tag\n Topic{posts} to Post{topics}\n}",
    );
    let resources = resolve(source);

    for resource in &resources {
        for field in resource.fields.iter().filter(|f| f.is_relation()) {
            let relation = field.relation.as_ref().unwrap();
            assert_eq!(relation.kind, RelationKind::ManyToMany);
            assert!(relation.is_collection);

            let target = resources
                .iter()
                .find(|r| r.entity == relation.target_entity)
                .unwrap();
            let partner_name = if relation.is_owning_side {
                relation.inversed_by.as_deref().unwrap()
            } else {
                relation.mapped_by.as_deref().unwrap()
            };
            let partner = target.field(partner_name).unwrap();
            let partner_relation = partner.relation.as_ref().unwrap();

            assert_ne!(relation.is_owning_side, partner_relation.is_owning_side);
            assert_eq!(partner_relation.target_entity, resource.entity);
            let back = if partner_relation.is_owning_side {
                partner_relation.inversed_by.as_deref()
            } else {
                partner_relation.mapped_by.as_deref()
            };
            assert_eq!(back, Some(field.name.as_str()));
        }
    }

    let owning: usize = resources
        .iter()
        .flat_map(|r| &r.fields)
        .filter(|f| f.relation.as_ref().is_some_and(|r| r.is_owning_side))
        .count();
    assert_eq!(owning, 2);
}

#[test]
fn test_malformed_field_line_contributes_nothing() {
    let resources = resolve("entity Book {\n title string required\n this line is not a field\n}");
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].fields.len(), 1);
    assert_eq!(resources[0].fields[0].name, "title");
}

#[test]
fn test_garbage_input_never_fails() {
    let resources = resolve("}{ entity { relationship Sideways { ??? } config {");
    assert!(resources.is_empty());
}

#[test]
fn test_section_gating() {
    for falsy in [json!(false), json!(null), json!(""), json!(0)] {
        assert_eq!(TemplateRenderer::render("{{#x}}Y{{/x}}", &json!({"x": falsy})), "");
    }
    assert_eq!(TemplateRenderer::render("{{#x}}Y{{/x}}", &json!({"x": true})), "Y");
}

#[test]
fn test_section_iteration() {
    assert_eq!(
        TemplateRenderer::render("{{#items}}[{{.}}]{{/items}}", &json!({"items": ["a", "b"]})),
        "[a][b]"
    );
}

fn field_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "String", "Integer", "Long", "Boolean", "BigDecimal", "Instant", "LocalDate", "UUID",
    ])
}

fn jdl_source() -> impl Strategy<Value = String> {
    let field = ("[a-z][a-z_]{1,8}", field_type(), any::<bool>());
    let entity = ("[A-Z][a-z]{2,7}", prop::collection::vec(field, 0..5));

    (prop::collection::vec(entity, 1..5), any::<bool>()).prop_map(|(entities, relate)| {
        let mut out = String::new();
        for (name, fields) in &entities {
            out.push_str(&format!("entity {name} {{\n"));
            for (field, ty, required) in fields {
                let flag = if *required { " required" } else { "" };
                out.push_str(&format!("  {field} {ty}{flag}\n"));
            }
            out.push_str("}\n");
        }
        if relate && entities.len() > 1 {
            out.push_str(&format!(
                "relationship ManyToMany {{\n  {} to {}\n}}\n",
                entities[0].0,
                entities[entities.len() - 1].0
            ));
        }
        out
    })
}

proptest! {
    #[test]
    fn prop_resolution_is_idempotent(source in jdl_source()) {
        let first = resolve(&source);
        let second = resolve(&source);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_every_entity_resolves(source in jdl_source()) {
        let doc = JdlParser::parse(&source);
        prop_assert_eq!(JdlToResourceMapper::map(&doc).len(), doc.entities.len());
    }
}
