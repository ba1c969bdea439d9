//! Generators shared by both frameworks: DTOs and the OpenAPI schema fragment

use super::support::{self, php_literal, SYSTEM_FIELDS};
use super::{GeneratedFile, GenerationContext};
use crate::definition::FieldDefinition;
use crate::error::Result;
use crate::naming::Naming;
use crate::template::StubRepository;
use serde_json::{json, Value};

/// Source root for the context's framework (`app` or `src`)
#[must_use]
pub fn source_root(ctx: &GenerationContext<'_>) -> &'static str {
    if ctx.framework == "laravel" {
        "app"
    } else {
        "src"
    }
}

/// Serialized property name for the framework
fn property_name(ctx: &GenerationContext<'_>, field: &FieldDefinition) -> String {
    if ctx.framework == "laravel" {
        Naming::snake(&field.name)
    } else {
        Naming::camel(&field.name)
    }
}

fn payload_fields<'a>(ctx: &'a GenerationContext<'_>) -> impl Iterator<Item = &'a FieldDefinition> {
    ctx.def
        .fields
        .iter()
        .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
}

/// Input / output data transfer objects
pub struct DtoGenerator;

impl DtoGenerator {
    fn namespace(ctx: &GenerationContext<'_>) -> String {
        format!("App\\Dto\\{}", ctx.entity)
    }

    /// Template variables for the input DTO
    #[must_use]
    pub fn input_metadata(ctx: &GenerationContext<'_>) -> Value {
        let symfony = ctx.framework == "symfony";

        let properties: Vec<Value> = payload_fields(ctx)
            .map(|f| {
                let mut attributes = vec![format!("#[Groups(['{}'])]", ctx.groups_write)];
                if symfony && !f.is_relation() {
                    attributes.extend(support::symfony_asserts(f).into_iter().map(String::from));
                }

                json!({
                    "property": property_name(ctx, f),
                    "php_type": support::input_php_type(f),
                    "attributes": attributes,
                })
            })
            .collect();

        let mut uses = vec!["Symfony\\Component\\Serializer\\Attribute\\Groups"];
        if symfony {
            uses.push("Symfony\\Component\\Validator\\Constraints as Assert");
        }

        json!({
            "namespace": Self::namespace(ctx),
            "entity": ctx.entity,
            "uses": uses,
            "properties": properties,
        })
    }

    /// Template variables for the output DTO
    #[must_use]
    pub fn output_metadata(ctx: &GenerationContext<'_>) -> Value {
        let id_type = if ctx.def.api.uuid { "?string" } else { "?int" };
        let mut properties = vec![json!({
            "property": "id",
            "php_type": id_type,
            "default": " = null",
        })];

        properties.extend(payload_fields(ctx).filter(|f| !f.hidden).map(|f| {
            let php_type = support::output_php_type(f);
            let default = if php_type.starts_with('?') { " = null" } else { "" };
            json!({
                "property": property_name(ctx, f),
                "php_type": php_type,
                "default": default,
            })
        }));

        json!({
            "namespace": Self::namespace(ctx),
            "entity": ctx.entity,
            "groups_read": ctx.groups_read,
            "properties": properties,
        })
    }

    /// `<root>/Dto/<Entity>/<Entity>Input.php`
    pub fn generate_input(
        ctx: &GenerationContext<'_>,
        stubs: &StubRepository,
    ) -> Result<GeneratedFile> {
        let content = stubs.render("common/dto.input", &Self::input_metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!(
                "{}/Dto/{}/{}Input.php",
                source_root(ctx),
                ctx.entity,
                ctx.entity
            )),
            content,
            kind: "dto.input",
            description: format!("Input DTO for {}", ctx.entity),
        })
    }

    /// `<root>/Dto/<Entity>/<Entity>Output.php`
    pub fn generate_output(
        ctx: &GenerationContext<'_>,
        stubs: &StubRepository,
    ) -> Result<GeneratedFile> {
        let content = stubs.render("common/dto.output", &Self::output_metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!(
                "{}/Dto/{}/{}Output.php",
                source_root(ctx),
                ctx.entity,
                ctx.entity
            )),
            content,
            kind: "dto.output",
            description: format!("Output DTO for {}", ctx.entity),
        })
    }
}

/// OpenAPI schema fragment
pub struct OpenApiGenerator;

impl OpenApiGenerator {
    /// Template variables for the schema class
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let fields: Vec<&FieldDefinition> = payload_fields(ctx).filter(|f| !f.hidden).collect();

        let properties: Vec<Value> = fields
            .iter()
            .map(|f| {
                let (ty, format, example) = support::openapi_property(f);
                let mut attrs = vec![format!("'type' => '{ty}'")];
                if let Some(format) = format {
                    attrs.push(format!("'format' => '{format}'"));
                }
                if f.nullable {
                    attrs.push("'nullable' => true".to_string());
                }
                attrs.push(format!("'example' => {}", php_literal(&example)));

                json!({
                    "name": property_name(ctx, f),
                    "attrs": attrs.join(", "),
                })
            })
            .collect();

        let required: Vec<String> = fields
            .iter()
            .filter(|f| !f.nullable && !f.is_collection())
            .map(|f| format!("'{}'", property_name(ctx, f)))
            .collect();

        json!({
            "namespace": "App\\OpenApi",
            "entity": ctx.entity,
            "properties": properties,
            "has_required": !required.is_empty(),
            "required": required.join(", "),
        })
    }

    /// `<root>/OpenApi/<Entity>Schema.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("common/openapi.schema", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("{}/OpenApi/{}Schema.php", source_root(ctx), ctx.entity)),
            content,
            kind: "openapi",
            description: format!("OpenAPI schema for {}", ctx.entity),
        })
    }
}
