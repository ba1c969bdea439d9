//! Field-level derivations shared by the generators
//!
//! Everything here is a pure function of a field or a definition: column
//! lines, casts, validation rules, PHP and ORM types, fixture expressions and
//! OpenAPI property shapes.

use crate::definition::{Feature, FieldDefinition, RelationKind, ResourceDefinition};
use crate::naming::Naming;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Columns the migration manages itself
pub const SYSTEM_FIELDS: [&str; 7] = [
    "id",
    "tenant_id",
    "created_at",
    "updated_at",
    "deleted_at",
    "created_by",
    "updated_by",
];

const DATE_TYPES: [&str; 7] = [
    "date",
    "localdate",
    "datetime",
    "timestamp",
    "zoneddatetime",
    "instant",
    "localtime",
];

/// Lowercased type and cast of a field
fn type_and_cast(field: &FieldDefinition) -> (String, String) {
    (
        field.normalized_type(),
        field
            .cast
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .unwrap_or_default(),
    )
}

/// `<name>_id` unless the name already ends in `_id`
#[must_use]
pub fn foreign_key_column(name: &str) -> String {
    let snake = Naming::snake(name);
    if snake.ends_with("_id") {
        snake
    } else {
        format!("{snake}_id")
    }
}

/// Storage table of the resource, falling back to the plural of the entity
#[must_use]
pub fn resource_table(def: &ResourceDefinition) -> String {
    let table = def.storage.table.trim();
    if table.is_empty() {
        Naming::table_name(&def.entity)
    } else {
        table.to_string()
    }
}

/// Join table for a many-to-many pair: both plural snake names, alphabetical
#[must_use]
pub fn pivot_table(a: &str, b: &str) -> String {
    let (a, b) = (Naming::table_name(a), Naming::table_name(b));
    if a <= b {
        format!("{a}_{b}")
    } else {
        format!("{b}_{a}")
    }
}

/// Whether the field holds a date or time value
#[must_use]
pub fn is_date_like(field: &FieldDefinition) -> bool {
    let (ty, cast) = type_and_cast(field);
    DATE_TYPES.contains(&ty.as_str()) || DATE_TYPES.contains(&cast.as_str())
}

/// Schema builder lines for the create-table migration
///
/// Identifier first, then one column per non-system field, then the audit,
/// timestamp, tenant and soft delete columns the features ask for. Relation
/// fields only contribute a column when they own a single-valued foreign key.
#[must_use]
pub fn migration_columns(def: &ResourceDefinition) -> Vec<String> {
    let uuid = def.api.uuid;
    let mut lines = Vec::with_capacity(def.fields.len() + 6);

    lines.push(if uuid {
        "$table->uuid('id')->primary();".to_string()
    } else {
        "$table->bigIncrements('id');".to_string()
    });

    for field in &def.fields {
        if SYSTEM_FIELDS.contains(&field.name.as_str()) {
            continue;
        }
        if let Some(line) = migration_column(field, uuid) {
            lines.push(line);
        }
    }

    if def.has(Feature::Audit) {
        lines.push("$table->unsignedBigInteger('created_by')->nullable()->index();".to_string());
        lines.push("$table->unsignedBigInteger('updated_by')->nullable()->index();".to_string());
    }

    lines.push("$table->timestamps();".to_string());

    if def.has(Feature::Tenant) {
        lines.push(
            "$table->foreignUuid('tenant_id')->nullable()->constrained('tenants');".to_string(),
        );
    }

    if def.has(Feature::SoftDeletes) {
        lines.push("$table->softDeletes();".to_string());
    }

    lines
}

fn migration_column(field: &FieldDefinition, uuid: bool) -> Option<String> {
    let name = &field.name;

    if let Some(relation) = &field.relation {
        if !field.has_foreign_key() {
            return None;
        }
        let fk = foreign_key_column(name);
        let mut line = if uuid {
            format!("$table->foreignUuid('{fk}')")
        } else {
            format!("$table->foreignId('{fk}')")
        };
        if field.nullable {
            line.push_str("->nullable()");
        }
        if !relation.target_entity.trim().is_empty() {
            line.push_str(&format!(
                "->constrained('{}')",
                Naming::table_name(&relation.target_entity)
            ));
        }
        line.push(';');
        return Some(line);
    }

    let (ty, cast) = type_and_cast(field);
    let method = match ty.as_str() {
        "uuid" => format!("$table->uuid('{name}')"),
        "text" | "textblob" => format!("$table->text('{name}')"),
        "bool" | "boolean" => format!("$table->boolean('{name}')"),
        "int" | "integer" => format!("$table->integer('{name}')"),
        "bigint" | "long" => format!("$table->bigInteger('{name}')"),
        "float" | "double" => format!("$table->float('{name}')"),
        "decimal" | "bigdecimal" => format!("$table->decimal('{name}', 15, 2)"),
        _ if ty == "date" || cast == "date" => format!("$table->date('{name}')"),
        _ if ["datetime", "timestamp"].contains(&ty.as_str())
            || ["datetime", "timestamp"].contains(&cast.as_str()) =>
        {
            format!("$table->dateTime('{name}')")
        }
        _ => format!("$table->string('{name}')"),
    };

    Some(if field.nullable {
        format!("{method}->nullable();")
    } else {
        format!("{method};")
    })
}

/// Migration file name for `table` inside `dir`
///
/// An existing `*_create_<table>_table.php` is reused so regeneration
/// overwrites instead of piling up; otherwise the next free four-digit
/// sequence is prefixed.
#[must_use]
pub fn migration_file_name(dir: &Path, table: &str) -> String {
    let base = format!("01_01_100000_create_{table}_table.php");
    let suffix = format!("_create_{table}_table.php");

    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(std::result::Result::ok)
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| name.ends_with(".php"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();

    if let Some(existing) = names.iter().find(|name| name.ends_with(&suffix)) {
        return existing.clone();
    }

    format!("{:04}_{base}", names.len() + 1)
}

/// Eloquent cast for a storage cast kind; `None` means "no cast"
#[must_use]
pub fn laravel_cast(kind: &str) -> Option<&'static str> {
    match kind.trim().to_lowercase().as_str() {
        "bool" | "boolean" => Some("boolean"),
        "int" | "integer" | "long" | "bigint" => Some("integer"),
        "float" | "double" => Some("float"),
        "decimal" | "bigdecimal" => Some("decimal:2"),
        "date" | "localdate" => Some("date:Y-m-d"),
        "datetime" | "timestamp" | "instant" | "zoneddatetime" => Some("datetime"),
        "uuid" => Some("string"),
        _ => None,
    }
}

/// Laravel validation rules, presence rule first
#[must_use]
pub fn laravel_rules(field: &FieldDefinition) -> Vec<&'static str> {
    let mut rules = vec![if field.nullable { "nullable" } else { "required" }];

    if field.is_relation() {
        rules.push(if field.is_collection() { "array" } else { "string" });
        return rules;
    }

    let ty = field.normalized_type();
    let type_rule = match ty.as_str() {
        "string" | "text" | "textblob" | "enum" | "duration" | "localtime" => Some("string"),
        "int" | "integer" | "long" | "bigint" => Some("integer"),
        "float" | "double" | "decimal" | "bigdecimal" => Some("numeric"),
        "bool" | "boolean" => Some("boolean"),
        "date" | "localdate" | "datetime" | "timestamp" | "zoneddatetime" | "instant" => {
            Some("date")
        }
        "uuid" => Some("uuid"),
        "blob" | "anyblob" | "imageblob" => Some("string"),
        _ => None,
    };
    rules.extend(type_rule);

    if field.format.as_deref() == Some("email") {
        rules.push("email");
    }

    rules
}

/// Doctrine column type; the cast wins over the domain type when present
#[must_use]
pub fn doctrine_type(field: &FieldDefinition) -> &'static str {
    if field.is_relation() {
        return "relation";
    }

    let (ty, cast) = type_and_cast(field);
    let base = if cast.is_empty() { ty } else { cast };

    match base.as_str() {
        "bool" | "boolean" => "boolean",
        "int" | "integer" => "integer",
        "long" | "bigint" | "duration" => "bigint",
        "float" | "double" => "float",
        "decimal" | "bigdecimal" => "decimal",
        "uuid" => "uuid",
        "date" | "localdate" => "date_immutable",
        "datetime" | "timestamp" | "instant" | "zoneddatetime" => "datetime_immutable",
        "time" | "localtime" => "time_immutable",
        "text" | "textblob" => "text",
        "blob" | "anyblob" | "imageblob" => "blob",
        _ => "string",
    }
}

fn scalar_php_type(ty: &str) -> &'static str {
    match ty {
        "bool" | "boolean" => "bool",
        "int" | "integer" | "long" | "bigint" => "int",
        "float" | "double" => "float",
        _ => "string",
    }
}

/// Property type on the input DTO; always nullable
#[must_use]
pub fn input_php_type(field: &FieldDefinition) -> String {
    if field.is_relation() {
        return if field.is_collection() { "?array" } else { "?string" }.to_string();
    }
    format!("?{}", scalar_php_type(&field.normalized_type()))
}

/// Property type on the output DTO; nullable when the field is
#[must_use]
pub fn output_php_type(field: &FieldDefinition) -> String {
    let base = if field.is_relation() {
        if field.is_collection() { "array" } else { "string" }
    } else {
        scalar_php_type(&field.normalized_type())
    };

    if field.nullable {
        format!("?{base}")
    } else {
        base.to_string()
    }
}

/// Property type on the Doctrine entity
#[must_use]
pub fn entity_php_type(field: &FieldDefinition) -> String {
    if let Some(relation) = &field.relation {
        return Naming::studly(&relation.target_entity);
    }

    let ty = field.normalized_type();
    match ty.as_str() {
        "uuid" => "\\Symfony\\Component\\Uid\\Uuid".to_string(),
        t if DATE_TYPES.contains(&t) => "\\DateTimeImmutable".to_string(),
        t => scalar_php_type(t).to_string(),
    }
}

/// Symfony validator attributes for a scalar field
#[must_use]
pub fn symfony_asserts(field: &FieldDefinition) -> Vec<&'static str> {
    let ty = field.normalized_type();
    let mut out = Vec::new();

    if !field.nullable {
        out.push("#[Assert\\NotNull]");
        if ["string", "textblob", "enum", "uuid"].contains(&ty.as_str()) {
            out.push("#[Assert\\NotBlank]");
        }
    }
    if ty == "uuid" {
        out.push("#[Assert\\Uuid]");
    }
    if field.format.as_deref() == Some("email") {
        out.push("#[Assert\\Email]");
    }

    out
}

/// Faker call for a scalar field, without the receiver
///
/// The caller prefixes `$this->faker->` or `self::faker()->`.
#[must_use]
pub fn faker_call(field: &FieldDefinition) -> &'static str {
    let (ty, cast) = type_and_cast(field);
    let is = |names: &[&str]| names.contains(&ty.as_str()) || names.contains(&cast.as_str());

    if is(&["datetime", "timestamp"]) {
        return "dateTime()";
    }
    if is(&["date"]) {
        return "date()";
    }
    if is(&["bool", "boolean"]) {
        return "boolean()";
    }
    if is(&["int", "integer", "bigint", "long"]) {
        return "numberBetween(1, 100)";
    }
    if is(&["float", "double", "decimal"]) {
        return "randomFloat(2, 1, 1000)";
    }
    if ty == "uuid" {
        return "uuid()";
    }
    if field.format.as_deref() == Some("email") || field.name == "email" {
        return "unique()->safeEmail()";
    }

    match field.name.as_str() {
        "code" => "unique()->word()",
        "label" | "name" | "title" => "sentence(3)",
        "description" | "details" => "optional()->paragraph()",
        "color" => "optional()->hexColor()",
        _ if field.nullable => "optional()->sentence(2)",
        _ => "sentence(2)",
    }
}

/// Literal PHP expression used as a request payload value in generated tests
///
/// Expressions may reference a `$uuid` variable the test declares.
#[must_use]
pub fn sample_value(field: &FieldDefinition) -> String {
    let (ty, _) = type_and_cast(field);
    match ty.as_str() {
        "bool" | "boolean" => "true".to_string(),
        "int" | "integer" | "long" | "bigint" => "123".to_string(),
        "float" | "double" | "decimal" | "bigdecimal" => "12.3".to_string(),
        "uuid" => "$uuid".to_string(),
        _ if is_date_like(field) => "'2026-01-01'".to_string(),
        _ => "'VAL-'.$uuid".to_string(),
    }
}

/// Field a generated test can look the created row up by, with its value
///
/// `code` wins, then the first required scalar field.
#[must_use]
pub fn unique_field(fields: &[FieldDefinition]) -> Option<(String, String)> {
    let scalars = || fields.iter().filter(|f| !f.is_relation());

    if scalars().any(|f| f.name == "code") {
        return Some(("code".to_string(), "$uuid".to_string()));
    }

    scalars()
        .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
        .find(|f| !f.nullable)
        .map(|f| (f.name.clone(), sample_value(f)))
}

/// OpenAPI property for a field: `(type, format, example)`
#[must_use]
pub fn openapi_property(field: &FieldDefinition) -> (&'static str, Option<&'static str>, Value) {
    if field.is_relation() {
        return if field.is_collection() {
            ("array", None, json!([]))
        } else {
            ("string", Some("iri-reference"), json!("/api/resource/1"))
        };
    }

    let format = field.format.as_deref().map(str::to_lowercase);
    let (ty, fmt) = match field.normalized_type().as_str() {
        "int" | "integer" | "long" | "bigint" => ("integer", None),
        "float" | "double" | "decimal" | "bigdecimal" => ("number", None),
        "bool" | "boolean" => ("boolean", None),
        "date" | "localdate" => ("string", Some("date")),
        "datetime" | "timestamp" | "instant" | "zoneddatetime" => ("string", Some("date-time")),
        "uuid" => ("string", Some("uuid")),
        _ if format.as_deref() == Some("email") => ("string", Some("email")),
        _ => ("string", None),
    };

    let example = match (ty, fmt) {
        (_, Some("email")) => json!("john@doe.test"),
        (_, Some("uuid")) => json!("c39017cf-9ce9-4754-be4e-64b422f3a48a"),
        (_, Some("date-time")) => json!("2026-01-17T12:00:00+00:00"),
        (_, Some("date")) => json!("2026-01-17"),
        ("integer", _) => json!(1),
        ("number", _) => json!(10.5),
        ("boolean", _) => json!(true),
        _ if field.name.contains("first") => json!("John"),
        _ if field.name.contains("last") => json!("Doe"),
        _ => json!("value"),
    };

    (ty, fmt, example)
}

/// Render a JSON scalar as a PHP literal
#[must_use]
pub fn php_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(php_literal).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

/// Whether a relation field is the single-valued, foreign-key holding side
///
/// Inverse one-to-one sides and collections are excluded.
#[must_use]
pub fn is_belongs_to(field: &FieldDefinition) -> bool {
    field.relation.as_ref().is_some_and(|r| {
        !r.is_collection
            && (r.kind == RelationKind::ManyToOne
                || (r.kind == RelationKind::OneToOne && r.is_owning_side))
    })
}
