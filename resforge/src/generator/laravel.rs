//! Laravel / Eloquent generation
//!
//! Model, migration and factory come from the `entity` and `factories`
//! features. The `state` feature adds the HTTP layer: a form request, an API
//! controller and a route file per resource.

use super::common::{DtoGenerator, OpenApiGenerator};
use super::support::{
    self, foreign_key_column, is_belongs_to, pivot_table, resource_table, SYSTEM_FIELDS,
};
use super::{GeneratedFile, GenerationContext, GenerationResult, ResourceGenerationStrategy};
use crate::definition::{Feature, FieldDefinition, RelationKind};
use crate::error::Result;
use crate::naming::Naming;
use crate::template::StubRepository;
use serde_json::{json, Value};

/// `laravel` framework with the `eloquent` driver
pub struct LaravelEloquentStrategy {
    stubs: StubRepository,
}

impl LaravelEloquentStrategy {
    /// Strategy rendering from `stubs`
    #[must_use]
    pub const fn new(stubs: StubRepository) -> Self {
        Self { stubs }
    }
}

impl ResourceGenerationStrategy for LaravelEloquentStrategy {
    fn name(&self) -> &'static str {
        "laravel-eloquent"
    }

    fn supports(&self, ctx: &GenerationContext<'_>) -> bool {
        ctx.framework == "laravel" && ctx.def.driver == "eloquent"
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<GenerationResult> {
        let stubs = &self.stubs;
        let mut result = GenerationResult::new();

        let native = ctx.def.stack().is_some_and(|s| s.eq_ignore_ascii_case("native"));
        if ctx.has(Feature::Dto) && !native {
            result.push(DtoGenerator::generate_input(ctx, stubs)?);
        }

        if ctx.has(Feature::Factories) {
            result.push(FactoryGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::Entity) {
            result.push(ModelGenerator::generate(ctx, stubs)?);
            result.push(MigrationGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::State) {
            result.push(FormRequestGenerator::generate(ctx, stubs)?);
            result.push(ControllerGenerator::generate(ctx, stubs)?);
            result.push(RoutesGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::Tests) {
            result.push(FeatureTestGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::Dto) {
            result.push(OpenApiGenerator::generate(ctx, stubs)?);
        }

        Ok(result)
    }
}

/// Foreign key on the other table for has-one / has-many sides
fn inverse_foreign_key(ctx: &GenerationContext<'_>, field: &FieldDefinition) -> String {
    field
        .relation
        .as_ref()
        .and_then(|r| r.mapped_by.as_deref())
        .filter(|m| !m.trim().is_empty())
        .map_or_else(|| foreign_key_column(&ctx.entity_snake), foreign_key_column)
}

/// Eloquent model
pub struct ModelGenerator;

impl ModelGenerator {
    /// Template variables for the model
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let def = ctx.def;
        let mut uses: Vec<String> = Vec::new();
        let mut traits: Vec<&str> = Vec::new();

        if def.api.uuid {
            uses.push("Illuminate\\Database\\Eloquent\\Concerns\\HasUuids".to_string());
            traits.push("HasUuids");
        }
        if ctx.has(Feature::SoftDeletes) {
            uses.push("Illuminate\\Database\\Eloquent\\SoftDeletes".to_string());
            traits.push("SoftDeletes");
        }
        if ctx.has(Feature::Tenant) {
            uses.push("App\\Models\\Concerns\\TenantOwned".to_string());
            traits.push("TenantOwned");
        }

        let relations = Self::relations(ctx);
        for relation in &relations {
            if let Some(kind) = relation["kind"].as_str() {
                let class = format!("Illuminate\\Database\\Eloquent\\Relations\\{kind}");
                if !uses.contains(&class) {
                    uses.push(class);
                }
            }
        }

        let hidden = &def.storage.hidden;
        let casts: Vec<Value> = def
            .storage
            .casts
            .iter()
            .filter_map(|(column, kind)| {
                support::laravel_cast(kind).map(|cast| json!({"column": column, "cast": cast}))
            })
            .collect();

        json!({
            "namespace": "App\\Models",
            "entity": ctx.entity,
            "table": resource_table(ctx.def),
            "uses": uses,
            "traits": traits,
            "fillable": Self::fillable(ctx),
            "has_hidden": !hidden.is_empty(),
            "hidden": hidden,
            "has_casts": !casts.is_empty(),
            "casts": casts,
            "relations": relations,
        })
    }

    /// Storage fillable list with relation names swapped for their foreign
    /// key columns; collection and inverse relation names are dropped
    #[must_use]
    pub fn fillable(ctx: &GenerationContext<'_>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if !out.contains(&name) {
                out.push(name);
            }
        };

        for name in &ctx.def.storage.fillable {
            match ctx.def.field(name) {
                Some(field) if is_belongs_to(field) => push(foreign_key_column(name)),
                Some(field) if field.is_relation() => {}
                _ => push(Naming::snake(name)),
            }
        }

        for field in ctx.def.fields.iter().filter(|f| is_belongs_to(f)) {
            push(foreign_key_column(&field.name));
        }

        out
    }

    fn relations(ctx: &GenerationContext<'_>) -> Vec<Value> {
        ctx.def
            .fields
            .iter()
            .filter_map(|field| {
                let relation = field.relation.as_ref()?;
                let target = Naming::studly(&relation.target_entity);
                if target.is_empty() {
                    return None;
                }

                let (kind, call) = match relation.kind {
                    RelationKind::OneToMany if relation.is_collection => (
                        "HasMany",
                        format!(
                            "$this->hasMany({target}::class, '{}')",
                            inverse_foreign_key(ctx, field)
                        ),
                    ),
                    RelationKind::ManyToMany if relation.is_collection => (
                        "BelongsToMany",
                        format!(
                            "$this->belongsToMany({target}::class, '{}')",
                            pivot_table(&ctx.entity, &target)
                        ),
                    ),
                    RelationKind::ManyToOne | RelationKind::OneToOne if is_belongs_to(field) => (
                        "BelongsTo",
                        format!(
                            "$this->belongsTo({target}::class, '{}')",
                            foreign_key_column(&field.name)
                        ),
                    ),
                    RelationKind::OneToOne if !relation.is_collection => (
                        "HasOne",
                        format!(
                            "$this->hasOne({target}::class, '{}')",
                            inverse_foreign_key(ctx, field)
                        ),
                    ),
                    _ => return None,
                };

                Some(json!({
                    "method": Naming::camel(&field.name),
                    "kind": kind,
                    "call": call,
                }))
            })
            .collect()
    }

    /// `app/Models/<Entity>.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("laravel/model", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("app/Models/{}.php", ctx.entity)),
            content,
            kind: "model",
            description: format!("Eloquent model for {}", ctx.entity),
        })
    }
}

/// Create-table migration
pub struct MigrationGenerator;

impl MigrationGenerator {
    /// `database/migrations/<seq>_01_01_100000_create_<table>_table.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let table = resource_table(ctx.def);
        let dir = ctx.path("database/migrations");
        let metadata = json!({
            "table": table,
            "columns": support::migration_columns(ctx.def),
        });
        let content = stubs.render("laravel/migration.create_table", &metadata)?;

        Ok(GeneratedFile {
            path: dir.join(support::migration_file_name(&dir, &table)),
            content,
            kind: "migration",
            description: format!("Database migration for {table} table"),
        })
    }
}

/// Model factory
pub struct FactoryGenerator;

impl FactoryGenerator {
    /// Template variables for the factory
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let mut imports: Vec<String> = Vec::new();
        let mut definitions = Vec::new();

        if ctx.def.api.uuid {
            definitions.push(json!({"key": "id", "value": "(string) Str::uuid()"}));
        }
        if ctx.has(Feature::Tenant) {
            imports.push("Tenant".to_string());
            definitions.push(json!({"key": "tenant_id", "value": "Tenant::factory()"}));
        }

        for field in &ctx.def.fields {
            if SYSTEM_FIELDS.contains(&field.name.as_str()) {
                continue;
            }

            if let Some(relation) = &field.relation {
                if !is_belongs_to(field) {
                    continue;
                }
                let target = Naming::studly(&relation.target_entity);
                if target.is_empty() {
                    continue;
                }
                if target != ctx.entity && !imports.contains(&target) {
                    imports.push(target.clone());
                }
                let factory = format!("{target}::factory()");
                let value = if field.nullable {
                    format!("$this->faker->optional()->passthrough({factory})")
                } else {
                    factory
                };
                definitions.push(json!({"key": foreign_key_column(&field.name), "value": value}));
                continue;
            }

            definitions.push(json!({
                "key": field.name,
                "value": format!("$this->faker->{}", support::faker_call(field)),
            }));
        }

        json!({
            "entity": ctx.entity,
            "imports": imports,
            "definitions": definitions,
        })
    }

    /// `database/factories/<Entity>Factory.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("laravel/factory", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("database/factories/{}Factory.php", ctx.entity)),
            content,
            kind: "factory",
            description: format!("Model factory for {}", ctx.entity),
        })
    }
}

/// Validated form request
pub struct FormRequestGenerator;

impl FormRequestGenerator {
    /// Template variables for the request
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let rules: Vec<Value> = ctx
            .def
            .fields
            .iter()
            .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
            .filter(|f| match &f.relation {
                None => f.fillable,
                Some(r) => is_belongs_to(f) || r.kind == RelationKind::ManyToMany,
            })
            .map(|f| {
                let field = if is_belongs_to(f) {
                    foreign_key_column(&f.name)
                } else {
                    f.name.clone()
                };
                json!({"field": field, "rule": support::laravel_rules(f).join("|")})
            })
            .collect();

        json!({
            "entity": ctx.entity,
            "security_enabled": ctx.security_enabled,
            "open_access": !ctx.security_enabled,
            "permission_create": ctx.qualified_permission("CREATE"),
            "permission_update": ctx.qualified_permission("UPDATE"),
            "rules": rules,
        })
    }

    /// `app/Http/Requests/<Entity>/<Entity>Request.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("laravel/form_request", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!(
                "app/Http/Requests/{}/{}Request.php",
                ctx.entity, ctx.entity
            )),
            content,
            kind: "form_request",
            description: format!("Form request for {}", ctx.entity),
        })
    }
}

/// API controller over the model
pub struct ControllerGenerator;

impl ControllerGenerator {
    const TENANT_LINE: &'static str =
        "$tenantId = app(\\App\\Tenancy\\TenantContext::class)->requireId();";
    const ITEMS_PER_PAGE: &'static str = "50";

    /// Template variables for the controller
    ///
    /// Create and update are authorized by the form request; list, show and
    /// delete check their permission through `PermissionChecker`.
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let tenant = ctx.has(Feature::Tenant);
        let query = if tenant {
            format!("{}::query()->where('tenant_id', $tenantId)", ctx.entity)
        } else {
            format!("{}::query()", ctx.entity)
        };

        let permission = |action: &str| ctx.guarded_permission(action).unwrap_or_default();
        let (list, view, delete) = (permission("LIST"), permission("VIEW"), permission("DELETE"));
        let guarded = [&list, &view, &delete].iter().any(|p| !p.is_empty());

        let syncs: Vec<Value> = ctx
            .def
            .fields
            .iter()
            .filter(|f| {
                f.relation
                    .as_ref()
                    .is_some_and(|r| r.kind == RelationKind::ManyToMany && r.is_collection)
            })
            .map(|f| json!({"method": Naming::camel(&f.name), "field": f.name}))
            .collect();

        json!({
            "entity": ctx.entity,
            "guarded": guarded,
            "permission_list": list,
            "permission_view": view,
            "permission_delete": delete,
            "tenant": tenant,
            "tenant_line": Self::TENANT_LINE,
            "find_one": format!("{query}->findOrFail($id)"),
            "query": query,
            "items_per_page": Self::ITEMS_PER_PAGE,
            "syncs": syncs,
        })
    }

    /// `app/Http/Controllers/<Entity>Controller.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("laravel/controller", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("app/Http/Controllers/{}Controller.php", ctx.entity)),
            content,
            kind: "controller",
            description: format!("API controller for {}", ctx.entity),
        })
    }
}

/// Route group for the controller
pub struct RoutesGenerator;

impl RoutesGenerator {
    /// Template variables for the route file
    ///
    /// The last segment of the collection uri names the resource; the
    /// segments before it become the group prefix.
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let uri = ctx.collection_uri();
        let mut segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();
        let resource = segments
            .pop()
            .map_or_else(|| Naming::kebab(&Naming::plural(&ctx.entity)), str::to_string);

        let mut middlewares = vec!["'api'"];
        if ctx.security_enabled {
            middlewares.push("'auth:sanctum'");
        }

        json!({
            "entity": ctx.entity,
            "middlewares": middlewares.join(", "),
            "prefix": segments.join("/"),
            "resource": resource,
        })
    }

    /// `routes/api/<entity_snake>.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("laravel/routes", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("routes/api/{}.php", ctx.entity_snake)),
            content,
            kind: "routes",
            description: format!("API routes for {}", ctx.entity),
        })
    }
}

/// HTTP feature test
pub struct FeatureTestGenerator;

impl FeatureTestGenerator {
    /// Template variables for the test case
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let unique = support::unique_field(&ctx.def.fields);

        let payload: Vec<Value> = ctx
            .def
            .fields
            .iter()
            .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
            .filter_map(|f| {
                if let Some(relation) = &f.relation {
                    if !is_belongs_to(f) {
                        return None;
                    }
                    let target = Naming::studly(&relation.target_entity);
                    return Some(json!({
                        "key": foreign_key_column(&f.name),
                        "value": format!("{target}::factory()->create()->getKey()"),
                    }));
                }

                let value = match &unique {
                    Some((name, value)) if *name == f.name => value.clone(),
                    _ => support::sample_value(f),
                };
                Some(json!({"key": f.name, "value": value}))
            })
            .collect();

        let (unique_field, unique_value) = unique.unwrap_or_default();

        json!({
            "entity": ctx.entity,
            "table": resource_table(ctx.def),
            "uri": ctx.collection_uri(),
            "payload": payload,
            "has_unique": !unique_field.is_empty(),
            "unique_field": unique_field,
            "unique_value": unique_value,
            "soft_deletes": ctx.has(Feature::SoftDeletes),
        })
    }

    /// `tests/Feature/<Entity>ApiTest.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("laravel/test.feature", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("tests/Feature/{}ApiTest.php", ctx.entity)),
            content,
            kind: "test",
            description: format!("Feature test for {}", ctx.entity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::definition::{DefinitionLoader, ResourceDefinition};
    use std::path::PathBuf;

    fn book(features: Value) -> ResourceDefinition {
        DefinitionLoader::new()
            .hydrate(&json!({
                "entity": "Book",
                "table": "books",
                "features": features,
                "fields": [
                    {"name": "title", "type": "string"},
                    {"name": "pages", "type": "int", "nullable": true},
                    {"name": "published_at", "type": "datetime", "cast": "datetime"},
                    {
                        "name": "author",
                        "relationKind": "ManyToOne",
                        "targetEntity": "Author",
                        "isOwningSide": true
                    },
                    {
                        "name": "tags",
                        "relationKind": "ManyToMany",
                        "targetEntity": "Tag",
                        "isCollection": true,
                        "isOwningSide": true
                    },
                    {
                        "name": "chapters",
                        "relationKind": "OneToMany",
                        "targetEntity": "Chapter",
                        "isCollection": true,
                        "mappedBy": "book"
                    }
                ]
            }))
            .unwrap()
    }

    fn ctx<'a>(def: &'a ResourceDefinition) -> GenerationContext<'a> {
        GenerationContext::from(def, "laravel", "/out", false, true, &GeneratorConfig::default())
    }

    #[test]
    fn test_strategy_file_set() {
        let def = book(json!({}));
        let result = LaravelEloquentStrategy::new(StubRepository::embedded())
            .generate(&ctx(&def))
            .unwrap();

        assert_eq!(
            result.kinds(),
            vec![
                "dto.input",
                "factory",
                "model",
                "migration",
                "form_request",
                "controller",
                "routes",
                "test",
                "openapi"
            ]
        );
        assert_eq!(
            result.get("model").unwrap().path,
            PathBuf::from("/out/app/Models/Book.php")
        );
        assert_eq!(
            result.get("controller").unwrap().path,
            PathBuf::from("/out/app/Http/Controllers/BookController.php")
        );
        assert_eq!(result.get("routes").unwrap().path, PathBuf::from("/out/routes/api/book.php"));
        assert_eq!(
            result.get("form_request").unwrap().path,
            PathBuf::from("/out/app/Http/Requests/Book/BookRequest.php")
        );
    }

    #[test]
    fn test_strategy_respects_features() {
        let def = book(json!({"dto": false, "tests": false, "state": false}));
        let result = LaravelEloquentStrategy::new(StubRepository::embedded())
            .generate(&ctx(&def))
            .unwrap();
        assert_eq!(result.kinds(), vec!["factory", "model", "migration"]);
    }

    #[test]
    fn test_native_stack_skips_input_dto() {
        let mut def = book(json!({}));
        def.app = Some(crate::definition::AppDefinition {
            stack: Some("native".to_string()),
        });
        let result = LaravelEloquentStrategy::new(StubRepository::embedded())
            .generate(&ctx(&def))
            .unwrap();
        assert!(result.get("dto.input").is_none());
        assert!(result.get("openapi").is_some());
    }

    #[test]
    fn test_model_fillable_uses_foreign_keys() {
        let def = book(json!({"tenant": false, "audit": false}));
        assert_eq!(
            ModelGenerator::fillable(&ctx(&def)),
            vec!["title", "pages", "published_at", "author_id"]
        );
    }

    #[test]
    fn test_model_content() {
        let def = book(json!({}));
        let file = ModelGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();
        let content = &file.content;

        assert!(content.contains("class Book extends Model"));
        assert!(content.contains("use Illuminate\\Database\\Eloquent\\Concerns\\HasUuids;"));
        assert!(content.contains("    use SoftDeletes;\n"));
        assert!(content.contains("protected $table = 'books';"));
        assert!(content.contains("        'tenant_id',\n"));
        assert!(content.contains("        'author_id',\n"));
        assert!(!content.contains("        'tags',\n"));
        assert!(content.contains("protected $hidden = [\n        'tenant_id',\n    ];"));
        assert!(content.contains("'published_at' => 'datetime',"));
        assert!(content.contains("public function author(): BelongsTo"));
        assert!(content.contains("return $this->belongsTo(Author::class, 'author_id');"));
        assert!(content.contains("return $this->belongsToMany(Tag::class, 'books_tags');"));
        assert!(content.contains("return $this->hasMany(Chapter::class, 'book_id');"));
        assert!(content.contains("use Illuminate\\Database\\Eloquent\\Relations\\HasMany;"));
    }

    #[test]
    fn test_migration_file() {
        let def = book(json!({"tenant": false}));
        let file = MigrationGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();

        assert_eq!(
            file.path,
            PathBuf::from("/out/database/migrations/0001_01_01_100000_create_books_table.php")
        );
        assert!(file
            .content
            .contains("$table->foreignUuid('author_id')->constrained('authors');"));
        assert!(!file.content.contains("tenant_id"));
        assert!(!file.content.contains("tags"));
    }

    #[test]
    fn test_factory_definitions() {
        let def = book(json!({"tenant": false}));
        let file = FactoryGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();

        assert!(file.content.contains("use App\\Models\\Author;"));
        assert!(file.content.contains("'id' => (string) Str::uuid(),"));
        assert!(file.content.contains("'title' => $this->faker->sentence(3),"));
        assert!(file.content.contains("'pages' => $this->faker->numberBetween(1, 100),"));
        assert!(file.content.contains("'published_at' => $this->faker->dateTime(),"));
        assert!(file.content.contains("'author_id' => Author::factory(),"));
        assert!(!file.content.contains("Tenant"));
    }

    #[test]
    fn test_form_request_rules_and_security() {
        let def = book(json!({}));
        let config = GeneratorConfig {
            security_enabled: true,
            ..GeneratorConfig::default()
        };
        let ctx = GenerationContext::from(&def, "laravel", "/out", false, true, &config);
        let file = FormRequestGenerator::generate(&ctx, &StubRepository::embedded()).unwrap();

        assert!(file.content.contains("'title' => 'required|string',"));
        assert!(file.content.contains("'pages' => 'nullable|integer',"));
        assert!(file.content.contains("'author_id' => 'required|string',"));
        assert!(file.content.contains("'tags' => 'required|array',"));
        assert!(!file.content.contains("'chapters'"));
        assert!(file.content.contains("'APP_BOOK:CREATE'"));
        assert!(!file.content.contains("return true;"));
    }

    #[test]
    fn test_form_request_open_access() {
        let def = book(json!({}));
        let file =
            FormRequestGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();
        assert!(file.content.contains("return true;"));
        assert!(!file.content.contains("can($permission)"));
    }

    #[test]
    fn test_feature_test_payload() {
        let def = book(json!({}));
        let file =
            FeatureTestGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();

        assert_eq!(file.path, PathBuf::from("/out/tests/Feature/BookApiTest.php"));
        assert!(file.content.contains("private string $uri = '/books';"));
        assert!(file.content.contains("'title' => 'VAL-'.$uuid,"));
        assert!(file
            .content
            .contains("'author_id' => Author::factory()->create()->getKey(),"));
        assert!(file
            .content
            .contains("$this->assertDatabaseHas('books', ['title' => 'VAL-'.$uuid]);"));
        assert!(file.content.contains("$this->assertSoftDeleted($model);"));
    }

    #[test]
    fn test_controller_tenant_scoping_and_syncs() {
        let def = book(json!({}));
        let file = ControllerGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();
        let content = &file.content;

        assert!(content.contains("class BookController extends Controller"));
        assert!(content.contains("use App\\Http\\Requests\\Book\\BookRequest;"));
        assert!(content.contains(
            "        $tenantId = app(\\App\\Tenancy\\TenantContext::class)->requireId();\n"
        ));
        assert!(content.contains("$payload['tenant_id'] = $tenantId;"));
        assert!(content.contains(
            "return response()->json(Book::query()->where('tenant_id', $tenantId)->findOrFail($id));"
        ));
        assert!(content.contains("$request->query('itemsPerPage', '50')"));
        assert!(content.contains("$model->tags()->sync($request->input('tags', []));"));
        assert!(!content.contains("chapters()"));
        assert!(!content.contains("PermissionChecker"));
    }

    #[test]
    fn test_controller_without_tenant() {
        let def = book(json!({"tenant": false}));
        let file = ControllerGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();

        assert!(!file.content.contains("tenant_id"));
        assert!(file.content.contains("Book::query()->findOrFail($id)->delete();"));
    }

    #[test]
    fn test_controller_permissions() {
        let def = book(json!({}));
        let config = GeneratorConfig {
            security_enabled: true,
            default_permissions: vec!["LIST".to_string(), "DELETE".to_string()],
            ..GeneratorConfig::default()
        };
        let ctx = GenerationContext::from(&def, "laravel", "/out", false, true, &config);
        let file = ControllerGenerator::generate(&ctx, &StubRepository::embedded()).unwrap();
        let content = &file.content;

        assert!(content.contains("use App\\Security\\Rbac\\PermissionChecker;"));
        assert!(
            content.contains("public function __construct(private PermissionChecker $perm) {}")
        );
        assert!(content.contains("$this->perm->authorize('APP_BOOK:LIST');"));
        assert!(content.contains("$this->perm->authorize('APP_BOOK:DELETE');"));
        assert!(!content.contains("APP_BOOK:VIEW"));
    }

    #[test]
    fn test_routes_split_prefix_and_resource() {
        let mut def = book(json!({}));
        def.api.uri_prefix = "/books".to_string();
        let config = GeneratorConfig {
            uri_prefix: "/api/v1".to_string(),
            security_enabled: true,
            ..GeneratorConfig::default()
        };
        let ctx = GenerationContext::from(&def, "laravel", "/out", false, true, &config);

        let metadata = RoutesGenerator::metadata(&ctx);
        assert_eq!(metadata["prefix"], "api/v1");
        assert_eq!(metadata["resource"], "books");
        assert_eq!(metadata["middlewares"], "'api', 'auth:sanctum'");

        let file = RoutesGenerator::generate(&ctx, &StubRepository::embedded()).unwrap();
        assert!(file.content.contains("use App\\Http\\Controllers\\BookController;"));
        assert!(file.content.contains("    ->prefix('api/v1')\n"));
        assert!(file.content.contains("Route::apiResource('books', BookController::class);"));
    }

    #[test]
    fn test_routes_without_prefix() {
        let def = book(json!({}));
        let file = RoutesGenerator::generate(&ctx(&def), &StubRepository::embedded()).unwrap();

        assert!(file.content.contains("Route::middleware(['api'])\n    ->group("));
        assert!(!file.content.contains("->prefix("));
    }
}
