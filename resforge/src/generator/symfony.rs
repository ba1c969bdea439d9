//! Symfony / Doctrine generation
//!
//! Produces an API Platform resource on a Doctrine entity, a Foundry
//! factory, an `ApiTestCase`, the shared DTOs and the OpenAPI fragment. The
//! `state` feature adds the repository and state classes from
//! [`super::symfony_state`]. Properties are `camelCase`; column names stay
//! `snake_case`.

use super::common::{DtoGenerator, OpenApiGenerator};
use super::symfony_state::{state_namespace, RepositoryGenerator, StateGenerator};
use super::support::{
    self, foreign_key_column, is_belongs_to, pivot_table, resource_table, SYSTEM_FIELDS,
};
use super::{GeneratedFile, GenerationContext, GenerationResult, ResourceGenerationStrategy};
use crate::definition::{Feature, FieldDefinition, Relation, RelationKind};
use crate::error::Result;
use crate::naming::Naming;
use crate::template::StubRepository;
use serde_json::{json, Value};

const UUID_CLASS: &str = "Symfony\\Component\\Uid\\Uuid";
const AUDIT_TRAIT: &str = "App\\Entity\\Traits\\AuditTrait";
const SOFT_DELETE_TRAIT: &str = "App\\Entity\\Traits\\SoftDeleteTrait";

/// `symfony` framework with the `doctrine` (or `orm`) driver
pub struct SymfonyDoctrineStrategy {
    stubs: StubRepository,
}

impl SymfonyDoctrineStrategy {
    /// Strategy rendering from `stubs`
    #[must_use]
    pub const fn new(stubs: StubRepository) -> Self {
        Self { stubs }
    }

    /// The `tests` feature when the definition spells it out, else `tests.enabled`
    fn tests_enabled(ctx: &GenerationContext<'_>) -> bool {
        let explicit = ctx
            .def
            .raw
            .get("features")
            .and_then(|f| f.get("tests"))
            .is_some();

        if explicit {
            ctx.has(Feature::Tests)
        } else {
            ctx.def.tests.enabled
        }
    }
}

impl ResourceGenerationStrategy for SymfonyDoctrineStrategy {
    fn name(&self) -> &'static str {
        "symfony-doctrine"
    }

    fn supports(&self, ctx: &GenerationContext<'_>) -> bool {
        ctx.framework == "symfony" && matches!(ctx.def.driver.as_str(), "doctrine" | "orm")
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<GenerationResult> {
        let stubs = &self.stubs;
        let mut result = GenerationResult::new();

        if ctx.has(Feature::Dto) {
            result.push(DtoGenerator::generate_input(ctx, stubs)?);
            result.push(DtoGenerator::generate_output(ctx, stubs)?);
        }

        if ctx.has(Feature::Factories) {
            result.push(FactoryGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::Entity) {
            result.push(EntityGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::State) {
            result.push(RepositoryGenerator::generate(ctx, stubs)?);
            result.extend(StateGenerator::generate(ctx, stubs)?);
        }

        if Self::tests_enabled(ctx) {
            result.push(ApiTestGenerator::generate(ctx, stubs)?);
        }

        if ctx.has(Feature::Dto) {
            result.push(OpenApiGenerator::generate(ctx, stubs)?);
        }

        Ok(result)
    }
}

fn property_fields<'a>(
    ctx: &'a GenerationContext<'_>,
) -> impl Iterator<Item = &'a FieldDefinition> {
    ctx.def
        .fields
        .iter()
        .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
}

/// Doctrine entity carrying the API Platform resource
pub struct EntityGenerator;

impl EntityGenerator {
    /// Template variables for the entity
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let mut uses: Vec<&str> = Vec::new();
        let mut traits: Vec<&str> = Vec::new();
        let mut properties: Vec<Value> = Vec::new();
        let mut collections: Vec<String> = Vec::new();

        if ctx.def.api.uuid {
            uses.push(UUID_CLASS);
        }

        if ctx.has(Feature::Tenant) {
            properties.push(json!({
                "attributes": ["#[ORM\\Column(name: 'tenant_id', type: 'uuid', nullable: true)]"],
                "declaration": "public ?\\Symfony\\Component\\Uid\\Uuid $tenantId = null;",
            }));
        }

        for field in property_fields(ctx) {
            match &field.relation {
                Some(relation) => {
                    let (attributes, declaration) = Self::relation_property(ctx, field, relation);
                    if relation.is_collection {
                        collections.push(Naming::camel(&field.name));
                    }
                    properties.push(json!({"attributes": attributes, "declaration": declaration}));
                }
                None => {
                    let (attributes, declaration) = Self::scalar_property(ctx, field);
                    properties.push(json!({"attributes": attributes, "declaration": declaration}));
                }
            }
        }

        let asserts = property_fields(ctx)
            .filter(|f| !f.is_relation())
            .any(|f| !support::symfony_asserts(f).is_empty());
        if asserts {
            uses.push("Symfony\\Component\\Validator\\Constraints as Assert");
        }
        if !collections.is_empty() {
            uses.push("Doctrine\\Common\\Collections\\ArrayCollection");
            uses.push("Doctrine\\Common\\Collections\\Collection");
        }

        if ctx.has(Feature::Audit) {
            uses.push(AUDIT_TRAIT);
            traits.push("AuditTrait");
        }
        if ctx.has(Feature::SoftDeletes) {
            uses.push(SOFT_DELETE_TRAIT);
            traits.push("SoftDeleteTrait");
        }

        json!({
            "uses": uses,
            "repository": ctx.has(Feature::State),
            "table": resource_table(ctx.def),
            "groups_read": ctx.groups_read,
            "groups_write": ctx.groups_write,
            "entity": ctx.entity,
            "operations": Self::operations(ctx),
            "traits": traits,
            "id_property": Self::id_property(ctx),
            "properties": properties,
            "has_collections": !collections.is_empty(),
            "collections": collections,
        })
    }

    /// API Platform operations with their routes and access rules
    ///
    /// A `security` argument is emitted only when security is enabled and the
    /// action is one of the configured default permissions. With the `state`
    /// feature each operation names its generated provider or processor.
    #[must_use]
    pub fn operations(ctx: &GenerationContext<'_>) -> Vec<Value> {
        const OPERATIONS: [(&str, &str, bool, (&str, &str)); 5] = [
            ("GetCollection", "LIST", false, ("provider", "CollectionProvider")),
            ("Post", "CREATE", false, ("processor", "WriteProcessor")),
            ("Get", "VIEW", true, ("provider", "ItemProvider")),
            ("Patch", "UPDATE", true, ("processor", "WriteProcessor")),
            ("Delete", "DELETE", true, ("processor", "DeleteProcessor")),
        ];

        let collection = ctx.collection_uri();
        let state_namespace = state_namespace(ctx);

        OPERATIONS
            .iter()
            .map(|(class, action, item, (state_arg, state_class))| {
                let mut args = Vec::with_capacity(5);
                if *item {
                    args.push(format!("uriTemplate: '{collection}/{{id}}'"));
                    args.push(format!("requirements: ['id' => '{}']", ctx.id_requirement));
                } else {
                    args.push(format!("uriTemplate: '{collection}'"));
                }
                args.push(format!("name: '{}_{}'", ctx.op_base, action.to_lowercase()));

                if let Some(permission) = ctx.guarded_permission(action) {
                    args.push(format!("security: \"is_granted('{permission}')\""));
                }
                if ctx.has(Feature::State) {
                    args.push(format!(
                        "{state_arg}: \\{state_namespace}\\{}{state_class}::class",
                        ctx.entity
                    ));
                }

                json!({"class": class, "args": args.join(", ")})
            })
            .collect()
    }

    fn id_property(ctx: &GenerationContext<'_>) -> String {
        let (mapping, php_type) = if ctx.def.api.uuid {
            (
                concat!(
                    "    #[ORM\\Id]\n",
                    "    #[ORM\\Column(type: 'uuid', unique: true)]\n",
                    "    #[ORM\\GeneratedValue(strategy: 'CUSTOM')]\n",
                    "    #[ORM\\CustomIdGenerator(class: 'doctrine.uuid_generator')]",
                ),
                "Uuid",
            )
        } else {
            (
                "    #[ORM\\Id]\n    #[ORM\\GeneratedValue]\n    #[ORM\\Column(type: 'integer')]",
                "int",
            )
        };

        format!(
            "{mapping}\n    #[Groups(['{read}'])]\n    private ?{php_type} $id = null;\n\n    public function getId(): ?{php_type}\n    {{\n        return $this->id;\n    }}\n",
            read = ctx.groups_read,
        )
    }

    fn groups(ctx: &GenerationContext<'_>, writable: bool) -> String {
        if writable {
            format!("#[Groups(['{}', '{}'])]", ctx.groups_read, ctx.groups_write)
        } else {
            format!("#[Groups(['{}'])]", ctx.groups_read)
        }
    }

    fn scalar_property(
        ctx: &GenerationContext<'_>,
        field: &FieldDefinition,
    ) -> (Vec<String>, String) {
        let property = Naming::camel(&field.name);
        let doctrine = support::doctrine_type(field);

        let mut column = Vec::with_capacity(4);
        if property != field.name {
            column.push(format!("name: '{}'", field.name));
        }
        column.push(format!("type: '{doctrine}'"));
        if doctrine == "decimal" {
            column.push("precision: 15, scale: 2".to_string());
        }
        if field.nullable {
            column.push("nullable: true".to_string());
        }

        let mut attributes = vec![format!("#[ORM\\Column({})]", column.join(", "))];
        if field.hidden {
            attributes.push(format!("#[Groups(['{}'])]", ctx.groups_write));
        } else {
            attributes.push(Self::groups(ctx, field.fillable));
        }
        attributes.extend(support::symfony_asserts(field).into_iter().map(String::from));

        let declaration = format!(
            "public ?{} ${property} = null;",
            support::entity_php_type(field)
        );
        (attributes, declaration)
    }

    fn relation_property(
        ctx: &GenerationContext<'_>,
        field: &FieldDefinition,
        relation: &Relation,
    ) -> (Vec<String>, String) {
        let property = Naming::camel(&field.name);
        let target = Naming::studly(&relation.target_entity);
        let inversed_by = relation
            .inversed_by
            .as_deref()
            .map(|i| format!(", inversedBy: '{}'", Naming::camel(i)))
            .unwrap_or_default();
        let mapped_by = relation
            .mapped_by
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map_or_else(|| Naming::camel(&ctx.entity), Naming::camel);

        let join_column = format!(
            "#[ORM\\JoinColumn(name: '{}', nullable: {})]",
            foreign_key_column(&field.name),
            field.nullable
        );

        let mut attributes = Vec::with_capacity(3);
        match relation.kind {
            RelationKind::ManyToOne => {
                attributes.push(format!(
                    "#[ORM\\ManyToOne(targetEntity: {target}::class{inversed_by})]"
                ));
                attributes.push(join_column);
            }
            RelationKind::OneToOne if is_belongs_to(field) => {
                attributes.push(format!(
                    "#[ORM\\OneToOne(targetEntity: {target}::class{inversed_by})]"
                ));
                attributes.push(join_column);
            }
            RelationKind::OneToOne => {
                attributes.push(format!(
                    "#[ORM\\OneToOne(targetEntity: {target}::class, mappedBy: '{mapped_by}')]"
                ));
            }
            RelationKind::OneToMany => {
                attributes.push(format!(
                    "#[ORM\\OneToMany(targetEntity: {target}::class, mappedBy: '{mapped_by}')]"
                ));
            }
            RelationKind::ManyToMany if relation.is_owning_side => {
                attributes.push(format!(
                    "#[ORM\\ManyToMany(targetEntity: {target}::class{inversed_by})]"
                ));
                attributes.push(format!(
                    "#[ORM\\JoinTable(name: '{}')]",
                    pivot_table(&ctx.entity, &target)
                ));
            }
            RelationKind::ManyToMany => {
                attributes.push(format!(
                    "#[ORM\\ManyToMany(targetEntity: {target}::class, mappedBy: '{mapped_by}')]"
                ));
            }
        }

        let writable = is_belongs_to(field)
            || (relation.kind == RelationKind::ManyToMany && relation.is_owning_side);
        attributes.push(Self::groups(ctx, writable));

        let declaration = if relation.is_collection {
            format!("public Collection ${property};")
        } else {
            format!("public ?{target} ${property} = null;")
        };
        (attributes, declaration)
    }

    /// `src/Entity/<Entity>.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("symfony/entity", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("src/Entity/{}.php", ctx.entity)),
            content,
            kind: "entity",
            description: format!("Doctrine entity for {}", ctx.entity),
        })
    }
}

/// Foundry factory
pub struct FactoryGenerator;

impl FactoryGenerator {
    fn default_value(field: &FieldDefinition) -> String {
        let ty = field.normalized_type();
        if ty == "uuid" {
            return "\\Symfony\\Component\\Uid\\Uuid::v4()".to_string();
        }
        if support::is_date_like(field) {
            return "\\DateTimeImmutable::createFromMutable(self::faker()->dateTime())".to_string();
        }

        let call = format!("self::faker()->{}", support::faker_call(field));
        if support::doctrine_type(field) == "decimal" {
            format!("(string) {call}")
        } else {
            call
        }
    }

    /// Template variables for the factory
    ///
    /// Only required single-valued relations get a nested factory.
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let defaults: Vec<Value> = property_fields(ctx)
            .filter_map(|f| {
                let value = match &f.relation {
                    Some(relation) if is_belongs_to(f) && !f.nullable => format!(
                        "\\App\\Factory\\{}Factory::new()",
                        Naming::studly(&relation.target_entity)
                    ),
                    Some(_) => return None,
                    None => Self::default_value(f),
                };
                Some(json!({"key": Naming::camel(&f.name), "value": value}))
            })
            .collect();

        json!({
            "entity": ctx.entity,
            "defaults": defaults,
        })
    }

    /// `src/Factory/<Entity>Factory.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("symfony/factory", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("src/Factory/{}Factory.php", ctx.entity)),
            content,
            kind: "factory",
            description: format!("Foundry factory for {}", ctx.entity),
        })
    }
}

/// API Platform functional test
pub struct ApiTestGenerator;

impl ApiTestGenerator {
    /// Template variables for the test case
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let payload: Vec<Value> = property_fields(ctx)
            .filter(|f| !f.is_relation() && f.fillable)
            .map(|f| {
                json!({
                    "key": Naming::camel(&f.name),
                    "value": support::sample_value(f),
                })
            })
            .collect();

        json!({
            "entity": ctx.entity,
            "uri": ctx.collection_uri(),
            "payload": payload,
        })
    }

    /// `tests/ApiResource/<Entity>ApiTest.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let content = stubs.render("symfony/test.api", &Self::metadata(ctx))?;
        Ok(GeneratedFile {
            path: ctx.path(format!("tests/ApiResource/{}ApiTest.php", ctx.entity)),
            content,
            kind: "test",
            description: format!("API test for {}", ctx.entity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::definition::{DefinitionLoader, ResourceDefinition};
    use std::path::PathBuf;

    fn article(extra: Value) -> ResourceDefinition {
        let mut raw = json!({
            "entity": "Article",
            "table": "articles",
            "driver": "doctrine",
            "fields": [
                {"name": "title", "type": "string"},
                {"name": "word_count", "type": "int", "nullable": true},
                {"name": "price", "type": "decimal"},
                {"name": "published_at", "type": "datetime"},
                {
                    "name": "author",
                    "relationKind": "ManyToOne",
                    "targetEntity": "Author",
                    "isOwningSide": true,
                    "inversedBy": "articles"
                },
                {
                    "name": "tags",
                    "relationKind": "ManyToMany",
                    "targetEntity": "Tag",
                    "isCollection": true,
                    "isOwningSide": true
                },
                {
                    "name": "comments",
                    "relationKind": "OneToMany",
                    "targetEntity": "Comment",
                    "isCollection": true,
                    "mappedBy": "article"
                }
            ]
        });
        if let (Some(target), Some(extra)) = (raw.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        DefinitionLoader::new().hydrate(&raw).unwrap()
    }

    fn ctx<'a>(def: &'a ResourceDefinition, config: &GeneratorConfig) -> GenerationContext<'a> {
        GenerationContext::from(def, "symfony", "/out", false, true, config)
    }

    #[test]
    fn test_supports_doctrine_and_orm_only() {
        let strategy = SymfonyDoctrineStrategy::new(StubRepository::embedded());
        let config = GeneratorConfig::default();

        let def = article(json!({}));
        assert!(strategy.supports(&ctx(&def, &config)));

        let def = article(json!({"driver": "orm"}));
        assert!(strategy.supports(&ctx(&def, &config)));

        let def = article(json!({"driver": "eloquent"}));
        assert!(!strategy.supports(&ctx(&def, &config)));
        let laravel = GenerationContext::from(&def, "laravel", "/out", false, true, &config);
        assert!(!strategy.supports(&laravel));
    }

    #[test]
    fn test_strategy_file_set() {
        let def = article(json!({}));
        let config = GeneratorConfig::default();
        let result = SymfonyDoctrineStrategy::new(StubRepository::embedded())
            .generate(&ctx(&def, &config))
            .unwrap();

        assert_eq!(
            result.kinds(),
            vec![
                "dto.input",
                "dto.output",
                "factory",
                "entity",
                "repository",
                "state.mapper",
                "state.payload_resolver",
                "state.collection_provider",
                "state.item_provider",
                "state.write_processor",
                "state.delete_processor",
                "test",
                "openapi"
            ]
        );
        assert_eq!(
            result.get("entity").unwrap().path,
            PathBuf::from("/out/src/Entity/Article.php")
        );
        assert_eq!(
            result.get("test").unwrap().path,
            PathBuf::from("/out/tests/ApiResource/ArticleApiTest.php")
        );
    }

    #[test]
    fn test_state_feature_off_skips_state_layer() {
        let def = article(json!({"features": {"state": false}}));
        let config = GeneratorConfig::default();
        let result = SymfonyDoctrineStrategy::new(StubRepository::embedded())
            .generate(&ctx(&def, &config))
            .unwrap();

        assert!(result.get("repository").is_none());
        assert!(!result.kinds().iter().any(|k| k.starts_with("state.")));

        let entity = &result.get("entity").unwrap().content;
        assert!(entity.contains("#[ORM\\Entity]\n"));
        assert!(!entity.contains("provider:"));
    }

    #[test]
    fn test_tests_follow_tests_block_without_feature_key() {
        let config = GeneratorConfig::default();
        let strategy = SymfonyDoctrineStrategy::new(StubRepository::embedded());

        let def = article(json!({"tests": {"enabled": false}}));
        let result = strategy.generate(&ctx(&def, &config)).unwrap();
        assert!(result.get("test").is_none());

        let def = article(json!({"tests": {"enabled": false}, "features": {"tests": true}}));
        let result = strategy.generate(&ctx(&def, &config)).unwrap();
        assert!(result.get("test").is_some());

        let def = article(json!({"features": {"tests": false}}));
        let result = strategy.generate(&ctx(&def, &config)).unwrap();
        assert!(result.get("test").is_none());
    }

    #[test]
    fn test_entity_content() {
        let def = article(json!({}));
        let config = GeneratorConfig::default();
        let file =
            EntityGenerator::generate(&ctx(&def, &config), &StubRepository::embedded()).unwrap();
        let content = &file.content;

        assert!(content.contains(
            "#[ORM\\Entity(repositoryClass: \\App\\Repository\\ArticleRepository::class)]"
        ));
        assert!(content.contains("#[ORM\\Table(name: 'articles')]"));
        assert!(content.contains("normalizationContext: ['groups' => ['article:read']],"));
        assert!(content.contains("use Symfony\\Component\\Uid\\Uuid;"));
        assert!(content.contains("#[ORM\\CustomIdGenerator(class: 'doctrine.uuid_generator')]"));
        assert!(content.contains("public function getId(): ?Uuid"));
        assert!(content.contains("    use AuditTrait;\n"));
        assert!(content.contains("    use SoftDeleteTrait;\n"));
        assert!(content.contains("public ?\\Symfony\\Component\\Uid\\Uuid $tenantId = null;"));
        assert!(content.contains(
            "    #[ORM\\Column(name: 'word_count', type: 'integer', nullable: true)]\n    #[Groups(['article:read', 'article:write'])]\n    public ?int $wordCount = null;"
        ));
        assert!(content.contains("#[ORM\\Column(type: 'decimal', precision: 15, scale: 2)]"));
        assert!(
            content.contains("#[ORM\\Column(name: 'published_at', type: 'datetime_immutable')]")
        );
        assert!(content.contains(
            "#[ORM\\ManyToOne(targetEntity: Author::class, inversedBy: 'articles')]"
        ));
        assert!(content.contains("#[ORM\\JoinColumn(name: 'author_id', nullable: false)]"));
        assert!(content.contains("#[ORM\\JoinTable(name: 'articles_tags')]"));
        assert!(
            content.contains("#[ORM\\OneToMany(targetEntity: Comment::class, mappedBy: 'article')]")
        );
        assert!(content.contains("public Collection $comments;"));
        assert!(content.contains(
            "        $this->tags = new ArrayCollection();\n        $this->comments = new ArrayCollection();\n"
        ));
        assert!(content.contains("use Doctrine\\Common\\Collections\\ArrayCollection;"));
        assert!(!content.contains("is_granted"));
    }

    #[test]
    fn test_operations_with_security() {
        let mut def = article(json!({"api": {"uriPrefix": "/articles", "uuid": false}}));
        def.security = Some(crate::definition::SecurityDefinition {
            enabled: Some(true),
            prefix: None,
            module_code: Some("blog".to_string()),
        });
        let config = GeneratorConfig {
            uri_prefix: "/api".to_string(),
            default_permissions: vec!["LIST".to_string(), "view".to_string()],
            ..GeneratorConfig::default()
        };

        let operations = EntityGenerator::operations(&ctx(&def, &config));
        assert_eq!(operations.len(), 5);
        assert_eq!(
            operations[0]["args"],
            concat!(
                "uriTemplate: '/api/articles', name: 'article_list', ",
                "security: \"is_granted('APP_BLOG:LIST')\", ",
                "provider: \\App\\State\\Article\\ArticleCollectionProvider::class"
            )
        );
        assert_eq!(
            operations[1]["args"],
            concat!(
                "uriTemplate: '/api/articles', name: 'article_create', ",
                "processor: \\App\\State\\Article\\ArticleWriteProcessor::class"
            )
        );
        assert_eq!(
            operations[2]["args"],
            concat!(
                "uriTemplate: '/api/articles/{id}', requirements: ['id' => '\\d+'], ",
                "name: 'article_view', security: \"is_granted('APP_BLOG:VIEW')\", ",
                "provider: \\App\\State\\Article\\ArticleItemProvider::class"
            )
        );
        assert_eq!(operations[4]["class"], "Delete");
        assert!(operations[4]["args"]
            .as_str()
            .unwrap()
            .ends_with("processor: \\App\\State\\Article\\ArticleDeleteProcessor::class"));
    }

    #[test]
    fn test_integer_identifier() {
        let def = article(json!({"api": {"uuid": false}}));
        let config = GeneratorConfig::default();
        let file =
            EntityGenerator::generate(&ctx(&def, &config), &StubRepository::embedded()).unwrap();
        assert!(file.content.contains(
            "#[ORM\\Column(type: 'integer')]\n    #[Groups(['article:read'])]\n    private ?int $id = null;"
        ));
        assert!(!file.content.contains("use Symfony\\Component\\Uid\\Uuid;"));
    }

    #[test]
    fn test_factory_defaults() {
        let def = article(json!({}));
        let config = GeneratorConfig::default();
        let file =
            FactoryGenerator::generate(&ctx(&def, &config), &StubRepository::embedded()).unwrap();

        assert_eq!(file.path, PathBuf::from("/out/src/Factory/ArticleFactory.php"));
        assert!(file.content.contains("'title' => self::faker()->sentence(3),"));
        assert!(file.content.contains("'wordCount' => self::faker()->numberBetween(1, 100),"));
        assert!(file
            .content
            .contains("'price' => (string) self::faker()->randomFloat(2, 1, 1000),"));
        assert!(file.content.contains(
            "'publishedAt' => \\DateTimeImmutable::createFromMutable(self::faker()->dateTime()),"
        ));
        assert!(file.content.contains("'author' => \\App\\Factory\\AuthorFactory::new(),"));
        assert!(!file.content.contains("'tags'"));
    }

    #[test]
    fn test_api_test_payload() {
        let def = article(json!({}));
        let config = GeneratorConfig::default();
        let file =
            ApiTestGenerator::generate(&ctx(&def, &config), &StubRepository::embedded()).unwrap();

        assert!(file.content.contains("request('GET', '/articles')"));
        assert!(file.content.contains("'title' => 'VAL-'.$uuid,"));
        assert!(file.content.contains("'wordCount' => 123,"));
        assert!(file.content.contains("'publishedAt' => '2026-01-01',"));
        assert!(!file.content.contains("'author'"));
    }
}
