//! Symfony API Platform state layer
//!
//! With the `state` feature a Doctrine resource gets a repository, a mapper
//! between the entity and its DTOs, a resolver for relation identifiers, two
//! providers and two processors. Soft deletes switch the finders and the
//! delete logic; file fields switch the mapper onto `Base64FileService`.

use super::support::{self, is_belongs_to, SYSTEM_FIELDS};
use super::{GeneratedFile, GenerationContext};
use crate::definition::{Feature, FieldDefinition, RelationKind};
use crate::error::Result;
use crate::naming::Naming;
use crate::template::StubRepository;
use serde_json::{json, Value};

const DATE_CLASS: &str = "\\DateTimeImmutable";
const UUID_CLASS: &str = "\\Symfony\\Component\\Uid\\Uuid";

/// Stub name, class suffix and artifact kind of each state class
const STATE_CLASSES: [(&str, &str, &str); 6] = [
    ("symfony/state.mapper", "Mapper", "state.mapper"),
    ("symfony/state.payload_resolver", "PayloadResolver", "state.payload_resolver"),
    ("symfony/state.collection_provider", "CollectionProvider", "state.collection_provider"),
    ("symfony/state.item_provider", "ItemProvider", "state.item_provider"),
    ("symfony/state.write_processor", "WriteProcessor", "state.write_processor"),
    ("symfony/state.delete_processor", "DeleteProcessor", "state.delete_processor"),
];

/// `App\State\<Entity>`
#[must_use]
pub fn state_namespace(ctx: &GenerationContext<'_>) -> String {
    format!("App\\State\\{}", ctx.entity)
}

fn payload_fields<'a>(
    ctx: &'a GenerationContext<'_>,
) -> impl Iterator<Item = &'a FieldDefinition> {
    ctx.def
        .fields
        .iter()
        .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
}

/// Whether the input may write the field, matching the entity's write group
fn writable(field: &FieldDefinition) -> bool {
    match &field.relation {
        None => field.fillable,
        Some(relation) => {
            is_belongs_to(field)
                || (relation.kind == RelationKind::ManyToMany && relation.is_owning_side)
        }
    }
}

/// Repository with soft delete aware finders
pub struct RepositoryGenerator;

impl RepositoryGenerator {
    /// `src/Repository/<Entity>Repository.php`
    pub fn generate(ctx: &GenerationContext<'_>, stubs: &StubRepository) -> Result<GeneratedFile> {
        let metadata = json!({
            "entity": ctx.entity,
            "soft_deletes": ctx.has(Feature::SoftDeletes),
        });
        let content = stubs.render("symfony/state.repository", &metadata)?;
        Ok(GeneratedFile {
            path: ctx.path(format!("src/Repository/{}Repository.php", ctx.entity)),
            content,
            kind: "repository",
            description: format!("Doctrine repository for {}", ctx.entity),
        })
    }
}

/// Mapper, payload resolver, providers and processors
pub struct StateGenerator;

impl StateGenerator {
    /// Template variables shared by every state class
    #[must_use]
    pub fn metadata(ctx: &GenerationContext<'_>) -> Value {
        let soft_deletes = ctx.has(Feature::SoftDeletes);
        let (find_all, find_one) = if soft_deletes {
            ("findAllNotDeleted()", "findOneNotDeleted((string) $id)")
        } else {
            ("findAll()", "find($id)")
        };

        json!({
            "namespace": state_namespace(ctx),
            "entity": ctx.entity,
            "find_all": find_all,
            "find_one": find_one,
            "soft_deletes": soft_deletes,
            "hard_delete": !soft_deletes,
            "audit": ctx.has(Feature::Audit),
            "base64": ctx.has_files(),
            "to_output": Self::output_assignments(ctx),
            "apply": Self::apply_assignments(ctx),
        })
    }

    /// `$dto->...` lines copying the entity into the output DTO
    #[must_use]
    pub fn output_assignments(ctx: &GenerationContext<'_>) -> Vec<String> {
        let id = if ctx.def.api.uuid {
            "$entity->getId()?->toRfc4122()"
        } else {
            "$entity->getId()"
        };
        let mut lines = vec![format!("$dto->id = {id};")];

        for field in payload_fields(ctx).filter(|f| !f.hidden) {
            let property = Naming::camel(&field.name);
            let source = format!("$entity->{property}");
            let value = if field.is_collection() {
                format!(
                    "array_map(static fn ($item): string => (string) $item->getId(), {source}->toArray())"
                )
            } else if field.is_relation() {
                format!("{source} === null ? null : (string) {source}->getId()")
            } else {
                match support::entity_php_type(field).as_str() {
                    DATE_CLASS => format!("{source}?->format('c')"),
                    UUID_CLASS => format!("{source}?->toRfc4122()"),
                    _ => source,
                }
            };
            lines.push(format!("$dto->{property} = {value};"));
        }

        lines
    }

    /// `$entity->...` lines writing the input DTO onto the entity
    ///
    /// Collections are cleared and refilled from identifiers; single
    /// relations go through the payload resolver. File fields are stored
    /// through `Base64FileService` when the resource carries files.
    #[must_use]
    pub fn apply_assignments(ctx: &GenerationContext<'_>) -> Vec<String> {
        let mut lines = Vec::new();

        for field in payload_fields(ctx).filter(|f| writable(f)) {
            let property = Naming::camel(&field.name);
            let input = format!("$input->{property}");

            if let Some(relation) = &field.relation {
                let target = format!(
                    "\\App\\Entity\\{}::class",
                    Naming::studly(&relation.target_entity)
                );
                if relation.is_collection {
                    lines.push(format!("if ({input} !== null) {{"));
                    lines.push(format!("    $entity->{property}->clear();"));
                    lines.push(format!("    foreach ({input} as $id) {{"));
                    lines.push(format!(
                        "        $entity->{property}->add($this->resolver->resolve((string) $id, {target}));"
                    ));
                    lines.push("    }".to_string());
                    lines.push("}".to_string());
                } else {
                    lines.push(format!(
                        "$entity->{property} = $this->resolver->resolveNullable({input}, {target});"
                    ));
                }
                continue;
            }

            let value = if ctx.has_files() && field.carries_file() {
                format!(
                    "{input} === null ? null : $this->files->store((string) {input}, '{}/{property}')->storageKey",
                    ctx.entity_snake
                )
            } else {
                match support::entity_php_type(field).as_str() {
                    DATE_CLASS => {
                        format!("{input} === null ? null : new {DATE_CLASS}((string) {input})")
                    }
                    UUID_CLASS => {
                        format!("{input} === null ? null : {UUID_CLASS}::fromString({input})")
                    }
                    _ => input,
                }
            };
            lines.push(format!("$entity->{property} = {value};"));
        }

        lines
    }

    /// Every state class under `src/State/<Entity>/`
    pub fn generate(
        ctx: &GenerationContext<'_>,
        stubs: &StubRepository,
    ) -> Result<Vec<GeneratedFile>> {
        let metadata = Self::metadata(ctx);
        let entity = &ctx.entity;

        STATE_CLASSES
            .iter()
            .map(|&(stub, suffix, kind)| {
                let content = stubs.render(stub, &metadata)?;
                Ok(GeneratedFile {
                    path: ctx.path(format!("src/State/{entity}/{entity}{suffix}.php")),
                    content,
                    kind,
                    description: format!("{suffix} for {entity}"),
                })
            })
            .collect()
    }
}
