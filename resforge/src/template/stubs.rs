//! Named generator stubs
//!
//! Every stub is embedded in the binary. A configured override directory
//! wins when it holds `<name>.stub`, so projects can restyle the generated
//! code without rebuilding.

use super::renderer::TemplateRenderer;
use crate::error::{ResforgeError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Eloquent model
pub const LARAVEL_MODEL: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;
{{#uses}}use {{.}};
{{/uses}}
class {{entity}} extends Model
{
    use HasFactory;
{{#traits}}    use {{.}};
{{/traits}}
    protected $table = '{{table}}';

    protected $fillable = [
{{#fillable}}        '{{.}}',
{{/fillable}}    ];
{{#has_hidden}}
    protected $hidden = [
{{#hidden}}        '{{.}}',
{{/hidden}}    ];
{{/has_hidden}}{{#has_casts}}
    protected $casts = [
{{#casts}}        '{{column}}' => '{{cast}}',
{{/casts}}    ];
{{/has_casts}}{{#relations}}
    public function {{method}}(): {{kind}}
    {
        return {{call}};
    }
{{/relations}}}
"##;

/// Schema builder migration creating the resource table
pub const LARAVEL_MIGRATION_CREATE_TABLE: &str = r##"<?php

declare(strict_types=1);

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    public function up(): void
    {
        Schema::create('{{table}}', function (Blueprint $table) {
{{#columns}}            {{.}}
{{/columns}}        });
    }

    public function down(): void
    {
        Schema::dropIfExists('{{table}}');
    }
};
"##;

/// Eloquent model factory
pub const LARAVEL_FACTORY: &str = r##"<?php

declare(strict_types=1);

namespace Database\Factories;

use App\Models\{{entity}};
{{#imports}}use App\Models\{{.}};
{{/imports}}use Illuminate\Database\Eloquent\Factories\Factory;
use Illuminate\Support\Str;

/**
 * @extends Factory<{{entity}}>
 */
class {{entity}}Factory extends Factory
{
    protected $model = {{entity}}::class;

    public function definition(): array
    {
        return [
{{#definitions}}            '{{key}}' => {{value}},
{{/definitions}}        ];
    }
}
"##;

/// Validated form request
pub const LARAVEL_FORM_REQUEST: &str = r##"<?php

declare(strict_types=1);

namespace App\Http\Requests\{{entity}};

use Illuminate\Foundation\Http\FormRequest;

class {{entity}}Request extends FormRequest
{
    public function authorize(): bool
    {
{{#security_enabled}}        $permission = $this->isMethod('POST') ? '{{permission_create}}' : '{{permission_update}}';

        return $this->user()?->can($permission) ?? false;
{{/security_enabled}}{{#open_access}}        return true;
{{/open_access}}    }

    public function rules(): array
    {
        return [
{{#rules}}            '{{field}}' => '{{rule}}',
{{/rules}}        ];
    }
}
"##;

/// HTTP feature test for the resource endpoints
pub const LARAVEL_TEST_FEATURE: &str = r##"<?php

declare(strict_types=1);

namespace Tests\Feature;

use App\Models\{{entity}};
use Illuminate\Foundation\Testing\RefreshDatabase;
use Illuminate\Support\Str;
use Tests\TestCase;

class {{entity}}ApiTest extends TestCase
{
    use RefreshDatabase;

    private string $uri = '{{uri}}';

    public function test_list_returns_ok(): void
    {
        {{entity}}::factory()->count(3)->create();

        $this->getJson($this->uri)->assertOk();
    }

    public function test_show_returns_resource(): void
    {
        $model = {{entity}}::factory()->create();

        $this->getJson($this->uri.'/'.$model->getKey())->assertOk();
    }

    public function test_create_persists_resource(): void
    {
        $uuid = (string) Str::uuid();

        $this->postJson($this->uri, [
{{#payload}}            '{{key}}' => {{value}},
{{/payload}}        ])->assertCreated();
{{#has_unique}}
        $this->assertDatabaseHas('{{table}}', ['{{unique_field}}' => {{unique_value}}]);
{{/has_unique}}    }

    public function test_delete_removes_resource(): void
    {
        $model = {{entity}}::factory()->create();

        $this->deleteJson($this->uri.'/'.$model->getKey())->assertNoContent();
{{#soft_deletes}}        $this->assertSoftDeleted($model);
{{/soft_deletes}}    }
}
"##;

/// API controller backing the resource routes
pub const LARAVEL_CONTROLLER: &str = r##"<?php

declare(strict_types=1);

namespace App\Http\Controllers;

use App\Http\Requests\{{entity}}\{{entity}}Request;
use App\Models\{{entity}};
{{#guarded}}use App\Security\Rbac\PermissionChecker;
{{/guarded}}use Illuminate\Http\JsonResponse;
use Illuminate\Http\Request;
use Illuminate\Http\Response;

class {{entity}}Controller extends Controller
{
{{#guarded}}    public function __construct(private PermissionChecker $perm) {}

{{/guarded}}    public function index(Request $request): JsonResponse
    {
{{#permission_list}}        $this->perm->authorize('{{permission_list}}');
{{/permission_list}}{{#tenant}}        {{tenant_line}}
{{/tenant}}        $perPage = (int) $request->query('itemsPerPage', '{{items_per_page}}');

        return response()->json({{query}}->paginate($perPage));
    }

    public function show(string $id): JsonResponse
    {
{{#permission_view}}        $this->perm->authorize('{{permission_view}}');
{{/permission_view}}{{#tenant}}        {{tenant_line}}
{{/tenant}}
        return response()->json({{find_one}});
    }

    public function store({{entity}}Request $request): JsonResponse
    {
        $payload = $request->validated();
{{#tenant}}        {{tenant_line}}
        $payload['tenant_id'] = $tenantId;
{{/tenant}}
        $model = {{entity}}::query()->create($payload);
{{#syncs}}        $model->{{method}}()->sync($request->input('{{field}}', []));
{{/syncs}}
        return response()->json($model, Response::HTTP_CREATED);
    }

    public function update({{entity}}Request $request, string $id): JsonResponse
    {
{{#tenant}}        {{tenant_line}}
{{/tenant}}        $model = {{find_one}};
        $model->update($request->validated());
{{#syncs}}        $model->{{method}}()->sync($request->input('{{field}}', []));
{{/syncs}}
        return response()->json($model);
    }

    public function destroy(string $id): Response
    {
{{#permission_delete}}        $this->perm->authorize('{{permission_delete}}');
{{/permission_delete}}{{#tenant}}        {{tenant_line}}
{{/tenant}}        {{find_one}}->delete();

        return response()->noContent();
    }
}
"##;

/// Route group registering the resource controller
pub const LARAVEL_ROUTES: &str = r##"<?php

declare(strict_types=1);

use App\Http\Controllers\{{entity}}Controller;
use Illuminate\Support\Facades\Route;

Route::middleware([{{middlewares}}])
{{#prefix}}    ->prefix('{{prefix}}')
{{/prefix}}    ->group(function (): void {
        Route::apiResource('{{resource}}', {{entity}}Controller::class);
    });
"##;

/// Doctrine entity exposed as an API resource
pub const SYMFONY_ENTITY: &str = r##"<?php

declare(strict_types=1);

namespace App\Entity;

use ApiPlatform\Metadata\ApiResource;
use ApiPlatform\Metadata\Delete;
use ApiPlatform\Metadata\Get;
use ApiPlatform\Metadata\GetCollection;
use ApiPlatform\Metadata\Patch;
use ApiPlatform\Metadata\Post;
use Doctrine\ORM\Mapping as ORM;
use Symfony\Component\Serializer\Attribute\Groups;
{{#uses}}use {{.}};
{{/uses}}
#[ORM\Entity{{#repository}}(repositoryClass: \App\Repository\{{entity}}Repository::class){{/repository}}]
#[ORM\Table(name: '{{table}}')]
#[ApiResource(
    normalizationContext: ['groups' => ['{{groups_read}}']],
    denormalizationContext: ['groups' => ['{{groups_write}}']],
    input: \App\Dto\{{entity}}\{{entity}}Input::class,
    output: \App\Dto\{{entity}}\{{entity}}Output::class,
    operations: [
{{#operations}}        new {{class}}({{args}}),
{{/operations}}    ],
)]
class {{entity}}
{
{{#traits}}    use {{.}};

{{/traits}}{{id_property}}
{{#properties}}{{#attributes}}    {{.}}
{{/attributes}}    {{declaration}}

{{/properties}}{{#has_collections}}    public function __construct()
    {
{{#collections}}        $this->{{.}} = new ArrayCollection();
{{/collections}}    }
{{/has_collections}}}
"##;

/// Foundry factory for the entity
pub const SYMFONY_FACTORY: &str = r##"<?php

declare(strict_types=1);

namespace App\Factory;

use App\Entity\{{entity}};
use Zenstruck\Foundry\Persistence\PersistentProxyObjectFactory;

/**
 * @extends PersistentProxyObjectFactory<{{entity}}>
 */
final class {{entity}}Factory extends PersistentProxyObjectFactory
{
    public static function class(): string
    {
        return {{entity}}::class;
    }

    protected function defaults(): array|callable
    {
        return [
{{#defaults}}            '{{key}}' => {{value}},
{{/defaults}}        ];
    }
}
"##;

/// API Platform functional test
pub const SYMFONY_TEST_API: &str = r##"<?php

declare(strict_types=1);

namespace App\Tests\ApiResource;

use ApiPlatform\Symfony\Bundle\Test\ApiTestCase;
use App\Factory\{{entity}}Factory;
use Symfony\Component\Uid\Uuid;
use Zenstruck\Foundry\Test\Factories;
use Zenstruck\Foundry\Test\ResetDatabase;

final class {{entity}}ApiTest extends ApiTestCase
{
    use Factories;
    use ResetDatabase;

    public function testGetCollection(): void
    {
        {{entity}}Factory::createMany(3);

        static::createClient()->request('GET', '{{uri}}');

        self::assertResponseIsSuccessful();
    }

    public function testCreate(): void
    {
        $uuid = (string) Uuid::v4();

        static::createClient()->request('POST', '{{uri}}', ['json' => [
{{#payload}}            '{{key}}' => {{value}},
{{/payload}}        ]]);

        self::assertResponseStatusCodeSame(201);
    }

    public function testDelete(): void
    {
        $item = {{entity}}Factory::createOne();

        static::createClient()->request('DELETE', '{{uri}}/'.$item->getId());

        self::assertResponseStatusCodeSame(204);
    }
}
"##;

/// Doctrine repository with the soft delete aware finders
pub const SYMFONY_STATE_REPOSITORY: &str = r##"<?php

declare(strict_types=1);

namespace App\Repository;

use App\Entity\{{entity}};
use Doctrine\Bundle\DoctrineBundle\Repository\ServiceEntityRepository;
use Doctrine\Persistence\ManagerRegistry;

/**
 * @extends ServiceEntityRepository<{{entity}}>
 */
class {{entity}}Repository extends ServiceEntityRepository
{
    public function __construct(ManagerRegistry $registry)
    {
        parent::__construct($registry, {{entity}}::class);
    }
{{#soft_deletes}}
    /**
     * @return list<{{entity}}>
     */
    public function findAllNotDeleted(): array
    {
        return $this->createQueryBuilder('e')
            ->andWhere('e.deletedAt IS NULL')
            ->getQuery()
            ->getResult();
    }

    public function findOneNotDeleted(string $id): ?{{entity}}
    {
        return $this->createQueryBuilder('e')
            ->andWhere('e.id = :id')
            ->andWhere('e.deletedAt IS NULL')
            ->setParameter('id', $id)
            ->getQuery()
            ->getOneOrNullResult();
    }
{{/soft_deletes}}}
"##;

/// Entity to output DTO and input DTO to entity mapping
pub const SYMFONY_STATE_MAPPER: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use App\Dto\{{entity}}\{{entity}}Input;
use App\Dto\{{entity}}\{{entity}}Output;
use App\Entity\{{entity}};
{{#base64}}use App\Service\Base64FileService;
{{/base64}}
final class {{entity}}Mapper
{
    public function __construct(
        private {{entity}}PayloadResolver $resolver,
{{#base64}}        private Base64FileService $files,
{{/base64}}    ) {
    }

    public function toOutput({{entity}} $entity): {{entity}}Output
    {
        $dto = new {{entity}}Output();
{{#to_output}}        {{.}}
{{/to_output}}
        return $dto;
    }

    public function apply({{entity}}Input $input, {{entity}} $entity): void
    {
{{#apply}}        {{.}}
{{/apply}}    }
}
"##;

/// Resolves relation identifiers from a payload to managed entities
pub const SYMFONY_STATE_PAYLOAD_RESOLVER: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use Doctrine\ORM\EntityManagerInterface;
use Symfony\Component\HttpKernel\Exception\UnprocessableEntityHttpException;

final class {{entity}}PayloadResolver
{
    public function __construct(private EntityManagerInterface $em)
    {
    }

    /**
     * @template T of object
     *
     * @param class-string<T> $class
     *
     * @return T
     */
    public function resolve(string $id, string $class): object
    {
        $found = $this->em->find($class, $id);
        if ($found === null) {
            throw new UnprocessableEntityHttpException(sprintf('%s "%s" not found.', $class, $id));
        }

        return $found;
    }

    /**
     * @template T of object
     *
     * @param class-string<T> $class
     *
     * @return T|null
     */
    public function resolveNullable(?string $id, string $class): ?object
    {
        return $id === null || $id === '' ? null : $this->resolve($id, $class);
    }
}
"##;

/// Collection provider
pub const SYMFONY_STATE_COLLECTION_PROVIDER: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use ApiPlatform\Metadata\Operation;
use ApiPlatform\State\ProviderInterface;
use App\Dto\{{entity}}\{{entity}}Output;
use App\Repository\{{entity}}Repository;

/**
 * @implements ProviderInterface<{{entity}}Output>
 */
final class {{entity}}CollectionProvider implements ProviderInterface
{
    public function __construct(
        private {{entity}}Repository $repository,
        private {{entity}}Mapper $mapper,
    ) {
    }

    /**
     * @return list<{{entity}}Output>
     */
    public function provide(Operation $operation, array $uriVariables = [], array $context = []): array
    {
        return array_map(
            fn ($entity) => $this->mapper->toOutput($entity),
            $this->repository->{{find_all}},
        );
    }
}
"##;

/// Item provider
pub const SYMFONY_STATE_ITEM_PROVIDER: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use ApiPlatform\Metadata\Operation;
use ApiPlatform\State\ProviderInterface;
use App\Dto\{{entity}}\{{entity}}Output;
use App\Repository\{{entity}}Repository;

/**
 * @implements ProviderInterface<{{entity}}Output>
 */
final class {{entity}}ItemProvider implements ProviderInterface
{
    public function __construct(
        private {{entity}}Repository $repository,
        private {{entity}}Mapper $mapper,
    ) {
    }

    public function provide(Operation $operation, array $uriVariables = [], array $context = []): ?{{entity}}Output
    {
        $id = $uriVariables['id'] ?? null;
        $entity = $id === null ? null : $this->repository->{{find_one}};

        return $entity === null ? null : $this->mapper->toOutput($entity);
    }
}
"##;

/// Create and update processor
pub const SYMFONY_STATE_WRITE_PROCESSOR: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use ApiPlatform\Metadata\Operation;
use ApiPlatform\State\ProcessorInterface;
use App\Dto\{{entity}}\{{entity}}Input;
use App\Dto\{{entity}}\{{entity}}Output;
use App\Entity\{{entity}};
use App\Repository\{{entity}}Repository;
use Doctrine\ORM\EntityManagerInterface;
use Symfony\Component\HttpKernel\Exception\NotFoundHttpException;

/**
 * @implements ProcessorInterface<{{entity}}Input, {{entity}}Output>
 */
final class {{entity}}WriteProcessor implements ProcessorInterface
{
    public function __construct(
        private EntityManagerInterface $em,
        private {{entity}}Repository $repository,
        private {{entity}}Mapper $mapper,
    ) {
    }

    public function process(mixed $data, Operation $operation, array $uriVariables = [], array $context = []): {{entity}}Output
    {
        $id = $uriVariables['id'] ?? null;
        $entity = $id === null ? new {{entity}}() : $this->repository->{{find_one}};
        if ($entity === null) {
            throw new NotFoundHttpException('{{entity}} not found.');
        }

        $this->mapper->apply($data, $entity);
{{#audit}}
        $now = new \DateTimeImmutable();
        $entity->createdAt ??= $now;
        $entity->updatedAt = $now;
{{/audit}}
        $this->em->persist($entity);
        $this->em->flush();

        return $this->mapper->toOutput($entity);
    }
}
"##;

/// Delete processor
pub const SYMFONY_STATE_DELETE_PROCESSOR: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use ApiPlatform\Metadata\Operation;
use ApiPlatform\State\ProcessorInterface;
use App\Repository\{{entity}}Repository;
use Doctrine\ORM\EntityManagerInterface;
use Symfony\Component\HttpKernel\Exception\NotFoundHttpException;

/**
 * @implements ProcessorInterface<mixed, null>
 */
final class {{entity}}DeleteProcessor implements ProcessorInterface
{
    public function __construct(
        private EntityManagerInterface $em,
        private {{entity}}Repository $repository,
    ) {
    }

    public function process(mixed $data, Operation $operation, array $uriVariables = [], array $context = []): null
    {
        $id = $uriVariables['id'] ?? null;
        $entity = $id === null ? null : $this->repository->{{find_one}};
        if ($entity === null) {
            throw new NotFoundHttpException('{{entity}} not found.');
        }

{{#soft_deletes}}        $entity->softDelete();
{{/soft_deletes}}{{#hard_delete}}        $this->em->remove($entity);
{{/hard_delete}}        $this->em->flush();

        return null;
    }
}
"##;

/// Write-side data transfer object
pub const COMMON_DTO_INPUT: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

{{#uses}}use {{.}};
{{/uses}}
final class {{entity}}Input
{
{{#properties}}{{#attributes}}    {{.}}
{{/attributes}}    public {{php_type}} ${{property}} = null;

{{/properties}}}
"##;

/// Read-side data transfer object
pub const COMMON_DTO_OUTPUT: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

use Symfony\Component\Serializer\Attribute\Groups;

final class {{entity}}Output
{
{{#properties}}    #[Groups(['{{groups_read}}'])]
    public {{php_type}} ${{property}}{{default}};

{{/properties}}}
"##;

/// OpenAPI schema fragment for the resource payload
pub const COMMON_OPENAPI_SCHEMA: &str = r##"<?php

declare(strict_types=1);

namespace {{namespace}};

final class {{entity}}Schema
{
    public static function schema(): array
    {
        $schema = [
            'type' => 'object',
            'properties' => [
{{#properties}}                '{{name}}' => new \ArrayObject([{{attrs}}]),
{{/properties}}            ],
        ];
{{#has_required}}
        $schema['required'] = [{{required}}];
{{/has_required}}
        return $schema;
    }
}
"##;

/// Every embedded stub by name
const EMBEDDED: &[(&str, &str)] = &[
    ("laravel/model", LARAVEL_MODEL),
    ("laravel/migration.create_table", LARAVEL_MIGRATION_CREATE_TABLE),
    ("laravel/factory", LARAVEL_FACTORY),
    ("laravel/form_request", LARAVEL_FORM_REQUEST),
    ("laravel/test.feature", LARAVEL_TEST_FEATURE),
    ("laravel/controller", LARAVEL_CONTROLLER),
    ("laravel/routes", LARAVEL_ROUTES),
    ("symfony/entity", SYMFONY_ENTITY),
    ("symfony/factory", SYMFONY_FACTORY),
    ("symfony/test.api", SYMFONY_TEST_API),
    ("symfony/state.repository", SYMFONY_STATE_REPOSITORY),
    ("symfony/state.mapper", SYMFONY_STATE_MAPPER),
    ("symfony/state.payload_resolver", SYMFONY_STATE_PAYLOAD_RESOLVER),
    ("symfony/state.collection_provider", SYMFONY_STATE_COLLECTION_PROVIDER),
    ("symfony/state.item_provider", SYMFONY_STATE_ITEM_PROVIDER),
    ("symfony/state.write_processor", SYMFONY_STATE_WRITE_PROCESSOR),
    ("symfony/state.delete_processor", SYMFONY_STATE_DELETE_PROCESSOR),
    ("common/dto.input", COMMON_DTO_INPUT),
    ("common/dto.output", COMMON_DTO_OUTPUT),
    ("common/openapi.schema", COMMON_OPENAPI_SCHEMA),
];

/// Resolves stub names to template text
#[derive(Debug, Clone, Default)]
pub struct StubRepository {
    override_dir: Option<PathBuf>,
}

impl StubRepository {
    /// Repository with an optional override directory
    #[must_use]
    pub const fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// Embedded stubs only
    #[must_use]
    pub const fn embedded() -> Self {
        Self { override_dir: None }
    }

    /// Names of all embedded stubs
    pub fn names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }

    /// Configured override directory
    #[must_use]
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Template text for `name`
    ///
    /// # Errors
    ///
    /// Returns [`ResforgeError::StubNotFound`] for an unknown name, or an I/O
    /// error if an override file exists but cannot be read.
    pub fn get(&self, name: &str) -> Result<String> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(format!("{name}.stub"));
            if path.is_file() {
                tracing::debug!(stub = name, path = %path.display(), "using override stub");
                return Ok(fs::read_to_string(path)?);
            }
        }

        EMBEDDED
            .iter()
            .find(|(stub, _)| *stub == name)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| ResforgeError::StubNotFound(name.to_string()))
    }

    /// Fetch `name` and render it against `vars`
    pub fn render(&self, name: &str, vars: &Value) -> Result<String> {
        Ok(TemplateRenderer::render(&self.get(name)?, vars))
    }
}
