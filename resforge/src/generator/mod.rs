//! Code generation orchestrator
//!
//! A [`ResourceGenerator`] holds the registered
//! [`ResourceGenerationStrategy`] implementations. For each
//! [`GenerationContext`] it picks the first strategy that supports the
//! context's framework and driver, collects the files that strategy renders,
//! and hands them to the [`FileWriter`].
//!
//! Built-in strategies:
//! - [`laravel::LaravelEloquentStrategy`]: `laravel` + `eloquent`
//! - [`symfony::SymfonyDoctrineStrategy`]: `symfony` + `doctrine` / `orm`

pub mod common;
pub mod context;
pub mod laravel;
pub mod support;
pub mod symfony;
pub mod symfony_state;

pub use context::GenerationContext;

use crate::error::Result;
use crate::template::StubRepository;
use crate::writer::{FileWriter, WriteOutcome};
use std::path::PathBuf;

/// Represents a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Destination path (output root already applied)
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// Short artifact tag (`model`, `migration`, `dto.input`, ...)
    pub kind: &'static str,
    /// File description for user feedback
    pub description: String,
}

/// Files produced for one resource, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    /// Generated files
    pub files: Vec<GeneratedFile>,
}

impl GenerationResult {
    /// Empty result
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Append one file
    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was generated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First file of the given kind
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    /// Kinds in generation order
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.files.iter().map(|f| f.kind).collect()
    }
}

impl Extend<GeneratedFile> for GenerationResult {
    fn extend<T: IntoIterator<Item = GeneratedFile>>(&mut self, iter: T) {
        self.files.extend(iter);
    }
}

impl IntoIterator for GenerationResult {
    type Item = GeneratedFile;
    type IntoIter = std::vec::IntoIter<GeneratedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// One framework / driver combination
pub trait ResourceGenerationStrategy {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy handles the context
    fn supports(&self, ctx: &GenerationContext<'_>) -> bool;

    /// Render every file this strategy produces for the resource
    fn generate(&self, ctx: &GenerationContext<'_>) -> Result<GenerationResult>;
}

/// Strategy dispatcher
pub struct ResourceGenerator {
    strategies: Vec<Box<dyn ResourceGenerationStrategy>>,
    writer: FileWriter,
}

impl ResourceGenerator {
    /// Generator with the built-in strategies rendering from `stubs`
    #[must_use]
    pub fn new(stubs: StubRepository) -> Self {
        Self {
            strategies: vec![
                Box::new(laravel::LaravelEloquentStrategy::new(stubs.clone())),
                Box::new(symfony::SymfonyDoctrineStrategy::new(stubs)),
            ],
            writer: FileWriter::new(),
        }
    }

    /// Register a strategy ahead of the existing ones
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn ResourceGenerationStrategy>) -> Self {
        self.strategies.insert(0, strategy);
        self
    }

    /// First registered strategy supporting `ctx`
    #[must_use]
    pub fn strategy_for(
        &self,
        ctx: &GenerationContext<'_>,
    ) -> Option<&dyn ResourceGenerationStrategy> {
        self.strategies
            .iter()
            .find(|s| s.supports(ctx))
            .map(Box::as_ref)
    }

    /// Render the files for `ctx`; empty when no strategy applies
    pub fn generate(&self, ctx: &GenerationContext<'_>) -> Result<GenerationResult> {
        let Some(strategy) = self.strategy_for(ctx) else {
            tracing::debug!(
                entity = %ctx.entity,
                framework = %ctx.framework,
                driver = %ctx.def.driver,
                "no strategy supports this resource"
            );
            return Ok(GenerationResult::new());
        };

        tracing::debug!(entity = %ctx.entity, strategy = strategy.name(), "generating resource");
        strategy.generate(ctx)
    }

    /// Write `result` honouring the context's force and dry-run switches
    pub fn write(
        &self,
        ctx: &GenerationContext<'_>,
        result: &GenerationResult,
    ) -> Result<Vec<(PathBuf, WriteOutcome)>> {
        result
            .files
            .iter()
            .map(|file| {
                let outcome = self
                    .writer
                    .write(&file.path, &file.content, ctx.force, ctx.dry_run)?;
                Ok((file.path.clone(), outcome))
            })
            .collect()
    }

    /// [`generate`](Self::generate) then [`write`](Self::write)
    pub fn run(&self, ctx: &GenerationContext<'_>) -> Result<Vec<(PathBuf, WriteOutcome)>> {
        let result = self.generate(ctx)?;
        self.write(ctx, &result)
    }
}

impl Default for ResourceGenerator {
    fn default() -> Self {
        Self::new(StubRepository::embedded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::definition::{DefinitionLoader, ResourceDefinition};
    use serde_json::json;
    use tempfile::tempdir;

    fn book(driver: &str) -> ResourceDefinition {
        DefinitionLoader::new()
            .hydrate(&json!({
                "entity": "Book",
                "table": "books",
                "driver": driver,
                "fields": [
                    {"name": "title", "type": "string"},
                    {"name": "pages", "type": "int", "nullable": true}
                ]
            }))
            .unwrap()
    }

    struct Marker;

    impl ResourceGenerationStrategy for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn supports(&self, ctx: &GenerationContext<'_>) -> bool {
            ctx.framework == "laravel"
        }

        fn generate(&self, ctx: &GenerationContext<'_>) -> Result<GenerationResult> {
            let mut result = GenerationResult::new();
            result.push(GeneratedFile {
                path: ctx.path("MARKER"),
                content: ctx.entity.clone(),
                kind: "marker",
                description: "marker".to_string(),
            });
            Ok(result)
        }
    }

    #[test]
    fn test_picks_strategy_by_framework_and_driver() {
        let generator = ResourceGenerator::default();
        let config = GeneratorConfig::default();

        let def = book("eloquent");
        let ctx = GenerationContext::from(&def, "laravel", ".", false, true, &config);
        assert_eq!(generator.strategy_for(&ctx).map(|s| s.name()), Some("laravel-eloquent"));

        let def = book("orm");
        let ctx = GenerationContext::from(&def, "symfony", ".", false, true, &config);
        assert_eq!(generator.strategy_for(&ctx).map(|s| s.name()), Some("symfony-doctrine"));
    }

    #[test]
    fn test_unsupported_combination_is_empty() {
        let def = book("doctrine");
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::from(&def, "laravel", ".", false, true, &config);
        let result = ResourceGenerator::default().generate(&ctx).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_registered_strategy_takes_precedence() {
        let def = book("eloquent");
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::from(&def, "laravel", ".", false, true, &config);
        let generator = ResourceGenerator::default().with_strategy(Box::new(Marker));

        let result = generator.generate(&ctx).unwrap();
        assert_eq!(result.kinds(), vec!["marker"]);
        assert_eq!(result.get("marker").unwrap().content, "Book");
    }

    #[test]
    fn test_run_writes_then_skips() {
        let dir = tempdir().unwrap();
        let def = book("eloquent");
        let generator = ResourceGenerator::default();
        let config = GeneratorConfig::default();

        let ctx = GenerationContext::from(&def, "laravel", dir.path(), false, false, &config);
        let first = generator.run(&ctx).unwrap();
        assert!(!first.is_empty());
        assert!(first.iter().all(|(_, outcome)| *outcome == WriteOutcome::Written));
        assert!(dir.path().join("app/Models/Book.php").is_file());

        let second = generator.run(&ctx).unwrap();
        let skipped = second.iter().filter(|(_, o)| *o == WriteOutcome::Skipped).count();
        assert_eq!(skipped, second.len());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let def = book("eloquent");
        let config = GeneratorConfig::default();
        let ctx = GenerationContext::from(&def, "laravel", dir.path(), false, true, &config);

        let outcomes = ResourceGenerator::default().run(&ctx).unwrap();
        assert!(outcomes.iter().all(|(_, o)| *o == WriteOutcome::DryRun));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
