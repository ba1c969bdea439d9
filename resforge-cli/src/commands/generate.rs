//! `resforge generate`
//!
//! Loads every resource in a definition file, runs the matching generation
//! strategy for each one and writes the results.
//!
//! # Example
//!
//! ```bash
//! resforge generate app.jdl --out ./backend --dry-run
//! resforge generate book.yaml --framework laravel --force
//! ```

use super::load_definitions;
use anyhow::{Context, Result};
use clap::Args;
use console::style;
use resforge::config::ResforgeConfig;
use resforge::template::StubRepository;
use resforge::{GenerationContext, ResourceGenerator, WriteOutcome};
use std::path::PathBuf;

/// Generate code for every resource in a definition file
#[derive(Debug, Clone, Args)]
pub struct GenerateCommand {
    /// Definition file (`.jdl`, `.jh`, `.json`, `.yaml`, `.yml`)
    pub definition: PathBuf,

    /// Target framework (`laravel` or `symfony`); defaults to the definition's
    /// own setting, then the configuration
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Output root (default: `output.base_path` from configuration)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Report what would be written without touching the disk
    #[arg(long)]
    pub dry_run: bool,

    /// Extra configuration file merged over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// What one `generate` run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Resources processed without error
    pub resources: usize,
    /// Files written
    pub written: usize,
    /// Existing files left alone
    pub skipped: usize,
    /// Files reported by a dry run
    pub planned: usize,
    /// Entity name and error message for every resource that failed
    pub failed: Vec<(String, String)>,
}

impl GenerateReport {
    const fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written += 1,
            WriteOutcome::Skipped => self.skipped += 1,
            WriteOutcome::DryRun => self.planned += 1,
        }
    }

    /// Whether any resource failed
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl GenerateCommand {
    /// Command for `definition` with every option at its default
    #[must_use]
    pub const fn new(definition: PathBuf) -> Self {
        Self {
            definition,
            framework: None,
            out: None,
            force: false,
            dry_run: false,
            config: None,
        }
    }

    /// Execute the generate command
    ///
    /// A resource that fails is reported and recorded in the returned
    /// [`GenerateReport`]; the remaining resources are still generated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration cannot be loaded
    /// - The definition file is missing, unsupported or malformed
    pub fn execute(&self) -> Result<GenerateReport> {
        let config = ResforgeConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;
        let (definitions, detected) = load_definitions(&self.definition, &config.output.framework)?;

        let framework = self.framework.clone().unwrap_or(detected);
        let base_path = self
            .out
            .clone()
            .unwrap_or_else(|| config.output.base_path.clone());
        let generator =
            ResourceGenerator::new(StubRepository::new(config.output.stubs_dir.clone()));
        let generator_config = config.generator_config();

        println!(
            "\n{} {} {} {}",
            style("Generating").cyan().bold(),
            style(definitions.len()).green().bold(),
            style("resource(s) for").cyan().bold(),
            style(&framework).green().bold()
        );
        if self.dry_run {
            println!("{}", style("Dry run: nothing will be written").yellow());
        }

        let mut report = GenerateReport::default();

        for def in &definitions {
            let ctx = GenerationContext::from(
                def,
                &framework,
                base_path.clone(),
                self.force,
                self.dry_run,
                &generator_config,
            );

            println!("\n{}", style(&ctx.entity).green().bold());

            match generator.run(&ctx) {
                Ok(outcomes) => {
                    if outcomes.is_empty() {
                        println!(
                            "  {} no generator for framework '{}' with driver '{}'",
                            style("!").yellow(),
                            ctx.framework,
                            def.driver
                        );
                    }
                    for (path, outcome) in outcomes {
                        let tag = match outcome {
                            WriteOutcome::Written => style(outcome.to_string()).green(),
                            WriteOutcome::Skipped => style(outcome.to_string()).yellow(),
                            WriteOutcome::DryRun => style(outcome.to_string()).cyan(),
                        };
                        println!("  {tag} {}", style(path.display()).dim());
                        report.record(outcome);
                    }
                    report.resources += 1;
                }
                Err(err) => {
                    tracing::error!(
                        entity = %ctx.entity,
                        error = %err,
                        "resource generation failed"
                    );
                    println!("  {} {}", style("✗").red(), style(&err).red());
                    report.failed.push((ctx.entity.clone(), err.to_string()));
                }
            }
        }

        println!(
            "\n{} {} written, {} skipped, {} planned",
            style("Done:").cyan().bold(),
            report.written,
            report.skipped,
            report.planned
        );

        Ok(report)
    }
}
