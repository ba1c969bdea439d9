//! `resforge inspect`

use super::load_definitions;
use anyhow::{Context, Result};
use clap::Args;
use resforge::config::ResforgeConfig;
use serde_json::json;
use std::path::PathBuf;

/// Print the resolved resource model as JSON
#[derive(Debug, Clone, Args)]
pub struct InspectCommand {
    /// Definition file (`.jdl`, `.jh`, `.json`, `.yaml`, `.yml`)
    pub definition: PathBuf,

    /// Extra configuration file merged over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl InspectCommand {
    /// Command for `definition`
    #[must_use]
    pub const fn new(definition: PathBuf) -> Self {
        Self {
            definition,
            config: None,
        }
    }

    /// `{"framework": ..., "resources": [...]}`, pretty printed
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the definition file cannot be
    /// loaded.
    pub fn render(&self) -> Result<String> {
        let config = ResforgeConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;
        let (definitions, framework) =
            load_definitions(&self.definition, &config.output.framework)?;

        let out = json!({
            "framework": framework,
            "resources": definitions,
        });
        serde_json::to_string_pretty(&out).context("Failed to serialize resources")
    }

    /// Execute the inspect command
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn execute(&self) -> Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }
}
