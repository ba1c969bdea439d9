//! CLI command implementations

pub mod generate;
pub mod inspect;

pub use generate::{GenerateCommand, GenerateReport};
pub use inspect::InspectCommand;

use anyhow::{Context, Result};
use resforge::jdl::adapter_for;
use resforge::ResourceDefinition;
use std::path::Path;

/// Read every resource in `path` and the framework the input targets
///
/// JDL input names its own framework; structured input falls back to
/// `default_framework`.
///
/// # Errors
///
/// Returns an error if the extension is not recognized or the file cannot be
/// read or parsed.
pub fn load_definitions(
    path: &Path,
    default_framework: &str,
) -> Result<(Vec<ResourceDefinition>, String)> {
    let mut adapter = adapter_for(path, default_framework)
        .with_context(|| format!("Unsupported definition file: {}", path.display()))?;
    let definitions = adapter
        .from_file(path)
        .with_context(|| format!("Failed to read definitions from {}", path.display()))?;

    if definitions.is_empty() {
        tracing::warn!(path = %path.display(), "definition file contains no resources");
    }

    Ok((definitions, adapter.framework()))
}
