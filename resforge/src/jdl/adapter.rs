//! Input adapters: one entry point for every definition format

use super::{JdlParser, JdlToResourceMapper};
use crate::definition::loader::DefinitionFormat;
use crate::definition::{DefinitionLoader, ResourceDefinition};
use crate::error::{ResforgeError, Result};
use std::fs;
use std::path::Path;

/// Turns definition input into resources and reports its target framework
pub trait DefinitionAdapter {
    /// Read and convert a definition file
    fn from_file(&mut self, path: &Path) -> Result<Vec<ResourceDefinition>>;

    /// Convert definition text
    fn from_str(&mut self, content: &str) -> Result<Vec<ResourceDefinition>>;

    /// Framework the last converted input targets
    fn framework(&self) -> String;
}

/// JDL text through [`JdlParser`] and [`JdlToResourceMapper`]
#[derive(Debug, Default)]
pub struct JdlDefinitionAdapter {
    last_framework: Option<String>,
}

impl JdlDefinitionAdapter {
    /// New adapter with no input seen yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_framework: None,
        }
    }
}

impl DefinitionAdapter for JdlDefinitionAdapter {
    fn from_file(&mut self, path: &Path) -> Result<Vec<ResourceDefinition>> {
        if !path.is_file() {
            return Err(ResforgeError::DefinitionNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        self.from_str(&content)
    }

    fn from_str(&mut self, content: &str) -> Result<Vec<ResourceDefinition>> {
        let doc = JdlParser::parse(content);
        self.last_framework = Some(doc.config.framework.clone());
        Ok(JdlToResourceMapper::map(&doc))
    }

    fn framework(&self) -> String {
        self.last_framework
            .clone()
            .unwrap_or_else(|| "symfony".to_string())
    }
}

/// A single JSON or YAML resource through [`DefinitionLoader`]
#[derive(Debug)]
pub struct StructuredDefinitionAdapter {
    framework: String,
    format: DefinitionFormat,
}

impl StructuredDefinitionAdapter {
    /// Adapter for `format`, generating for `framework`
    pub fn new(framework: impl Into<String>, format: DefinitionFormat) -> Self {
        Self {
            framework: framework.into(),
            format,
        }
    }
}

impl DefinitionAdapter for StructuredDefinitionAdapter {
    fn from_file(&mut self, path: &Path) -> Result<Vec<ResourceDefinition>> {
        Ok(vec![DefinitionLoader::new().load(path)?])
    }

    fn from_str(&mut self, content: &str) -> Result<Vec<ResourceDefinition>> {
        Ok(vec![DefinitionLoader::new().load_str(content, self.format)?])
    }

    fn framework(&self) -> String {
        self.framework.clone()
    }
}

/// Pick an adapter by file extension
///
/// `.jdl` and `.jh` go through the DSL parser; everything else through the
/// structured loader, which rejects unsupported extensions.
pub fn adapter_for(path: &Path, default_framework: &str) -> Result<Box<dyn DefinitionAdapter>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    if matches!(ext.as_str(), "jdl" | "jh") {
        return Ok(Box::new(JdlDefinitionAdapter::new()));
    }

    let format = DefinitionFormat::from_extension(&ext)?;
    Ok(Box::new(StructuredDefinitionAdapter::new(
        default_framework,
        format,
    )))
}
