//! resforge: resource definitions in, framework CRUD scaffolding out
//!
//! The crate is organised as a pipeline:
//! - **Input**: a JDL-style text document ([`jdl`]) or a structured JSON/YAML
//!   resource file ([`definition::DefinitionLoader`])
//! - **Model**: a normalized, ordered list of [`ResourceDefinition`]s with
//!   relation fields resolved on both sides
//! - **Generation**: a [`GenerationContext`] per resource and framework, a
//!   strategy picked by [`ResourceGenerator`], and generators rendering the
//!   embedded stubs through [`TemplateRenderer`]
//! - **Output**: [`FileWriter`] with force / dry-run / skip-existing handling
//!
//! # Quick Start
//!
//! ```rust
//! use resforge::prelude::*;
//!
//! # fn main() -> resforge::Result<()> {
//! let source = r"
//!     entity Book { title string required }
//!     entity Author { name string }
//!     relationship ManyToOne { Book{author} to Author }
//! ";
//! let resources = JdlToResourceMapper::map(&JdlParser::parse(source));
//! assert_eq!(resources[0].entity, "Book");
//! assert_eq!(resources[0].fields.len(), 2);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod definition;
pub mod error;
pub mod generator;
pub mod jdl;
pub mod naming;
pub mod observability;
pub mod template;
pub mod writer;

pub use definition::{
    DefinitionLoader, Feature, Features, FieldDefinition, Relation, RelationKind,
    ResourceDefinition,
};
pub use error::{ResforgeError, Result};
pub use generator::{GeneratedFile, GenerationContext, GenerationResult, ResourceGenerator};
pub use naming::Naming;
pub use template::TemplateRenderer;
pub use writer::{FileWriter, WriteOutcome};

/// Commonly used types for building a generation pipeline
pub mod prelude {
    pub use crate::config::{GeneratorConfig, ResforgeConfig};
    pub use crate::definition::{DefinitionLoader, FieldDefinition, ResourceDefinition};
    pub use crate::error::{ResforgeError, Result};
    pub use crate::generator::{GenerationContext, ResourceGenerator};
    pub use crate::jdl::{adapter_for, DefinitionAdapter, JdlParser, JdlToResourceMapper};
    pub use crate::naming::Naming;
    pub use crate::template::TemplateRenderer;
    pub use crate::writer::{FileWriter, WriteOutcome};
}
