//! JDL-style definition language: parse tree, parser, relation mapper and
//! input adapters

pub mod adapter;
pub mod document;
pub mod mapper;
pub mod parser;

pub use adapter::{
    adapter_for, DefinitionAdapter, JdlDefinitionAdapter, StructuredDefinitionAdapter,
};
pub use document::{JdlConfig, JdlDocument, JdlEntity, JdlEnum, JdlField, JdlRelation};
pub use mapper::JdlToResourceMapper;
pub use parser::JdlParser;
