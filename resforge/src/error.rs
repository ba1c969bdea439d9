//! Error types for the definition pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, ResforgeError>;

/// Errors raised while loading definitions or generating files
///
/// Lenient DSL parsing and unresolvable relations never produce an error;
/// those fragments are dropped and logged at debug level instead.
#[derive(Debug, Error)]
pub enum ResforgeError {
    /// Definition file does not exist
    #[error("Definition not found: {}", .0.display())]
    DefinitionNotFound(PathBuf),

    /// File extension is not one of json, yml, yaml
    #[error("Unsupported definition extension: {0}")]
    UnsupportedExtension(String),

    /// Structured input is not a mapping at the root
    #[error("Invalid definition format: {0}")]
    MalformedRoot(String),

    /// `entity` or `table` is empty after hydration
    #[error("Definition must contain \"entity\" and \"table\" (missing {0})")]
    MissingRequiredKey(&'static str),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No embedded or overriding stub with this name
    #[error("Stub not found: {0}")]
    StubNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for ResforgeError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ResforgeError::UnsupportedExtension("xml".to_string());
        assert_eq!(err.to_string(), "Unsupported definition extension: xml");

        let err = ResforgeError::MissingRequiredKey("table");
        assert!(err.to_string().contains("\"entity\" and \"table\""));

        let err = ResforgeError::DefinitionNotFound(PathBuf::from("/tmp/none.json"));
        assert_eq!(err.to_string(), "Definition not found: /tmp/none.json");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ResforgeError = io.into();
        assert!(matches!(err, ResforgeError::Io(_)));
    }
}
