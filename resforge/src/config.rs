//! Configuration management
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `RESFORGE_` prefix, `__` for nesting)
//! 2. File passed with `--config`
//! 3. `./resforge.toml` (project)
//! 4. `~/.config/resforge/config.toml` (user config, XDG)
//! 5. Hardcoded defaults (fallback)
//!
//! Example: `RESFORGE_SECURITY__ENABLED=true`
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! uri_prefix = "/api"
//!
//! [security]
//! enabled = true
//! prefix = "SHOP_"
//! default_permissions = ["LIST", "VIEW"]
//!
//! [output]
//! base_path = "./generated"
//! framework = "laravel"
//! stubs_dir = "./stubs"
//! ```

use crate::error::{ResforgeError, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// API settings applied to every resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Prepended to each resource's own uri prefix
    pub uri_prefix: String,
}

/// Permission generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Emit permission checks (still gated by the `security` feature)
    pub enabled: bool,
    /// Prefix for permission constants
    pub prefix: String,
    /// Actions every resource gets a permission for
    pub default_permissions: Vec<String>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix: "APP_".to_string(),
            default_permissions: ["LIST", "VIEW", "CREATE", "UPDATE", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Root directory generated paths are joined onto
    pub base_path: PathBuf,
    /// Framework for structured (JSON/YAML) input
    pub framework: String,
    /// Directory whose `<name>.stub` files override the embedded stubs
    pub stubs_dir: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            framework: "laravel".to_string(),
            stubs_dir: None,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResforgeConfig {
    /// API settings
    pub api: ApiSettings,
    /// Security settings
    pub security: SecuritySettings,
    /// Output settings
    pub output: OutputSettings,
}

impl ResforgeConfig {
    /// Load from every source, with an optional explicit file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - The explicit file does not exist
    /// - A configuration file contains invalid TOML
    /// - Values fail type conversion
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(&defaults_toml()?));

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./resforge.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ResforgeError::Config(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        let config = figment
            .merge(Env::prefixed("RESFORGE_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Load defaults merged with one specific file (missing file yields defaults)
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&defaults_toml()?))
            .merge(Toml::file(path.as_ref()))
            .extract()?;
        Ok(config)
    }

    /// XDG user configuration path
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./resforge.toml"),
            |dir| dir.join("resforge").join("config.toml"),
        )
    }

    /// The subset passed explicitly into each generation context
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            uri_prefix: self.api.uri_prefix.clone(),
            security_enabled: self.security.enabled,
            security_prefix: self.security.prefix.clone(),
            default_permissions: self.security.default_permissions.clone(),
        }
    }
}

fn defaults_toml() -> Result<String> {
    toml::to_string(&ResforgeConfig::default())
        .map_err(|e| ResforgeError::Config(e.to_string()))
}

/// Global settings a [`crate::GenerationContext`] is derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Global uri prefix
    pub uri_prefix: String,
    /// Global security switch
    pub security_enabled: bool,
    /// Permission prefix
    pub security_prefix: String,
    /// Default permission actions
    pub default_permissions: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        ResforgeConfig::default().generator_config()
    }
}
