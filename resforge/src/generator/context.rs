//! Per-resource generation context

use crate::config::GeneratorConfig;
use crate::definition::{Feature, ResourceDefinition};
use crate::naming::Naming;
use std::path::{Path, PathBuf};

const UUID_REQUIREMENT: &str = "[0-9a-fA-F-]{36}";
const INTEGER_REQUIREMENT: &str = r"\d+";

/// Everything a generator needs for one resource and one target framework
///
/// Built once per (definition, framework, run) by [`GenerationContext::from`]
/// and never mutated afterwards. Global settings arrive through
/// [`GeneratorConfig`]; nothing here reads process state.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerationContext<'a> {
    /// The resource being generated
    pub def: &'a ResourceDefinition,
    /// Lowercased framework tag
    pub framework: String,
    /// Output root
    pub base_path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Report only
    pub dry_run: bool,
    /// `StudlyCase` entity name
    pub entity: String,
    /// `snake_case` entity name
    pub entity_snake: String,
    /// Operation name base
    pub op_base: String,
    /// Global prefix followed by the resource prefix
    pub uri_prefix: String,
    /// Read serialization group
    pub groups_read: String,
    /// Write serialization group
    pub groups_write: String,
    /// Module part of permission names
    pub permission_prefix: String,
    /// Route requirement for the identifier
    pub id_requirement: String,
    /// Global switch (or resource override) AND the `security` feature
    pub security_enabled: bool,
    /// Prefix of qualified permission names
    pub security_prefix: String,
    /// Actions to emit permissions for
    pub default_permissions: Vec<String>,
    has_files: bool,
}

impl<'a> GenerationContext<'a> {
    /// Derive the context for `def`
    ///
    /// Resource-level `security.enabled` and `security.prefix` override the
    /// global settings; the `security` feature still has to be on.
    #[must_use]
    pub fn from(
        def: &'a ResourceDefinition,
        framework: &str,
        base_path: impl Into<PathBuf>,
        force: bool,
        dry_run: bool,
        config: &GeneratorConfig,
    ) -> Self {
        let entity = Naming::studly(&def.entity);
        let entity_snake = Naming::snake(&entity);

        let or_default = |value: &str, suffix: &str| {
            if value.trim().is_empty() {
                format!("{entity_snake}:{suffix}")
            } else {
                value.to_string()
            }
        };
        let groups_read = or_default(&def.api.groups_read, "read");
        let groups_write = or_default(&def.api.groups_write, "write");

        let security = def.security.as_ref();
        let security_enabled = security
            .and_then(|s| s.enabled)
            .unwrap_or(config.security_enabled)
            && def.has(Feature::Security);
        let security_prefix = security
            .and_then(|s| s.prefix.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| config.security_prefix.clone());
        let permission_prefix = security
            .and_then(|s| s.module_code.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| entity_snake.clone());

        let id_requirement = if def.api.uuid { UUID_REQUIREMENT } else { INTEGER_REQUIREMENT };

        Self {
            def,
            framework: framework.trim().to_lowercase(),
            base_path: base_path.into(),
            force,
            dry_run,
            op_base: entity_snake.clone(),
            uri_prefix: format!("{}{}", config.uri_prefix, def.api.uri_prefix),
            groups_read,
            groups_write,
            permission_prefix,
            id_requirement: id_requirement.to_string(),
            security_enabled,
            security_prefix,
            default_permissions: config.default_permissions.clone(),
            has_files: def.has_files(),
            entity,
            entity_snake,
        }
    }

    /// `relative` joined onto the output root
    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        self.base_path
            .join(relative.strip_prefix("/").unwrap_or(relative))
    }

    /// `MODULE:ACTION`, uppercased
    #[must_use]
    pub fn permission(&self, action: &str) -> String {
        format!(
            "{}:{}",
            self.permission_prefix.to_uppercase(),
            action.to_uppercase()
        )
    }

    /// Permission with the security prefix, e.g. `APP_BOOK:LIST`
    #[must_use]
    pub fn qualified_permission(&self, action: &str) -> String {
        format!("{}{}", self.security_prefix, self.permission(action))
    }

    /// Qualified permission guarding `action`, when security is on and the
    /// action is one of the default permissions
    #[must_use]
    pub fn guarded_permission(&self, action: &str) -> Option<String> {
        let granted = self
            .default_permissions
            .iter()
            .any(|p| p.eq_ignore_ascii_case(action));
        (self.security_enabled && granted).then(|| self.qualified_permission(action))
    }

    /// Whether any field carries file content
    #[must_use]
    pub const fn has_files(&self) -> bool {
        self.has_files
    }

    /// Shorthand for a feature check on the definition
    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        self.def.has(feature)
    }

    /// Collection route: the uri prefix, or `/<plural-kebab>` when empty
    #[must_use]
    pub fn collection_uri(&self) -> String {
        if self.uri_prefix.is_empty() {
            format!("/{}", Naming::kebab(&Naming::plural(&self.entity)))
        } else {
            self.uri_prefix.clone()
        }
    }
}
