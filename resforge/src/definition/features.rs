//! Feature toggles carried by every resource

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Known feature switches
///
/// Names are matched in their camelCase form (`softDeletes`), the way they
/// appear in definition files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Multi-tenant `tenant_id` column
    Tenant,
    /// Soft delete column
    SoftDeletes,
    /// `created_by` / `updated_by` columns
    Audit,
    /// Generated test suites
    Tests,
    /// Model factories / fixtures
    Factories,
    /// Input and output DTOs
    Dto,
    /// Model or entity class
    Entity,
    /// Request / state classes
    State,
    /// Permission checks on operations
    Security,
    /// Import endpoints
    Import,
    /// Export endpoints
    Export,
    /// Quality tooling
    Qa,
}

impl Feature {
    /// Every feature, in declaration order
    pub const ALL: [Self; 12] = [
        Self::Tenant,
        Self::SoftDeletes,
        Self::Audit,
        Self::Tests,
        Self::Factories,
        Self::Dto,
        Self::Entity,
        Self::State,
        Self::Security,
        Self::Import,
        Self::Export,
        Self::Qa,
    ];

    /// The camelCase key used in definition files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::SoftDeletes => "softDeletes",
            Self::Audit => "audit",
            Self::Tests => "tests",
            Self::Factories => "factories",
            Self::Dto => "dto",
            Self::Entity => "entity",
            Self::State => "state",
            Self::Security => "security",
            Self::Import => "import",
            Self::Export => "export",
            Self::Qa => "qa",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| format!("unknown feature: {s}"))
    }
}

/// Feature map with a documented default table (everything enabled)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(BTreeMap<Feature, bool>);

impl Default for Features {
    fn default() -> Self {
        Self(Feature::ALL.into_iter().map(|f| (f, true)).collect())
    }
}

impl Features {
    /// Build from a raw `features` object, ignoring unknown keys
    ///
    /// Non-object input yields the defaults.
    #[must_use]
    pub fn from_value(raw: &serde_json::Value) -> Self {
        let mut features = Self::default();
        let Some(map) = raw.as_object() else {
            return features;
        };

        for (key, value) in map {
            match key.parse::<Feature>() {
                Ok(feature) => features.set(feature, super::flag(value, true)),
                Err(_) => tracing::debug!(key = %key, "ignoring unknown feature key"),
            }
        }

        features
    }

    /// Lookup by name; unknown names are disabled
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::definition::Features;
    /// let features = Features::default();
    /// assert!(features.enabled("softDeletes"));
    /// assert!(!features.enabled("teleport"));
    /// ```
    #[must_use]
    pub fn enabled(&self, name: &str) -> bool {
        name.parse::<Feature>().is_ok_and(|f| self.is_enabled(f))
    }

    /// Typed lookup
    #[must_use]
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.0.get(&feature).copied().unwrap_or(false)
    }

    /// Override a single feature
    pub fn set(&mut self, feature: Feature, enabled: bool) {
        self.0.insert(feature, enabled);
    }

    /// Builder-style override
    #[must_use]
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.set(feature, enabled);
        self
    }
}
