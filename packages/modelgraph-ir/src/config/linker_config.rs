//! LinkerConfig and its YAML v1 schema

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// How the registry reacts to a second definition of the same (domain, name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Abort the run with `LinkError::DuplicateDefinition`
    #[default]
    Reject,
    /// Keep the later definition and log a warning
    LastWriteWins,
}

/// Suffixes used when composing generated names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub dto_suffix: String,
    pub method_suffix: String,
    pub count_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            dto_suffix: "Dto".to_string(),
            method_suffix: "Async".to_string(),
            count_suffix: "Count".to_string(),
        }
    }
}

/// Configuration for one link run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerConfig {
    pub application_root_namespace: String,
    pub duplicate_policy: DuplicatePolicy,
    pub default_id_type: String,
    pub naming: NamingConfig,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            application_root_namespace: "Application".to_string(),
            duplicate_policy: DuplicatePolicy::Reject,
            default_id_type: "Guid".to_string(),
            naming: NamingConfig::default(),
        }
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    version: Option<u32>,

    application_root_namespace: String,

    #[serde(default)]
    duplicate_policy: DuplicatePolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_id_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    naming: Option<NamingConfig>,
}

impl LinkerConfig {
    pub fn new(application_root_namespace: impl Into<String>) -> Self {
        Self {
            application_root_namespace: application_root_namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_default_id_type(mut self, id_type: impl Into<String>) -> Self {
        self.default_id_type = id_type.into();
        self
    }

    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    /// Load configuration from a YAML file
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let defaults = Self::default();
        let config = Self {
            application_root_namespace: export.application_root_namespace,
            duplicate_policy: export.duplicate_policy,
            default_id_type: export.default_id_type.unwrap_or(defaults.default_id_type),
            naming: export.naming.unwrap_or(defaults.naming),
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            application_root_namespace: self.application_root_namespace.clone(),
            duplicate_policy: self.duplicate_policy,
            default_id_type: Some(self.default_id_type.clone()),
            naming: Some(self.naming.clone()),
        };
        Ok(serde_yaml::to_string(&export)?)
    }

    /// Reject values that would produce malformed namespaces or names
    pub fn validate(&self) -> ConfigResult<()> {
        let root = self.application_root_namespace.trim();
        if root.is_empty() {
            return Err(ConfigError::invalid(
                "application_root_namespace",
                "Set a root namespace such as 'Acme.Shop'.",
            ));
        }
        if root != self.application_root_namespace {
            return Err(ConfigError::invalid(
                "application_root_namespace",
                format!(
                    "'{}' has leading or trailing whitespace; use '{}'.",
                    self.application_root_namespace, root
                ),
            ));
        }
        if root.starts_with('.') || root.ends_with('.') || root.contains("..") {
            return Err(ConfigError::invalid(
                "application_root_namespace",
                format!("'{}' has an empty namespace segment.", root),
            ));
        }
        if self.default_id_type.trim().is_empty() {
            return Err(ConfigError::invalid(
                "default_id_type",
                "Use a type name such as 'Guid' or 'long'.",
            ));
        }
        if self.naming.count_suffix.is_empty() {
            return Err(ConfigError::invalid(
                "naming.count_suffix",
                "Count use cases need a suffix to stay distinct from their search use case.",
            ));
        }
        Ok(())
    }
}
