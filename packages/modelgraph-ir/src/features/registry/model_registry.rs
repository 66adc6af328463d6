//! Model registry
//!
//! Unions every input document per domain and indexes the definitions for
//! membership checks during edge resolution. Defaults are filled in here so
//! later stages never look at an empty classification key or identifier type.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DuplicatePolicy, LinkerConfig};
use crate::errors::{DefinitionKind, LinkError, Result};
use crate::shared::keyed::DomainTable;
use crate::shared::models::{
    DataModelDef, DataPropertyDef, DomainModelDef, EnumerationDef, ModelSet,
};

/// What edge resolution needs to know about a domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub classification_key: String,
    pub feature_name: Option<String>,
    pub data_model_name: String,
    /// Position in `ModelRegistry::models()`
    pub slot: usize,
}

/// A registered persistence model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModelNode {
    pub domain: String,
    pub name: String,
    pub classification_key: String,
    pub properties: Vec<DataPropertyDef>,
}

/// A domain model definition with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredModel {
    pub domain: String,
    pub def: DomainModelDef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredEnumeration {
    pub domain: String,
    pub def: EnumerationDef,
}

/// Flattened, read-only view over all input documents
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    summaries: DomainTable<ModelSummary>,
    models: Vec<RegisteredModel>,
    data_models: DomainTable<DataModelNode>,
    data_model_order: Vec<(String, String)>,
    enumeration_slots: DomainTable<usize>,
    enumerations: Vec<RegisteredEnumeration>,
}

impl ModelRegistry {
    /// Build the registry from a model set.
    ///
    /// Duplicate (domain, name) pairs are handled according to
    /// `config.duplicate_policy`.
    pub fn build(set: &ModelSet, config: &LinkerConfig) -> Result<Self> {
        let mut registry = Self::default();
        let policy = config.duplicate_policy;

        for document in &set.domain_models {
            for def in &document.models {
                registry.register_model(&document.domain, def, config, policy)?;
            }
        }

        for document in &set.data_models {
            for def in &document.data_models {
                registry.register_data_model(&document.domain, def, policy)?;
            }
        }

        for document in &set.enumerations {
            for def in &document.enumerations {
                registry.register_enumeration(&document.domain, def, policy)?;
            }
        }

        debug!(
            "Registry built: {} models, {} data models, {} enumerations",
            registry.models.len(),
            registry.data_models.len(),
            registry.enumerations.len()
        );

        Ok(registry)
    }

    fn register_model(
        &mut self,
        domain: &str,
        def: &DomainModelDef,
        config: &LinkerConfig,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let name = def.name.trim();
        if name.is_empty() {
            debug!("Skipping unnamed domain model in domain '{}'", domain);
            return Ok(());
        }

        let normalized = normalize_model(def, name, &config.default_id_type);
        let summary = ModelSummary {
            classification_key: normalized.classification_key.clone(),
            feature_name: normalized.feature_name.clone(),
            data_model_name: normalized
                .data_model_name
                .clone()
                .unwrap_or_else(|| name.to_string()),
            slot: self.models.len(),
        };

        match self.summaries.insert_unique(domain, name, summary) {
            Ok(()) => {
                self.models.push(RegisteredModel {
                    domain: domain.to_string(),
                    def: normalized,
                });
            }
            Err(mut summary) => {
                let slot = self
                    .summaries
                    .get(domain, name)
                    .map(|existing| existing.slot)
                    .unwrap_or_default();
                reject_or_overwrite(policy, DefinitionKind::DomainModel, domain, name)?;
                summary.slot = slot;
                self.summaries.replace(domain, name, summary);
                self.models[slot] = RegisteredModel {
                    domain: domain.to_string(),
                    def: normalized,
                };
            }
        }
        Ok(())
    }

    fn register_data_model(
        &mut self,
        domain: &str,
        def: &DataModelDef,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let name = def.name.trim();
        if name.is_empty() {
            debug!("Skipping unnamed data model in domain '{}'", domain);
            return Ok(());
        }

        let node = DataModelNode {
            domain: domain.to_string(),
            name: name.to_string(),
            classification_key: non_empty_or(&def.classification_key, name),
            properties: def.properties.clone(),
        };

        if let Err(node) = self.data_models.insert_unique(domain, name, node) {
            reject_or_overwrite(policy, DefinitionKind::DataModel, domain, name)?;
            self.data_models.replace(domain, name, node);
        } else {
            self.data_model_order
                .push((domain.to_string(), name.to_string()));
        }
        Ok(())
    }

    fn register_enumeration(
        &mut self,
        domain: &str,
        def: &EnumerationDef,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let name = def.name.trim();
        if name.is_empty() {
            debug!("Skipping unnamed enumeration in domain '{}'", domain);
            return Ok(());
        }

        let registered = RegisteredEnumeration {
            domain: domain.to_string(),
            def: EnumerationDef {
                name: name.to_string(),
                items: def.items.clone(),
            },
        };

        let slot = self.enumerations.len();
        match self.enumeration_slots.insert_unique(domain, name, slot) {
            Ok(()) => self.enumerations.push(registered),
            Err(_) => {
                reject_or_overwrite(policy, DefinitionKind::Enumeration, domain, name)?;
                if let Some(&existing) = self.enumeration_slots.get(domain, name) {
                    self.enumerations[existing] = registered;
                }
            }
        }
        Ok(())
    }

    /// Summary lookup: domain → model name → (classification key, feature, data model).
    /// The model graph resolves every reference and child name through here.
    pub fn summary(&self, domain: &str, name: &str) -> Option<&ModelSummary> {
        self.summaries.get(domain, name)
    }

    /// Registered domain models in declaration order
    pub fn models(&self) -> &[RegisteredModel] {
        &self.models
    }

    pub fn data_model(&self, domain: &str, name: &str) -> Option<&DataModelNode> {
        self.data_models.get(domain, name)
    }

    /// Persistence models in declaration order
    pub fn data_models(&self) -> impl Iterator<Item = &DataModelNode> {
        self.data_model_order
            .iter()
            .filter_map(|(domain, name)| self.data_models.get(domain, name))
    }

    pub fn enumerations(&self) -> &[RegisteredEnumeration] {
        &self.enumerations
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn data_model_count(&self) -> usize {
        self.data_models.len()
    }
}

fn reject_or_overwrite(
    policy: DuplicatePolicy,
    kind: DefinitionKind,
    domain: &str,
    name: &str,
) -> Result<()> {
    match policy {
        DuplicatePolicy::Reject => Err(LinkError::duplicate(kind, domain, name)),
        DuplicatePolicy::LastWriteWins => {
            warn!(
                "Duplicate {} '{}' in domain '{}': keeping the later definition",
                kind, name, domain
            );
            Ok(())
        }
    }
}

fn normalize_model(def: &DomainModelDef, name: &str, default_id_type: &str) -> DomainModelDef {
    let mut normalized = def.clone();
    normalized.name = name.to_string();
    normalized.classification_key = non_empty_or(&def.classification_key, name);
    normalized.id_type = Some(
        def.id_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(default_id_type)
            .to_string(),
    );
    normalized.data_model_name = Some(
        def.data_model_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(name)
            .to_string(),
    );
    normalized.feature_name = def
        .feature_name
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string);
    normalized
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
