//! (domain, classification key) → feature name
//!
//! The first registration of a key wins. Use-case overrides are registered
//! before model-declared names, so an override always beats the model.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::shared::keyed::DomainTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureNameTable {
    names: DomainTable<String>,
    conflicts: usize,
}

impl FeatureNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature name; returns `false` when the key was already taken
    pub fn register(&mut self, domain: &str, classification_key: &str, feature_name: &str) -> bool {
        let feature_name = feature_name.trim();
        if feature_name.is_empty() {
            return false;
        }
        match self
            .names
            .insert_unique(domain, classification_key, feature_name.to_string())
        {
            Ok(()) => true,
            Err(rejected) => {
                let kept = self
                    .names
                    .get(domain, classification_key)
                    .map(String::as_str)
                    .unwrap_or_default();
                if kept != rejected {
                    self.conflicts += 1;
                    warn!(
                        "Feature name '{}' for {}.{} ignored, '{}' was registered first",
                        rejected, domain, classification_key, kept
                    );
                } else {
                    debug!(
                        "Feature name '{}' for {}.{} registered again",
                        kept, domain, classification_key
                    );
                }
                false
            }
        }
    }

    /// Register only if the key is still free; never counts as a conflict
    pub fn fill(&mut self, domain: &str, classification_key: &str, feature_name: &str) -> bool {
        let feature_name = feature_name.trim();
        !feature_name.is_empty()
            && self
                .names
                .insert_unique(domain, classification_key, feature_name.to_string())
                .is_ok()
    }

    pub fn get(&self, domain: &str, classification_key: &str) -> Option<&str> {
        self.names.get(domain, classification_key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts
    }
}
