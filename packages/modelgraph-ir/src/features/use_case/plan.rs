//! The finished use-case plan

use serde::{Deserialize, Serialize};

use super::catalogue::MethodCatalogue;
use super::feature_names::FeatureNameTable;
use super::types::{QueryProviderMethod, UseCaseNode};
use crate::shared::keyed::ScopedTable;
use crate::shared::models::UseCaseId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCasePlan {
    pub(super) use_cases: Vec<UseCaseNode>,
    /// (domain, namespace key, use-case name) → node
    pub(super) index: ScopedTable<UseCaseId>,
    pub(super) catalogue: MethodCatalogue,
    pub(super) features: FeatureNameTable,
}

impl UseCasePlan {
    pub fn use_case(&self, domain: &str, namespace_key: &str, name: &str) -> Option<&UseCaseNode> {
        self.index
            .get(domain, namespace_key, name)
            .map(|&id| self.node(id))
    }

    pub fn node(&self, id: UseCaseId) -> &UseCaseNode {
        &self.use_cases[id.index()]
    }

    pub fn use_cases(&self) -> &[UseCaseNode] {
        &self.use_cases
    }

    /// Methods attached to a use case, in attachment order
    pub fn methods_of(&self, id: UseCaseId) -> impl Iterator<Item = &QueryProviderMethod> {
        self.node(id)
            .methods
            .iter()
            .map(|&method| self.catalogue.get(method))
    }

    pub fn catalogue(&self) -> &MethodCatalogue {
        &self.catalogue
    }

    pub fn features(&self) -> &FeatureNameTable {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.use_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.use_cases.is_empty()
    }
}
