//! The DTO graph and its lookups

use serde::{Deserialize, Serialize};

use super::types::{DtoNode, ResolvedUseCase};
use crate::shared::keyed::{DomainTable, ScopedTable};
use crate::shared::models::DtoId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoGraph {
    pub(super) nodes: Vec<DtoNode>,
    /// (domain, use-case key, logical name) → DTO
    pub(super) by_logical: ScopedTable<DtoId>,
    /// (domain, canonical name) → first DTO emitted under that name
    pub(super) by_canonical: DomainTable<DtoId>,
    /// (domain, use-case key, model name) → DTOs representing that model
    pub(super) by_model: ScopedTable<Vec<DtoId>>,
    pub(super) use_cases: Vec<ResolvedUseCase>,
    /// (domain, namespace key, use-case name) → position in `use_cases`
    pub(super) use_case_index: ScopedTable<usize>,
    pub(super) skipped: usize,
}

impl DtoGraph {
    pub fn get(&self, domain: &str, use_case_key: &str, logical_name: &str) -> Option<&DtoNode> {
        self.by_logical
            .get(domain, use_case_key, logical_name)
            .map(|&id| self.node(id))
    }

    pub fn by_canonical_name(&self, domain: &str, canonical_name: &str) -> Option<&DtoNode> {
        self.by_canonical
            .get(domain, canonical_name)
            .map(|&id| self.node(id))
    }

    /// DTOs of one use case that represent the named domain or persistence model
    pub fn dtos_for_model(&self, domain: &str, use_case_key: &str, model: &str) -> &[DtoId] {
        self.by_model
            .get(domain, use_case_key, model)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node(&self, id: DtoId) -> &DtoNode {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[DtoNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.references.len()).sum()
    }

    /// Resolved use cases in processing order, count variants last
    pub fn use_cases(&self) -> &[ResolvedUseCase] {
        &self.use_cases
    }

    pub fn use_case(&self, domain: &str, namespace_key: &str, name: &str) -> Option<&ResolvedUseCase> {
        self.use_case_index
            .get(domain, namespace_key, name)
            .map(|&slot| &self.use_cases[slot])
    }

    /// Declared SearchCount use cases that were left to the planner
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }
}
