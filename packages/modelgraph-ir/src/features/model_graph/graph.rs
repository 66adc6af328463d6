//! The resolved model graph and its read-only queries

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::types::{DomainModelNode, EnumerationNode, UnresolvedReference};
use crate::features::registry::DataModelNode;
use crate::shared::keyed::DomainTable;
use crate::shared::models::{EnumerationId, ModelId};

/// Reference graph of domain models and enumerations
///
/// Arena order equals declaration order, so two builds over the same input
/// compare equal with `==`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelGraph {
    pub(super) nodes: Vec<DomainModelNode>,
    pub(super) index: DomainTable<ModelId>,
    pub(super) enumerations: Vec<EnumerationNode>,
    pub(super) enumeration_index: DomainTable<EnumerationId>,
    pub(super) top_level_aggregates: FxHashMap<String, Vec<ModelId>>,
    /// (domain, data model) → domain models it backs
    pub(super) backed_by: DomainTable<Vec<ModelId>>,
    pub(super) data_models: DomainTable<DataModelNode>,
    pub(super) unresolved: Vec<UnresolvedReference>,
}

impl ModelGraph {
    /// Resolve a model name.
    ///
    /// `declared_domain` wins when it is present and non-empty; otherwise the
    /// owner's domain is searched.
    pub fn resolve(
        &self,
        owner_domain: &str,
        declared_domain: Option<&str>,
        name: &str,
    ) -> Option<ModelId> {
        let domain = declared_domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(owner_domain);
        self.index.get(domain, name.trim()).copied()
    }

    pub fn get(&self, domain: &str, name: &str) -> Option<&DomainModelNode> {
        self.id_of(domain, name).map(|id| self.node(id))
    }

    pub fn id_of(&self, domain: &str, name: &str) -> Option<ModelId> {
        self.index.get(domain, name).copied()
    }

    pub fn node(&self, id: ModelId) -> &DomainModelNode {
        &self.nodes[id.index()]
    }

    /// All domain models in declaration order
    pub fn nodes(&self) -> &[DomainModelNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn enumeration(&self, domain: &str, name: &str) -> Option<&EnumerationNode> {
        self.enumeration_index
            .get(domain, name)
            .map(|id| &self.enumerations[id.index()])
    }

    pub fn enumerations(&self) -> &[EnumerationNode] {
        &self.enumerations
    }

    /// Aggregates of `domain` that are not themselves children
    pub fn top_level_aggregates(&self, domain: &str) -> &[ModelId] {
        self.top_level_aggregates
            .get(domain)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Domain models backed by the given persistence model
    pub fn models_backed_by(&self, domain: &str, data_model: &str) -> &[ModelId] {
        self.backed_by
            .get(domain, data_model)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn data_model(&self, domain: &str, name: &str) -> Option<&DataModelNode> {
        self.data_models.get(domain, name)
    }

    /// References that were dropped while building
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// `[id, parent, grandparent, ..., top]`
    ///
    /// The walk is bounded by the node count and stops at the first revisited
    /// node, so a malformed chain cannot loop.
    pub fn aggregate_chain(&self, id: ModelId) -> Vec<ModelId> {
        self.walk_aggregates(id).0
    }

    /// Top-level aggregate of a child node; `None` for non-children
    pub fn top_level_aggregate(&self, id: ModelId) -> Option<ModelId> {
        if !self.node(id).is_child_domain_model() {
            return None;
        }
        let (chain, terminated) = self.walk_aggregates(id);
        if terminated {
            chain.last().copied().filter(|&top| top != id)
        } else {
            None
        }
    }

    fn walk_aggregates(&self, id: ModelId) -> (Vec<ModelId>, bool) {
        let mut chain = vec![id];
        let mut seen = FxHashSet::default();
        seen.insert(id);

        let mut current = id;
        for _ in 0..self.nodes.len() {
            match self.node(current).aggregate {
                None => return (chain, true),
                Some(parent) => {
                    if !seen.insert(parent) {
                        return (chain, false);
                    }
                    chain.push(parent);
                    current = parent;
                }
            }
        }
        (chain, false)
    }

    /// Any structural backward edge on the node, or, for aggregates, on any
    /// of its transitive children
    pub fn has_dependents(&self, id: ModelId) -> bool {
        let referenced = |n: &DomainModelNode| n.referenced_by.iter().any(|e| e.is_structural());

        let root = self.node(id);
        if referenced(root) {
            return true;
        }
        if !root.is_aggregate {
            return false;
        }
        self.descendants(id)
            .into_iter()
            .any(|child| referenced(self.node(child)))
    }

    /// Changed state of a node.
    ///
    /// A node with children reports the OR of its children's `has_changes`;
    /// its own flag is ignored. A leaf reports its own flag.
    pub fn has_changes(&self, id: ModelId) -> bool {
        let mut seen = FxHashSet::default();
        self.changes_below(id, &mut seen)
    }

    fn changes_below(&self, id: ModelId, seen: &mut FxHashSet<ModelId>) -> bool {
        if !seen.insert(id) {
            return false;
        }
        let node = self.node(id);
        if node.children.is_empty() {
            return node.tracks_changes;
        }
        node.children
            .iter()
            .any(|&child| self.changes_below(child, seen))
    }

    /// Transitive children, depth first, each node once
    pub fn descendants(&self, id: ModelId) -> Vec<ModelId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(id);
        let mut stack: Vec<ModelId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }

    pub fn forward_edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.references.len()).sum()
    }

    pub fn backward_edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.referenced_by.len()).sum()
    }
}
