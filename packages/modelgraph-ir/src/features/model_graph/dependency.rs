//! Model dependency ordering
//!
//! Directed graph over structural forward edges (owner → target). The
//! emission layer uses it to generate referenced models before the models
//! that point at them; cycles are reported, never fatal.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use super::graph::ModelGraph;
use crate::shared::models::ModelId;

pub struct ModelDependencyGraph {
    graph: DiGraph<ModelId, String>,
    node_of: FxHashMap<ModelId, NodeIndex>,
}

impl ModelDependencyGraph {
    pub fn build(models: &ModelGraph) -> Self {
        let mut graph = DiGraph::with_capacity(models.len(), models.forward_edge_count());
        let mut node_of = FxHashMap::default();

        for node in models.nodes() {
            node_of.insert(node.id, graph.add_node(node.id));
        }

        for node in models.nodes() {
            let from = node_of[&node.id];
            for edge in node.references.iter().filter(|e| e.is_structural()) {
                if let Some(to) = edge.peer.model.and_then(|id| node_of.get(&id)) {
                    graph.add_edge(from, *to, edge.property_name.clone());
                }
            }
        }

        Self { graph, node_of }
    }

    /// Targets before the models that reference them.
    ///
    /// With cycles present, strongly connected components are emitted as
    /// units in reverse topological order, members sorted by id.
    pub fn emission_order(&self) -> Vec<ModelId> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().rev().map(|idx| self.graph[idx]).collect(),
            Err(_) => tarjan_scc(&self.graph)
                .into_iter()
                .flat_map(|component| {
                    let mut ids: Vec<ModelId> =
                        component.into_iter().map(|idx| self.graph[idx]).collect();
                    ids.sort();
                    ids
                })
                .collect(),
        }
    }

    /// Groups of models that reference each other in a cycle
    pub fn reference_cycles(&self) -> Vec<Vec<ModelId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&idx| self.graph.contains_edge(idx, idx))
            })
            .map(|component| {
                let mut ids: Vec<ModelId> =
                    component.into_iter().map(|idx| self.graph[idx]).collect();
                ids.sort();
                ids
            })
            .collect()
    }

    /// Models `id` directly depends on
    pub fn dependencies(&self, id: ModelId) -> Vec<ModelId> {
        let Some(&idx) = self.node_of.get(&id) else {
            return Vec::new();
        };
        let mut out: Vec<ModelId> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
