//! Link run result types

use serde::{Deserialize, Serialize};

use crate::features::dto_graph::DtoGraph;
use crate::features::model_graph::{ModelDependencyGraph, ModelGraph};
use crate::features::use_case::UseCasePlan;
use crate::shared::models::ModelId;

/// Counters for one link run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub models: usize,
    pub data_models: usize,
    pub enumerations: usize,
    pub forward_edges: usize,
    pub backward_edges: usize,
    /// References, children and data references that resolved to nothing
    pub dropped_references: usize,
    pub reference_cycles: usize,
    pub dtos: usize,
    pub dto_edges: usize,
    pub use_cases: usize,
    pub synthesized_use_cases: usize,
    pub methods: usize,
    pub method_reuses: usize,
    pub method_conflicts: usize,
    pub build_duration_ms: u64,
}

/// Everything the emission layer consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedModel {
    pub model_graph: ModelGraph,
    pub dto_graph: DtoGraph,
    pub plan: UseCasePlan,
    pub stats: LinkStats,
}

impl LinkedModel {
    /// Domain models ordered so referenced models come first
    pub fn emission_order(&self) -> Vec<ModelId> {
        ModelDependencyGraph::build(&self.model_graph).emission_order()
    }

    /// Snapshot of the three graphs (stats excluded, they carry timings)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Snapshot {
            model_graph: &self.model_graph,
            dto_graph: &self.dto_graph,
            plan: &self.plan,
        })
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    model_graph: &'a ModelGraph,
    dto_graph: &'a DtoGraph,
    plan: &'a UseCasePlan,
}
