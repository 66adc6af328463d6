//! Runs the four stages in order

use std::time::Instant;

use tracing::info;

use super::result::{LinkStats, LinkedModel};
use crate::config::LinkerConfig;
use crate::errors::Result;
use crate::features::dto_graph::DtoGraph;
use crate::features::model_graph::{ModelDependencyGraph, ModelGraph};
use crate::features::registry::ModelRegistry;
use crate::features::use_case::UseCasePlanner;
use crate::shared::models::ModelSet;

/// Link a model set: Registry → Model Graph → DTO Graph → Use-Case Plan.
///
/// Fails on an invalid configuration, a duplicate definition, or a
/// Create/Update/Delete use case without a resolvable domain model.
pub fn link(set: &ModelSet, config: &LinkerConfig) -> Result<LinkedModel> {
    let start = Instant::now();
    config.validate()?;

    let registry = ModelRegistry::build(set, config)?;
    let model_graph = ModelGraph::build(&registry, config);
    let dto_graph = DtoGraph::build(set, &model_graph, config)?;
    let (dto_graph, plan) = UseCasePlanner::new(&model_graph, config).plan(dto_graph)?;

    let reference_cycles = ModelDependencyGraph::build(&model_graph)
        .reference_cycles()
        .len();

    let stats = LinkStats {
        models: model_graph.len(),
        data_models: registry.data_model_count(),
        enumerations: model_graph.enumerations().len(),
        forward_edges: model_graph.forward_edge_count(),
        backward_edges: model_graph.backward_edge_count(),
        dropped_references: model_graph.unresolved().len(),
        reference_cycles,
        dtos: dto_graph.len(),
        dto_edges: dto_graph.edge_count(),
        use_cases: plan.len(),
        synthesized_use_cases: plan.use_cases().iter().filter(|u| u.synthesized).count(),
        methods: plan.catalogue().len(),
        method_reuses: plan.catalogue().reuse_count(),
        method_conflicts: plan.catalogue().conflict_count(),
        build_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Link complete: {} models, {} DTOs, {} use cases, {} methods in {}ms",
        stats.models, stats.dtos, stats.use_cases, stats.methods, stats.build_duration_ms
    );

    Ok(LinkedModel {
        model_graph,
        dto_graph,
        plan,
        stats,
    })
}
