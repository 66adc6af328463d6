//! Property-based tests for the link pipeline
//!
//! Invariants that hold for any generated model set:
//! - Idempotence: link(x) == link(x)
//! - Pairing: each forward edge has exactly one mirrored backward edge
//! - Containment: children point back at their aggregate, never at themselves
//! - Termination: arbitrary child declarations (cycles included) always link

mod common;

use common::*;
use modelgraph_ir::{link, ModelGraph};
use modelgraph_ir::shared::models::*;
use proptest::prelude::*;

/// (reference targets, child names, aggregate flag, change flag) per model
type ModelShape = (Vec<usize>, Vec<usize>, bool, bool);

fn model_name(index: usize) -> String {
    format!("M{}", index)
}

fn model_set(shapes: &[ModelShape], use_case_targets: &[usize]) -> ModelSet {
    // Indexes past the end name models that do not exist
    let span = shapes.len() + 2;
    let mut document = DomainModelDocument::new("D");
    for (index, (references, children, aggregate, tracked)) in shapes.iter().enumerate() {
        let mut model = DomainModelDef::new(model_name(index));
        for (n, target) in references.iter().enumerate() {
            model = model.with_property(
                PropertyDef::new(format!("Ref{}Id", n), "Guid").reference_to(model_name(target % span)),
            );
        }
        for child in children {
            model = model.with_child(model_name(child % span));
        }
        if *aggregate {
            model = model.aggregate();
        }
        if *tracked {
            model = model.tracking_changes();
        }
        document = document.with_model(model);
    }

    let mut use_cases = UseCaseDocument::new("D");
    for (n, target) in use_case_targets.iter().enumerate() {
        let target = model_name(target % shapes.len());
        use_cases = use_cases
            .with_use_case(UseCaseDef::new(format!("Read{}", n), UseCaseKind::Read).for_model(target.clone()))
            .with_use_case(
                UseCaseDef::new(format!("Search{}", n), UseCaseKind::Search)
                    .with_classification_key(target.clone())
                    .with_dto(DtoDef::named("Row").referencing(target.clone())),
            )
            .with_use_case(
                UseCaseDef::new(format!("Update{}", n), UseCaseKind::Update)
                    .with_dto(
                        DtoDef::new()
                            .referencing(target.clone())
                            .with_property(DtoPropertyDef::new("Ref0Id", "Guid")),
                    ),
            )
            .with_use_case(UseCaseDef::new(format!("Delete{}", n), UseCaseKind::Delete).for_model(target));
    }

    ModelSet::new()
        .with_domain_models(document)
        .with_use_cases(use_cases)
}

fn model_shapes() -> impl Strategy<Value = Vec<ModelShape>> {
    prop::collection::vec(
        (
            prop::collection::vec(0usize..12, 0..3),
            prop::collection::vec(0usize..12, 0..3),
            any::<bool>(),
            any::<bool>(),
        ),
        1..8,
    )
}

/// Leaves report their own flag, everything else ORs its children
fn changed_leaf_below(graph: &ModelGraph, id: ModelId) -> bool {
    let node = graph.node(id);
    if node.children.is_empty() {
        node.tracks_changes
    } else {
        node.children.iter().any(|&child| changed_leaf_below(graph, child))
    }
}

proptest! {
    #[test]
    fn prop_linking_is_idempotent(shapes in model_shapes(), targets in prop::collection::vec(0usize..8, 0..3)) {
        let set = model_set(&shapes, &targets);
        let first = link(&set, &config()).unwrap();
        let second = link(&set, &config()).unwrap();

        prop_assert_eq!(&first.model_graph, &second.model_graph);
        prop_assert_eq!(&first.dto_graph, &second.dto_graph);
        prop_assert_eq!(&first.plan, &second.plan);
    }

    #[test]
    fn prop_model_graph_invariants(shapes in model_shapes()) {
        let set = model_set(&shapes, &[]);
        let linked = link(&set, &config()).unwrap();
        let graph = &linked.model_graph;

        assert_edges_paired(graph);
        assert_no_dangling(graph);
        assert_aggregate_linkage(graph);
        prop_assert_eq!(graph.len(), shapes.len());
        prop_assert_eq!(linked.emission_order().len(), shapes.len());

        for node in graph.nodes() {
            let chain = graph.aggregate_chain(node.id);
            prop_assert!(chain.len() <= graph.len());
            prop_assert_eq!(graph.has_changes(node.id), changed_leaf_below(graph, node.id));
        }
    }

    #[test]
    fn prop_methods_are_unique_per_bucket(shapes in model_shapes(), targets in prop::collection::vec(0usize..8, 1..3)) {
        let set = model_set(&shapes, &targets);
        let linked = link(&set, &config()).unwrap();
        let catalogue = linked.plan.catalogue();

        let mut identities: Vec<(&str, &str, &str)> = catalogue
            .methods()
            .iter()
            .map(|m| (m.domain.as_str(), m.classification_key.as_str(), m.name.as_str()))
            .collect();
        let total = identities.len();
        identities.sort();
        identities.dedup();
        prop_assert_eq!(identities.len(), total);

        for use_case in linked.plan.use_cases() {
            let mut methods = use_case.methods.clone();
            methods.sort();
            methods.dedup();
            prop_assert_eq!(methods.len(), use_case.methods.len());
        }
    }
}
