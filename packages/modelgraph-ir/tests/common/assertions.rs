//! Graph invariants shared by the integration and property tests

use modelgraph_ir::features::model_graph::ModelGraph;

/// Every forward edge has exactly one mirrored backward edge on its target
pub fn assert_edges_paired(graph: &ModelGraph) {
    for owner in graph.nodes() {
        for edge in &owner.references {
            let target = edge
                .peer
                .model
                .unwrap_or_else(|| panic!("forward edge {}.{} has no target id", owner.name, edge.property_name));
            let mirrored = graph
                .node(target)
                .referenced_by
                .iter()
                .filter(|back| back.peer.model == Some(owner.id) && back.property_name == edge.property_name)
                .count();
            assert_eq!(
                mirrored, 1,
                "Expected one backward edge for {}.{} on {}",
                owner.name, edge.property_name, edge.peer.name
            );
        }
    }
}

/// No edge, child or aggregate pointer leaves the arena
pub fn assert_no_dangling(graph: &ModelGraph) {
    let len = graph.len();
    for node in graph.nodes() {
        let peers = node
            .references
            .iter()
            .chain(&node.referenced_by)
            .filter_map(|edge| edge.peer.model);
        for id in peers.chain(node.children.iter().copied()).chain(node.aggregate) {
            assert!(id.index() < len, "{} points outside the graph: {}", node.name, id);
        }
    }
}

/// A child is never its own top-level aggregate
pub fn assert_aggregate_linkage(graph: &ModelGraph) {
    for node in graph.nodes() {
        assert_eq!(node.is_child_domain_model(), node.aggregate.is_some());
        if node.is_child_domain_model() {
            assert_ne!(graph.top_level_aggregate(node.id), Some(node.id));
        }
        for &child in &node.children {
            assert_eq!(graph.node(child).aggregate, Some(node.id));
        }
    }
}
