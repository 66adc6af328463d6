//! Model graph builder
//!
//! Four passes over the registry:
//!
//! ```text
//! A  register nodes + forward edges   (reversed edges staged)
//! B  backward edges                    (staged edges applied)
//! C  aggregate / child linkage
//! D  persistence-only cross-domain backward edges
//! ```
//!
//! Nothing in here fails. An unresolvable reference is dropped, recorded in
//! `ModelGraph::unresolved` and logged at debug level, so a draft model set
//! always links.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::graph::ModelGraph;
use super::types::{
    DomainModelNode, EdgeOrigin, EdgePeer, EnumItem, EnumerationNode, ForeignKeyEdge,
    UnresolvedKind, UnresolvedReference,
};
use crate::config::LinkerConfig;
use crate::features::registry::ModelRegistry;
use crate::shared::models::{EnumerationId, ModelId};

/// Reversed edge waiting for pass B
struct StagedEdge {
    target: ModelId,
    edge: ForeignKeyEdge,
}

pub struct ModelGraphBuilder<'a> {
    registry: &'a ModelRegistry,
    config: &'a LinkerConfig,
    graph: ModelGraph,
    staged: Vec<StagedEdge>,
    aggregates: Vec<ModelId>,
}

impl<'a> ModelGraphBuilder<'a> {
    pub fn new(registry: &'a ModelRegistry, config: &'a LinkerConfig) -> Self {
        Self {
            registry,
            config,
            graph: ModelGraph::default(),
            staged: Vec::new(),
            aggregates: Vec::new(),
        }
    }

    /// Run all passes and hand out the finished graph
    pub fn build(mut self) -> ModelGraph {
        let start = Instant::now();

        self.register_nodes();
        self.register_enumerations();
        self.link_forward_edges();
        self.link_backward_edges();
        self.link_aggregates();
        self.link_persistence_edges();

        let graph = self.graph;
        info!(
            "Model graph built: {} models, {} enumerations, {} forward / {} backward edges, {} dropped references in {}ms",
            graph.len(),
            graph.enumerations.len(),
            graph.forward_edge_count(),
            graph.backward_edge_count(),
            graph.unresolved.len(),
            start.elapsed().as_millis()
        );
        graph
    }

    // ── Pass A ───────────────────────────────────────────────────────────────

    fn register_nodes(&mut self) {
        let registry = self.registry;
        for registered in registry.models() {
            let def = &registered.def;
            let id = ModelId::from_index(self.graph.nodes.len());
            let node = DomainModelNode {
                id,
                domain: registered.domain.clone(),
                name: def.name.clone(),
                classification_key: def.classification_key.clone(),
                feature_name: def.feature_name.clone(),
                id_type: def
                    .id_type
                    .clone()
                    .unwrap_or_else(|| self.config.default_id_type.clone()),
                data_model_name: def.data_model_name.clone().unwrap_or_else(|| def.name.clone()),
                is_aggregate: def.is_aggregate,
                is_value_object: def.is_value_object,
                tracks_changes: def.tracks_changes,
                declared_children: def.children.clone(),
                properties: def.properties.clone(),
                references: Vec::new(),
                referenced_by: Vec::new(),
                children: Vec::new(),
                aggregate: None,
            };

            if self
                .graph
                .index
                .insert_unique(&node.domain, &node.name, id)
                .is_err()
            {
                // The registry already settled duplicates; keep the first node
                debug!("Model '{}.{}' registered twice, ignoring", node.domain, node.name);
                continue;
            }

            let (backing, _) = self.graph.backed_by.get_or_insert_with(
                &node.domain,
                &node.data_model_name,
                Vec::new,
            );
            backing.push(id);

            if node.is_aggregate {
                self.aggregates.push(id);
            }
            self.graph.nodes.push(node);
        }

        for data_model in registry.data_models() {
            let _ = self.graph.data_models.insert_unique(
                &data_model.domain,
                &data_model.name,
                data_model.clone(),
            );
        }
    }

    fn register_enumerations(&mut self) {
        let root = &self.config.application_root_namespace;
        for registered in self.registry.enumerations() {
            let id = EnumerationId::from_index(self.graph.enumerations.len());
            let mut next = 0i64;
            let items = registered
                .def
                .items
                .iter()
                .map(|item| {
                    let value = item.value.unwrap_or(next);
                    next = value.saturating_add(1);
                    EnumItem {
                        name: item.name.clone(),
                        value,
                    }
                })
                .collect();

            let node = EnumerationNode {
                id,
                domain: registered.domain.clone(),
                name: registered.def.name.clone(),
                items,
                namespace: format!("{}.{}.Enumerations", root, registered.domain),
            };
            if self
                .graph
                .enumeration_index
                .insert_unique(&node.domain, &node.name, id)
                .is_ok()
            {
                self.graph.enumerations.push(node);
            }
        }
    }

    fn link_forward_edges(&mut self) {
        for owner_index in 0..self.graph.nodes.len() {
            let owner = &self.graph.nodes[owner_index];
            let owner_peer = owner.as_peer();

            let mut forward = Vec::new();
            let mut dropped = Vec::new();

            for property in &owner.properties {
                let Some(target_name) = property.reference_target() else {
                    continue;
                };
                let declared_domain = property.reference_domain.as_deref();

                let resolved = self.registered_peer(&owner.domain, declared_domain, target_name);
                let Some((target_id, target_peer)) = resolved else {
                    dropped.push(UnresolvedReference {
                        kind: UnresolvedKind::Reference,
                        domain: owner.domain.clone(),
                        owner: owner.name.clone(),
                        member: property.name.clone(),
                        target_domain: declared_domain
                            .filter(|d| !d.trim().is_empty())
                            .unwrap_or(&owner.domain)
                            .to_string(),
                        target: target_name.to_string(),
                    });
                    continue;
                };

                let target = &self.graph.nodes[target_id.index()];
                let key_type = if property.type_name.trim().is_empty() {
                    target.id_type.clone()
                } else {
                    property.type_name.clone()
                };

                forward.push(ForeignKeyEdge {
                    property_name: property.name.clone(),
                    property_alias: property.alias.clone(),
                    peer: target_peer,
                    key_type: key_type.clone(),
                    is_processing: property.is_processing,
                    origin: EdgeOrigin::DomainModel,
                });
                self.staged.push(StagedEdge {
                    target: target_id,
                    edge: ForeignKeyEdge {
                        property_name: property.name.clone(),
                        property_alias: property.alias.clone(),
                        peer: owner_peer.clone(),
                        key_type,
                        is_processing: property.is_processing,
                        origin: EdgeOrigin::DomainModel,
                    },
                });
            }

            for reference in &dropped {
                debug!(
                    "Dropping reference {}.{}.{} -> {}.{} (not in model space)",
                    reference.domain,
                    reference.owner,
                    reference.member,
                    reference.target_domain,
                    reference.target
                );
            }
            self.graph.unresolved.extend(dropped);
            self.graph.nodes[owner_index].references = forward;
        }
    }

    /// Resolve a model name against the registry summaries.
    ///
    /// `declared_domain` wins when present and non-empty. The peer is built
    /// from the summary, so it carries the normalized classification key,
    /// feature name and backing data model.
    fn registered_peer(
        &self,
        owner_domain: &str,
        declared_domain: Option<&str>,
        name: &str,
    ) -> Option<(ModelId, EdgePeer)> {
        let domain = declared_domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(owner_domain);
        let name = name.trim();
        let summary = self.registry.summary(domain, name)?;

        // Nodes were registered in registry order, so the slot is the arena index
        let node = self.graph.nodes.get(summary.slot)?;
        if node.domain != domain || node.name != name {
            debug!("Registry slot {} does not hold {}.{}", summary.slot, domain, name);
            return None;
        }
        Some((
            node.id,
            EdgePeer {
                domain: domain.to_string(),
                name: name.to_string(),
                classification_key: summary.classification_key.clone(),
                feature_name: summary.feature_name.clone(),
                data_model_name: summary.data_model_name.clone(),
                model: Some(node.id),
            },
        ))
    }

    // ── Pass B ───────────────────────────────────────────────────────────────

    fn link_backward_edges(&mut self) {
        for staged in std::mem::take(&mut self.staged) {
            match self.graph.nodes.get_mut(staged.target.index()) {
                Some(target) => target.referenced_by.push(staged.edge),
                None => debug!("Backward edge target {} vanished, dropping", staged.target),
            }
        }
    }

    // ── Pass C ───────────────────────────────────────────────────────────────

    fn link_aggregates(&mut self) {
        for aggregate_id in self.aggregates.clone() {
            let (domain, name, declared) = {
                let node = self.graph.node(aggregate_id);
                (
                    node.domain.clone(),
                    node.name.clone(),
                    node.declared_children.clone(),
                )
            };

            for child_name in &declared {
                let Some((child_id, _)) = self.registered_peer(&domain, None, child_name) else {
                    debug!(
                        "Dropping child '{}' of aggregate {}.{} (not found)",
                        child_name, domain, name
                    );
                    self.graph.unresolved.push(UnresolvedReference {
                        kind: UnresolvedKind::Child,
                        domain: domain.clone(),
                        owner: name.clone(),
                        member: child_name.clone(),
                        target_domain: domain.clone(),
                        target: child_name.clone(),
                    });
                    continue;
                };

                if child_id == aggregate_id {
                    warn!("Aggregate {}.{} lists itself as a child, ignoring", domain, name);
                    continue;
                }
                if let Some(owner) = self.graph.node(child_id).aggregate {
                    if owner != aggregate_id {
                        warn!(
                            "Child {}.{} already belongs to {}, ignoring second aggregate {}",
                            domain,
                            child_name,
                            self.graph.node(owner).name,
                            name
                        );
                    }
                    continue;
                }
                if self.graph.aggregate_chain(aggregate_id).contains(&child_id) {
                    warn!(
                        "Child {}.{} would close an aggregate cycle through {}, ignoring",
                        domain, child_name, name
                    );
                    continue;
                }

                self.graph.nodes[child_id.index()].aggregate = Some(aggregate_id);
                self.graph.nodes[aggregate_id.index()].children.push(child_id);
            }
        }

        for &aggregate_id in &self.aggregates {
            let node = self.graph.node(aggregate_id);
            if node.is_top_level_aggregate() {
                let domain = node.domain.clone();
                self.graph
                    .top_level_aggregates
                    .entry(domain)
                    .or_default()
                    .push(aggregate_id);
            }
        }
    }

    // ── Pass D ───────────────────────────────────────────────────────────────

    fn link_persistence_edges(&mut self) {
        let registry = self.registry;

        for data_model in registry.data_models() {
            for property in &data_model.properties {
                let Some(reference) = &property.reference else {
                    continue;
                };
                let target_domain = reference
                    .domain
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .unwrap_or(&data_model.domain);
                if target_domain == data_model.domain {
                    continue;
                }

                let targets = self
                    .graph
                    .models_backed_by(target_domain, &reference.data_model)
                    .to_vec();
                if targets.is_empty() {
                    debug!(
                        "Dropping data reference {}.{}.{} -> {}.{} (no backing domain model)",
                        data_model.domain,
                        data_model.name,
                        property.name,
                        target_domain,
                        reference.data_model
                    );
                    self.graph.unresolved.push(UnresolvedReference {
                        kind: UnresolvedKind::DataReference,
                        domain: data_model.domain.clone(),
                        owner: data_model.name.clone(),
                        member: property.name.clone(),
                        target_domain: target_domain.to_string(),
                        target: reference.data_model.clone(),
                    });
                    continue;
                }

                let peer = EdgePeer {
                    domain: data_model.domain.clone(),
                    name: data_model.name.clone(),
                    classification_key: data_model.classification_key.clone(),
                    feature_name: None,
                    data_model_name: data_model.name.clone(),
                    model: None,
                };

                for target_id in targets {
                    let target = &mut self.graph.nodes[target_id.index()];
                    let already_known = target.referenced_by.iter().any(|edge| {
                        edge.property_name == property.name
                            && edge.peer.domain == peer.domain
                            && edge.peer.data_model_name == peer.data_model_name
                    });
                    if already_known {
                        continue;
                    }
                    let key_type = if property.type_name.trim().is_empty() {
                        target.id_type.clone()
                    } else {
                        property.type_name.clone()
                    };
                    target.referenced_by.push(ForeignKeyEdge {
                        property_name: property.name.clone(),
                        property_alias: None,
                        peer: peer.clone(),
                        key_type,
                        is_processing: false,
                        origin: EdgeOrigin::Persistence,
                    });
                }
            }
        }
    }
}

impl ModelGraph {
    /// Build the model graph from a registry
    pub fn build(registry: &ModelRegistry, config: &LinkerConfig) -> ModelGraph {
        ModelGraphBuilder::new(registry, config).build()
    }
}
