//! DTO graph builder
//!
//! Walks the use cases in declaration order. For each one it resolves the
//! governing domain model, fixes the namespace key and the names every DTO
//! is emitted under, attaches DTOs to the model they map, and rewrites
//! property types that name a sibling DTO.
//!
//! Resolution is fatal only for Create/Update/Delete; every other lookup
//! degrades to `None`.

use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use super::graph::DtoGraph;
use super::types::{use_case_key, DtoNode, DtoProperty, DtoTarget, ResolvedUseCase};
use crate::config::LinkerConfig;
use crate::errors::{DefinitionKind, LinkError, Result};
use crate::features::model_graph::ModelGraph;
use crate::shared::models::{DtoDef, DtoId, ModelId, ModelSet, UseCaseDef, UseCaseKind};

/// DTO waiting for its sibling types to be rewritten
struct DtoDraft<'d> {
    def: &'d DtoDef,
    logical_name: String,
    canonical_name: String,
    reference_model: Option<String>,
    represents: Option<DtoTarget>,
}

pub struct DtoGraphBuilder<'a> {
    models: &'a ModelGraph,
    config: &'a LinkerConfig,
    graph: DtoGraph,
}

impl<'a> DtoGraphBuilder<'a> {
    pub fn new(models: &'a ModelGraph, config: &'a LinkerConfig) -> Self {
        Self::resume(DtoGraph::default(), models, config)
    }

    /// Continue adding use cases to a finished graph
    pub fn resume(graph: DtoGraph, models: &'a ModelGraph, config: &'a LinkerConfig) -> Self {
        Self {
            models,
            config,
            graph,
        }
    }

    /// Link every use case of the set and hand out the graph
    pub fn build(mut self, set: &ModelSet) -> Result<DtoGraph> {
        let start = Instant::now();

        for document in &set.use_cases {
            for def in &document.use_cases {
                self.add_use_case(&document.domain, def)?;
            }
        }

        info!(
            "DTO graph built: {} use cases ({} SearchCount skipped), {} DTOs, {} DTO edges in {}ms",
            self.graph.use_cases.len(),
            self.graph.skipped,
            self.graph.len(),
            self.graph.edge_count(),
            start.elapsed().as_millis()
        );
        Ok(self.graph)
    }

    /// Link one declared use case.
    ///
    /// Returns its position in `DtoGraph::use_cases()`, or `None` when the use
    /// case was skipped (declared SearchCount, or unnamed).
    pub fn add_use_case(&mut self, domain: &str, def: &UseCaseDef) -> Result<Option<usize>> {
        if def.kind == UseCaseKind::SearchCount {
            debug!(
                "Skipping declared SearchCount use case '{}' in domain '{}'",
                def.name, domain
            );
            self.graph.skipped += 1;
            return Ok(None);
        }
        if def.name.trim().is_empty() {
            debug!("Skipping unnamed use case in domain '{}'", domain);
            return Ok(None);
        }
        self.link_use_case(domain, def, false).map(Some)
    }

    /// Link a synthesized count variant through the same path
    pub fn add_count_variant(&mut self, domain: &str, def: &UseCaseDef) -> Result<usize> {
        self.link_use_case(domain, def, true)
    }

    pub fn finish(self) -> DtoGraph {
        self.graph
    }

    fn link_use_case(&mut self, domain: &str, def: &UseCaseDef, synthesized: bool) -> Result<usize> {
        let models = self.models;
        let declared_name = def.name.trim();
        let governing = self.resolve_governing(domain, declared_name, def)?;

        let mut name = declared_name.to_string();
        let mut redirected_to = None;
        if def.kind.is_command() {
            if let Some(child) = governing.map(|id| models.node(id)) {
                if child.is_child_domain_model() {
                    if !name.contains(&child.name) {
                        name.push_str(&child.name);
                    }
                    redirected_to = models.top_level_aggregate(child.id);
                }
            }
        }

        let namespace_key = non_empty(def.namespace_classification_key.as_deref())
            .or_else(|| redirected_to.map(|top| models.node(top).classification_key.clone()))
            .or_else(|| non_empty(Some(def.classification_key.as_str())))
            .or_else(|| governing.map(|id| models.node(id).classification_key.clone()))
            .or_else(|| def.declared_model().map(str::to_string))
            .unwrap_or_else(|| name.clone());

        let reference_name = redirected_to
            .or(governing)
            .map(|id| models.node(id).name.clone())
            .or_else(|| def.declared_model().map(str::to_string))
            .unwrap_or_else(|| namespace_key.clone());

        let slot = self.graph.use_cases.len();
        if self
            .graph
            .use_case_index
            .insert_unique(domain, &namespace_key, &name, slot)
            .is_err()
        {
            return Err(LinkError::duplicate(
                DefinitionKind::UseCase,
                domain,
                use_case_key(&namespace_key, &name),
            ));
        }

        let key = use_case_key(&namespace_key, &name);
        let drafts = self.draft_dtos(domain, def, &name, &reference_name, governing);

        let mut seen = FxHashSet::default();
        for draft in &drafts {
            if !seen.insert(draft.logical_name.as_str()) {
                return Err(LinkError::duplicate(
                    DefinitionKind::Dto,
                    domain,
                    format!("{}.{}", key, draft.logical_name),
                ));
            }
        }

        let dto_ids = self.insert_dtos(domain, &key, &name, drafts);

        // Drafts follow `def.dtos` one to one, so the index carries over
        let main_dto = def
            .main_dto_index()
            .and_then(|index| dto_ids.get(index).copied());

        debug!(
            "Linked use case {}.{} ({:?}): {} DTOs, governing model {:?}",
            domain,
            key,
            def.kind,
            dto_ids.len(),
            governing.map(|id| models.node(id).name.as_str())
        );

        self.graph.use_cases.push(ResolvedUseCase {
            domain: domain.to_string(),
            name,
            kind: def.kind,
            classification_key: non_empty(Some(def.classification_key.as_str()))
                .unwrap_or_else(|| namespace_key.clone()),
            namespace_key,
            reference_name,
            feature_name: non_empty(def.feature_name.as_deref()),
            governing_model: governing,
            redirected_to,
            main_dto,
            dtos: dto_ids,
            synthesized,
            source: def.clone(),
        });
        Ok(slot)
    }

    fn resolve_governing(
        &self,
        domain: &str,
        use_case: &str,
        def: &UseCaseDef,
    ) -> Result<Option<ModelId>> {
        let main_reference = def.main_dto_def().and_then(DtoDef::declared_reference);

        let required = match def.kind {
            UseCaseKind::Delete => def.declared_model(),
            UseCaseKind::Create | UseCaseKind::Update => main_reference.or(def.declared_model()),
            _ => {
                let declared = def.declared_model().or(main_reference);
                let resolved = declared.and_then(|model| self.models.resolve(domain, None, model));
                if let (Some(model), None) = (declared, resolved) {
                    debug!(
                        "Use case {}.{} names '{}', which is not a domain model",
                        domain, use_case, model
                    );
                }
                return Ok(resolved);
            }
        };

        let model = required.ok_or_else(|| LinkError::UnspecifiedDomainModel {
            domain: domain.to_string(),
            use_case: use_case.to_string(),
        })?;
        self.models
            .resolve(domain, None, model)
            .map(Some)
            .ok_or_else(|| LinkError::missing_model(domain, model, use_case))
    }

    fn draft_dtos<'d>(
        &self,
        domain: &str,
        def: &'d UseCaseDef,
        use_case_name: &str,
        reference_name: &str,
        governing: Option<ModelId>,
    ) -> Vec<DtoDraft<'d>> {
        let governing = governing.map(|id| self.models.node(id));
        let suffix = &self.config.naming.dto_suffix;

        def.dtos
            .iter()
            .map(|dto| {
                let logical_name = dto
                    .declared_name()
                    .map(str::to_string)
                    .or_else(|| governing.map(|g| g.name.clone()))
                    .or_else(|| dto.declared_reference().map(str::to_string))
                    .unwrap_or_else(|| reference_name.to_string());
                let canonical_name =
                    format!("{}{}{}{}", reference_name, use_case_name, logical_name, suffix);

                let reference_model = dto.declared_reference().map(str::to_string).or_else(|| {
                    governing.map(|g| {
                        if def.kind.is_read_side() {
                            g.data_model_name.clone()
                        } else {
                            g.name.clone()
                        }
                    })
                });
                let represents = reference_model
                    .as_deref()
                    .and_then(|model| self.attach(domain, def.kind, model));

                DtoDraft {
                    def: dto,
                    logical_name,
                    canonical_name,
                    reference_model,
                    represents,
                }
            })
            .collect()
    }

    fn attach(&self, domain: &str, kind: UseCaseKind, model: &str) -> Option<DtoTarget> {
        let as_domain_model = || {
            self.models
                .resolve(domain, None, model)
                .map(DtoTarget::DomainModel)
        };
        let as_data_model = || {
            self.models
                .data_model(domain, model)
                .map(|data_model| DtoTarget::DataModel {
                    domain: data_model.domain.clone(),
                    name: data_model.name.clone(),
                })
        };

        let target = if kind.is_command() {
            as_domain_model()
        } else if kind.is_read_side() {
            as_data_model()
        } else {
            as_domain_model().or_else(as_data_model)
        };
        if target.is_none() {
            debug!(
                "DTO reference '{}' in domain '{}' matches no model for a {:?} use case",
                model, domain, kind
            );
        }
        target
    }

    fn insert_dtos(
        &mut self,
        domain: &str,
        key: &str,
        use_case_name: &str,
        drafts: Vec<DtoDraft<'_>>,
    ) -> Vec<DtoId> {
        let first = self.graph.nodes.len();
        let siblings: FxHashMap<String, (DtoId, String)> = drafts
            .iter()
            .enumerate()
            .map(|(offset, draft)| {
                (
                    draft.logical_name.clone(),
                    (DtoId::from_index(first + offset), draft.canonical_name.clone()),
                )
            })
            .collect();

        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = DtoId::from_index(self.graph.nodes.len());

            let mut references = Vec::new();
            let properties: Vec<DtoProperty> = draft
                .def
                .properties
                .iter()
                .map(|property| {
                    let sibling = siblings.get(property.type_name.trim());
                    if let Some(&(sibling_id, _)) = sibling {
                        if !references.contains(&sibling_id) {
                            references.push(sibling_id);
                        }
                    }
                    DtoProperty {
                        name: property.name.clone(),
                        type_name: sibling
                            .map(|(_, canonical)| canonical.clone())
                            .unwrap_or_else(|| property.type_name.clone()),
                        nullable: property.nullable,
                        is_collection: property.is_collection,
                        dto: sibling.map(|&(sibling_id, _)| sibling_id),
                    }
                })
                .collect();

            // Logical names were checked for repeats by the caller
            let _ = self
                .graph
                .by_logical
                .insert_unique(domain, key, &draft.logical_name, id);

            if self
                .graph
                .by_canonical
                .insert_unique(domain, &draft.canonical_name, id)
                .is_err()
            {
                warn!(
                    "Canonical DTO name '{}' in domain '{}' is emitted twice; name lookups return the first",
                    draft.canonical_name, domain
                );
            }

            if let Some(model_name) = draft.represents.as_ref().map(|target| match target {
                DtoTarget::DomainModel(model) => self.models.node(*model).name.clone(),
                DtoTarget::DataModel { name, .. } => name.clone(),
            }) {
                let (bucket, _) =
                    self.graph
                        .by_model
                        .get_or_insert_with(domain, key, &model_name, Vec::new);
                bucket.push(id);
            }

            self.graph.nodes.push(DtoNode {
                id,
                domain: domain.to_string(),
                use_case_key: key.to_string(),
                use_case_name: use_case_name.to_string(),
                logical_name: draft.logical_name,
                canonical_name: draft.canonical_name,
                reference_model: draft.reference_model,
                represents: draft.represents,
                properties,
                references,
            });
            ids.push(id);
        }
        ids
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl DtoGraph {
    /// Build the DTO graph for every use case in the set
    pub fn build(set: &ModelSet, models: &ModelGraph, config: &LinkerConfig) -> Result<DtoGraph> {
        DtoGraphBuilder::new(models, config).build(set)
    }
}
