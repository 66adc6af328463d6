//! Use-case planner
//!
//! ```text
//! 1  synthesize SearchCount variants of Search use cases (DTO builder resumed)
//! 2  feature-name table: use-case overrides, then model-declared names
//! 3  graph-shape methods: IsUsed per backward edge, ReadAggregateId per child
//! 4  per use case: namespace + kind-driven methods, all via the catalogue
//! ```

use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use super::catalogue::MethodCatalogue;
use super::feature_names::FeatureNameTable;
use super::plan::UseCasePlan;
use super::types::{MethodKind, QueryProviderMethod, TypeDescriptor, UseCaseNode};
use crate::config::LinkerConfig;
use crate::errors::Result;
use crate::features::dto_graph::{DtoGraph, DtoGraphBuilder, DtoTarget, ResolvedUseCase};
use crate::features::model_graph::{DomainModelNode, ModelGraph};
use crate::shared::models::{MethodId, ModelId, UseCaseDef, UseCaseId, UseCaseKind};
use crate::shared::naming::{lower_first, Pluralizer, SuffixPluralizer};

/// Methods derived from the shape of the model graph alone
#[derive(Default)]
struct GraphShapeMethods {
    /// Referenced model → IsUsed methods of edges pointing at it
    is_used_by_target: FxHashMap<ModelId, Vec<MethodId>>,
    /// Child model → its ReadAggregateId method
    read_aggregate_id: FxHashMap<ModelId, MethodId>,
}

pub struct UseCasePlanner<'a> {
    models: &'a ModelGraph,
    config: &'a LinkerConfig,
    pluralizer: Box<dyn Pluralizer + 'a>,
}

impl<'a> UseCasePlanner<'a> {
    pub fn new(models: &'a ModelGraph, config: &'a LinkerConfig) -> Self {
        Self {
            models,
            config,
            pluralizer: Box::new(SuffixPluralizer),
        }
    }

    pub fn with_pluralizer(mut self, pluralizer: impl Pluralizer + 'a) -> Self {
        self.pluralizer = Box::new(pluralizer);
        self
    }

    /// Plan every use case of the DTO graph.
    ///
    /// The DTO graph comes back extended by the synthesized count variants.
    pub fn plan(&self, dtos: DtoGraph) -> Result<(DtoGraph, UseCasePlan)> {
        let start = Instant::now();
        let dtos = self.synthesize_count_variants(dtos)?;

        let mut plan = UseCasePlan::default();
        self.register_feature_names(&dtos, &mut plan.features);
        let shape = self.plan_graph_shape_methods(&mut plan.catalogue);

        for (slot, resolved) in dtos.use_cases().iter().enumerate() {
            let id = UseCaseId::from_index(slot);
            let methods = self.methods_for(resolved, &dtos, &shape, &mut plan.catalogue);
            let feature_name = plan
                .features
                .get(&resolved.domain, &resolved.namespace_key)
                .map(str::to_string);
            let namespace = self.namespace(resolved, feature_name.as_deref());

            // Identity was already checked by the DTO stage
            let _ = plan
                .index
                .insert_unique(&resolved.domain, &resolved.namespace_key, &resolved.name, id);

            plan.use_cases.push(UseCaseNode {
                id,
                domain: resolved.domain.clone(),
                name: resolved.name.clone(),
                kind: resolved.kind,
                classification_key: resolved.classification_key.clone(),
                namespace_key: resolved.namespace_key.clone(),
                namespace,
                feature_name,
                governing_model: resolved.governing_model,
                main_dto: resolved.main_dto,
                dtos: resolved.dtos.clone(),
                methods,
                synthesized: resolved.synthesized,
            });
        }

        info!(
            "Use cases planned: {} use cases, {} methods ({} reused, {} conflicting) in {}ms",
            plan.use_cases.len(),
            plan.catalogue.len(),
            plan.catalogue.reuse_count(),
            plan.catalogue.conflict_count(),
            start.elapsed().as_millis()
        );
        Ok((dtos, plan))
    }

    fn synthesize_count_variants(&self, dtos: DtoGraph) -> Result<DtoGraph> {
        let suffix = &self.config.naming.count_suffix;
        let variants: Vec<(String, UseCaseDef)> = dtos
            .use_cases()
            .iter()
            .filter(|u| u.kind == UseCaseKind::Search && !u.synthesized)
            .map(|u| (u.domain.clone(), u.source.count_variant(suffix)))
            .collect();

        let mut builder = DtoGraphBuilder::resume(dtos, self.models, self.config);
        for (domain, variant) in &variants {
            builder.add_count_variant(domain, variant)?;
        }
        debug!("Synthesized {} count variants", variants.len());
        Ok(builder.finish())
    }

    fn register_feature_names(&self, dtos: &DtoGraph, features: &mut FeatureNameTable) {
        for use_case in dtos.use_cases() {
            let Some(feature) = use_case.feature_name.as_deref() else {
                continue;
            };
            features.register(&use_case.domain, &use_case.namespace_key, feature);
            if use_case.classification_key != use_case.namespace_key {
                features.register(&use_case.domain, &use_case.classification_key, feature);
            }

            let models: Vec<ModelId> = match use_case.kind {
                UseCaseKind::Create | UseCaseKind::Update => use_case
                    .dtos
                    .iter()
                    .filter_map(|&dto| dtos.node(dto).represents.as_ref())
                    .filter_map(DtoTarget::domain_model)
                    .collect(),
                UseCaseKind::Delete => use_case.governing_model.into_iter().collect(),
                _ => Vec::new(),
            };
            for model in models {
                let node = self.models.node(model);
                features.register(&node.domain, &node.classification_key, feature);
            }
        }

        for node in self.models.nodes() {
            if let Some(feature) = node.feature_name.as_deref() {
                features.fill(&node.domain, &node.classification_key, feature);
            }
        }
    }

    fn plan_graph_shape_methods(&self, catalogue: &mut MethodCatalogue) -> GraphShapeMethods {
        let suffix = &self.config.naming.method_suffix;
        let mut shape = GraphShapeMethods::default();

        for target in self.models.nodes() {
            for edge in target.referenced_by.iter().filter(|e| e.is_structural()) {
                let method = QueryProviderMethod::new(
                    &edge.peer.domain,
                    &edge.peer.classification_key,
                    format!("IsUsed{}{}", edge.property_name, suffix),
                    MethodKind::IsUsedForeignKey,
                    TypeDescriptor::boolean(),
                )
                .with_parameter(
                    lower_first(&edge.property_name),
                    TypeDescriptor::new(&edge.key_type),
                );
                let id = catalogue.request(method);
                let attached = shape.is_used_by_target.entry(target.id).or_default();
                if !attached.contains(&id) {
                    attached.push(id);
                }
            }
        }

        for child in self.models.nodes() {
            let Some(top) = self.models.top_level_aggregate(child.id) else {
                continue;
            };
            let top = self.models.node(top);
            let method = QueryProviderMethod::new(
                &top.domain,
                &top.classification_key,
                format!("Read{}IdBy{}Id{}", top.name, child.name, suffix),
                MethodKind::ReadAggregateId,
                TypeDescriptor::new(&top.id_type),
            )
            .with_parameter(
                format!("{}Id", lower_first(&child.name)),
                TypeDescriptor::new(&child.id_type),
            )
            .with_chain(self.models.aggregate_chain(child.id));
            shape
                .read_aggregate_id
                .insert(child.id, catalogue.request(method));
        }

        debug!(
            "Graph-shape methods: {} IsUsed targets, {} ReadAggregateId",
            shape.is_used_by_target.len(),
            shape.read_aggregate_id.len()
        );
        shape
    }

    fn namespace(&self, use_case: &ResolvedUseCase, feature_name: Option<&str>) -> String {
        let segment = feature_name
            .map(str::to_string)
            .unwrap_or_else(|| self.pluralizer.pluralize(&use_case.namespace_key));
        format!(
            "{}.{}.{}.{}.{}",
            self.config.application_root_namespace,
            use_case.domain,
            segment,
            use_case.kind.namespace_segment(),
            use_case.name
        )
    }

    fn methods_for(
        &self,
        use_case: &ResolvedUseCase,
        dtos: &DtoGraph,
        shape: &GraphShapeMethods,
        catalogue: &mut MethodCatalogue,
    ) -> Vec<MethodId> {
        let naming = &self.config.naming;
        let domain = use_case.domain.as_str();
        let key = use_case.namespace_key.as_str();
        let main_type = use_case
            .main_dto
            .map(|dto| dtos.node(dto).canonical_name.clone())
            .unwrap_or_else(|| use_case.reference_name.clone());
        let governing = use_case.governing_model.map(|id| self.models.node(id));

        let query = |name: String, kind: MethodKind, returns: TypeDescriptor| {
            QueryProviderMethod::new(domain, key, name, kind, returns)
        };
        let search_name = format!("{}{}", use_case.name, naming.method_suffix);

        let mut methods = Vec::new();
        match use_case.kind {
            UseCaseKind::Read => {
                let id_type = governing
                    .map(|g| g.id_type.clone())
                    .unwrap_or_else(|| self.config.default_id_type.clone());
                methods.push(
                    catalogue.request(
                        query(search_name, MethodKind::Read, TypeDescriptor::new(main_type).nullable())
                            .with_parameter("id", TypeDescriptor::new(id_type)),
                    ),
                );
            }
            UseCaseKind::Search | UseCaseKind::Suggestions => {
                methods.push(catalogue.request(query(
                    search_name,
                    MethodKind::Search,
                    TypeDescriptor::new(main_type).collection(),
                )));
            }
            UseCaseKind::SearchCount => {
                methods.push(catalogue.request(query(
                    search_name,
                    MethodKind::SearchCount,
                    TypeDescriptor::int(),
                )));
            }
            UseCaseKind::Unique => {
                let count_name =
                    format!("{}{}{}", use_case.name, naming.count_suffix, naming.method_suffix);
                methods.push(catalogue.request(query(
                    search_name,
                    MethodKind::Search,
                    TypeDescriptor::new(main_type).collection(),
                )));
                methods.push(catalogue.request(query(
                    count_name,
                    MethodKind::SearchCount,
                    TypeDescriptor::int(),
                )));
            }
            UseCaseKind::Create | UseCaseKind::Update => {
                self.request_exists(use_case, dtos, catalogue, &mut methods);
                self.request_is_unique(use_case, dtos, catalogue, &mut methods);
                if let Some(id) = governing.and_then(|g| shape.read_aggregate_id.get(&g.id)) {
                    methods.push(*id);
                }
            }
            UseCaseKind::Delete => {
                if let Some(g) = governing {
                    let mut targets = vec![g.id];
                    if g.is_aggregate {
                        targets.extend(self.models.descendants(g.id));
                    }
                    for target in targets {
                        if let Some(attached) = shape.is_used_by_target.get(&target) {
                            methods.extend(attached.iter().copied());
                        }
                    }
                    if let Some(&id) = shape.read_aggregate_id.get(&g.id) {
                        methods.push(id);
                    }
                }
            }
            UseCaseKind::Custom => {}
        }

        let mut seen = FxHashSet::default();
        methods.retain(|id| seen.insert(*id));
        methods
    }

    /// ExistsAsync in each referenced target's bucket, per foreign-key DTO property
    fn request_exists(
        &self,
        use_case: &ResolvedUseCase,
        dtos: &DtoGraph,
        catalogue: &mut MethodCatalogue,
        methods: &mut Vec<MethodId>,
    ) {
        let name = format!("Exists{}", self.config.naming.method_suffix);
        for &dto_id in &use_case.dtos {
            let dto = dtos.node(dto_id);
            let owner = dto
                .represents
                .as_ref()
                .and_then(DtoTarget::domain_model)
                .or(use_case.governing_model);
            let Some(owner) = owner.map(|id| self.models.node(id)) else {
                continue;
            };

            for property in &dto.properties {
                let Some(target) = owner
                    .reference_for(&property.name)
                    .and_then(|edge| edge.peer.model)
                else {
                    continue;
                };
                let target = self.models.node(target);
                methods.push(
                    catalogue.request(
                        QueryProviderMethod::new(
                            &target.domain,
                            &target.classification_key,
                            name.clone(),
                            MethodKind::Exists,
                            TypeDescriptor::boolean(),
                        )
                        .with_parameter("id", TypeDescriptor::new(&target.id_type)),
                    ),
                );
            }
        }
    }

    /// IsUnique per Unique rule on every domain model the DTOs map to
    fn request_is_unique(
        &self,
        use_case: &ResolvedUseCase,
        dtos: &DtoGraph,
        catalogue: &mut MethodCatalogue,
        methods: &mut Vec<MethodId>,
    ) {
        let mut models: Vec<ModelId> = Vec::new();
        for &dto_id in &use_case.dtos {
            let represents = dtos.node(dto_id).represents.as_ref();
            if let Some(model) = represents.and_then(DtoTarget::domain_model) {
                if !models.contains(&model) {
                    models.push(model);
                }
            }
        }

        for model in models {
            let model = self.models.node(model);
            for property in &model.properties {
                for rule in property.unique_rules() {
                    let method =
                        self.is_unique_method(model, &property.name, &rule.related_properties);
                    methods.push(catalogue.request(method));
                }
            }
        }
    }

    fn is_unique_method(
        &self,
        model: &DomainModelNode,
        property: &str,
        related: &[String],
    ) -> QueryProviderMethod {
        let mut method = QueryProviderMethod::new(
            &model.domain,
            &model.classification_key,
            format!("IsUnique{}{}", property, self.config.naming.method_suffix),
            MethodKind::IsUnique,
            TypeDescriptor::boolean(),
        );

        for name in std::iter::once(property).chain(related.iter().map(String::as_str)) {
            match model.property(name) {
                Some(p) => {
                    let mut type_ = TypeDescriptor::new(&p.type_name);
                    type_.nullable = p.nullable;
                    method = method.with_parameter(lower_first(&p.name), type_);
                }
                None => debug!(
                    "Unique rule on {}.{}.{} names unknown property '{}'",
                    model.domain, model.name, property, name
                ),
            }
        }

        method.with_parameter("ignoreId", TypeDescriptor::new(&model.id_type).nullable())
    }
}
