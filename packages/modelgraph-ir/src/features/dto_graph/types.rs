//! DTO graph types

use serde::{Deserialize, Serialize};

use crate::shared::models::{DtoId, ModelId, UseCaseDef, UseCaseKind};

/// What a DTO maps to or from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DtoTarget {
    DomainModel(ModelId),
    DataModel { domain: String, name: String },
}

impl DtoTarget {
    pub fn domain_model(&self) -> Option<ModelId> {
        match self {
            Self::DomainModel(id) => Some(*id),
            Self::DataModel { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoProperty {
    pub name: String,
    /// Declared type, or the sibling's canonical name when it named a sibling DTO
    pub type_name: String,
    pub nullable: bool,
    pub is_collection: bool,
    /// Sibling DTO this property points at
    pub dto: Option<DtoId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoNode {
    pub id: DtoId,
    pub domain: String,
    /// `{namespace key}.{use case name}`
    pub use_case_key: String,
    pub use_case_name: String,
    pub logical_name: String,
    /// `{reference}{use case}{logical}{suffix}`
    pub canonical_name: String,
    /// Model name the DTO declared (or inherited) as its counterpart
    pub reference_model: Option<String>,
    pub represents: Option<DtoTarget>,
    pub properties: Vec<DtoProperty>,
    /// DTO → DTO edges, one level, in property order
    pub references: Vec<DtoId>,
}

/// A use case after governing-model resolution and naming
///
/// Index `i` in `DtoGraph::use_cases()` becomes `UseCaseId(i)` in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUseCase {
    pub domain: String,
    /// Use-case name after child-model adjustment
    pub name: String,
    pub kind: UseCaseKind,
    pub classification_key: String,
    pub namespace_key: String,
    /// Leading part of every canonical DTO name of this use case
    pub reference_name: String,
    pub feature_name: Option<String>,
    pub governing_model: Option<ModelId>,
    /// Top-level aggregate a child command was redirected to
    pub redirected_to: Option<ModelId>,
    pub main_dto: Option<DtoId>,
    pub dtos: Vec<DtoId>,
    /// Produced from a Search use case rather than declared
    pub synthesized: bool,
    /// Definition as declared, kept for count-variant derivation
    pub source: UseCaseDef,
}

impl ResolvedUseCase {
    pub fn key(&self) -> String {
        use_case_key(&self.namespace_key, &self.name)
    }
}

pub(crate) fn use_case_key(namespace_key: &str, name: &str) -> String {
    format!("{}.{}", namespace_key, name)
}
