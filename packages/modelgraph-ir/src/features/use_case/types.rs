//! Use-case plan types

use serde::{Deserialize, Serialize};

use crate::shared::models::{DtoId, MethodId, ModelId, UseCaseId, UseCaseKind};

/// What a query-provider method does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Read,
    Search,
    SearchCount,
    Exists,
    IsUnique,
    IsUsedForeignKey,
    ReadAggregateId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub nullable: bool,
    pub is_collection: bool,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            is_collection: false,
        }
    }

    pub fn boolean() -> Self {
        Self::new("bool")
    }

    pub fn int() -> Self {
        Self::new("int")
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_: TypeDescriptor,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            type_,
        }
    }
}

/// A data-access operation some use case needs
///
/// Identity is (domain, classification key, name); the catalogue stores one
/// descriptor per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProviderMethod {
    pub domain: String,
    pub classification_key: String,
    pub name: String,
    pub kind: MethodKind,
    pub return_type: TypeDescriptor,
    pub parameters: Vec<ParameterDescriptor>,
    /// child → ... → top aggregate (ReadAggregateId only)
    pub aggregate_chain: Vec<ModelId>,
}

impl QueryProviderMethod {
    pub fn new(
        domain: impl Into<String>,
        classification_key: impl Into<String>,
        name: impl Into<String>,
        kind: MethodKind,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            domain: domain.into(),
            classification_key: classification_key.into(),
            name: name.into(),
            kind,
            return_type,
            parameters: Vec::new(),
            aggregate_chain: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, type_: TypeDescriptor) -> Self {
        self.parameters.push(ParameterDescriptor::new(name, type_));
        self
    }

    pub fn with_chain(mut self, chain: Vec<ModelId>) -> Self {
        self.aggregate_chain = chain;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseNode {
    pub id: UseCaseId,
    pub domain: String,
    pub name: String,
    pub kind: UseCaseKind,
    pub classification_key: String,
    pub namespace_key: String,
    /// `{root}.{domain}.{feature or plural key}.{Commands|Queries}.{name}`
    pub namespace: String,
    pub feature_name: Option<String>,
    pub governing_model: Option<ModelId>,
    pub main_dto: Option<DtoId>,
    pub dtos: Vec<DtoId>,
    /// Ordered, each method once
    pub methods: Vec<MethodId>,
    pub synthesized: bool,
}
