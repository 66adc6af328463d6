//! Model graph types
//!
//! Nodes are stored in an arena and point at each other through `ModelId`.
//! A node is created once from its definition; the builder only fills in the
//! derived fields (`references`, `referenced_by`, `children`, `aggregate`).

use serde::{Deserialize, Serialize};

use crate::shared::models::{EnumerationId, ModelId, PropertyDef};

/// Which layer an edge was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOrigin {
    /// Declared on a domain model property
    DomainModel,
    /// Declared only on a persistence model column in another domain
    Persistence,
}

/// The node on the other end of an edge
///
/// For a forward edge this is the target, for a backward edge the
/// referencing owner. `model` is `None` only for persistence-only edges,
/// where the referencing side has no domain model of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePeer {
    pub domain: String,
    pub name: String,
    pub classification_key: String,
    pub feature_name: Option<String>,
    pub data_model_name: String,
    pub model: Option<ModelId>,
}

/// Foreign-key edge between two models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    /// Property on the referencing side
    pub property_name: String,
    pub property_alias: Option<String>,
    pub peer: EdgePeer,
    /// Type of the key value held by the referencing property
    pub key_type: String,
    /// Computational reference; ignored by reverse-reference accounting
    pub is_processing: bool,
    pub origin: EdgeOrigin,
}

impl ForeignKeyEdge {
    /// Matches a DTO property name against the property name or its alias
    pub fn matches_property(&self, name: &str) -> bool {
        self.property_name == name || self.property_alias.as_deref() == Some(name)
    }

    /// Edge participates in reverse-reference accounting
    pub fn is_structural(&self) -> bool {
        !self.is_processing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainModelNode {
    pub id: ModelId,
    pub domain: String,
    pub name: String,
    pub classification_key: String,
    pub feature_name: Option<String>,
    pub id_type: String,
    pub data_model_name: String,
    pub is_aggregate: bool,
    pub is_value_object: bool,
    pub tracks_changes: bool,
    /// Child names as declared; see `children` for the resolved ones
    pub declared_children: Vec<String>,
    pub properties: Vec<PropertyDef>,

    /// Forward edges (this model → models it references)
    pub references: Vec<ForeignKeyEdge>,
    /// Backward edges (models that reference this one)
    pub referenced_by: Vec<ForeignKeyEdge>,
    /// Resolved children (aggregates only)
    pub children: Vec<ModelId>,
    /// Owning aggregate (children only)
    pub aggregate: Option<ModelId>,
}

impl DomainModelNode {
    pub fn is_child_domain_model(&self) -> bool {
        self.aggregate.is_some()
    }

    pub fn is_top_level_aggregate(&self) -> bool {
        self.is_aggregate && self.aggregate.is_none()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Forward edge whose property name or alias equals `name`
    pub fn reference_for(&self, name: &str) -> Option<&ForeignKeyEdge> {
        self.references.iter().find(|edge| edge.matches_property(name))
    }

    /// This node seen from the other end of an edge
    pub(crate) fn as_peer(&self) -> EdgePeer {
        EdgePeer {
            domain: self.domain.clone(),
            name: self.name.clone(),
            classification_key: self.classification_key.clone(),
            feature_name: self.feature_name.clone(),
            data_model_name: self.data_model_name.clone(),
            model: Some(self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationNode {
    pub id: EnumerationId,
    pub domain: String,
    pub name: String,
    pub items: Vec<EnumItem>,
    pub namespace: String,
}

/// What kind of declaration could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnresolvedKind {
    /// Domain model property reference
    Reference,
    /// Aggregate child name
    Child,
    /// Persistence column reference to another domain
    DataReference,
}

/// A reference the builder dropped instead of failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub kind: UnresolvedKind,
    pub domain: String,
    pub owner: String,
    /// Property or child slot that held the reference
    pub member: String,
    pub target_domain: String,
    pub target: String,
}
