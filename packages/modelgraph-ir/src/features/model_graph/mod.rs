//! Model graph stage
//!
//! Registers every domain model and enumeration as a node and links them:
//! forward and backward foreign-key edges, aggregate/child containment and
//! references that only exist between persistence models of two domains.
//!
//! Key properties:
//! - Edges are created in matching forward/backward pairs or not at all
//! - Unresolvable references are dropped, never raised
//! - Aggregate chains are walked with a bounded loop

mod builder;
mod dependency;
mod graph;
mod types;

pub use builder::ModelGraphBuilder;
pub use dependency::ModelDependencyGraph;
pub use graph::ModelGraph;
pub use types::{
    DomainModelNode, EdgeOrigin, EdgePeer, EnumItem, EnumerationNode, ForeignKeyEdge,
    UnresolvedKind, UnresolvedReference,
};
