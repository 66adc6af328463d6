//! Use-case planning stage
//!
//! Turns resolved use cases into namespaced `UseCaseNode`s and derives the
//! query-provider methods each of them needs. Methods live in one global
//! catalogue keyed by (domain, classification key, name).

mod catalogue;
mod feature_names;
mod plan;
mod planner;
mod types;

pub use catalogue::MethodCatalogue;
pub use feature_names::FeatureNameTable;
pub use plan::UseCasePlan;
pub use planner::UseCasePlanner;
pub use types::{
    MethodKind, ParameterDescriptor, QueryProviderMethod, TypeDescriptor, UseCaseNode,
};
