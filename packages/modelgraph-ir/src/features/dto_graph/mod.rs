//! DTO graph stage
//!
//! Gives every DTO of every use case its canonical name, resolves the
//! governing domain model of each use case and links DTOs to each other and
//! to the models they map.

mod builder;
mod graph;
mod types;

pub use builder::DtoGraphBuilder;
pub use graph::DtoGraph;
pub use types::{DtoNode, DtoProperty, DtoTarget, ResolvedUseCase};
