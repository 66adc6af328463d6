//! Shared models: input documents and arena indexes

pub mod document;
pub mod ids;

pub use document::*;
pub use ids::{DtoId, EnumerationId, MethodId, ModelId, UseCaseId};
