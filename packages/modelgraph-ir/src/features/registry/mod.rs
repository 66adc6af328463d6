//! Model registry stage
//!
//! First stage of the link pipeline: flattens the input documents into
//! lookup tables and enforces (domain, name) uniqueness.

mod model_registry;

pub use model_registry::{
    DataModelNode, ModelRegistry, ModelSummary, RegisteredEnumeration, RegisteredModel,
};
