//! Linker stages, leaves first
//!
//! Each stage consumes the finished, read-only output of the one before it:
//!
//! - registry/    - flattened lookup tables over the input documents
//! - model_graph/ - domain models, enumerations and their foreign-key edges
//! - dto_graph/   - canonical DTO names and DTO → DTO edges
//! - use_case/    - namespaces and the query-provider method catalogue

pub mod registry;

pub mod model_graph;

pub mod dto_graph;

pub mod use_case;
