/*
 * Modelgraph IR - Cross-Model Dependency Resolution & Linking
 *
 * Feature-First Architecture:
 * - shared/      : Input documents, arena ids, keyed tables, naming port
 * - features/    : Stages (registry → model_graph → dto_graph → use_case)
 * - pipeline/    : link() entry point and run statistics
 * - config/      : LinkerConfig (YAML v1)
 *
 * Every stage reads the finished output of the previous one. Only duplicate
 * definitions and unresolved command models abort a run.
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Linker stages
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{DuplicatePolicy, LinkerConfig, NamingConfig};
pub use errors::{DefinitionKind, LinkError, Result};
pub use features::dto_graph::{DtoGraph, DtoNode, DtoTarget};
pub use features::model_graph::{DomainModelNode, ModelDependencyGraph, ModelGraph};
pub use features::use_case::{MethodKind, QueryProviderMethod, UseCaseNode, UseCasePlan};
pub use pipeline::{link, LinkStats, LinkedModel};
pub use shared::models::ModelSet;
