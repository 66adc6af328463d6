//! Common test utilities for modelgraph-ir
//!
//! Shared model-set fixtures and graph assertions for the integration tests.

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
