//! Error types for modelgraph-ir
//!
//! Only two situations abort a link run: a duplicate definition (integrity) and a
//! command use case whose governing domain model cannot be found. Everything else
//! in the model space degrades to an omitted edge.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// What kind of definition collided in a duplicate registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    DomainModel,
    DataModel,
    Enumeration,
    UseCase,
    Dto,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DomainModel => "domain model",
            Self::DataModel => "data model",
            Self::Enumeration => "enumeration",
            Self::UseCase => "use case",
            Self::Dto => "dto",
        };
        f.write_str(label)
    }
}

/// Main error type for a link run
#[derive(Debug, Error)]
pub enum LinkError {
    /// The same (domain, name) was registered twice
    #[error("Duplicate {kind} definition '{name}' in domain '{domain}'")]
    DuplicateDefinition {
        kind: DefinitionKind,
        domain: String,
        name: String,
    },

    /// A Create/Update/Delete use case names a domain model that does not exist
    #[error("Use case '{use_case}' in domain '{domain}' references missing domain model '{model}'")]
    MissingDomainModel {
        domain: String,
        model: String,
        use_case: String,
    },

    /// A Create/Update/Delete use case does not name any domain model at all
    #[error("Use case '{use_case}' in domain '{domain}' does not name a domain model")]
    UnspecifiedDomainModel { domain: String, use_case: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LinkError {
    pub fn duplicate(kind: DefinitionKind, domain: impl Into<String>, name: impl Into<String>) -> Self {
        LinkError::DuplicateDefinition {
            kind,
            domain: domain.into(),
            name: name.into(),
        }
    }

    pub fn missing_model(
        domain: impl Into<String>,
        model: impl Into<String>,
        use_case: impl Into<String>,
    ) -> Self {
        LinkError::MissingDomainModel {
            domain: domain.into(),
            model: model.into(),
            use_case: use_case.into(),
        }
    }
}

/// Result type alias for link operations
pub type Result<T> = std::result::Result<T, LinkError>;
