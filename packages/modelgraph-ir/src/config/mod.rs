//! Linker configuration
//!
//! A single versioned YAML document controls the few knobs the linker has:
//! the application root namespace, how duplicate definitions are treated,
//! the fallback identifier type and the suffixes used when composing names.
//!
//! ```yaml
//! version: 1
//! application_root_namespace: Acme.Shop
//! duplicate_policy: reject
//! default_id_type: Guid
//! naming:
//!   dto_suffix: Dto
//!   method_suffix: Async
//!   count_suffix: Count
//! ```

pub mod error;
pub mod linker_config;

pub use error::{ConfigError, ConfigResult};
pub use linker_config::{DuplicatePolicy, LinkerConfig, NamingConfig};
