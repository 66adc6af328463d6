//! Shared building blocks used by every linker stage

pub mod keyed;
pub mod models;
pub mod naming;

pub use keyed::{DomainTable, ScopedTable};
pub use naming::{lower_first, Pluralizer, SuffixPluralizer};
