//! Global method catalogue
//!
//! Every query-provider method any use case asks for goes through
//! `request`, which deduplicates by (domain, classification key, name).

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::QueryProviderMethod;
use crate::shared::keyed::ScopedTable;
use crate::shared::models::MethodId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCatalogue {
    methods: Vec<QueryProviderMethod>,
    index: ScopedTable<MethodId>,
    reuses: usize,
    conflicts: usize,
}

impl MethodCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-insert by identity.
    ///
    /// A second request returns the stored descriptor's id. If the new
    /// descriptor differs from the stored one it is counted as a conflict;
    /// the stored one is kept either way.
    pub fn request(&mut self, method: QueryProviderMethod) -> MethodId {
        let next = MethodId::from_index(self.methods.len());
        let (&mut id, inserted) = self.index.get_or_insert_with(
            &method.domain,
            &method.classification_key,
            &method.name,
            || next,
        );

        if inserted {
            self.methods.push(method);
            return id;
        }

        self.reuses += 1;
        let existing = &self.methods[id.index()];
        if *existing != method {
            self.conflicts += 1;
            warn!(
                "Method {}.{}.{} requested with a different shape ({:?} vs {:?}); keeping the first",
                method.domain, method.classification_key, method.name, existing.kind, method.kind
            );
        }
        id
    }

    pub fn lookup(&self, domain: &str, classification_key: &str, name: &str) -> Option<MethodId> {
        self.index.get(domain, classification_key, name).copied()
    }

    pub fn get(&self, id: MethodId) -> &QueryProviderMethod {
        &self.methods[id.index()]
    }

    /// Methods of one (domain, classification key) bucket in insertion order
    pub fn bucket(&self, domain: &str, classification_key: &str) -> Vec<&QueryProviderMethod> {
        let mut ids: Vec<MethodId> = self
            .index
            .scope(domain, classification_key)
            .map(|(_, &id)| id)
            .collect();
        ids.sort();
        ids.into_iter().map(|id| self.get(id)).collect()
    }

    pub fn methods(&self) -> &[QueryProviderMethod] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Requests answered by an existing descriptor
    pub fn reuse_count(&self) -> usize {
        self.reuses
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::use_case::types::{MethodKind, TypeDescriptor};

    fn exists(key: &str) -> QueryProviderMethod {
        QueryProviderMethod::new("Sales", key, "ExistsAsync", MethodKind::Exists, TypeDescriptor::boolean())
            .with_parameter("id", TypeDescriptor::new("Guid"))
    }

    #[test]
    fn test_same_identity_is_stored_once() {
        let mut catalogue = MethodCatalogue::new();
        let first = catalogue.request(exists("Customer"));
        let second = catalogue.request(exists("Customer"));
        let other = catalogue.request(exists("Product"));

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.reuse_count(), 1);
        assert_eq!(catalogue.conflict_count(), 0);
        assert_eq!(catalogue.lookup("Sales", "Customer", "ExistsAsync"), Some(first));
    }

    #[test]
    fn test_differing_shape_counts_conflict_and_keeps_first() {
        let mut catalogue = MethodCatalogue::new();
        let first = catalogue.request(exists("Customer"));
        let changed = QueryProviderMethod::new(
            "Sales",
            "Customer",
            "ExistsAsync",
            MethodKind::Exists,
            TypeDescriptor::boolean(),
        )
        .with_parameter("id", TypeDescriptor::new("int"));

        assert_eq!(catalogue.request(changed), first);
        assert_eq!(catalogue.conflict_count(), 1);
        assert_eq!(catalogue.get(first).parameters[0].type_.name, "Guid");
    }

    #[test]
    fn test_bucket_keeps_insertion_order() {
        let mut catalogue = MethodCatalogue::new();
        for name in ["ReadCustomerAsync", "ExistsAsync", "IsUniqueEmailAsync"] {
            catalogue.request(QueryProviderMethod::new(
                "Sales",
                "Customer",
                name,
                MethodKind::Read,
                TypeDescriptor::boolean(),
            ));
        }
        let names: Vec<&str> = catalogue
            .bucket("Sales", "Customer")
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["ReadCustomerAsync", "ExistsAsync", "IsUniqueEmailAsync"]);
        assert!(catalogue.bucket("Sales", "Nothing").is_empty());
    }
}
