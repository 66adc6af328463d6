//! Keyed node tables
//!
//! Every cache in the linker is keyed by domain first and then by one or two
//! names. `DomainTable` is the two-level form (domain → name → value) and
//! `ScopedTable` the three-level form (domain → scope → name → value).
//!
//! Both refuse to overwrite through `insert_unique`; replacing an entry has to
//! be spelled out with `replace`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// domain → name → value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTable<V> {
    buckets: FxHashMap<String, FxHashMap<String, V>>,
    len: usize,
}

impl<V> Default for DomainTable<V> {
    fn default() -> Self {
        Self {
            buckets: FxHashMap::default(),
            len: 0,
        }
    }
}

impl<V> DomainTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str, name: &str) -> Option<&V> {
        self.buckets.get(domain).and_then(|bucket| bucket.get(name))
    }

    pub fn get_mut(&mut self, domain: &str, name: &str) -> Option<&mut V> {
        self.buckets
            .get_mut(domain)
            .and_then(|bucket| bucket.get_mut(name))
    }

    pub fn contains(&self, domain: &str, name: &str) -> bool {
        self.get(domain, name).is_some()
    }

    /// Insert unless the key is taken; on collision the table is unchanged
    /// and the rejected value is handed back.
    pub fn insert_unique(&mut self, domain: &str, name: &str, value: V) -> Result<(), V> {
        let bucket = self.buckets.entry(domain.to_string()).or_default();
        if bucket.contains_key(name) {
            return Err(value);
        }
        bucket.insert(name.to_string(), value);
        self.len += 1;
        Ok(())
    }

    /// Insert or overwrite, returning the previous value
    pub fn replace(&mut self, domain: &str, name: &str, value: V) -> Option<V> {
        let previous = self
            .buckets
            .entry(domain.to_string())
            .or_default()
            .insert(name.to_string(), value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Returns the stored value and whether it was created by this call
    pub fn get_or_insert_with(
        &mut self,
        domain: &str,
        name: &str,
        make: impl FnOnce() -> V,
    ) -> (&mut V, bool) {
        let bucket = self.buckets.entry(domain.to_string()).or_default();
        let inserted = !bucket.contains_key(name);
        if inserted {
            self.len += 1;
        }
        (bucket.entry(name.to_string()).or_insert_with(make), inserted)
    }

    /// Entries of one domain (unordered)
    pub fn domain(&self, domain: &str) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .get(domain)
            .into_iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.buckets.values().flat_map(|bucket| bucket.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &V)> {
        self.buckets.iter().flat_map(|(domain, bucket)| {
            bucket
                .iter()
                .map(move |(name, v)| (domain.as_str(), name.as_str(), v))
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// domain → scope → name → value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedTable<V> {
    scopes: DomainTable<FxHashMap<String, V>>,
    len: usize,
}

impl<V> Default for ScopedTable<V> {
    fn default() -> Self {
        Self {
            scopes: DomainTable::default(),
            len: 0,
        }
    }
}

impl<V> ScopedTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str, scope: &str, name: &str) -> Option<&V> {
        self.scopes
            .get(domain, scope)
            .and_then(|bucket| bucket.get(name))
    }

    pub fn get_mut(&mut self, domain: &str, scope: &str, name: &str) -> Option<&mut V> {
        self.scopes
            .get_mut(domain, scope)
            .and_then(|bucket| bucket.get_mut(name))
    }

    pub fn contains(&self, domain: &str, scope: &str, name: &str) -> bool {
        self.get(domain, scope, name).is_some()
    }

    pub fn insert_unique(&mut self, domain: &str, scope: &str, name: &str, value: V) -> Result<(), V> {
        let (bucket, _) = self
            .scopes
            .get_or_insert_with(domain, scope, FxHashMap::default);
        if bucket.contains_key(name) {
            return Err(value);
        }
        bucket.insert(name.to_string(), value);
        self.len += 1;
        Ok(())
    }

    pub fn get_or_insert_with(
        &mut self,
        domain: &str,
        scope: &str,
        name: &str,
        make: impl FnOnce() -> V,
    ) -> (&mut V, bool) {
        let (bucket, _) = self
            .scopes
            .get_or_insert_with(domain, scope, FxHashMap::default);
        let inserted = !bucket.contains_key(name);
        if inserted {
            self.len += 1;
        }
        (bucket.entry(name.to_string()).or_insert_with(make), inserted)
    }

    /// Entries of one (domain, scope) bucket (unordered)
    pub fn scope(&self, domain: &str, scope: &str) -> impl Iterator<Item = (&str, &V)> {
        self.scopes
            .get(domain, scope)
            .into_iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.scopes.values().flat_map(|bucket| bucket.values())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_unique_rejects_second_value() {
        let mut table = DomainTable::new();
        assert!(table.insert_unique("Sales", "Customer", 1).is_ok());
        assert_eq!(table.insert_unique("Sales", "Customer", 2), Err(2));
        assert_eq!(table.get("Sales", "Customer"), Some(&1));
        assert_eq!(table.len(), 1);

        // Same name in another domain is a different key
        assert!(table.insert_unique("Billing", "Customer", 3).is_ok());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_replace_counts_only_new_keys() {
        let mut table = DomainTable::new();
        assert_eq!(table.replace("Sales", "Order", "a"), None);
        assert_eq!(table.replace("Sales", "Order", "b"), Some("a"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Sales", "Order"), Some(&"b"));
    }

    #[test]
    fn test_get_or_insert_reports_creation() {
        let mut table: DomainTable<Vec<u32>> = DomainTable::new();
        let (v, inserted) = table.get_or_insert_with("Sales", "Order", Vec::new);
        v.push(1);
        assert!(inserted);

        let (v, inserted) = table.get_or_insert_with("Sales", "Order", Vec::new);
        assert!(!inserted);
        assert_eq!(v, &vec![1]);
    }

    #[test]
    fn test_scoped_table_three_levels() {
        let mut table = ScopedTable::new();
        assert!(table.insert_unique("Sales", "Customer", "ExistsAsync", 1).is_ok());
        assert!(table.insert_unique("Sales", "Order", "ExistsAsync", 2).is_ok());
        assert_eq!(table.insert_unique("Sales", "Customer", "ExistsAsync", 3), Err(3));

        assert_eq!(table.get("Sales", "Customer", "ExistsAsync"), Some(&1));
        assert_eq!(table.scope("Sales", "Order").count(), 1);
        assert_eq!(table.scope("Sales", "Nothing").count(), 0);
        assert_eq!(table.len(), 2);
    }
}
