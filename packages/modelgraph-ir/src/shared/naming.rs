//! Naming port
//!
//! Pluralization and casing belong to the host's naming utilities. The linker
//! only needs a plural form for namespace segments and a lower-camel form for
//! parameter names, so it talks to a small trait and ships a plain English
//! fallback.

/// Pluralizes a classification key for use as a namespace segment
pub trait Pluralizer {
    fn pluralize(&self, word: &str) -> String;
}

/// Suffix-rule English pluralizer (Category → Categories, Address → Addresses)
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixPluralizer;

impl Pluralizer for SuffixPluralizer {
    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let lower = word.to_ascii_lowercase();
        if lower.ends_with("ss")
            || lower.ends_with("sh")
            || lower.ends_with("ch")
            || lower.ends_with('x')
            || lower.ends_with('z')
        {
            return format!("{}es", word);
        }
        if lower.ends_with('s') {
            return word.to_string();
        }
        if lower.ends_with('y') {
            let before_y = lower.chars().rev().nth(1);
            if !matches!(before_y, Some('a' | 'e' | 'i' | 'o' | 'u')) {
                return format!("{}ies", &word[..word.len() - 1]);
            }
        }
        format!("{}s", word)
    }
}

/// `CustomerId` → `customerId`
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_pluralizer() {
        let p = SuffixPluralizer;
        assert_eq!(p.pluralize("Customer"), "Customers");
        assert_eq!(p.pluralize("Category"), "Categories");
        assert_eq!(p.pluralize("Day"), "Days");
        assert_eq!(p.pluralize("Address"), "Addresses");
        assert_eq!(p.pluralize("Box"), "Boxes");
        assert_eq!(p.pluralize("Branch"), "Branches");
        assert_eq!(p.pluralize("Orders"), "Orders");
        assert_eq!(p.pluralize(""), "");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("CustomerId"), "customerId");
        assert_eq!(lower_first("id"), "id");
        assert_eq!(lower_first(""), "");
    }
}
