//! Quiz category preferences
//!
//! Persisted separately from the best score. The interruption controller only
//! reads the filter when a quiz triggers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of enabled quiz categories.
///
/// An empty filter, or one naming only categories the pool does not have,
/// means "any question".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFilter {
    enabled: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.enabled.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }

    pub fn enable(&mut self, category: &str) {
        self.enabled.insert(category.to_string());
    }

    pub fn disable(&mut self, category: &str) {
        self.enabled.remove(category);
    }

    /// Flip a category; returns whether it is now enabled
    pub fn toggle(&mut self, category: &str) -> bool {
        if self.enabled.remove(category) {
            false
        } else {
            self.enabled.insert(category.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.enabled.clear();
    }

    /// Enabled categories that the given set does not know about
    pub fn unknown<'a>(&'a self, known: &'a BTreeSet<String>) -> impl Iterator<Item = &'a str> {
        self.enabled.difference(known).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut filter = CategoryFilter::new();
        assert!(filter.toggle("Science"));
        assert!(filter.contains("Science"));
        assert!(!filter.toggle("Science"));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let filter = CategoryFilter::from_names(["b", "a"]);
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#"["a","b"]"#);
        let back: CategoryFilter = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn test_unknown_categories() {
        let filter = CategoryFilter::from_names(["Science", "Geography"]);
        let known: BTreeSet<String> = ["Science".to_string(), "History".to_string()].into();
        assert_eq!(filter.unknown(&known).collect::<Vec<_>>(), vec!["Geography"]);
    }
}
