//! Key/value persistence port
//!
//! Two values survive across sessions:
//! - the best score, stored as a decimal string
//! - the enabled quiz categories, stored as a JSON array
//!
//! Backends only provide string get/set; the typed accessors are shared.

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::collections::HashMap;

use thiserror::Error;

use crate::settings::CategoryFilter;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

pub const BEST_SCORE_KEY: &str = "bestScore";
pub const CATEGORY_FILTER_KEY: &str = "quizCategories";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Stored best score, 0 when missing or unreadable
    fn best_score(&self) -> u32 {
        match self.get_item(BEST_SCORE_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable best score {:?}", raw);
                0
            }),
            None => 0,
        }
    }

    fn set_best_score(&mut self, score: u32) -> Result<(), StorageError> {
        self.set_item(BEST_SCORE_KEY, &score.to_string())
    }

    /// Stored category filter, None when missing or unreadable
    fn category_filter(&self) -> Option<CategoryFilter> {
        let raw = self.get_item(CATEGORY_FILTER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(filter) => Some(filter),
            Err(e) => {
                log::warn!("Ignoring unreadable category filter: {}", e);
                None
            }
        }
    }

    fn set_category_filter(&mut self, filter: &CategoryFilter) -> Result<(), StorageError> {
        let json = serde_json::to_string(filter)?;
        self.set_item(CATEGORY_FILTER_KEY, &json)
    }
}

/// In-process storage for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    /// Simulate a full or blocked store
    pub read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "read-only".to_string(),
            });
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_score_defaults_to_zero() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.best_score(), 0);

        let storage = MemoryStorage::new().with_item(BEST_SCORE_KEY, "garbage");
        assert_eq!(storage.best_score(), 0);
    }

    #[test]
    fn test_best_score_stored_as_decimal() {
        let mut storage = MemoryStorage::new();
        storage.set_best_score(17).unwrap();
        assert_eq!(storage.get_item(BEST_SCORE_KEY).as_deref(), Some("17"));
        assert_eq!(storage.best_score(), 17);
    }

    #[test]
    fn test_category_filter_persisted() {
        let mut storage = MemoryStorage::new();
        assert!(storage.category_filter().is_none());

        let filter = CategoryFilter::from_names(["History"]);
        storage.set_category_filter(&filter).unwrap();
        assert_eq!(storage.category_filter(), Some(filter));

        let storage = storage.with_item(CATEGORY_FILTER_KEY, "{oops");
        assert!(storage.category_filter().is_none());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut storage = MemoryStorage {
            read_only: true,
            ..Default::default()
        };
        assert!(matches!(
            storage.set_best_score(3),
            Err(StorageError::Write { .. })
        ));
        assert_eq!(storage.best_score(), 0);
    }
}
