//! Trivia content and the interruption state machine
//!
//! Content is loaded once at startup. A pool that failed to load is simply
//! empty, which disables quiz triggering.

pub mod interrupt;

use std::collections::BTreeSet;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::CategoryFilter;

pub use interrupt::{Interruption, InterruptionController, QuizContext};

/// Why quiz content could not be loaded
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to fetch quiz content: {0}")]
    Fetch(String),
    #[error("failed to read quiz content: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse quiz content: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub category: String,
    pub question: String,
    /// Answer choices in display order
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: String,
}

impl QuizItem {
    /// Has at least one option and the correct index points at one
    pub fn is_valid(&self) -> bool {
        self.correct_option_index < self.options.len()
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_option_index
    }
}

/// All loaded questions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizPool {
    items: Vec<QuizItem>,
}

impl QuizPool {
    /// Empty pool (quiz disabled)
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a pool, dropping items that cannot be answered
    pub fn from_items(items: Vec<QuizItem>) -> Self {
        let total = items.len();
        let items: Vec<QuizItem> = items.into_iter().filter(QuizItem::is_valid).collect();
        if items.len() < total {
            log::warn!("Skipped {} malformed quiz item(s)", total - items.len());
        }
        Self { items }
    }

    /// Parse a JSON array of quiz items
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let items: Vec<QuizItem> = serde_json::from_str(json)?;
        Ok(Self::from_items(items))
    }

    /// Read and parse a JSON file (native hosts)
    pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Turn a load result into a pool, degrading to empty on failure
    pub fn or_disabled(result: Result<Self, ContentError>) -> Self {
        match result {
            Ok(pool) => {
                log::info!("Loaded {} quiz question(s)", pool.len());
                pool
            }
            Err(e) => {
                log::warn!("Quiz disabled: {}", e);
                Self::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    /// Distinct category names, sorted
    pub fn categories(&self) -> BTreeSet<String> {
        self.items.iter().map(|q| q.category.clone()).collect()
    }

    /// Items in enabled categories, or the whole pool when none match
    pub fn candidates(&self, filter: &CategoryFilter) -> Vec<&QuizItem> {
        let enabled: Vec<&QuizItem> = self
            .items
            .iter()
            .filter(|q| filter.contains(&q.category))
            .collect();
        if enabled.is_empty() {
            log::debug!("No quiz items match the category filter, using full pool");
            self.items.iter().collect()
        } else {
            enabled
        }
    }

    /// Uniformly random candidate
    pub fn choose(&self, rng: &mut Pcg32, filter: &CategoryFilter) -> Option<&QuizItem> {
        let candidates = self.candidates(filter);
        if candidates.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..candidates.len());
        Some(candidates[idx])
    }
}

#[cfg(test)]
pub(crate) fn sample_pool() -> QuizPool {
    QuizPool::from_json(
        r#"[
            {"category": "Science", "question": "H2O is?", "options": ["Water", "Salt"],
             "correctOptionIndex": 0, "explanation": "Two hydrogens, one oxygen."},
            {"category": "Science", "question": "Closest star?", "options": ["Sirius", "The Sun"],
             "correctOptionIndex": 1, "explanation": "The Sun is a star."},
            {"category": "History", "question": "Year 1066 battle?", "options": ["Hastings", "Agincourt", "Bosworth"],
             "correctOptionIndex": 0, "explanation": "Battle of Hastings."}
        ]"#,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_parse_camel_case_records() {
        let pool = sample_pool();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.items()[1].correct_option_index, 1);
        assert!(pool.items()[1].is_correct(1));
        assert_eq!(
            pool.categories().into_iter().collect::<Vec<_>>(),
            vec!["History".to_string(), "Science".to_string()]
        );
    }

    #[test]
    fn test_malformed_items_skipped() {
        let pool = QuizPool::from_json(
            r#"[
                {"category": "A", "question": "q", "options": [], "correctOptionIndex": 0, "explanation": ""},
                {"category": "A", "question": "q", "options": ["x"], "correctOptionIndex": 3, "explanation": ""},
                {"category": "A", "question": "q", "options": ["x"], "correctOptionIndex": 0, "explanation": ""}
            ]"#,
        )
        .unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_load_failure_disables_quiz() {
        let pool = QuizPool::or_disabled(QuizPool::from_json("{ not json"));
        assert!(pool.is_empty());

        let pool = QuizPool::or_disabled(QuizPool::read_file("/nonexistent/questions.json"));
        assert!(pool.is_empty());

        let mut rng = Pcg32::seed_from_u64(1);
        assert!(pool.choose(&mut rng, &CategoryFilter::new()).is_none());
    }

    #[test]
    fn test_candidates_respect_filter() {
        let pool = sample_pool();
        let filter = CategoryFilter::from_names(["History"]);
        let candidates = pool.candidates(&filter);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].category, "History");
    }

    #[test]
    fn test_empty_filter_uses_full_pool() {
        let pool = sample_pool();
        assert_eq!(pool.candidates(&CategoryFilter::new()).len(), 3);
    }

    #[test]
    fn test_stale_filter_uses_full_pool() {
        let pool = sample_pool();
        let filter = CategoryFilter::from_names(["Geography"]);
        assert_eq!(pool.candidates(&filter).len(), 3);
    }

    #[test]
    fn test_choose_covers_all_candidates() {
        let pool = sample_pool();
        let mut rng = Pcg32::seed_from_u64(77);
        let filter = CategoryFilter::from_names(["Science"]);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            let item = pool.choose(&mut rng, &filter).unwrap();
            assert_eq!(item.category, "Science");
            seen.insert(item.question.clone());
        }
        assert_eq!(seen.len(), 2);
    }
}
