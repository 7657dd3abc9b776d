//! Best score tracking
//!
//! A single scalar, persisted through [`crate::persistence::Storage`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Strictly beats the stored best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a finished round's score.
    /// Returns true if it became the new best (caller persists it).
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        true
    }
}
