//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`], so a
//! host can load overrides from JSON. Missing fields fall back to
//! [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub width: f32,
    pub height: f32,
    pub ground_height: f32,

    pub actor_x: f32,
    pub actor_start_y: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    pub gravity: f32,
    pub flap_impulse: f32,
    pub rotation_factor: f32,
    pub rotation_min: f32,
    pub rotation_max: f32,

    pub obstacle_width: f32,
    pub gap_height: f32,
    pub gap_margin: f32,
    pub spawn_interval: u32,
    pub base_speed: f32,

    pub cloud_count: usize,

    /// Chance (0-1) that a flap opens a quiz
    pub quiz_trigger_probability: f32,
    pub countdown_start: u32,
    pub countdown_step_ms: u32,
    pub boost_multiplier: f32,
    pub boost_duration_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,

            actor_x: ACTOR_X,
            actor_start_y: ACTOR_START_Y,
            actor_width: ACTOR_WIDTH,
            actor_height: ACTOR_HEIGHT,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            rotation_factor: ROTATION_FACTOR,
            rotation_min: ROTATION_MIN,
            rotation_max: ROTATION_MAX,

            obstacle_width: OBSTACLE_WIDTH,
            gap_height: GAP_HEIGHT,
            gap_margin: GAP_MARGIN,
            spawn_interval: SPAWN_INTERVAL,
            base_speed: BASE_SPEED,

            cloud_count: CLOUD_COUNT,

            quiz_trigger_probability: QUIZ_TRIGGER_PROBABILITY,
            countdown_start: COUNTDOWN_START,
            countdown_step_ms: COUNTDOWN_STEP_MS,
            boost_multiplier: BOOST_MULTIPLIER,
            boost_duration_ms: BOOST_DURATION_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read overrides from a JSON file (native hosts)
    pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Turn a load result into tuning, falling back to the defaults
    pub fn or_default(result: Result<Self, TuningError>) -> Self {
        result.unwrap_or_else(|e| {
            log::warn!("Using default tuning: {}", e);
            Self::default()
        })
    }

    /// Y coordinate of the top of the ground strip
    #[inline]
    pub fn ground_top(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Width of the band the gap top is drawn from. Never negative.
    pub fn gap_range(&self) -> f32 {
        (self.height - 2.0 * self.gap_margin - self.gap_height).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.width, 400.0);
        assert_eq!(t.ground_top(), 550.0);
        assert_eq!(t.spawn_interval, 100);
        assert_eq!(t.boost_duration_ms, 3000);
    }

    #[test]
    fn test_gap_band_stays_above_ground() {
        let t = Tuning::default();
        assert_eq!(t.gap_range(), 250.0);
        // Lowest possible gap bottom must clear the ground strip
        assert!(t.gap_margin + t.gap_range() + t.gap_height <= t.ground_top());
    }

    #[test]
    fn test_partial_override() {
        let t = Tuning::from_json(r#"{ "quiz_trigger_probability": 1.0 }"#).unwrap();
        assert_eq!(t.quiz_trigger_probability, 1.0);
        assert_eq!(t.gravity, GRAVITY);
    }

    #[test]
    fn test_read_file_overrides_and_falls_back() {
        let path = std::env::temp_dir().join("quiz_flap_tuning_test.json");
        std::fs::write(&path, r#"{ "base_speed": 3.0, "spawn_interval": 80 }"#).unwrap();
        let t = Tuning::or_default(Tuning::read_file(&path));
        let _ = std::fs::remove_file(&path);
        assert_eq!(t.base_speed, 3.0);
        assert_eq!(t.spawn_interval, 80);
        assert_eq!(t.flap_impulse, FLAP_IMPULSE);

        let missing = Tuning::read_file("/nonexistent/tuning.json");
        assert!(matches!(missing, Err(TuningError::Io(_))));
        assert_eq!(Tuning::or_default(missing), Tuning::default());

        let garbage = Tuning::from_json("{ nope");
        assert!(matches!(garbage, Err(TuningError::Parse(_))));
    }
}
