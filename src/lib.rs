//! Quiz Flap - A side-scrolling arcade game with trivia interruptions
//!
//! Core modules:
//! - `sim`: Per-frame simulation (actor physics, obstacles, collisions)
//! - `quiz`: Trivia content and the interruption state machine
//! - `session`: Start/playing/game-over state machine driving everything
//! - `platform`: Frame/timer scheduling abstraction
//! - `persistence`: Best score and category filter storage
//! - `renderer`: Drawing port (canvas 2D on web)
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::BestScore;
pub use session::Session;
pub use settings::CategoryFilter;
pub use tuning::Tuning;

/// Game configuration constants
///
/// Units are pixels and frames: there is no timestep normalization, so one
/// tick is one rendered frame.
pub mod consts {
    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Height of the ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Actor defaults
    pub const ACTOR_X: f32 = 50.0;
    pub const ACTOR_START_Y: f32 = 300.0;
    pub const ACTOR_WIDTH: f32 = 34.0;
    pub const ACTOR_HEIGHT: f32 = 24.0;
    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a flap (pixels/tick, negative is up)
    pub const FLAP_IMPULSE: f32 = -8.0;
    /// Display rotation in degrees per unit of velocity
    pub const ROTATION_FACTOR: f32 = 3.0;
    pub const ROTATION_MIN: f32 = -30.0;
    pub const ROTATION_MAX: f32 = 90.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const GAP_HEIGHT: f32 = 150.0;
    /// Minimum distance between the gap and the top/bottom playfield edges
    pub const GAP_MARGIN: f32 = 100.0;
    /// Ticks between obstacle spawns
    pub const SPAWN_INTERVAL: u32 = 100;
    /// Horizontal scroll speed (pixels/tick)
    pub const BASE_SPEED: f32 = 2.0;

    /// Background decoration
    pub const CLOUD_COUNT: usize = 5;
    /// Ground stripe spacing; the scroll offset wraps at this distance
    pub const GROUND_STRIPE: f32 = 50.0;

    /// Quiz interruption
    pub const QUIZ_TRIGGER_PROBABILITY: f32 = 0.15;
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_STEP_MS: u32 = 1000;
    /// Speed multiplier applied after a wrong answer
    pub const BOOST_MULTIPLIER: f32 = 1.5;
    pub const BOOST_DURATION_MS: u32 = 3000;
    pub const BASE_MULTIPLIER: f32 = 1.0;
}
