//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; input handlers
//! only touch fields that the next tick consumes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    #[default]
    Start,
    /// Active gameplay (possibly interrupted by a quiz)
    Playing,
    /// Round ended
    GameOver,
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner; x never changes during a round
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels/tick, positive is down)
    pub velocity: f32,
    /// Display angle in degrees, derived from velocity
    pub rotation: f32,
}

impl Actor {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.actor_x, tuning.actor_start_y),
            size: Vec2::new(tuning.actor_width, tuning.actor_height),
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    /// Back to the initial kinematic state
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos.y = tuning.actor_start_y;
        self.velocity = 0.0;
        self.rotation = 0.0;
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// An obstacle pair: a column with a passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Top of the gap
    pub gap_y: f32,
    pub gap_height: f32,
    /// Set once the actor has cleared the trailing edge
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_y: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            width: tuning.obstacle_width,
            gap_y,
            gap_height: tuning.gap_height,
            passed: false,
        }
    }

    /// Right edge
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom of the gap
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap_height
    }

    /// Fully past the left side of the playfield
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }
}

/// A decorative cloud (no gameplay effect)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Base drift speed (pixels/tick), scaled by the speed multiplier
    pub speed: f32,
}

/// Background decoration: clouds and the scrolling ground pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub clouds: Vec<Cloud>,
    /// Horizontal offset of the ground stripes, in (-GROUND_STRIPE, 0]
    pub ground_offset: f32,
}

impl Background {
    /// Fresh randomized clouds, ground offset back to zero
    pub fn randomize(&mut self, rng: &mut Pcg32, tuning: &Tuning) {
        self.clouds.clear();
        for _ in 0..tuning.cloud_count {
            self.clouds.push(Cloud {
                x: rng.random::<f32>() * tuning.width,
                y: rng.random::<f32>() * 200.0,
                width: 60.0 + rng.random::<f32>() * 40.0,
                speed: 0.2 + rng.random::<f32>() * 0.3,
            });
        }
        self.ground_offset = 0.0;
    }
}

/// The "game data" aggregate: one actor and one obstacle set per session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Ticks simulated this round
    pub time_ticks: u64,
    pub actor: Actor,
    /// Spawn order
    pub obstacles: Vec<Obstacle>,
    pub background: Background,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            score: 0,
            time_ticks: 0,
            actor: Actor::new(tuning),
            obstacles: Vec::new(),
            background: Background::default(),
        };

        // Title screen still shows clouds
        state.background.randomize(&mut state.rng, tuning);

        state
    }

    /// Reset everything a new round starts from. The RNG keeps its stream.
    pub fn reset_round(&mut self, tuning: &Tuning) {
        self.score = 0;
        self.time_ticks = 0;
        self.actor.reset(tuning);
        self.obstacles.clear();
        self.background.randomize(&mut self.rng, tuning);
    }
}
