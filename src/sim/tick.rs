//! Per-frame simulation tick
//!
//! One call is one rendered frame: simulator, then spawner, then checker.

use super::collision::{self, Collision};
use super::physics;
use super::spawner::{self, Spawner};
use super::state::{GamePhase, GameState};
use crate::tuning::Tuning;

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Terminal condition; the phase is already GameOver when set
    pub collision: Option<Collision>,
    /// Obstacles passed this tick (already added to the score)
    pub passed: u32,
    pub spawned: bool,
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        self.collision.is_some()
    }
}

/// Advance the game state by one frame.
///
/// `multiplier` scales obstacle, ground and cloud scrolling. Does nothing
/// outside the Playing phase.
pub fn tick(
    state: &mut GameState,
    spawner: &mut Spawner,
    tuning: &Tuning,
    multiplier: f32,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase != GamePhase::Playing {
        return outcome;
    }

    state.time_ticks += 1;

    // --- SIMULATOR ---
    physics::step_actor(&mut state.actor, tuning);

    // Leaving the playfield ends the tick before anything else moves
    if collision::boundary_violation(&state.actor, tuning) {
        state.phase = GamePhase::GameOver;
        outcome.collision = Some(Collision::Boundary);
        return outcome;
    }

    physics::advance_background(&mut state.background, tuning, multiplier);
    physics::advance_obstacles(&mut state.obstacles, tuning.base_speed * multiplier);

    // --- SPAWNER ---
    outcome.spawned = spawner.step(&mut state.obstacles, &mut state.rng, tuning);
    spawner::cull(&mut state.obstacles);

    // --- CHECKER ---
    outcome.passed = collision::mark_passed(&state.actor, &mut state.obstacles);
    state.score += outcome.passed;

    if let Some(hit) = collision::check(&state.actor, &state.obstacles, tuning) {
        state.phase = GamePhase::GameOver;
        outcome.collision = Some(hit);
    }

    outcome
}
