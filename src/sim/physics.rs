//! Entity simulator
//!
//! Frame-count units throughout: one call advances one rendered frame.

use super::state::{Actor, Background, Obstacle};
use crate::tuning::Tuning;

/// Display angle for a given velocity, clamped to the tuning limits
#[inline]
pub fn rotation_for(velocity: f32, tuning: &Tuning) -> f32 {
    (velocity * tuning.rotation_factor).clamp(tuning.rotation_min, tuning.rotation_max)
}

/// Apply gravity, integrate position, derive rotation
pub fn step_actor(actor: &mut Actor, tuning: &Tuning) {
    actor.velocity += tuning.gravity;
    actor.pos.y += actor.velocity;
    actor.rotation = rotation_for(actor.velocity, tuning);
}

/// Replace the accumulated velocity with the flap impulse
pub fn flap(actor: &mut Actor, tuning: &Tuning) {
    actor.velocity = tuning.flap_impulse;
}

/// Scroll every obstacle left by `speed` pixels
pub fn advance_obstacles(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Drift clouds and scroll the ground pattern
pub fn advance_background(background: &mut Background, tuning: &Tuning, multiplier: f32) {
    for cloud in &mut background.clouds {
        cloud.x -= cloud.speed * multiplier;
        if cloud.x + cloud.width < 0.0 {
            cloud.x = tuning.width;
        }
    }

    background.ground_offset -= tuning.base_speed * multiplier;
    if background.ground_offset <= -crate::consts::GROUND_STRIPE {
        background.ground_offset = 0.0;
    }
}
