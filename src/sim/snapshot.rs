//! Read-only view of one frame for the drawing collaborator

use super::state::{Actor, Background, GamePhase, Obstacle};
use crate::quiz::Interruption;

#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub actor: &'a Actor,
    pub obstacles: &'a [Obstacle],
    pub background: &'a Background,
    pub interruption: &'a Interruption,
    pub speed_multiplier: f32,
    pub boost_active: bool,
}

impl Snapshot<'_> {
    pub fn is_interrupted(&self) -> bool {
        !matches!(self.interruption, Interruption::Idle)
    }
}
