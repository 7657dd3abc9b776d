//! Drawing port
//!
//! The session hands a [`Snapshot`] to a [`RenderSurface`] after each frame.
//! On the web that is a canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use crate::sim::{GamePhase, Snapshot};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

pub trait RenderSurface {
    fn draw(&mut self, snapshot: &Snapshot<'_>);
}

/// Surface that draws nothing and remembers a summary of the last frame.
/// Used by the native headless runner.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub frames: u64,
    pub last_phase: Option<GamePhase>,
    pub last_score: u32,
    pub last_obstacles: usize,
}

impl RenderSurface for HeadlessSurface {
    fn draw(&mut self, snapshot: &Snapshot<'_>) {
        self.frames += 1;
        self.last_phase = Some(snapshot.phase);
        self.last_score = snapshot.score;
        self.last_obstacles = snapshot.obstacles.len();
    }
}
