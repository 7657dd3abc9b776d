//! Frame-driven simulation module
//!
//! All gameplay physics lives here. This module stays pure:
//! - One tick per rendered frame, no timestep normalization
//! - Seeded RNG only
//! - Obstacles iterate in spawn order
//! - No rendering, timer or platform dependencies

pub mod collision;
pub mod physics;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Collision;
pub use snapshot::Snapshot;
pub use spawner::Spawner;
pub use state::{Actor, Background, Cloud, GamePhase, GameState, Obstacle};
pub use tick::{TickOutcome, tick};
