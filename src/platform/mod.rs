//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame callbacks (`requestAnimationFrame`)
//! - Real-time timers (`setTimeout`)

pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use scheduler::{FrameHandle, ManualScheduler, Scheduler, TimerHandle, TimerKind};
#[cfg(target_arch = "wasm32")]
pub use web::{FrameCallback, TimerCallback, WebScheduler};
