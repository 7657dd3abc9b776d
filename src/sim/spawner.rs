//! Obstacle spawner
//!
//! Counts ticks and appends a new obstacle at the right edge every
//! `spawn_interval` ticks, with the gap drawn uniformly from the band that
//! keeps it clear of the top edge and the ground.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Obstacle;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Ticks since the last spawn
    timer: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self { timer: 0 }
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.timer = 0;
    }

    /// Advance the timer by one tick, spawning when the interval is reached.
    /// Returns true if an obstacle was appended.
    pub fn step(&mut self, obstacles: &mut Vec<Obstacle>, rng: &mut Pcg32, tuning: &Tuning) -> bool {
        self.timer += 1;
        if self.timer < tuning.spawn_interval {
            return false;
        }

        let gap_y = random_gap_y(rng, tuning);
        obstacles.push(Obstacle::new(tuning.width, gap_y, tuning));
        self.timer = 0;
        true
    }
}

/// Uniform gap top in `[gap_margin, gap_margin + gap_range)`
pub fn random_gap_y(rng: &mut Pcg32, tuning: &Tuning) -> f32 {
    rng.random::<f32>() * tuning.gap_range() + tuning.gap_margin
}

/// Drop every obstacle that has fully left the playfield.
/// Returns how many were removed.
pub fn cull(obstacles: &mut Vec<Obstacle>) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| !o.is_offscreen());
    let removed = before - obstacles.len();
    if removed > 0 {
        log::debug!("Culled {} obstacle(s)", removed);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_first_spawn_on_interval() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new();
        let mut obstacles = Vec::new();

        for _ in 1..100 {
            assert!(!spawner.step(&mut obstacles, &mut rng, &tuning));
        }
        assert!(obstacles.is_empty());
        assert_eq!(spawner.timer(), 99);

        assert!(spawner.step(&mut obstacles, &mut rng, &tuning));
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].x, 400.0);
        assert!(!obstacles[0].passed);
        assert_eq!(spawner.timer(), 0);
    }

    #[test]
    fn test_spawns_keep_insertion_order() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = Spawner::new();
        let mut obstacles = Vec::new();
        for _ in 0..300 {
            spawner.step(&mut obstacles, &mut rng, &tuning);
            for o in &mut obstacles {
                o.x -= 1.0;
            }
        }
        assert_eq!(obstacles.len(), 3);
        assert!(obstacles.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_cull_removes_only_offscreen() {
        let tuning = Tuning::default();
        let mut obstacles = vec![
            Obstacle::new(-81.0, 100.0, &tuning),
            Obstacle::new(-80.0, 100.0, &tuning),
            Obstacle::new(200.0, 100.0, &tuning),
        ];
        assert_eq!(cull(&mut obstacles), 1);
        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[0].x, -80.0);
        assert_eq!(cull(&mut obstacles), 0);
    }

    #[test]
    fn test_degenerate_band_collapses_to_margin() {
        let tuning = Tuning {
            gap_height: 500.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        assert_eq!(random_gap_y(&mut rng, &tuning), tuning.gap_margin);
    }

    proptest! {
        #[test]
        fn prop_gap_within_band(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let gap_y = random_gap_y(&mut rng, &tuning);
            prop_assert!(gap_y >= 100.0);
            prop_assert!(gap_y <= 350.0);
            prop_assert!(gap_y + tuning.gap_height <= tuning.ground_top());
        }
    }
}
