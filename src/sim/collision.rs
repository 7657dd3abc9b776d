//! Collision and boundary checks
//!
//! Axis-aligned tests in playfield coordinates (y grows downward). The actor
//! box and the obstacle gap share that frame.

use super::state::{Actor, Obstacle};
use crate::tuning::Tuning;

/// A terminal condition found during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Actor left the playable band (above the top or into the ground)
    Boundary,
    /// Actor hit the obstacle at this index
    Obstacle { index: usize },
}

/// Actor above the top edge or overlapping the ground strip
#[inline]
pub fn boundary_violation(actor: &Actor, tuning: &Tuning) -> bool {
    actor.y() < 0.0 || actor.y() + actor.height() > tuning.ground_top()
}

/// Actor and obstacle columns overlap horizontally
#[inline]
pub fn overlaps_horizontally(actor: &Actor, obstacle: &Obstacle) -> bool {
    actor.x() + actor.width() > obstacle.x && actor.x() < obstacle.trailing_edge()
}

/// Actor overlaps the obstacle column and is not fully inside the gap
pub fn hits_obstacle(actor: &Actor, obstacle: &Obstacle) -> bool {
    overlaps_horizontally(actor, obstacle)
        && (actor.y() < obstacle.gap_y || actor.y() + actor.height() > obstacle.gap_bottom())
}

/// First terminal condition, boundary before obstacles (in spawn order)
pub fn check(actor: &Actor, obstacles: &[Obstacle], tuning: &Tuning) -> Option<Collision> {
    if boundary_violation(actor, tuning) {
        return Some(Collision::Boundary);
    }
    obstacles
        .iter()
        .position(|o| hits_obstacle(actor, o))
        .map(|index| Collision::Obstacle { index })
}

/// Flag every obstacle whose trailing edge the actor has cleared.
/// Each obstacle is counted once; returns the number newly passed.
pub fn mark_passed(actor: &Actor, obstacles: &mut [Obstacle]) -> u32 {
    let mut passed = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.passed) {
        if actor.x() > obstacle.trailing_edge() {
            obstacle.passed = true;
            passed += 1;
        }
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_at(y: f32) -> (Actor, Tuning) {
        let tuning = Tuning::default();
        let mut actor = Actor::new(&tuning);
        actor.pos.y = y;
        (actor, tuning)
    }

    #[test]
    fn test_boundary_top_and_ground() {
        let (actor, tuning) = actor_at(0.0);
        assert!(!boundary_violation(&actor, &tuning));

        let (actor, tuning) = actor_at(-0.5);
        assert!(boundary_violation(&actor, &tuning));

        // 526 + 24 = 550 touches the ground line but does not cross it
        let (actor, tuning) = actor_at(526.0);
        assert!(!boundary_violation(&actor, &tuning));

        let (actor, tuning) = actor_at(526.5);
        assert!(boundary_violation(&actor, &tuning));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let (actor, tuning) = actor_at(200.0);
        // Overlapping column, gap 150..300 fully contains 200..224
        let ob = Obstacle::new(60.0, 150.0, &tuning);
        assert!(overlaps_horizontally(&actor, &ob));
        assert!(!hits_obstacle(&actor, &ob));
        assert_eq!(check(&actor, &[ob], &tuning), None);
    }

    #[test]
    fn test_gap_edges_are_inclusive() {
        let (actor, tuning) = actor_at(150.0);
        let ob = Obstacle::new(60.0, 150.0, &tuning);
        assert!(!hits_obstacle(&actor, &ob));

        let (actor, _) = actor_at(276.0);
        assert!(!hits_obstacle(&actor, &ob));

        let (actor, _) = actor_at(276.5);
        assert!(hits_obstacle(&actor, &ob));
    }

    #[test]
    fn test_hit_above_and_below_gap() {
        let (actor, tuning) = actor_at(140.0);
        let ob = Obstacle::new(60.0, 150.0, &tuning);
        assert!(hits_obstacle(&actor, &ob));

        let (actor, _) = actor_at(290.0);
        assert!(hits_obstacle(&actor, &ob));
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let (actor, tuning) = actor_at(10.0);
        // Actor spans 50..84; obstacle starts exactly at the actor's right edge
        let ahead = Obstacle::new(84.0, 300.0, &tuning);
        assert!(!hits_obstacle(&actor, &ahead));
        // Obstacle ends exactly at the actor's left edge
        let behind = Obstacle::new(-30.0, 300.0, &tuning);
        assert!(!hits_obstacle(&actor, &behind));
    }

    #[test]
    fn test_check_reports_first_obstacle() {
        let (actor, tuning) = actor_at(10.0);
        let obstacles = vec![
            Obstacle::new(300.0, 100.0, &tuning),
            Obstacle::new(40.0, 300.0, &tuning),
            Obstacle::new(70.0, 300.0, &tuning),
        ];
        assert_eq!(
            check(&actor, &obstacles, &tuning),
            Some(Collision::Obstacle { index: 1 })
        );
    }

    #[test]
    fn test_boundary_checked_first() {
        let (actor, tuning) = actor_at(-3.0);
        let obstacles = vec![Obstacle::new(40.0, 300.0, &tuning)];
        assert_eq!(check(&actor, &obstacles, &tuning), Some(Collision::Boundary));
    }

    #[test]
    fn test_pass_counted_once() {
        let (actor, tuning) = actor_at(200.0);
        let mut obstacles = vec![
            Obstacle::new(-30.0, 150.0, &tuning),
            Obstacle::new(-31.0, 150.0, &tuning),
        ];
        // Trailing edge at 50 equals actor.x: not passed yet
        assert_eq!(mark_passed(&actor, &mut obstacles), 1);
        assert!(!obstacles[0].passed);
        assert!(obstacles[1].passed);

        obstacles[0].x = -30.5;
        assert_eq!(mark_passed(&actor, &mut obstacles), 1);
        assert_eq!(mark_passed(&actor, &mut obstacles), 0);
        assert!(obstacles.iter().all(|o| o.passed));
    }
}
