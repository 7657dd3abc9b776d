//! Quiz interruption state machine
//!
//! ```text
//! Idle --flap (p=0.15, pool non-empty)--> QuizActive
//! QuizActive --select_answer--> QuizActive (answer + explanation revealed)
//! QuizActive --confirm--> CountingDown(3)
//! CountingDown(n) --1000 ms--> CountingDown(n-1) ... --> Idle
//! ```
//!
//! Leaving the countdown after a wrong answer starts a 3000 ms speed boost.
//! At most one countdown timer and one boost timer are pending at any time.

use rand::Rng;
use rand_pcg::Pcg32;

use super::{QuizItem, QuizPool};
use crate::consts::BASE_MULTIPLIER;
use crate::platform::{Scheduler, TimerHandle, TimerKind};
use crate::settings::CategoryFilter;
use crate::tuning::Tuning;

/// The question on screen and what the player did with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizContext {
    pub item: QuizItem,
    pub selected: Option<usize>,
    pub explanation_visible: bool,
}

impl QuizContext {
    fn new(item: QuizItem) -> Self {
        Self {
            item,
            selected: None,
            explanation_visible: false,
        }
    }

    /// None until an answer is selected
    pub fn answered_correctly(&self) -> Option<bool> {
        self.selected.map(|i| self.item.is_correct(i))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interruption {
    #[default]
    Idle,
    QuizActive(QuizContext),
    CountingDown {
        remaining: u32,
        /// Wrong answer: boost once the countdown ends
        apply_boost: bool,
    },
}

#[derive(Debug)]
pub struct InterruptionController {
    state: Interruption,
    multiplier: f32,
    countdown_timer: Option<TimerHandle>,
    boost_timer: Option<TimerHandle>,
}

impl Default for InterruptionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptionController {
    pub fn new() -> Self {
        Self {
            state: Interruption::Idle,
            multiplier: BASE_MULTIPLIER,
            countdown_timer: None,
            boost_timer: None,
        }
    }

    pub fn state(&self) -> &Interruption {
        &self.state
    }

    /// Quiz on screen or countdown running; ticking is suspended
    pub fn is_interrupted(&self) -> bool {
        !matches!(self.state, Interruption::Idle)
    }

    pub fn quiz(&self) -> Option<&QuizContext> {
        match &self.state {
            Interruption::QuizActive(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn countdown(&self) -> Option<u32> {
        match self.state {
            Interruption::CountingDown { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// A wrong answer is waiting for the countdown to finish
    pub fn boost_pending(&self) -> bool {
        matches!(
            self.state,
            Interruption::CountingDown {
                apply_boost: true,
                ..
            }
        )
    }

    pub fn boost_active(&self) -> bool {
        self.boost_timer.is_some()
    }

    /// Scroll speed multiplier for obstacles, ground and clouds
    pub fn speed_multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Roll for a quiz. Only from Idle, and only when there is content.
    pub fn try_trigger(
        &mut self,
        pool: &QuizPool,
        filter: &CategoryFilter,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) -> bool {
        if self.is_interrupted() || pool.is_empty() {
            return false;
        }
        if rng.random::<f32>() >= tuning.quiz_trigger_probability {
            return false;
        }
        let Some(item) = pool.choose(rng, filter) else {
            return false;
        };

        log::info!("Quiz triggered ({}): {}", item.category, item.question);
        self.state = Interruption::QuizActive(QuizContext::new(item.clone()));
        true
    }

    /// Record the player's choice and reveal the explanation.
    /// The first valid selection is final.
    pub fn select_answer(&mut self, index: usize) -> bool {
        let Interruption::QuizActive(ctx) = &mut self.state else {
            return false;
        };
        if ctx.selected.is_some() || index >= ctx.item.options.len() {
            return false;
        }
        ctx.selected = Some(index);
        ctx.explanation_visible = true;
        log::debug!(
            "Answer {} selected ({})",
            index,
            if ctx.item.is_correct(index) { "correct" } else { "wrong" }
        );
        true
    }

    /// Close the quiz and start the countdown. Needs a selected answer.
    pub fn confirm(&mut self, scheduler: &mut dyn Scheduler, tuning: &Tuning) -> bool {
        let Some(correct) = self.quiz().and_then(QuizContext::answered_correctly) else {
            return false;
        };

        self.cancel_countdown(scheduler);
        self.state = Interruption::CountingDown {
            remaining: tuning.countdown_start.max(1),
            apply_boost: !correct,
        };
        self.arm_countdown(scheduler, tuning);
        true
    }

    /// One countdown step elapsed. Returns true when ticking should resume.
    pub fn on_countdown_elapsed(&mut self, scheduler: &mut dyn Scheduler, tuning: &Tuning) -> bool {
        if self.countdown_timer.take().is_none() {
            return false;
        }
        let Interruption::CountingDown {
            remaining,
            apply_boost,
        } = self.state
        else {
            return false;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.state = Interruption::CountingDown {
                remaining,
                apply_boost,
            };
            self.arm_countdown(scheduler, tuning);
            return !self.is_interrupted();
        }

        self.finish_countdown(scheduler, tuning);
        true
    }

    /// Boost window ended. Stale callbacks are ignored.
    pub fn on_boost_expired(&mut self) -> bool {
        if self.boost_timer.take().is_none() {
            return false;
        }
        self.multiplier = BASE_MULTIPLIER;
        log::info!("Speed boost over");
        true
    }

    /// Cancel both timers and return to Idle at base speed
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler) {
        self.cancel_countdown(scheduler);
        self.cancel_boost(scheduler);
        self.state = Interruption::Idle;
    }

    pub fn cancel_boost(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.boost_timer.take() {
            scheduler.clear_timeout(handle);
        }
        self.multiplier = BASE_MULTIPLIER;
    }

    fn cancel_countdown(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.countdown_timer.take() {
            scheduler.clear_timeout(handle);
        }
    }

    /// Arm the next countdown step. A refused timer ends the countdown now.
    fn arm_countdown(&mut self, scheduler: &mut dyn Scheduler, tuning: &Tuning) {
        self.countdown_timer = scheduler.set_timeout(TimerKind::Countdown, tuning.countdown_step_ms);
        if self.countdown_timer.is_none() {
            log::warn!("Countdown timer refused, resuming immediately");
            self.finish_countdown(scheduler, tuning);
        }
    }

    fn finish_countdown(&mut self, scheduler: &mut dyn Scheduler, tuning: &Tuning) {
        let apply_boost = self.boost_pending();
        self.state = Interruption::Idle;
        if apply_boost {
            self.start_boost(scheduler, tuning);
        }
        log::info!("Resuming play");
    }

    fn start_boost(&mut self, scheduler: &mut dyn Scheduler, tuning: &Tuning) {
        // One boost window at a time: restart rather than stack
        self.cancel_boost(scheduler);
        let Some(handle) = scheduler.set_timeout(TimerKind::BoostExpired, tuning.boost_duration_ms)
        else {
            log::warn!("Boost timer refused, staying at base speed");
            return;
        };
        self.multiplier = tuning.boost_multiplier;
        self.boost_timer = Some(handle);
        log::info!(
            "Speed boost x{} for {} ms",
            tuning.boost_multiplier,
            tuning.boost_duration_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;
    use crate::quiz::sample_pool;
    use rand::SeedableRng;

    fn always() -> Tuning {
        Tuning {
            quiz_trigger_probability: 1.0,
            ..Default::default()
        }
    }

    fn triggered(filter: &CategoryFilter) -> InterruptionController {
        let mut ctl = InterruptionController::new();
        let mut rng = Pcg32::seed_from_u64(11);
        assert!(ctl.try_trigger(&sample_pool(), filter, &mut rng, &always()));
        ctl
    }

    fn wrong_answer(ctl: &InterruptionController) -> usize {
        let item = &ctl.quiz().unwrap().item;
        (item.correct_option_index + 1) % item.options.len()
    }

    #[test]
    fn test_empty_pool_never_triggers() {
        let mut ctl = InterruptionController::new();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!ctl.try_trigger(&QuizPool::new(), &CategoryFilter::new(), &mut rng, &always()));
        }
        assert_eq!(ctl.state(), &Interruption::Idle);
    }

    #[test]
    fn test_zero_probability_never_triggers() {
        let mut ctl = InterruptionController::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning {
            quiz_trigger_probability: 0.0,
            ..Default::default()
        };
        for _ in 0..100 {
            assert!(!ctl.try_trigger(&sample_pool(), &CategoryFilter::new(), &mut rng, &tuning));
        }
    }

    #[test]
    fn test_trigger_rate_near_fifteen_percent() {
        let pool = sample_pool();
        let filter = CategoryFilter::new();
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut hits = 0;
        for _ in 0..10_000 {
            let mut ctl = InterruptionController::new();
            if ctl.try_trigger(&pool, &filter, &mut rng, &tuning) {
                hits += 1;
            }
        }
        assert!((1200..1800).contains(&hits), "hits = {}", hits);
    }

    #[test]
    fn test_no_retrigger_while_interrupted() {
        let mut ctl = triggered(&CategoryFilter::new());
        let before = ctl.state().clone();
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!ctl.try_trigger(&sample_pool(), &CategoryFilter::new(), &mut rng, &always()));
        assert_eq!(ctl.state(), &before);
    }

    #[test]
    fn test_trigger_honours_filter() {
        let ctl = triggered(&CategoryFilter::from_names(["History"]));
        assert_eq!(ctl.quiz().unwrap().item.category, "History");
    }

    #[test]
    fn test_select_answer_reveals_once() {
        let mut ctl = triggered(&CategoryFilter::new());
        assert!(!ctl.select_answer(99));
        assert!(ctl.quiz().unwrap().selected.is_none());

        assert!(ctl.select_answer(0));
        let ctx = ctl.quiz().unwrap();
        assert_eq!(ctx.selected, Some(0));
        assert!(ctx.explanation_visible);

        assert!(!ctl.select_answer(1));
        assert_eq!(ctl.quiz().unwrap().selected, Some(0));
        // Still on the quiz until confirmed
        assert!(ctl.is_interrupted());
    }

    #[test]
    fn test_confirm_requires_answer() {
        let mut sched = ManualScheduler::new();
        let mut ctl = triggered(&CategoryFilter::new());
        assert!(!ctl.confirm(&mut sched, &always()));
        assert_eq!(sched.pending_timers(), 0);
        assert!(ctl.quiz().is_some());
    }

    #[test]
    fn test_correct_answer_resumes_without_boost() {
        let mut sched = ManualScheduler::new();
        let tuning = always();
        let mut ctl = triggered(&CategoryFilter::new());
        let correct = ctl.quiz().unwrap().item.correct_option_index;
        ctl.select_answer(correct);
        assert!(ctl.confirm(&mut sched, &tuning));
        assert_eq!(ctl.countdown(), Some(3));
        assert!(!ctl.boost_pending());

        assert_eq!(sched.pop_next(), Some(TimerKind::Countdown));
        assert!(!ctl.on_countdown_elapsed(&mut sched, &tuning));
        assert_eq!(ctl.countdown(), Some(2));
        assert_eq!(sched.pop_next(), Some(TimerKind::Countdown));
        assert!(!ctl.on_countdown_elapsed(&mut sched, &tuning));
        assert_eq!(ctl.countdown(), Some(1));
        assert_eq!(sched.pop_next(), Some(TimerKind::Countdown));
        assert!(ctl.on_countdown_elapsed(&mut sched, &tuning));

        assert_eq!(sched.now_ms(), 3000);
        assert_eq!(ctl.state(), &Interruption::Idle);
        assert_eq!(ctl.speed_multiplier(), 1.0);
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_wrong_answer_boosts_for_exact_window() {
        let mut sched = ManualScheduler::new();
        let tuning = always();
        let mut ctl = triggered(&CategoryFilter::new());
        let wrong = wrong_answer(&ctl);
        ctl.select_answer(wrong);
        assert_eq!(ctl.quiz().unwrap().answered_correctly(), Some(false));
        ctl.confirm(&mut sched, &tuning);
        assert!(ctl.boost_pending());

        while let Some(kind) = sched.pop_due(3000) {
            assert_eq!(kind, TimerKind::Countdown);
            ctl.on_countdown_elapsed(&mut sched, &tuning);
        }
        assert!(!ctl.is_interrupted());
        assert_eq!(ctl.speed_multiplier(), 1.5);
        assert!(ctl.boost_active());
        assert_eq!(sched.due_of(TimerKind::BoostExpired), Some(6000));

        assert_eq!(sched.pop_due(5999), None);
        assert_eq!(sched.pop_due(6000), Some(TimerKind::BoostExpired));
        assert!(ctl.on_boost_expired());
        assert_eq!(ctl.speed_multiplier(), 1.0);
        assert!(!ctl.boost_active());
    }

    #[test]
    fn test_repeated_wrong_answers_never_stack_boosts() {
        let mut sched = ManualScheduler::new();
        let tuning = always();
        let mut ctl = InterruptionController::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let pool = sample_pool();

        for round in 0..3 {
            assert!(ctl.try_trigger(&pool, &CategoryFilter::new(), &mut rng, &tuning));
            let wrong = wrong_answer(&ctl);
            ctl.select_answer(wrong);
            ctl.confirm(&mut sched, &tuning);
            while ctl.is_interrupted() {
                // The previous boost may expire on the same millisecond
                match sched.pop_next() {
                    Some(TimerKind::Countdown) => {
                        ctl.on_countdown_elapsed(&mut sched, &tuning);
                    }
                    Some(TimerKind::BoostExpired) => {
                        ctl.on_boost_expired();
                    }
                    None => panic!("countdown stalled"),
                }
            }
            assert_eq!(sched.pending_of(TimerKind::BoostExpired), 1, "round {}", round);
            assert_eq!(sched.due_of(TimerKind::BoostExpired), Some(sched.now_ms() + 3000));
        }
        assert_eq!(ctl.speed_multiplier(), 1.5);
    }

    #[test]
    fn test_stale_timer_callbacks_ignored() {
        let mut sched = ManualScheduler::new();
        let tuning = always();
        let mut ctl = InterruptionController::new();
        assert!(!ctl.on_countdown_elapsed(&mut sched, &tuning));
        assert!(!ctl.on_boost_expired());
        assert_eq!(ctl.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_reset_cancels_everything() {
        let mut sched = ManualScheduler::new();
        let tuning = always();
        let mut ctl = triggered(&CategoryFilter::new());
        let wrong = wrong_answer(&ctl);
        ctl.select_answer(wrong);
        ctl.confirm(&mut sched, &tuning);
        assert_eq!(sched.pending_timers(), 1);

        ctl.reset(&mut sched);
        assert_eq!(sched.pending_timers(), 0);
        assert_eq!(ctl.state(), &Interruption::Idle);
        // Reset twice is fine
        ctl.reset(&mut sched);
        assert_eq!(ctl.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_refused_timers_never_strand_the_countdown() {
        let mut sched = ManualScheduler::new();
        sched.refuse = true;
        let tuning = always();
        let mut ctl = triggered(&CategoryFilter::new());
        let wrong = wrong_answer(&ctl);
        ctl.select_answer(wrong);

        assert!(ctl.confirm(&mut sched, &tuning));
        assert_eq!(ctl.state(), &Interruption::Idle);
        // No timer to end it, so no boost either
        assert!(!ctl.boost_active());
        assert_eq!(ctl.speed_multiplier(), 1.0);
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_refused_rearm_ends_countdown() {
        let mut sched = ManualScheduler::new();
        let tuning = always();
        let mut ctl = triggered(&CategoryFilter::new());
        let correct = ctl.quiz().unwrap().item.correct_option_index;
        ctl.select_answer(correct);
        ctl.confirm(&mut sched, &tuning);

        assert_eq!(sched.pop_next(), Some(TimerKind::Countdown));
        sched.refuse = true;
        assert!(ctl.on_countdown_elapsed(&mut sched, &tuning));
        assert!(!ctl.is_interrupted());
    }
}
