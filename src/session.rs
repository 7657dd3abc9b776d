//! Game session state machine
//!
//! `Start -> Playing -> GameOver -> Playing ...`
//!
//! Owns the game data aggregate and every pending callback handle. Hosts call
//! in from input handlers (`start`, `flap`, `select_answer`, `confirm`) and
//! from scheduler callbacks (`on_frame`, `on_timer`). Only `on_frame` runs
//! physics.

use crate::highscores::BestScore;
use crate::persistence::Storage;
use crate::platform::{FrameHandle, Scheduler, TimerKind};
use crate::quiz::{Interruption, InterruptionController, QuizPool};
use crate::renderer::RenderSurface;
use crate::settings::CategoryFilter;
use crate::sim::{self, GamePhase, GameState, Snapshot, Spawner, TickOutcome, physics};
use crate::tuning::Tuning;

pub struct Session<S: Storage> {
    tuning: Tuning,
    state: GameState,
    spawner: Spawner,
    interruption: InterruptionController,
    pool: QuizPool,
    filter: CategoryFilter,
    best: BestScore,
    storage: S,
    /// The one frame callback allowed in flight
    frame: Option<FrameHandle>,
    /// The last round ended with a record
    new_best: bool,
}

impl<S: Storage> Session<S> {
    /// Create a session on the title screen, reading stored preferences
    pub fn new(seed: u64, tuning: Tuning, pool: QuizPool, storage: S) -> Self {
        let best = BestScore::new(storage.best_score());
        let filter = storage.category_filter().unwrap_or_default();
        log::info!(
            "Session created (seed {}, best {}, {} quiz item(s))",
            seed,
            best.value(),
            pool.len()
        );
        Self {
            state: GameState::new(seed, &tuning),
            tuning,
            spawner: Spawner::new(),
            interruption: InterruptionController::new(),
            pool,
            filter,
            best,
            storage,
            frame: None,
            new_best: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    /// The round that just ended beat the previous best
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn interruption(&self) -> &InterruptionController {
        &self.interruption
    }

    /// Interruption state shortcut for overlays
    pub fn interruption_state(&self) -> &Interruption {
        self.interruption.state()
    }

    pub fn pool(&self) -> &QuizPool {
        &self.pool
    }

    pub fn category_filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// A frame callback is pending
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Playing and not suspended by a quiz or countdown
    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Playing && !self.interruption.is_interrupted()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            best_score: self.best.value(),
            actor: &self.state.actor,
            obstacles: &self.state.obstacles,
            background: &self.state.background,
            interruption: self.interruption.state(),
            speed_multiplier: self.interruption.speed_multiplier(),
            boost_active: self.interruption.boost_active(),
        }
    }

    /// Draw the current state without ticking (title screen, overlays)
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw(&self.snapshot());
    }

    /// Quiz content arrived (or failed) after startup
    pub fn set_quiz_pool(&mut self, pool: QuizPool) {
        self.pool = pool;
        let categories = self.pool.categories();
        for stale in self.filter.unknown(&categories) {
            log::debug!("Enabled category {:?} has no questions", stale);
        }
    }

    /// Replace and persist the enabled categories
    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        if let Err(e) = self.storage.set_category_filter(&self.filter) {
            log::warn!("Could not save categories: {}", e);
        }
    }

    /// Flip one category and persist. Returns whether it is now enabled.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        let mut filter = self.filter.clone();
        let enabled = filter.toggle(category);
        self.set_category_filter(filter);
        enabled
    }

    /// Start (or restart) a round. Ignored while already playing.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if self.state.phase == GamePhase::Playing {
            return false;
        }

        self.cancel_frame(scheduler);
        self.interruption.reset(scheduler);
        self.state.reset_round(&self.tuning);
        self.spawner.reset();
        self.new_best = false;
        self.state.phase = GamePhase::Playing;
        self.request_frame(scheduler);

        log::info!("Round started");
        true
    }

    /// Player input: upward impulse, then maybe a quiz
    pub fn flap(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if !self.is_running() {
            return false;
        }

        physics::flap(&mut self.state.actor, &self.tuning);

        if self.interruption.try_trigger(
            &self.pool,
            &self.filter,
            &mut self.state.rng,
            &self.tuning,
        ) {
            self.cancel_frame(scheduler);
        }
        true
    }

    pub fn select_answer(&mut self, index: usize) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        self.interruption.select_answer(index)
    }

    /// Close the quiz and start the resume countdown
    pub fn confirm(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        let accepted = self.interruption.confirm(scheduler, &self.tuning);
        // A refused countdown timer resumes play straight away
        if accepted && self.is_running() {
            self.request_frame(scheduler);
        }
        accepted
    }

    /// Animation callback: at most one tick, then draw.
    ///
    /// Without a surface the frame is dropped and the loop stops; the host
    /// restarts it with [`Session::resume_loop`] once drawing works again.
    pub fn on_frame(
        &mut self,
        scheduler: &mut dyn Scheduler,
        surface: Option<&mut dyn RenderSurface>,
    ) -> Option<TickOutcome> {
        self.frame = None;

        let Some(surface) = surface else {
            log::warn!("No render surface, frame aborted");
            return None;
        };

        let outcome = if self.is_running() {
            let multiplier = self.interruption.speed_multiplier();
            let outcome = sim::tick(&mut self.state, &mut self.spawner, &self.tuning, multiplier);
            if outcome.is_terminal() {
                self.game_over(scheduler, &outcome);
            }
            Some(outcome)
        } else {
            None
        };

        surface.draw(&self.snapshot());

        if self.is_running() {
            self.request_frame(scheduler);
        }
        outcome
    }

    /// Timer callback from the scheduler
    pub fn on_timer(&mut self, scheduler: &mut dyn Scheduler, kind: TimerKind) {
        match kind {
            TimerKind::Countdown => {
                if self.interruption.on_countdown_elapsed(scheduler, &self.tuning)
                    && self.state.phase == GamePhase::Playing
                {
                    self.request_frame(scheduler);
                }
            }
            TimerKind::BoostExpired => {
                self.interruption.on_boost_expired();
            }
        }
    }

    /// Re-request a frame after the loop stopped (e.g. surface came back)
    pub fn resume_loop(&mut self, scheduler: &mut dyn Scheduler) {
        if self.is_running() {
            self.request_frame(scheduler);
        }
    }

    /// Unmount: cancel every pending callback
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.cancel_frame(scheduler);
        self.interruption.reset(scheduler);
        log::info!("Session torn down");
    }

    fn game_over(&mut self, scheduler: &mut dyn Scheduler, outcome: &TickOutcome) {
        self.state.phase = GamePhase::GameOver;
        self.cancel_frame(scheduler);
        self.interruption.reset(scheduler);

        let score = self.state.score;
        log::info!("Game over ({:?}), score {}", outcome.collision, score);

        self.new_best = self.best.record(score);
        if self.new_best {
            log::info!("New best score: {}", score);
            if let Err(e) = self.storage.set_best_score(score) {
                log::warn!("Could not save best score: {}", e);
            }
        }
    }

    fn request_frame(&mut self, scheduler: &mut dyn Scheduler) {
        if self.frame.is_none() {
            self.frame = scheduler.request_frame();
        }
    }

    fn cancel_frame(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel_frame(handle);
        }
    }
}
