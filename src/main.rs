//! Quiz Flap entry point
//!
//! Handles platform-specific initialization and drives the session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, Response, TouchEvent};

    use quiz_flap::Session;
    use quiz_flap::persistence::LocalStorage;
    use quiz_flap::platform::{FrameCallback, TimerCallback, TimerKind, WebScheduler};
    use quiz_flap::quiz::{ContentError, Interruption, QuizPool};
    use quiz_flap::renderer::{CanvasRenderer, RenderSurface};
    use quiz_flap::sim::GamePhase;
    use quiz_flap::tuning::Tuning;

    const QUIZ_URL: &str = "questions.json";

    /// Game instance holding the session and its browser collaborators
    struct Game {
        session: Session<LocalStorage>,
        renderer: Option<CanvasRenderer>,
        scheduler: WebScheduler,
        /// Question currently rendered in the overlay, to avoid rebuilding buttons
        shown_question: Option<String>,
    }

    impl Game {
        fn flap(&mut self) {
            let Self {
                session, scheduler, ..
            } = self;
            session.flap(scheduler);
        }

        fn start(&mut self) {
            let Self {
                session, scheduler, ..
            } = self;
            session.start(scheduler);
        }

        fn confirm(&mut self) {
            let Self {
                session, scheduler, ..
            } = self;
            session.confirm(scheduler);
        }

        fn frame(&mut self) {
            let Self {
                session,
                renderer,
                scheduler,
                ..
            } = self;
            let surface = renderer.as_mut().map(|r| r as &mut dyn RenderSurface);
            session.on_frame(scheduler, surface);
        }

        fn timer(&mut self, kind: TimerKind) {
            let Self {
                session, scheduler, ..
            } = self;
            session.on_timer(scheduler, kind);
        }

        fn teardown(&mut self) {
            let Self {
                session, scheduler, ..
            } = self;
            session.teardown(scheduler);
        }

        /// Redraw without ticking (overlays, countdown, title screen)
        fn redraw(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                self.session.render(renderer);
            }
        }

        /// Update HUD and overlays in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.session.phase();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.session.score().to_string()));
            }
            if let Some(el) = document.get_element_by_id("best-score") {
                el.set_text_content(Some(&self.session.best_score().to_string()));
            }

            set_visible(&document, "start-screen", phase == GamePhase::Start);
            set_visible(&document, "hud", phase == GamePhase::Playing);
            set_visible(
                &document,
                "boost-indicator",
                self.session.interruption().boost_active(),
            );

            set_visible(&document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.session.score().to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-best") {
                    el.set_text_content(Some(&self.session.best_score().to_string()));
                }
            }
            set_visible(
                &document,
                "new-best",
                phase == GamePhase::GameOver && self.session.is_new_best(),
            );

            self.update_quiz_overlay(&document);
        }

        fn update_quiz_overlay(&mut self, document: &Document) {
            let Interruption::QuizActive(ctx) = self.session.interruption_state() else {
                set_visible(document, "quiz-overlay", false);
                self.shown_question = None;
                return;
            };
            set_visible(document, "quiz-overlay", true);

            if self.shown_question.as_deref() != Some(ctx.item.question.as_str()) {
                if let Some(el) = document.get_element_by_id("quiz-category") {
                    el.set_text_content(Some(&ctx.item.category));
                }
                if let Some(el) = document.get_element_by_id("quiz-question") {
                    el.set_text_content(Some(&ctx.item.question));
                }
                if let Some(list) = document.get_element_by_id("quiz-options") {
                    list.set_inner_html("");
                    for (index, option) in ctx.item.options.iter().enumerate() {
                        match option_button(document, index, option) {
                            Ok(btn) => {
                                let _ = list.append_child(&btn);
                            }
                            Err(e) => log::warn!("Could not build answer button: {:?}", e),
                        }
                    }
                }
                self.shown_question = Some(ctx.item.question.clone());
            }

            // Mark the chosen and correct answers once revealed
            if let Some(selected) = ctx.selected {
                if let Some(list) = document.get_element_by_id("quiz-options") {
                    let buttons = list.children();
                    for index in 0..buttons.length() {
                        let Some(btn) = buttons.item(index) else {
                            continue;
                        };
                        let index = index as usize;
                        let class = if ctx.item.is_correct(index) {
                            "answer correct"
                        } else if index == selected {
                            "answer wrong"
                        } else {
                            "answer"
                        };
                        let _ = btn.set_attribute("class", class);
                        let _ = btn.set_attribute("disabled", "");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("quiz-explanation") {
                if ctx.explanation_visible {
                    el.set_text_content(Some(&ctx.item.explanation));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
            set_visible(document, "quiz-confirm", ctx.selected.is_some());
        }

        /// Rebuild the category toggles from the loaded pool
        fn update_category_list(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(list) = document.get_element_by_id("category-list") else {
                return;
            };
            list.set_inner_html("");
            let filter = self.session.category_filter();
            for category in self.session.pool().categories() {
                let Ok(btn) = document.create_element("button") else {
                    continue;
                };
                let class = if filter.contains(&category) {
                    "category active"
                } else {
                    "category"
                };
                let _ = btn.set_attribute("class", class);
                let _ = btn.set_attribute("data-category", &category);
                btn.set_text_content(Some(&category));
                let _ = list.append_child(&btn);
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn option_button(document: &Document, index: usize, label: &str) -> Result<Element, JsValue> {
        let btn = document.create_element("button")?;
        btn.set_attribute("class", "answer")?;
        btn.set_attribute("data-index", &index.to_string())?;
        btn.set_text_content(Some(label));
        Ok(btn)
    }

    /// Read a `data-*` attribute from the clicked element
    fn target_attribute(event: &web_sys::Event, name: &str) -> Option<String> {
        event
            .target()?
            .dyn_into::<Element>()
            .ok()?
            .get_attribute(name)
    }

    /// Run an action against the game, then refresh the DOM and redraw
    fn with_game(game: &Rc<RefCell<Game>>, action: impl FnOnce(&mut Game)) {
        let mut g = game.borrow_mut();
        action(&mut *g);
        if !g.session.is_running() {
            g.redraw();
        }
        g.update_hud();
    }

    fn game_loop(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        g.frame();
        g.update_hud();
    }

    fn js_error(e: JsValue) -> ContentError {
        ContentError::Fetch(format!("{:?}", e))
    }

    async fn fetch_quiz_pool(window: &web_sys::Window) -> Result<QuizPool, ContentError> {
        let response: Response = JsFuture::from(window.fetch_with_str(QUIZ_URL))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        if !response.ok() {
            return Err(ContentError::Fetch(format!(
                "{} returned HTTP {}",
                QUIZ_URL,
                response.status()
            )));
        }
        let body = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let json = body
            .as_string()
            .ok_or_else(|| ContentError::Fetch("response body is not text".to_string()))?;
        QuizPool::from_json(&json)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Quiz Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let tuning = Tuning::default();
        let renderer = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => match CanvasRenderer::new(&canvas, &tuning) {
                Ok(renderer) => Some(renderer),
                Err(e) => {
                    log::error!("Canvas unavailable: {:?}", e);
                    None
                }
            },
            None => {
                log::error!("No #canvas element");
                None
            }
        };

        let seed = js_sys::Date::now() as u64;
        let storage = LocalStorage::open();
        let session = Session::new(seed, tuning, QuizPool::new(), storage);

        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let on_frame: FrameCallback = {
                let weak = weak.clone();
                Rc::new(move |_time: f64| {
                    if let Some(game) = weak.upgrade() {
                        game_loop(&game);
                    }
                })
            };
            let on_timer: TimerCallback = {
                let weak = weak.clone();
                Rc::new(move |kind: TimerKind| {
                    if let Some(game) = weak.upgrade() {
                        with_game(&game, |g| g.timer(kind));
                    }
                })
            };
            RefCell::new(Game {
                session,
                renderer,
                scheduler: WebScheduler::new(window.clone(), on_frame, on_timer),
                shown_question: None,
            })
        });
        log::info!("Game initialized with seed: {}", seed);

        if let Some(canvas) = document.get_element_by_id("canvas") {
            setup_input_handlers(&canvas, game.clone());
        }
        setup_buttons(&document, game.clone());
        setup_quiz_overlay(&document, game.clone());
        setup_teardown(&window, game.clone());

        with_game(&game, |_| {});

        // Quiz content arrives after the title screen is up
        let pool = QuizPool::or_disabled(fetch_quiz_pool(&window).await);
        {
            let mut g = game.borrow_mut();
            g.session.set_quiz_pool(pool);
            g.update_category_list();
        }

        log::info!("Quiz Flap running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &Element, game: Rc<RefCell<Game>>) {
        // Mouse click - flap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                with_game(&game, Game::flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - flap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                with_game(&game, Game::flap);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                match code.as_str() {
                    "Space" => {
                        event.prevent_default();
                        with_game(&game, Game::flap);
                    }
                    "Enter" => with_game(&game, Game::confirm),
                    _ => {
                        // Digit1..Digit9 pick an answer
                        if let Some(index) = code
                            .strip_prefix("Digit")
                            .and_then(|d| d.parse::<usize>().ok())
                            .and_then(|d| d.checked_sub(1))
                        {
                            with_game(&game, |g| {
                                g.session.select_answer(index);
                            });
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    with_game(&game, Game::start);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Category toggles are rebuilt on load; listen on the container
        if let Some(list) = document.get_element_by_id("category-list") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(category) = target_attribute(&event, "data-category") else {
                    return;
                };
                let mut g = game.borrow_mut();
                let enabled = g.session.toggle_category(&category);
                log::info!("Category {:?} {}", category, if enabled { "on" } else { "off" });
                g.update_category_list();
            });
            let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_quiz_overlay(document: &Document, game: Rc<RefCell<Game>>) {
        // Answer buttons are rebuilt per question; listen on the container
        if let Some(list) = document.get_element_by_id("quiz-options") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(index) = target_attribute(&event, "data-index")
                    .and_then(|i| i.parse::<usize>().ok())
                else {
                    return;
                };
                with_game(&game, |g| {
                    g.session.select_answer(index);
                });
            });
            let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quiz-confirm") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                with_game(&game, Game::confirm);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().teardown();
        });
        let _ = window
            .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use quiz_flap::Session;
    use quiz_flap::persistence::MemoryStorage;
    use quiz_flap::platform::ManualScheduler;
    use quiz_flap::quiz::QuizPool;
    use quiz_flap::renderer::HeadlessSurface;
    use quiz_flap::sim::{GamePhase, GameState};
    use quiz_flap::tuning::Tuning;

    /// ~60 Hz
    const FRAME_MS: u64 = 16;
    /// Stop a run that never dies (about five minutes of play)
    const MAX_FRAMES: u64 = 18_000;
    /// How often the autopilot knows the answer
    const ANSWER_ACCURACY: f64 = 0.75;

    #[derive(Debug, Default)]
    pub struct RunReport {
        pub frames: u64,
        pub score: u32,
        pub best_score: u32,
        pub quizzes: u32,
        pub wrong_answers: u32,
        pub elapsed_ms: u64,
    }

    /// Flap when the actor sinks below the middle of the next gap
    fn wants_flap(state: &GameState, tuning: &Tuning) -> bool {
        let actor = &state.actor;
        let target = state
            .obstacles
            .iter()
            .find(|o| o.trailing_edge() >= actor.x())
            .map(|o| o.gap_y + o.gap_height * 0.6)
            .unwrap_or(tuning.ground_top() * 0.5);
        actor.velocity >= 0.0 && actor.y() + actor.height() > target
    }

    /// Play one round on a virtual clock until game over or the frame cap
    pub fn run(seed: u64, pool: QuizPool, tuning: Tuning) -> RunReport {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::default();
        let mut answers = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let mut session = Session::new(seed, tuning.clone(), pool, MemoryStorage::new());
        let mut report = RunReport::default();

        session.start(&mut sched);

        while session.phase() == GamePhase::Playing && report.frames < MAX_FRAMES {
            let pick = session.interruption().quiz().map(|quiz| {
                let item = &quiz.item;
                let pick = if answers.random_bool(ANSWER_ACCURACY) {
                    item.correct_option_index
                } else {
                    (item.correct_option_index + 1) % item.options.len()
                };
                log::info!("Q: {} -> {}", item.question, item.options[pick]);
                (pick, item.is_correct(pick))
            });
            if let Some((pick, correct)) = pick {
                report.quizzes += 1;
                if !correct {
                    report.wrong_answers += 1;
                }
                session.select_answer(pick);
                session.confirm(&mut sched);
                continue;
            }

            if sched.take_frame().is_some() {
                sched.advance(FRAME_MS);
                let now = sched.now_ms();
                while let Some(kind) = sched.pop_due(now) {
                    session.on_timer(&mut sched, kind);
                }
                session.on_frame(&mut sched, Some(&mut surface));
                report.frames += 1;

                if session.is_running() && wants_flap(session.state(), &tuning) {
                    session.flap(&mut sched);
                }
                continue;
            }

            // Suspended: let the countdown run
            match sched.pop_next() {
                Some(kind) => session.on_timer(&mut sched, kind),
                None => {
                    log::warn!("Nothing scheduled while playing, stopping");
                    break;
                }
            }
        }

        session.teardown(&mut sched);
        report.score = session.score();
        report.best_score = session.best_score();
        report.elapsed_ms = sched.now_ms();
        report
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    log::info!("Quiz Flap (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    // Usage: quiz-flap [questions.json] [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let pool = match args.next() {
        Some(path) => quiz_flap::quiz::QuizPool::or_disabled(quiz_flap::quiz::QuizPool::read_file(
            &path,
        )),
        None => {
            log::info!("No quiz file given, quizzes disabled");
            quiz_flap::quiz::QuizPool::new()
        }
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({}), using clock", e);
            clock_seed()
        }
        None => clock_seed(),
    };

    let tuning = match args.next() {
        Some(path) => quiz_flap::Tuning::or_default(quiz_flap::Tuning::read_file(&path)),
        None => quiz_flap::Tuning::default(),
    };

    let report = headless::run(seed, pool, tuning);
    println!("\nSeed:          {}", seed);
    println!("Frames:        {}", report.frames);
    println!("Virtual time:  {:.1} s", report.elapsed_ms as f64 / 1000.0);
    println!("Score:         {}", report.score);
    println!("Best:          {}", report.best_score);
    println!(
        "Quizzes:       {} ({} wrong)",
        report.quizzes, report.wrong_answers
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
