//! Mini Golf entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build drives `tick` from requestAnimationFrame; the native build
//! plays the built-in course headlessly and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent};

    use mini_golf::consts::*;
    use mini_golf::sim::{
        Course, GameEvent, GamePhase, GameState, GameSummary, PlayMode, Shot, TickInput, tick,
    };
    use mini_golf::{Leaderboard, PhysicsTuning, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        settings: Settings,
        leaderboard: Leaderboard,
    }

    impl Game {
        fn new(state: GameState, settings: Settings) -> Self {
            Self {
                state,
                input: TickInput::default(),
                settings,
                leaderboard: Leaderboard::load(),
            }
        }

        /// One tick per animation frame
        fn update(&mut self) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input);

            for event in self.state.drain_events() {
                self.handle_event(event);
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::MuteChanged(muted) => {
                    self.settings.muted = muted;
                    self.settings.save();
                }
                GameEvent::HoleSunk { result, .. } => {
                    set_text("hole-result", &result);
                }
                GameEvent::GameComplete(GameSummary::Solo(summary)) => {
                    let rank = self.leaderboard.add_score(
                        self.settings.display_name(),
                        summary.total_score,
                        summary.par_diff,
                        js_sys::Date::now(),
                    );
                    if rank.is_some() {
                        self.leaderboard.save();
                    }
                }
                GameEvent::GameComplete(GameSummary::Multiplayer { scoreboard }) => {
                    if let Some(winner) = scoreboard.first() {
                        set_text("hole-result", &format!("{} wins!", winner.name));
                    }
                }
                other => log::debug!("{:?}", other),
            }
        }

        /// Refresh the text HUD
        fn update_hud(&self) {
            let state = &self.state;
            set_text("hud-level", &(state.level_index + 1).to_string());
            set_text("hud-par", &state.level.par().to_string());
            set_text("hud-strokes", &state.hole_strokes.to_string());
            set_text("hud-score", &state.score.to_string());
            set_text("hud-player", &state.player_name);
            set_visible("next-btn", state.phase == GamePhase::HoleComplete);
            set_visible("game-complete", state.phase == GamePhase::GameComplete);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Current power slider value
    fn slider_power() -> f32 {
        document()
            .and_then(|d| d.get_element_by_id("powerSlider"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.value().parse().ok())
            .unwrap_or(MIN_POWER)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mini Golf starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let size = Vec2::new(canvas.width() as f32, canvas.height() as f32);

        let course = match Course::builtin() {
            Ok(course) => course,
            Err(e) => {
                log::error!("Cannot load course: {}", e);
                return;
            }
        };

        let settings = Settings::load();
        let mode = PlayMode::Solo {
            player_name: settings.display_name().to_string(),
            ball_color: Some(settings.ball_color.clone()),
        };
        let seed = js_sys::Date::now() as u64;
        let mut state = match GameState::new(course, size, mode, PhysicsTuning::default(), seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start session: {}", e);
                return;
            }
        };
        state.muted = settings.muted;

        log::info!("Game initialized with seed: {}", seed);
        let game = Rc::new(RefCell::new(Game::new(state, settings)));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        request_animation_frame(game);

        log::info!("Mini Golf running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let point = Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            );
            let mut g = game.borrow_mut();
            if g.state.phase == GamePhase::Aiming {
                g.input.shot = Some(Shot {
                    target: point,
                    power: slider_power(),
                });
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons: [(&str, fn(&mut TickInput)); 3] = [
            ("next-btn", |input| input.advance = true),
            ("restart-btn", |input| input.reset = true),
            ("mute-btn", |input| input.toggle_mute = true),
        ];

        for (id, apply) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                apply(&mut game.borrow_mut().input);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mini Golf (native) starting...");
    log::info!("Native mode plays the built-in course headlessly; serve the wasm build to play");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// A bot that aims straight at the cup with just enough power
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use mini_golf::sim::{Course, GamePhase, GameState, GameSummary, PlayMode, Shot, TickInput, tick};
    use mini_golf::{GolfError, Leaderboard, PhysicsTuning, Settings};

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);
    /// Gives up on a stuck session
    const MAX_TICKS: u64 = 200_000;

    fn load_tuning() -> Result<PhysicsTuning, GolfError> {
        match std::env::var("MINI_GOLF_TUNING") {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(json) => PhysicsTuning::from_json(&json),
                Err(e) => {
                    log::warn!("Cannot read {}: {}, using default tuning", path, e);
                    Ok(PhysicsTuning::default())
                }
            },
            Err(_) => Ok(PhysicsTuning::default()),
        }
    }

    /// Pick the next shot: roll roughly to the cup, fanning out on retries
    fn plan_shot(state: &GameState) -> Shot {
        let to_hole = state.level.hole.pos - state.ball.pos;
        let spread = match state.hole_strokes % 3 {
            0 => 0.0,
            1 => 0.35,
            _ => -0.35,
        };
        let dir = Vec2::from_angle(spread).rotate(to_hole.normalize_or_zero());
        // Travel before stopping is about speed / (1 - friction)
        let travel = 1.0 / (1.0 - state.tuning.friction).max(0.001);
        let power = to_hole.length() / (travel * state.tuning.power_scale) + 1.0;
        Shot {
            target: state.ball.pos + dir * 100.0,
            power,
        }
    }

    pub fn run() -> Result<(), GolfError> {
        let settings = Settings::load();
        let seed = std::env::var("MINI_GOLF_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(42);

        let mut state = GameState::new(
            Course::builtin()?,
            CANVAS,
            PlayMode::solo(settings.display_name()),
            load_tuning()?,
            seed,
        )?;
        log::info!("Seed {}", state.seed());

        while state.phase != GamePhase::GameComplete {
            if state.time_ticks > MAX_TICKS {
                log::warn!("Bot stuck on hole {}, giving up", state.level_index + 1);
                return Ok(());
            }
            let input = match state.phase {
                GamePhase::Aiming => TickInput {
                    shot: Some(plan_shot(&state)),
                    ..Default::default()
                },
                GamePhase::HoleComplete => TickInput {
                    advance: true,
                    ..Default::default()
                },
                _ => TickInput::default(),
            };
            tick(&mut state, &input);
            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        if let Some(GameSummary::Solo(summary)) = &state.summary {
            println!(
                "Finished in {} strokes (par {}, {:+}), {} hole-in-one(s), {} water hazard(s)",
                summary.total_score,
                summary.total_par,
                summary.par_diff,
                summary.hole_in_ones,
                summary.water_hazard_hits
            );

            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as f64)
                .unwrap_or(0.0);
            let mut leaderboard = Leaderboard::load();
            if let Some(rank) = leaderboard.add_score(
                settings.display_name(),
                summary.total_score,
                summary.par_diff,
                timestamp,
            ) {
                log::info!("Leaderboard rank {}", rank);
                leaderboard.save();
            }
        }
        Ok(())
    }
}
