//! Ember Knight entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! simulation publishes a JSON snapshot every frame; drawing it is left to
//! the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use ember_knight::Tuning;
    use ember_knight::consts::*;
    use ember_knight::sim::{GamePhase, GameState, InputAction, InputTracker, tick};

    // Hand the snapshot to whatever renderer the page installed
    #[wasm_bindgen(inline_js = "
        export function publish_snapshot(json) {
            const render = window.emberKnightRender;
            if (typeof render === 'function') {
                render(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn publish_snapshot(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputTracker,
        accumulator: f32,
        last_time: f64,
        // Track phase for logging
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: GameState::new(seed, tuning),
                input: InputTracker::new(),
                accumulator: 0.0,
                last_time: 0.0,
                last_phase: GamePhase::Menu,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, current_phase);
                self.last_phase = current_phase;
            }
        }

        /// Publish the current snapshot
        fn publish(&self) {
            match serde_json::to_string(&self.state.snapshot()) {
                Ok(json) => publish_snapshot(&json),
                Err(e) => log::warn!("Snapshot encode failed: {e}"),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ember Knight starting...");

        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_release(game.clone());

        request_animation_frame(game);

        log::info!("Ember Knight running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                // Keep arrows and space from scrolling the page
                if InputAction::from_key(&key.to_lowercase()).is_some() {
                    event.prevent_default();
                }
                game.borrow_mut().input.key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Key-up events never arrive while the page is hidden, so drop held keys
    fn setup_auto_release(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().input.release_all();
                    log::info!("Released held keys (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
                log::info!("Released held keys (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.publish();
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
    log::info!("Ember Knight (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build to play");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a scripted minute of level 1: swing at whatever comes close
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use ember_knight::Tuning;
    use ember_knight::consts::TICK_HZ;
    use ember_knight::sim::{GamePhase, GameState, InputTracker, tick};

    let mut state = GameState::new(0x5eed, Tuning::load());
    let mut input = InputTracker::new();

    input.key_down("Enter");
    tick(&mut state, &input.take_tick_input());
    input.key_up("Enter");

    for _ in 0..(TICK_HZ * 60) {
        let px = state.player.pos.x;
        let nearest = state
            .enemies
            .iter()
            .min_by(|a, b| (a.x - px).abs().total_cmp(&(b.x - px).abs()));

        // Face the nearest enemy and swing when it is close
        input.key_up("arrowleft");
        input.key_up("arrowright");
        input.key_up(" ");
        if let Some(enemy) = nearest {
            if (enemy.x - px).abs() < 10.0 {
                input.key_down(" ");
            } else if enemy.x < px {
                input.key_down("arrowleft");
            } else {
                input.key_down("arrowright");
            }
        }

        tick(&mut state, &input.take_tick_input());
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Demo finished: phase={:?}, score={}, health={:.0}, time_left={}s",
        state.phase,
        state.score,
        state.player.health,
        state.time_remaining
    );
    println!(
        "phase={:?} score={} health={:.0}",
        state.phase, state.score, state.player.health
    );
}
