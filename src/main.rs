//! Tank Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use tank_defense::audio::HtmlAudioBackend;
    use tank_defense::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, SIM_DT_MS};
    use tank_defense::input::{Command, KeyState};
    use tank_defense::renderer::WebCanvas;
    use tank_defense::sim::GamePhase;
    use tank_defense::{Session, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session<HtmlAudioBackend>,
        canvas: WebCanvas,
        keys: KeyState,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                SIM_DT_MS
            };
            self.last_time = time;

            let input = self.keys.sample(&self.session.settings().keys);
            self.session.frame(elapsed, &input);
            self.session.render(&mut self.canvas);
        }

        fn command(&mut self, command: Command) {
            match command {
                Command::TogglePause => self.session.toggle(),
                Command::Restart if self.session.phase() == GamePhase::GameOver => {
                    let seed = js_sys::Date::now() as u64;
                    self.session.start(seed);
                    self.keys.clear();
                }
                Command::Restart => {}
            }
        }

        /// Page hidden or window blurred
        fn auto_stop(&mut self, reason: &str) {
            self.keys.clear();
            if self.session.settings().pause_on_blur && self.session.is_running() {
                let _ = self.session.stop();
                log::info!("Auto-stopped ({})", reason);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tank Defense starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let canvas = WebCanvas::new(&canvas, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
            .expect("no 2d context");

        let settings = Settings::default();
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(settings, HtmlAudioBackend, seed);
        session.start(seed);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            canvas,
            keys: KeyState::new(),
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone());
        setup_auto_stop(game.clone());

        request_animation_frame(game);

        log::info!("Tank Defense running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down: held keys plus one-shot commands
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if g.session.settings().keys.is_game_key(&code) {
                    event.prevent_default();
                }
                if event.repeat() {
                    return;
                }
                g.keys.press(&code);
                let command = g.session.settings().keys.command(&code);
                if let Some(command) = command {
                    g.command(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.release(&event.code());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }

    fn setup_auto_stop(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_stop("tab hidden");
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
                game.borrow_mut().auto_stop("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tank_defense::audio::NullBackend;
    use tank_defense::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, SIM_DT_MS};
    use tank_defense::renderer::ShapeBatch;
    use tank_defense::sim::TickInput;
    use tank_defense::{Session, Settings};

    env_logger::init();
    log::info!("Tank Defense (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_file(&path).unwrap_or_else(|e| {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        }),
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or(0x7a4e_de4f);
    let mut session = Session::new(settings, NullBackend, seed);
    session.start(seed);

    // Sweep left and right, firing constantly, for up to a minute of game time
    let mut batch = ShapeBatch::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    for frame in 0..3600u32 {
        let going_left = (frame / 90) % 2 == 0;
        let input = TickInput {
            left: going_left,
            right: !going_left,
            fire: true,
        };
        session.frame(SIM_DT_MS, &input);
        if !session.is_running() {
            break;
        }
    }
    session.render(&mut batch);

    log::info!(
        "Demo finished after {:.1}s: score {}, {} entities, {} vertices ({} bytes)",
        session.state().clock_ms / 1000.0,
        session.score(),
        session.state().entities.len(),
        batch.vertices().len(),
        batch.vertex_bytes().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
