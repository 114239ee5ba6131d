//! Fruit Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use fruit_catch::sim::{GameEvent, GameMode};
    use fruit_catch::{Command, Game, Tuning};

    /// Game instance plus the surface it draws on
    struct App {
        game: Game,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
    }

    impl App {
        /// Match the canvas to the window and tell the simulation
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
            self.game.resize(w as f32, h as f32);
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;
            self.game.update(dt);

            for event in self.game.drain_events() {
                if let GameEvent::GameOver { score } = event {
                    log::info!("Game over, final score {}", score);
                }
            }
        }

        fn render(&self) {
            let state = &self.game.state;
            let ctx = &self.ctx;
            ctx.clear_rect(0.0, 0.0, state.width as f64, state.height as f64);

            let basket = &state.basket;
            ctx.set_fill_style_str("brown");
            ctx.fill_rect(
                basket.pos.x as f64,
                basket.pos.y as f64,
                basket.width as f64,
                basket.height as f64,
            );

            ctx.set_font("28px serif");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            for entity in state.entities() {
                let _ = ctx.fill_text(
                    &entity.tag.to_string(),
                    entity.pos.x as f64,
                    entity.pos.y as f64,
                );
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.game.state;
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&state.score_label()));
            }
            set_visible(document, "game-over", state.mode == GameMode::Ended);
            set_visible(document, "pause-menu", state.mode == GameMode::Paused);
            set_visible(document, "startBtn", state.mode == GameMode::Idle);
            set_visible(document, "instructions", state.mode == GameMode::Idle);
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let display = if visible { "" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }

    /// Tuning embedded in the page, or defaults
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from page");
                tuning
            }
            Err(e) => {
                log::warn!("Bad tuning, using defaults: {}", e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fruit Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(load_tuning(&document), seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            canvas,
            ctx,
            last_time: 0.0,
        }));
        app.borrow_mut().fit_to_window();

        setup_input_handlers(app.clone());
        setup_buttons(&document, app.clone());

        request_animation_frame(app);
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let command = match event.key().as_str() {
                    "ArrowLeft" => Command::MoveLeftStart,
                    "ArrowRight" => Command::MoveRightStart,
                    "Escape" | "p" | "P" => Command::TogglePause,
                    _ => return,
                };
                app.borrow_mut().game.apply(command);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let command = match event.key().as_str() {
                    "ArrowLeft" => Command::MoveLeftStop,
                    "ArrowRight" => Command::MoveRightStop,
                    _ => return,
                };
                app.borrow_mut().game.apply(command);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().fit_to_window();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for (id, command) in [
            ("startBtn", Command::Start),
            ("restartBtn", Command::Restart),
            ("pauseBtn", Command::TogglePause),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().game.apply(command);
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
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
    log::info!("Fruit Catch (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the playable game");

    demo::run(2024);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run with a simple autopilot steering the basket
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use fruit_catch::sim::{EntityKind, GameMode, GameState};
    use fruit_catch::{Command, Game, Tuning};

    /// Two minutes of frames
    const MAX_FRAMES: u32 = 120 * 60;

    pub fn run(seed: u64) {
        let mut game = Game::new(Tuning::default(), seed);
        game.apply(Command::Start);

        let mut frames = 0;
        while game.mode() == GameMode::Running && frames < MAX_FRAMES {
            let steer = choose_direction(&game.state);
            for command in steer {
                game.apply(command);
            }
            game.step();
            frames += 1;
        }

        let seconds = frames as f32 / 60.0;
        match game.mode() {
            GameMode::Ended => log::info!(
                "Bomb hit after {:.1}s, score {}, difficulty {:.1}",
                seconds,
                game.state.score,
                game.state.difficulty
            ),
            _ => log::info!(
                "Survived {:.1}s, score {}, difficulty {:.1}",
                seconds,
                game.state.score,
                game.state.difficulty
            ),
        }
        println!("{}", game.state.score_label());
    }

    /// Chase the lowest fruit unless a bomb is about to land on the basket
    fn choose_direction(state: &GameState) -> [Command; 2] {
        let basket = &state.basket;
        let center = basket.pos.x + basket.width / 2.0;

        let threat = state
            .bombs
            .iter()
            .filter(|b| b.pos.y > basket.pos.y - 150.0 && b.pos.y < basket.pos.y)
            .find(|b| (b.pos.x - center).abs() < basket.width);
        let target = match threat {
            Some(bomb) if bomb.pos.x > center => Some(center - basket.width),
            Some(_) => Some(center + basket.width),
            None => state
                .entities()
                .filter(|e| e.kind == EntityKind::Fruit && e.pos.y < basket.pos.y)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|f| f.pos.x),
        };

        match target {
            Some(x) if x < center - basket.max_speed => {
                [Command::MoveRightStop, Command::MoveLeftStart]
            }
            Some(x) if x > center + basket.max_speed => {
                [Command::MoveLeftStop, Command::MoveRightStart]
            }
            _ => [Command::MoveLeftStop, Command::MoveRightStop],
        }
    }
}
