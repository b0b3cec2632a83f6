//! Asteroid Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlInputElement,
        KeyboardEvent, MouseEvent, TouchEvent,
    };

    use asteroid_shooter::audio::WebAudioSink;
    use asteroid_shooter::game::{Collaborators, Game, GameSummary, HudSink};
    use asteroid_shooter::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use asteroid_shooter::platform::BrowserClock;
    use asteroid_shooter::platform::input::is_game_key;
    use asteroid_shooter::renderer::{FrameView, MeshRenderer, Overlay, RenderConsumer};
    use asteroid_shooter::sim::Viewport;

    /// Score panel made of plain DOM elements
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl HudSink for DomHud {
        fn set_score(&mut self, text: &str) {
            self.set_text("score", text);
        }

        fn set_lives(&mut self, text: &str) {
            self.set_text("lives", text);
        }

        fn set_high_score(&mut self, text: &str) {
            self.set_text("highscore", text);
        }

        fn game_over(&mut self, summary: &GameSummary) {
            log::info!("Final score {} (best {})", summary.score, summary.high_score);
        }
    }

    /// Paints the tessellated frame onto a 2D canvas, then the text on top
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        mesh: MeshRenderer,
    }

    fn css_rgba(color: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8,
            color[3]
        )
    }

    impl RenderConsumer for CanvasRenderer {
        fn render(&mut self, view: &FrameView) {
            self.mesh.render(view);
            let ctx = &self.ctx;

            for tri in self.mesh.frame().vertices.chunks_exact(3) {
                ctx.set_fill_style_str(&css_rgba(tri[0].color));
                ctx.begin_path();
                ctx.move_to(tri[0].position[0] as f64, tri[0].position[1] as f64);
                ctx.line_to(tri[1].position[0] as f64, tri[1].position[1] as f64);
                ctx.line_to(tri[2].position[0] as f64, tri[2].position[1] as f64);
                ctx.close_path();
                ctx.fill();
            }

            ctx.set_fill_style_str("#000");
            ctx.set_font("12px Arial");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            for power_up in &view.world.power_ups {
                let _ = ctx.fill_text(
                    power_up.kind.label(),
                    power_up.pos.x as f64,
                    power_up.pos.y as f64,
                );
            }

            let (cx, cy) = (
                view.world.viewport.width as f64 / 2.0,
                view.world.viewport.height as f64 / 2.0,
            );
            ctx.set_fill_style_str("#FFF");
            if let Some(label) = view.respawn_label() {
                ctx.set_font("16px Arial");
                ctx.set_text_align("left");
                let _ = ctx.fill_text(&label, 10.0, 20.0);
                ctx.set_text_align("center");
            }
            if let Some(title) = view.overlay.title() {
                ctx.set_font("40px Arial");
                let _ = ctx.fill_text(title, cx, cy - 40.0);
                ctx.set_font("20px Arial");
                let detail = match view.overlay {
                    Overlay::GameOver { score } => Some(format!("Final Score: {}", score)),
                    Overlay::StartPrompt => Some("Arrows/WASD to fly, Space to fire".to_string()),
                    _ => None,
                };
                if let Some(detail) = detail {
                    let _ = ctx.fill_text(&detail, cx, cy + 10.0);
                }
                if matches!(view.overlay, Overlay::GameOver { .. }) {
                    let _ = ctx.fill_text("Press Restart to play again", cx, cy + 50.0);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Asteroid Shooter starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        let ctx = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("Unexpected 2d context type");
                    return;
                }
            },
            _ => {
                log::error!("Canvas 2d context unavailable");
                return;
            }
        };

        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);
        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; progress will not be saved", e);
                Box::new(MemoryStore::new())
            }
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            viewport,
            seed,
            Collaborators {
                clock: Box::new(BrowserClock),
                store,
                audio: Box::new(WebAudioSink::new()),
                hud: Box::new(DomHud {
                    document: document.clone(),
                }),
                renderer: Box::new(CanvasRenderer {
                    ctx,
                    mesh: MeshRenderer::new(),
                }),
            },
        );
        let game = Rc::new(RefCell::new(game));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        request_animation_frame(game);
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if is_game_key(&key) {
                    event.prevent_default();
                }
                game.borrow_mut().handle_key(&key, true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().handle_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                // Client pixels to canvas units
                let scale = Vec2::new(
                    canvas_clone.width() as f32 / rect.width().max(1.0) as f32,
                    canvas_clone.height() as f32 / rect.height().max(1.0) as f32,
                );
                let list = event.touches();
                let touches: Vec<Vec2> = (0..list.length())
                    .filter_map(|i| list.get(i))
                    .map(|t| {
                        Vec2::new(
                            t.client_x() as f32 - rect.left() as f32,
                            t.client_y() as f32 - rect.top() as f32,
                        ) * scale
                    })
                    .collect();
                game.borrow_mut().handle_touch_start(&touches);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().handle_touch_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn input_value(document: &Document, id: &str) -> Option<String> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn set_panel_visible(document: &Document, visible: bool) {
        if let Some(panel) = document.get_element_by_id("settingsMenu") {
            let display = if visible { "display: block" } else { "display: none" };
            let _ = panel.set_attribute("style", display);
        }
    }

    /// Mirror a slider's value into its label while it moves
    fn mirror_value(document: &Document, input_id: &str, label_id: &str) {
        let Some(input) = document.get_element_by_id(input_id) else {
            log::warn!("Input #{} not found", input_id);
            return;
        };
        let doc = document.clone();
        let (input_id, label_id) = (input_id.to_string(), label_id.to_string());
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            if let (Some(value), Some(label)) =
                (input_value(&doc, &input_id), doc.get_element_by_id(&label_id))
            {
                label.set_text_content(Some(&value));
            }
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "startBtn", move || {
                game.borrow_mut().start();
            });
        }
        {
            let game = game.clone();
            on_click(document, "pauseBtn", move || {
                game.borrow_mut().toggle_pause();
            });
        }
        {
            let game = game.clone();
            on_click(document, "restartBtn", move || game.borrow_mut().reset());
        }
        {
            let game = game.clone();
            let doc = document.clone();
            on_click(document, "settingsBtn", move || {
                set_panel_visible(&doc, true);
                game.borrow_mut().open_settings();
            });
        }
        {
            // Closing leaves a paused game paused
            let doc = document.clone();
            on_click(document, "closeSettings", move || set_panel_visible(&doc, false));
        }
        {
            let doc = document.clone();
            on_click(document, "saveSettings", move || {
                let speed = input_value(&doc, "asteroidSpeed").unwrap_or_default();
                let thrust = input_value(&doc, "shipSpeed").unwrap_or_default();
                match game.borrow_mut().apply_settings_input(&speed, &thrust) {
                    Ok(()) => set_panel_visible(&doc, false),
                    Err(e) => log::warn!("Settings rejected: {}", e),
                }
            });
        }

        mirror_value(document, "asteroidSpeed", "asteroidSpeedValue");
        mirror_value(document, "shipSpeed", "shipSpeedValue");
    }

    /// Display-refresh pump: fires timers, then delivers the pending frame
    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            {
                let mut g = game.borrow_mut();
                g.poll_timers();
                if let Some(token) = g.pending_frame() {
                    g.on_frame(token);
                }
            }
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use asteroid_shooter::audio::LogSink;
    use asteroid_shooter::game::{Collaborators, Game, GameSummary, HudSink, LoopPhase};
    use asteroid_shooter::persistence::{FileStore, KeyValueStore, MemoryStore};
    use asteroid_shooter::platform::ManualClock;
    use asteroid_shooter::renderer::MeshRenderer;
    use asteroid_shooter::sim::Viewport;

    /// Frame interval of the scripted run (ms)
    const FRAME_MS: f64 = 16.0;
    /// Give up after this much simulated time
    const MAX_RUN_MS: f64 = 120_000.0;

    struct LogHud;

    impl HudSink for LogHud {
        fn set_score(&mut self, text: &str) {
            log::debug!("{}", text);
        }

        fn set_lives(&mut self, text: &str) {
            log::info!("{}", text);
        }

        fn set_high_score(&mut self, text: &str) {
            log::debug!("{}", text);
        }

        fn game_over(&mut self, summary: &GameSummary) {
            println!(
                "GAME OVER - final score {} (high score {})",
                summary.score, summary.high_score
            );
        }
    }

    /// Fly a scripted pilot (spin and fire) until the session ends
    pub fn run(seed: u64) {
        let path = std::env::temp_dir().join("asteroid-shooter.json");
        let store: Box<dyn KeyValueStore> = match FileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; using in-memory store", e);
                Box::new(MemoryStore::new())
            }
        };

        let clock = ManualClock::new(0.0);
        let mut game = Game::new(
            Viewport::default(),
            seed,
            Collaborators {
                clock: Box::new(clock.clone()),
                store,
                audio: Box::new(LogSink::new()),
                hud: Box::new(LogHud),
                renderer: Box::new(MeshRenderer::new()),
            },
        );

        game.start();
        let mut elapsed = 0.0;
        while elapsed < MAX_RUN_MS {
            clock.advance(FRAME_MS);
            elapsed += FRAME_MS;

            // Alternate short thrust bursts with turning
            let beat = (elapsed / 1000.0) as u64;
            let intent = game.intent_mut();
            intent.fire = true;
            intent.right = true;
            intent.thrust = beat % 3 == 0;

            game.poll_timers();
            if let Some(token) = game.pending_frame() {
                game.on_frame(token);
            }
            if game.phase() == LoopPhase::Idle {
                break;
            }
        }

        println!(
            "Simulated {:.1}s: score {}, lives {}, high score {}",
            elapsed / 1000.0,
            game.session().score,
            game.session().lives,
            game.high_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Asteroid Shooter (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 for the playable version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run(seed);
}
