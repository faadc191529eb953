//! Duck Hunt entry point
//!
//! In the browser this runs the game loop. Natively it runs the static file
//! server that hosts the web build.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use duck_hunt::audio::{AudioManager, SoundEffect, sounds_for_event};
    use duck_hunt::consts::*;
    use duck_hunt::renderer::SdfRenderState;
    use duck_hunt::sim::{GameEvent, GameState, TickInput, tick};
    use duck_hunt::{HighScores, Hud, Settings, screen_to_world};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<SdfRenderState>,
        settings: Settings,
        audio: AudioManager,
        high_scores: HighScores,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Canvas client size (CSS pixels) for pointer mapping
        client_size: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Rank achieved by the run that just ended
        last_rank: Option<usize>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed),
                render_state: None,
                settings,
                audio,
                high_scores: HighScores::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                client_size: (PLAY_WIDTH, PLAY_HEIGHT),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_rank: None,
            }
        }

        fn to_world(&self, x: f32, y: f32) -> glam::Vec2 {
            screen_to_world(x, y, self.client_size.0, self.client_size.1)
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                // Presses are consumed by the first tick that sees them
                let input = TickInput {
                    pointer: self.input.pointer,
                    presses: std::mem::take(&mut self.input.presses),
                };
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                self.on_event(event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn on_event(&mut self, event: GameEvent) {
            for &effect in sounds_for_event(&event) {
                self.audio.play(effect);
            }

            match event {
                GameEvent::GameOver { score, .. } => {
                    self.last_rank = self
                        .high_scores
                        .record_game_over(&event, js_sys::Date::now());
                    if let Some(rank) = self.last_rank {
                        self.high_scores.save();
                        self.audio.play(SoundEffect::HighScore);
                        log::info!("New high score #{}: {}", rank, score);
                    }
                }
                GameEvent::Restarted => {
                    self.last_rank = None;
                }
                _ => {}
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = Hud::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("hud-status") {
                if el.text_content().as_deref() != Some(hud.status.as_str()) {
                    el.set_text_content(Some(&hud.status));
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                match hud.game_over {
                    Some(message) => {
                        let _ = el.set_attribute("class", "");
                        if let Some(msg_el) = document.get_element_by_id("game-over-message") {
                            msg_el.set_text_content(Some(message));
                        }
                        if let Some(best_el) = document.get_element_by_id("best-score") {
                            let best = match self.high_scores.best() {
                                Some(run) => format!(
                                    "{} (level {}, {} ducks)",
                                    run.score, run.level, run.ducks
                                ),
                                None => "-".to_string(),
                            };
                            best_el.set_text_content(Some(&best));
                        }
                        if let Some(rank_el) = document.get_element_by_id("new-rank") {
                            match self.last_rank {
                                Some(rank) => {
                                    let _ = rank_el.set_attribute("class", "");
                                    rank_el.set_text_content(Some(&format!("New high score! #{}", rank)));
                                }
                                None => {
                                    let _ = rank_el.set_attribute("class", "hidden");
                                }
                            }
                        }
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Duck Hunt starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Backing store matches the device pixels of the CSS box
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().client_size = (client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SdfRenderState::new(surface, &adapter, width, height).await {
            Ok(mut render_state) => {
                render_state.set_start_time(window.performance().map(|p| p.now()).unwrap_or(0.0));
                game.borrow_mut().render_state = Some(render_state);
            }
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_focus_handlers(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Duck Hunt running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - crosshair follows the pointer
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.client_size = (
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let pos = g.to_world(event.offset_x() as f32, event.offset_y() as f32);
                g.input.pointer = Some(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - shoot (or restart after game over)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.client_size = (
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let pos = g.to_world(event.offset_x() as f32, event.offset_y() as f32);
                g.input.pointer = Some(pos);
                g.input.presses.push(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - same as a click at the touch point
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    let rect = canvas_clone.get_bounding_client_rect();
                    g.client_size = (rect.width() as f32, rect.height() as f32);
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let pos = g.to_world(x, y);
                    g.input.pointer = Some(pos);
                    g.input.presses.push(pos);
                }
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
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "m" | "M" => {
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                        log::info!("Muted: {}", muted);
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (tab switch, click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(false);
                }
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use duck_hunt::server::{self, ServerConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Duck Hunt server starting...");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = actix_web::rt::System::new().block_on(server::run(config)) {
        log::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
