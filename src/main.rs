//! Neon Arcade entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use neon_arcade::minigames::{ClickSpeedPhase, ReactionOutcome, ReactionPhase};
    use neon_arcade::platform::{LocalStorage, Timeout, pointer_from_client};
    use neon_arcade::renderer::{RenderState, build_scene};
    use neon_arcade::sim::{Canvas, MatchPhase};
    use neon_arcade::settings::Toggle;
    use neon_arcade::{Arcade, FrameReport, Screen, Tuning};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const CELEBRATION_MS: f64 = 3000.0;
    /// How long the score flashes after a paddle return
    const SCORE_PULSE_MS: f64 = 150.0;

    /// A title temporarily replaced by a "new best" banner
    struct Celebration {
        selector: &'static str,
        revert_text: &'static str,
        timer: Timeout,
    }

    /// Game instance holding all state
    struct Game {
        arcade: Arcade<LocalStorage>,
        render_state: Option<RenderState>,
        sparkle_rng: Pcg32,
        last_time: f64,
        celebration: Option<Celebration>,
        score_pulse: Timeout,
    }

    impl Game {
        fn new(canvas: Canvas, tuning: Tuning, seed: u64) -> Self {
            Self {
                arcade: Arcade::new(canvas, tuning, LocalStorage::open(), seed),
                render_state: None,
                sparkle_rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
                last_time: 0.0,
                celebration: None,
                score_pulse: Timeout::new(),
            }
        }

        /// Advance simulation and timers
        fn update(&mut self, dt: f32, now: f64) {
            let report = self.arcade.update(dt, now);
            self.handle_report(&report, now);

            let expired = self
                .celebration
                .as_mut()
                .map(|c| c.timer.fire(now))
                .unwrap_or(false);
            if expired {
                if let Some(c) = self.celebration.take() {
                    end_celebration(c.selector, c.revert_text);
                }
            }

            if self.score_pulse.fire(now) {
                if let Some(el) = element("currentScore") {
                    let _ = el.class_list().remove_1("pulse");
                }
            }
        }

        fn handle_report(&mut self, report: &FrameReport, now: f64) {
            if report.paddle_hits() > 0 {
                if let Some(el) = element("currentScore") {
                    let _ = el.class_list().add_1("pulse");
                }
                self.score_pulse.arm(now, SCORE_PULSE_MS);
            }
            if let Some(result) = report.match_over {
                set_text("finalScore", &result.score.to_string());
                if result.new_record {
                    self.celebrate(".overlay-title", "NEW HIGH SCORE!", "GAME OVER", now);
                }
            }
            if let Some(result) = report.click_speed_done {
                set_text("finalClickScore", &result.clicks.to_string());
                if report.new_click_record {
                    self.celebrate("#clickResults .results-title", "NEW HIGH SCORE!", "RESULTS", now);
                }
            }
        }

        fn celebrate(&mut self, selector: &'static str, text: &str, revert_text: &'static str, now: f64) {
            if !self.arcade.settings.celebrations {
                return;
            }
            if let Some(previous) = self.celebration.take() {
                end_celebration(previous.selector, previous.revert_text);
            }
            if let Some(el) = query(selector) {
                el.set_text_content(Some(text));
                let _ = el.class_list().add_1("celebrate");
            }
            let mut timer = Timeout::new();
            timer.arm(now, CELEBRATION_MS);
            self.celebration = Some(Celebration {
                selector,
                revert_text,
                timer,
            });
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(
                    &self.arcade.pong,
                    &self.arcade.settings,
                    &mut self.sparkle_rng,
                );
                match render_state.render(&vertices) {
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

        /// Mirror arcade state into the DOM
        fn update_hud(&self) {
            let arcade = &self.arcade;
            let screen = arcade.screen;
            let phase = arcade.pong.phase;

            set_visible("gameSelection", screen == Screen::Menu);
            set_visible("startScreen", screen == Screen::Pong && phase == MatchPhase::Idle);
            set_visible("gameOverlay", screen == Screen::Pong && phase == MatchPhase::Ended);
            set_visible("pauseScreen", screen == Screen::Pong && phase == MatchPhase::Paused);
            set_visible("clickSpeedGame", screen == Screen::ClickSpeed);
            set_visible("reactionTimeGame", screen == Screen::ReactionTime);
            set_visible("scoreContainer", screen != Screen::Menu);

            let (current, best) = arcade.header_scores();
            set_text("currentScore", &current.to_string());
            set_text("highScore", &best.to_string());

            match screen {
                Screen::ClickSpeed => self.update_click_speed_hud(),
                Screen::ReactionTime => self.update_reaction_hud(),
                _ => {}
            }
        }

        fn update_click_speed_hud(&self) {
            let test = &self.arcade.click_speed;
            set_text("clickTimer", &test.time_left.to_string());
            set_text("clickCount", &test.clicks.to_string());
            set_text("clickHighScore", &self.arcade.best.click_speed.to_string());
            set_visible("clickResults", test.phase == ClickSpeedPhase::Finished);
            if let Some(button) = element("clickButton") {
                if test.accepts_clicks() {
                    let _ = button.remove_attribute("disabled");
                } else {
                    let _ = button.set_attribute("disabled", "");
                }
            }
        }

        fn update_reaction_hud(&self) {
            let test = &self.arcade.reaction;
            set_text("reactionBestTime", &self.arcade.best.reaction_ms.to_string());
            set_text("reactionLastTime", &test.last_ms.to_string());

            let (screen_class, message, button) = match test.phase {
                ReactionPhase::Idle => ("", "Click START to begin".to_string(), Some("START")),
                ReactionPhase::Waiting => (
                    "waiting",
                    "Wait for the screen to turn green...".to_string(),
                    None,
                ),
                ReactionPhase::Ready { .. } => ("ready", "CLICK NOW!".to_string(), None),
                ReactionPhase::TooSoon => ("too-soon", "Too Soon!".to_string(), Some("TRY AGAIN")),
                ReactionPhase::Measured { ms } => ("", format!("{}ms", ms), None),
            };
            if let Some(el) = element("reactionScreen") {
                let _ = el.set_attribute("class", &format!("reaction-screen {}", screen_class));
            }
            set_text("reactionMessage", &message);
            set_visible("reactionStartBtn", button.is_some());
            if let Some(label) = button {
                set_text("reactionStartBtn", label);
            }

            let measured = matches!(test.phase, ReactionPhase::Measured { .. });
            set_visible("reactionResults", measured);
            if measured {
                set_text("reactionTimeResult", &test.last_ms.to_string());
                set_text("reactionBestTimeResult", &self.arcade.best.reaction_ms.to_string());
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn query(selector: &str) -> Option<Element> {
        document()?.query_selector(selector).ok().flatten()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = element(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    fn end_celebration(selector: &str, revert_text: &str) {
        if let Some(el) = query(selector) {
            el.set_text_content(Some(revert_text));
            let _ = el.class_list().remove_1("celebrate");
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let canvas: HtmlCanvasElement = element("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "gameCanvas is not a canvas")?;

        let play_area = Canvas::new(canvas.width().max(1) as f32, canvas.height().max(1) as f32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(play_area, load_tuning(), seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, play_area)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_menu_buttons(game.clone())?;
        setup_minigame_buttons(game.clone())?;
        setup_auto_pause(&window, game.clone())?;

        game.borrow().update_hud();

        // Start frame loop
        request_animation_frame(game);

        log::info!("Neon Arcade running!");
        Ok(())
    }

    /// Balance overrides from `<script id="tuning" type="application/json">`, if the page has one
    fn load_tuning() -> Tuning {
        Tuning::with_overrides(element("tuning").and_then(|el| el.text_content()).as_deref())
    }

    /// Attach a click handler to an element by id, if present
    fn on_click(id: &str, mut handler: impl FnMut(MouseEvent) + 'static) -> Result<(), JsValue> {
        if let Some(el) = element(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| handler(event));
            el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = document().ok_or("no document")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "Left" => g.arcade.key_left(true),
                    "ArrowRight" | "Right" => g.arcade.key_right(true),
                    " " => {
                        event.prevent_default();
                        if g.arcade.screen == Screen::Pong && g.arcade.pong.phase == MatchPhase::Idle {
                            g.arcade.start_pong();
                        }
                    }
                    "Escape" => g.arcade.toggle_pause(),
                    key => {
                        if let Some(toggle) = Toggle::from_key(key) {
                            g.arcade.toggle_setting(toggle);
                        }
                    }
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "Left" => g.arcade.key_left(false),
                    "ArrowRight" | "Right" => g.arcade.key_right(false),
                    _ => {}
                }
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer moves anywhere on the page steer the paddle
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = pointer_from_client(
                    event.client_x() as f32,
                    rect.left() as f32,
                    rect.right() as f32,
                    canvas_clone.width() as f32,
                );
                game.borrow_mut().arcade.pointer_moved(x);
            });
            document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // No context menu on the play surface
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            canvas.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            on_click("startBtn", move |_| {
                game.borrow_mut().arcade.start_pong();
            })?;
        }
        {
            let game = game.clone();
            on_click("restartBtn", move |_| {
                game.borrow_mut().arcade.restart_pong();
            })?;
        }

        for id in [
            "backToMenuFromPongBtn",
            "backToMenuFromGameOverBtn",
            "backToMenuFromClickSpeedBtn",
            "backToMenuFromReactionBtn",
        ] {
            let game = game.clone();
            on_click(id, move |_| game.borrow_mut().arcade.show_menu())?;
        }

        // Game cards carry their target in data-game
        let document = document().ok_or("no document")?;
        let cards = document.query_selector_all(".game-card")?;
        for i in 0..cards.length() {
            let Some(card) = cards.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let screen = match card.get_attribute("data-game").as_deref() {
                Some("pong") => Screen::Pong,
                Some("clickSpeed") => Screen::ClickSpeed,
                Some("reactionTime") => Screen::ReactionTime,
                other => {
                    log::warn!("Unknown game card {:?}", other);
                    continue;
                }
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().arcade.select(screen);
            });
            card.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        on_click("resetScoresBtn", move |_| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let confirmed = window
                .confirm_with_message(
                    "Are you sure you want to reset ALL high scores? This cannot be undone.",
                )
                .unwrap_or(false);
            if confirmed {
                game.borrow_mut().arcade.reset_best_scores();
                let _ = window.alert_with_message("All Neon Games high scores have been reset!");
            }
        })?;

        Ok(())
    }

    fn setup_minigame_buttons(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            on_click("clickButton", move |_| {
                game.borrow_mut().arcade.click_speed_click(now_ms());
            })?;
        }
        {
            let game = game.clone();
            on_click("playAgainBtn", move |_| {
                game.borrow_mut().arcade.restart_click_speed();
            })?;
        }
        {
            let game = game.clone();
            // Must not bubble into the reaction area, which would count as a click
            on_click("reactionStartBtn", move |event| {
                event.stop_propagation();
                let mut g = game.borrow_mut();
                if g.arcade.reaction.phase == ReactionPhase::TooSoon {
                    g.arcade.restart_reaction();
                } else {
                    g.arcade.reaction_start(now_ms());
                }
            })?;
        }
        {
            let game = game.clone();
            on_click("reactionScreen", move |_| {
                let now = now_ms();
                let mut g = game.borrow_mut();
                let (outcome, new_record) = g.arcade.reaction_click(now);
                if let ReactionOutcome::Measured { .. } = outcome {
                    if new_record {
                        g.celebrate("#reactionResults .results-title", "NEW BEST TIME!", "RESULTS", now);
                    }
                }
            })?;
        }
        on_click("reactionPlayAgainBtn", move |_| {
            game.borrow_mut().arcade.restart_reaction();
        })?;
        Ok(())
    }

    fn setup_auto_pause(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.arcade.pong.is_running() {
                        g.arcade.toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.arcade.pong.is_running() {
                    g.arcade.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
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
                neon_arcade::consts::SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one match with a simple keyboard autopilot and report the outcome
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use neon_arcade::consts::SIM_DT;
    use neon_arcade::platform::MemoryStorage;
    use neon_arcade::sim::{Canvas, MatchPhase};
    use neon_arcade::{Arcade, Screen};

    const MAX_FRAMES: u32 = 60 * 120;
    // Dead zone so the autopilot eventually misses a fast ball
    const TRACKING_SLACK: f32 = 20.0;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut arcade = Arcade::new(Canvas::default(), load_tuning(), MemoryStorage::new(), seed);
    arcade.select(Screen::Pong);
    arcade.start_pong();

    let mut frames = 0;
    while arcade.pong.phase == MatchPhase::Running && frames < MAX_FRAMES {
        let diff = arcade.pong.ball.pos.x - arcade.pong.paddle.center();
        arcade.key_left(diff < -TRACKING_SLACK);
        arcade.key_right(diff > TRACKING_SLACK);

        let report = arcade.update(SIM_DT, frames as f64 * SIM_DT as f64 * 1000.0);
        if let Some(result) = report.match_over {
            println!(
                "Match over after {} frames: score {} ({} hits, best {}{})",
                frames,
                result.score,
                arcade.pong.hits,
                arcade.best.pong,
                if result.new_record { ", new record" } else { "" }
            );
        }
        frames += 1;
    }

    if arcade.pong.phase == MatchPhase::Running {
        println!(
            "Autopilot still alive after {} frames with score {}",
            frames, arcade.pong.score
        );
    }
}

/// Balance overrides from the JSON file named by `NEON_ARCADE_TUNING`, if set
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> neon_arcade::Tuning {
    use neon_arcade::Tuning;

    let Some(path) = std::env::var_os("NEON_ARCADE_TUNING") else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => Tuning::with_overrides(Some(&json)),
        Err(e) => {
            log::warn!("Cannot read tuning file {}: {}", path.to_string_lossy(), e);
            Tuning::default()
        }
    }
}
