//! Arcade context
//!
//! Owns every piece of game state so the browser glue only forwards events
//! and paints what it is handed. No globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::BestScores;
use crate::minigames::{ClickSpeedResult, ClickSpeedTest, ReactionOutcome, ReactionTest};
use crate::platform::{InputState, Storage};
use crate::settings::{Settings, Toggle};
use crate::sim::{Canvas, GameEvent, GameState, MatchPhase, PaddleControl, TickInput, tick};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Pong,
    ClickSpeed,
    ReactionTime,
}

/// What changed during one rendered frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Simulation ticks run this frame
    pub ticks: u32,
    pub events: Vec<GameEvent>,
    /// Set when a Pong match ended this frame
    pub match_over: Option<MatchResult>,
    pub click_speed_done: Option<ClickSpeedResult>,
    pub new_click_record: bool,
    /// Reaction signal turned green this frame
    pub reaction_ready: bool,
}

impl FrameReport {
    /// Paddle returns this frame
    pub fn paddle_hits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::PaddleHit { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub score: u64,
    pub new_record: bool,
}

pub struct Arcade<S: Storage> {
    pub screen: Screen,
    pub pong: GameState,
    pub click_speed: ClickSpeedTest,
    pub reaction: ReactionTest,
    pub best: BestScores,
    pub settings: Settings,
    pub input: InputState,
    storage: S,
    rng: Pcg32,
    accumulator: f32,
}

impl<S: Storage> Arcade<S> {
    pub fn new(canvas: Canvas, tuning: Tuning, storage: S, seed: u64) -> Self {
        let best = BestScores::load(&storage);
        let settings = Settings::load(&storage);
        Self {
            screen: Screen::Menu,
            click_speed: ClickSpeedTest::new(tuning.click_test_seconds),
            reaction: ReactionTest::new(tuning.reaction_delay_min_ms, tuning.reaction_delay_max_ms),
            pong: GameState::new(canvas, tuning, seed),
            best,
            settings,
            input: InputState::new(),
            storage,
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            accumulator: 0.0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Switch screens. Leaving a screen stops whatever was running on it.
    pub fn select(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        self.leave_current();
        self.screen = screen;
        log::info!("Screen: {:?}", screen);
    }

    pub fn show_menu(&mut self) {
        self.select(Screen::Menu);
    }

    fn leave_current(&mut self) {
        match self.screen {
            Screen::Pong => self.reset_pong(),
            Screen::ClickSpeed => self.click_speed.reset(),
            Screen::ReactionTime => self.reaction.reset(),
            Screen::Menu => {}
        }
    }

    fn reset_pong(&mut self) {
        self.pong.restart();
        self.input.reset_pointer();
        self.accumulator = 0.0;
    }

    /// Start a match from the Pong screen. Returns false if nothing started.
    pub fn start_pong(&mut self) -> bool {
        if self.screen != Screen::Pong {
            return false;
        }
        if self.pong.phase == MatchPhase::Ended {
            return false;
        }
        self.accumulator = 0.0;
        self.pong.start()
    }

    /// Fresh match, waiting on the start screen
    pub fn restart_pong(&mut self) {
        self.reset_pong();
        log::info!("Match reset");
    }

    pub fn toggle_pause(&mut self) {
        if self.screen == Screen::Pong {
            self.pong.toggle_pause();
        }
    }

    /// Keyboard/pointer plumbing
    pub fn key_left(&mut self, pressed: bool) {
        self.input.set_left(pressed);
    }

    pub fn key_right(&mut self, pressed: bool) {
        self.input.set_right(pressed);
    }

    /// Pointer x in canvas pixels. Only counts while a match is running.
    pub fn pointer_moved(&mut self, x: f32) {
        if self.screen == Screen::Pong && self.pong.is_running() {
            self.input.pointer_moved(x);
        }
    }

    /// Advance by `dt` seconds of wall time; `now` is the clock for mini-game timers (ms)
    pub fn update(&mut self, dt: f32, now: f64) -> FrameReport {
        let mut report = FrameReport::default();

        if self.screen == Screen::Pong && self.pong.is_running() {
            self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
            let steps = ((self.accumulator / SIM_DT) as u32).min(MAX_SUBSTEPS);
            let control = self.input.paddle_control();
            let start_x = self.pong.paddle.center();

            for step in 1..=steps {
                self.accumulator -= SIM_DT;
                report.ticks += 1;
                // Spread a pointer move over the frame's steps so every step
                // sees the paddle travelling
                let paddle = match control {
                    PaddleControl::Pointer(x) => {
                        PaddleControl::Pointer(start_x + (x - start_x) * step as f32 / steps as f32)
                    }
                    keys => keys,
                };
                let events = tick(&mut self.pong, &TickInput { paddle });
                let ended = events.iter().find_map(|e| match e {
                    GameEvent::MatchEnded { score } => Some(*score),
                    _ => None,
                });
                report.events.extend(events);
                if let Some(score) = ended {
                    let new_record = self.best.record_pong(score, &mut self.storage);
                    report.match_over = Some(MatchResult { score, new_record });
                    self.accumulator = 0.0;
                    break;
                }
            }
            // Drop time we could not catch up on instead of replaying it later
            if report.ticks == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }
        }

        if let Some(result) = self.click_speed.poll(now) {
            report.new_click_record = self.best.record_clicks(result.clicks, &mut self.storage);
            report.click_speed_done = Some(result);
        }
        report.reaction_ready = self.reaction.poll(now);

        report
    }

    pub fn click_speed_click(&mut self, now: f64) {
        if self.screen == Screen::ClickSpeed {
            self.click_speed.click(now);
        }
    }

    pub fn restart_click_speed(&mut self) {
        self.click_speed.reset();
    }

    pub fn reaction_start(&mut self, now: f64) {
        if self.screen == Screen::ReactionTime {
            self.reaction.start(now, &mut self.rng);
        }
    }

    /// Returns the outcome and whether it set a new best time
    pub fn reaction_click(&mut self, now: f64) -> (ReactionOutcome, bool) {
        let outcome = self.reaction.click(now);
        let new_record = match outcome {
            ReactionOutcome::Measured { ms } => self.best.record_reaction(ms, &mut self.storage),
            _ => false,
        };
        (outcome, new_record)
    }

    pub fn restart_reaction(&mut self) {
        self.reaction.reset();
    }

    pub fn reset_best_scores(&mut self) {
        self.best.reset_all(&mut self.storage);
    }

    /// Flip a visual effect and persist the change. Returns its new state.
    pub fn toggle_setting(&mut self, toggle: Toggle) -> bool {
        let enabled = self.settings.toggle(toggle);
        self.settings.save(&mut self.storage);
        log::info!("{:?} {}", toggle, if enabled { "on" } else { "off" });
        enabled
    }

    /// Current score and best for the header of the active screen
    pub fn header_scores(&self) -> (u64, u64) {
        match self.screen {
            Screen::Menu | Screen::Pong => (self.pong.score, self.best.pong),
            Screen::ClickSpeed => (self.click_speed.clicks, self.best.click_speed),
            Screen::ReactionTime => (self.reaction.last_ms, self.best.reaction_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PADDLE_NUDGE;
    use crate::highscores::PONG_KEY;
    use crate::minigames::ClickSpeedPhase;
    use crate::platform::MemoryStorage;
    use crate::sim::Direction;
    use glam::Vec2;

    fn arcade() -> Arcade<MemoryStorage> {
        Arcade::new(Canvas::new(800.0, 600.0), Tuning::default(), MemoryStorage::new(), 42)
    }

    #[test]
    fn test_start_requires_pong_screen() {
        let mut arcade = arcade();
        assert!(!arcade.start_pong());
        arcade.select(Screen::Pong);
        assert!(arcade.start_pong());
        assert!(arcade.pong.is_running());
    }

    #[test]
    fn test_fixed_step_accumulator() {
        let mut arcade = arcade();
        arcade.select(Screen::Pong);
        arcade.start_pong();

        assert_eq!(arcade.update(SIM_DT * 0.5, 0.0).ticks, 0);
        assert_eq!(arcade.update(SIM_DT * 0.6, 0.0).ticks, 1);
        // A huge gap is clamped, then capped, and the backlog is dropped
        assert_eq!(arcade.update(5.0, 0.0).ticks, MAX_SUBSTEPS);
        assert!(arcade.update(0.0, 0.0).ticks <= 1);
    }

    #[test]
    fn test_match_end_records_best_and_stops_ticking() {
        let mut arcade = arcade();
        arcade.select(Screen::Pong);
        arcade.start_pong();
        arcade.pong.score = 70;
        arcade.pong.paddle.x = 0.0;
        arcade.pong.ball.pos = Vec2::new(700.0, 600.0 + arcade.pong.ball.radius);
        arcade.pong.ball.vel = Vec2::new(0.0, 3.0);

        let report = arcade.update(SIM_DT * 4.0, 0.0);
        assert_eq!(report.ticks, 1);
        assert_eq!(
            report.match_over,
            Some(MatchResult {
                score: 70,
                new_record: true
            })
        );
        assert_eq!(arcade.best.pong, 70);
        assert_eq!(arcade.storage().get_score(PONG_KEY), Some(70));

        assert_eq!(arcade.update(1.0, 0.0).ticks, 0);
        assert!(!arcade.start_pong());

        arcade.restart_pong();
        assert!(arcade.start_pong());
        assert_eq!(arcade.pong.score, 0);
    }

    #[test]
    fn test_pointer_only_counts_while_running() {
        let mut arcade = arcade();
        arcade.select(Screen::Pong);
        arcade.pointer_moved(100.0);
        assert!(!arcade.input.pointer_active());

        arcade.start_pong();
        arcade.pointer_moved(100.0);
        arcade.key_left(true);
        arcade.update(SIM_DT, 0.0);
        assert_eq!(arcade.pong.paddle.center(), 100.0);

        arcade.restart_pong();
        assert!(!arcade.input.pointer_active());
        assert_eq!(arcade.input.direction(), Direction::Left);
    }

    #[test]
    fn test_pointer_swipe_nudges_on_later_substep() {
        let mut arcade = arcade();
        arcade.select(Screen::Pong);
        arcade.start_pong();
        arcade.pong.paddle.x = 340.0;
        let paddle_y = arcade.pong.paddle.y;
        let radius = arcade.pong.ball.radius;
        // Clear of the paddle after one step, overlapping after two
        arcade.pong.ball.pos = Vec2::new(450.0, paddle_y - radius - 4.0);
        arcade.pong.ball.vel = Vec2::new(0.0, 3.0);
        arcade.pong.ball.speed = 3.0;

        arcade.pointer_moved(450.0);
        let report = arcade.update(SIM_DT * 2.0 + 1e-4, 0.0);

        assert_eq!(report.ticks, 2);
        assert_eq!(report.paddle_hits(), 1);
        assert_eq!(arcade.pong.score, 10);
        assert_eq!(arcade.pong.paddle.center(), 450.0);
        assert!(arcade.pong.paddle.dx > 0.0);
        let expected = 3.2 * PADDLE_NUDGE.sin();
        assert!((arcade.pong.ball.vel.x - expected).abs() < 1e-4);
        assert!(arcade.pong.ball.vel.y < 0.0);
    }

    #[test]
    fn test_toggle_setting_persists() {
        let mut arcade = arcade();
        assert!(!arcade.toggle_setting(Toggle::Sparkles));
        assert!(!Settings::load(arcade.storage()).sparkles);
        assert!(Settings::load(arcade.storage()).trails);
    }

    #[test]
    fn test_leaving_screen_cancels_minigame() {
        let mut arcade = arcade();
        arcade.select(Screen::ClickSpeed);
        arcade.click_speed_click(0.0);
        assert!(arcade.click_speed.is_running());

        arcade.show_menu();
        assert_eq!(arcade.click_speed.phase, ClickSpeedPhase::Ready);
        let report = arcade.update(SIM_DT, 60_000.0);
        assert_eq!(report.click_speed_done, None);
    }

    #[test]
    fn test_click_speed_run_records_best() {
        let mut arcade = arcade();
        arcade.select(Screen::ClickSpeed);
        for i in 0..25 {
            arcade.click_speed_click(i as f64 * 50.0);
        }
        let report = arcade.update(SIM_DT, 10_000.0);
        assert_eq!(report.click_speed_done, Some(ClickSpeedResult { clicks: 25 }));
        assert!(report.new_click_record);
        assert_eq!(arcade.header_scores(), (25, 25));
    }

    #[test]
    fn test_reaction_flow_records_best() {
        let mut arcade = arcade();
        arcade.select(Screen::ReactionTime);
        arcade.reaction_start(0.0);
        assert_eq!(arcade.reaction_click(100.0), (ReactionOutcome::TooSoon, false));

        arcade.reaction_start(1000.0);
        let report = arcade.update(SIM_DT, 7000.0);
        assert!(report.reaction_ready);
        assert_eq!(
            arcade.reaction_click(7180.0),
            (ReactionOutcome::Measured { ms: 180 }, true)
        );
        assert_eq!(arcade.best.reaction_ms, 180);

        arcade.reset_best_scores();
        assert_eq!(arcade.best, BestScores::new());
    }

    #[test]
    fn test_best_scores_survive_reload() {
        let mut storage = MemoryStorage::new();
        storage.set_score(PONG_KEY, 90);
        let arcade = Arcade::new(Canvas::default(), Tuning::default(), storage, 1);
        assert_eq!(arcade.best.pong, 90);
        assert_eq!(arcade.header_scores(), (0, 90));
    }
}
