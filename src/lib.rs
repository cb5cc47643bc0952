//! Neon Arcade - Neon Pong and two reflex mini-games
//!
//! Core modules:
//! - `sim`: Pong simulation (ball/paddle physics, collisions, match state)
//! - `minigames`: Click-speed and reaction-time tests
//! - `arcade`: Owned context tying screens, games, scores and input together
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (timers, storage, input)
//! - `tuning`: Data-driven game balance

pub mod arcade;
pub mod highscores;
pub mod minigames;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::{Arcade, FrameReport, Screen};
pub use highscores::BestScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one reference frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap the accumulator will absorb (tab switches, breakpoints).
    /// Longer than `MAX_SUBSTEPS` steps, so a stalled frame drops its backlog.
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Default canvas size in pixels
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ball defaults (pixels, pixels per tick)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const INITIAL_BALL_SPEED: f32 = 3.0;
    pub const MAX_BALL_SPEED: f32 = 12.0;
    /// Added to ball speed on every paddle hit
    pub const BALL_SPEED_INCREASE: f32 = 0.2;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the canvas bottom to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;

    /// Largest outgoing angle from vertical (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Extra angle (radians) when the paddle was moving at contact
    pub const PADDLE_NUDGE: f32 = 0.15;

    pub const SCORE_PER_HIT: u64 = 10;

    /// Click-speed test length in seconds
    pub const CLICK_TEST_SECONDS: u32 = 10;
    /// Reaction test random delay window (ms)
    pub const REACTION_DELAY_MIN_MS: f64 = 2000.0;
    pub const REACTION_DELAY_MAX_MS: f64 = 5000.0;
}

/// Sign of `v` as -1, 0 or 1 (unlike `f32::signum`, zero maps to zero)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
    }
}
