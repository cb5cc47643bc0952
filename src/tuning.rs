//! Data-driven gameplay balance
//!
//! Defaults mirror `consts`; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning, fixed for the lifetime of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ball_radius: f32,
    pub initial_ball_speed: f32,
    pub max_ball_speed: f32,
    pub ball_speed_increase: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_bottom_offset: f32,

    /// Radians from vertical at the paddle's outer edge
    pub max_bounce_angle: f32,
    /// Radians added in the paddle's direction of travel
    pub paddle_nudge: f32,

    pub score_per_hit: u64,

    pub click_test_seconds: u32,
    pub reaction_delay_min_ms: f64,
    pub reaction_delay_max_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            initial_ball_speed: INITIAL_BALL_SPEED,
            max_ball_speed: MAX_BALL_SPEED,
            ball_speed_increase: BALL_SPEED_INCREASE,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,

            max_bounce_angle: MAX_BOUNCE_ANGLE,
            paddle_nudge: PADDLE_NUDGE,

            score_per_hit: SCORE_PER_HIT,

            click_test_seconds: CLICK_TEST_SECONDS,
            reaction_delay_min_ms: REACTION_DELAY_MIN_MS,
            reaction_delay_max_ms: REACTION_DELAY_MAX_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Defaults, with `json` applied over them when an override source supplied any
    pub fn with_overrides(json: Option<&str>) -> Self {
        match json.map(str::trim) {
            Some(json) if !json.is_empty() => {
                log::info!("Applying tuning overrides");
                Self::from_json(json)
            }
            _ => Self::default(),
        }
    }

    /// Repair values that would break simulation invariants
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.ball_radius > 0.0) {
            self.ball_radius = defaults.ball_radius;
        }
        if !(self.paddle_width > 0.0) {
            self.paddle_width = defaults.paddle_width;
        }
        if !(self.paddle_height > 0.0) {
            self.paddle_height = defaults.paddle_height;
        }
        if !(self.initial_ball_speed > 0.0) {
            self.initial_ball_speed = defaults.initial_ball_speed;
        }
        if self.max_ball_speed < self.initial_ball_speed {
            self.max_ball_speed = self.initial_ball_speed;
        }
        if self.ball_speed_increase < 0.0 {
            self.ball_speed_increase = 0.0;
        }
        if self.click_test_seconds == 0 {
            self.click_test_seconds = defaults.click_test_seconds;
        }
        if self.reaction_delay_max_ms <= self.reaction_delay_min_ms {
            self.reaction_delay_min_ms = defaults.reaction_delay_min_ms;
            self.reaction_delay_max_ms = defaults.reaction_delay_max_ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "paddle_speed": 10.0, "score_per_hit": 5 }"#);
        assert_eq!(tuning.paddle_speed, 10.0);
        assert_eq!(tuning.score_per_hit, 5);
        assert_eq!(tuning.ball_radius, BALL_RADIUS);
    }

    #[test]
    fn test_malformed_json_uses_defaults() {
        assert_eq!(Tuning::from_json("{ nope"), Tuning::default());
    }

    #[test]
    fn test_sanitize_speed_ordering() {
        let tuning = Tuning::from_json(r#"{ "initial_ball_speed": 20.0, "max_ball_speed": 5.0 }"#);
        assert!(tuning.max_ball_speed >= tuning.initial_ball_speed);
    }

    #[test]
    fn test_overrides_only_when_present() {
        assert_eq!(Tuning::with_overrides(None), Tuning::default());
        assert_eq!(Tuning::with_overrides(Some("  \n ")), Tuning::default());
        let tuning = Tuning::with_overrides(Some(r#" { "click_test_seconds": 5 } "#));
        assert_eq!(tuning.click_test_seconds, 5);
    }

    #[test]
    fn test_overrides_reach_a_new_match() {
        use crate::platform::MemoryStorage;
        use crate::sim::Canvas;
        use crate::Arcade;

        let tuning = Tuning::with_overrides(Some(r#"{ "paddle_width": 200.0 }"#));
        let arcade = Arcade::new(Canvas::default(), tuning, MemoryStorage::new(), 1);
        assert_eq!(arcade.pong.paddle.width, 200.0);
        assert_eq!(arcade.pong.paddle.x, 300.0);
    }
}
