//! Best scores for every game
//!
//! Persisted as plain integers, one storage key per game. A missing or
//! unreadable value counts as zero.

use crate::platform::Storage;

/// Best Pong score
pub const PONG_KEY: &str = "neonPongHighScore";
/// Most clicks in one click-speed run
pub const CLICK_SPEED_KEY: &str = "neonClickSpeedHighScore";
/// Fastest reaction in ms (0 = none yet)
pub const REACTION_KEY: &str = "neonReactionTimeBest";

/// Best values across all games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScores {
    pub pong: u64,
    pub click_speed: u64,
    pub reaction_ms: u64,
}

impl BestScores {
    /// Create empty records
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every record from storage
    pub fn load(storage: &impl Storage) -> Self {
        let scores = Self {
            pong: storage.get_score(PONG_KEY).unwrap_or(0),
            click_speed: storage.get_score(CLICK_SPEED_KEY).unwrap_or(0),
            reaction_ms: storage.get_score(REACTION_KEY).unwrap_or(0),
        };
        log::info!(
            "Loaded best scores: pong {}, clicks {}, reaction {} ms",
            scores.pong,
            scores.click_speed,
            scores.reaction_ms
        );
        scores
    }

    /// Record a finished Pong match. Returns true on a new best.
    pub fn record_pong(&mut self, score: u64, storage: &mut impl Storage) -> bool {
        if score <= self.pong {
            return false;
        }
        self.pong = score;
        storage.set_score(PONG_KEY, score);
        log::info!("New Pong high score: {}", score);
        true
    }

    /// Record a finished click-speed run. Returns true on a new best.
    pub fn record_clicks(&mut self, clicks: u64, storage: &mut impl Storage) -> bool {
        if clicks <= self.click_speed {
            return false;
        }
        self.click_speed = clicks;
        storage.set_score(CLICK_SPEED_KEY, clicks);
        log::info!("New click-speed high score: {}", clicks);
        true
    }

    /// Record a reaction time; lower is better, zero never counts
    pub fn record_reaction(&mut self, ms: u64, storage: &mut impl Storage) -> bool {
        if ms == 0 || (self.reaction_ms != 0 && ms >= self.reaction_ms) {
            return false;
        }
        self.reaction_ms = ms;
        storage.set_score(REACTION_KEY, ms);
        log::info!("New best reaction time: {} ms", ms);
        true
    }

    /// Forget every record, in memory and in storage
    pub fn reset_all(&mut self, storage: &mut impl Storage) {
        storage.remove_item(PONG_KEY);
        storage.remove_item(CLICK_SPEED_KEY);
        storage.remove_item(REACTION_KEY);
        *self = Self::new();
        log::info!("All high scores reset");
    }
}
