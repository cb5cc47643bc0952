//! Timer-driven reflex mini-games
//!
//! Each test owns its timers and reports results as return values. Neither
//! touches the Pong simulation.

pub mod click_speed;
pub mod reaction;

pub use click_speed::{ClickSpeedPhase, ClickSpeedResult, ClickSpeedTest};
pub use reaction::{ReactionOutcome, ReactionPhase, ReactionTest};
