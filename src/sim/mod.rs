//! Pong simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per call, driven by the host
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{WallHits, bounce_angle, bounce_velocity, hit_offset};
pub use state::{
    Ball, Canvas, Direction, GameState, MatchPhase, Paddle, TRAIL_LENGTH, TrailPoint,
};
pub use tick::{GameEvent, PaddleControl, TickInput, tick};
