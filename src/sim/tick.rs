//! Per-frame simulation tick
//!
//! One call advances a running match by exactly one reference frame.

use super::collision::{bounce_angle, bounce_velocity};
use super::state::{Direction, GameState, MatchPhase};

/// Which input source steers the paddle this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleControl {
    /// Discrete keyboard intent
    Keys(Direction),
    /// Pointer x in canvas pixels (may lie outside the canvas)
    Pointer(f32),
}

impl Default for PaddleControl {
    fn default() -> Self {
        PaddleControl::Keys(Direction::None)
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub paddle: PaddleControl,
}

/// Things that happened during a tick, for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PaddleHit { score: u64 },
    MatchEnded { score: u64 },
}

/// Advance the match by one frame. Does nothing unless the match is running.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != MatchPhase::Running {
        return events;
    }
    state.time_ticks += 1;

    // Paddle first so the collision check sees this frame's motion
    match input.paddle {
        PaddleControl::Pointer(x) => state.paddle.set_position_from_pointer(x, &state.canvas),
        PaddleControl::Keys(direction) => {
            state.paddle.set_intent(direction);
            state.paddle.advance(&state.canvas);
        }
    }

    state.ball.advance();
    let walls = state.ball.resolve_wall_collision(&state.canvas);
    if walls.any() {
        log::trace!("Wall bounce {:?} at {}", walls, state.ball.pos);
    }

    // Only a descending ball can be returned; a ball already leaving the
    // paddle must not score again on the following frames.
    if state.ball.vel.y > 0.0 && state.paddle.intersects(&state.ball) {
        let angle = bounce_angle(&state.ball, &state.paddle, &state.tuning);
        state.ball.apply_speed_increase(&state.tuning);
        state.ball.vel = bounce_velocity(angle, state.ball.speed);
        state.score += state.tuning.score_per_hit;
        state.hits += 1;
        log::debug!(
            "Paddle hit #{} at angle {:.3} rad, speed {:.2}",
            state.hits,
            angle,
            state.ball.speed
        );
        events.push(GameEvent::PaddleHit { score: state.score });
    }

    if state.ball.is_out_of_bounds(&state.canvas) {
        state.phase = MatchPhase::Ended;
        log::info!("Match over: score {} after {} hits", state.score, state.hits);
        events.push(GameEvent::MatchEnded { score: state.score });
    }

    events
}
