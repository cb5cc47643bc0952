//! Game state and core simulation types
//!
//! Everything the physics loop reads or writes lives in `GameState`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the player to start
    Idle,
    /// Active gameplay
    Running,
    /// Match is paused
    Paused,
    /// Ball left through the bottom edge
    Ended,
}

/// Play area size in canvas pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(crate::consts::CANVAS_WIDTH, crate::consts::CANVAS_HEIGHT)
    }
}

/// Paddle steering intent from discrete input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
}

/// Number of past positions kept for the trail
pub const TRAIL_LENGTH: usize = 5;

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Speed magnitude; velocity is rebuilt from this on every speed change
    pub speed: f32,
    pub radius: f32,
    /// Recent positions, oldest first
    #[serde(skip)]
    pub trail: VecDeque<TrailPoint>,
}

impl Ball {
    pub fn new(canvas: &Canvas, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            speed: 0.0,
            radius: tuning.ball_radius,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        };
        ball.reset(canvas, tuning, rng);
        ball
    }

    /// Centre the ball and serve it upward, randomly left or right
    pub fn reset(&mut self, canvas: &Canvas, tuning: &Tuning, rng: &mut impl Rng) {
        self.pos = canvas.center();
        self.speed = tuning.initial_ball_speed;
        let horizontal = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(horizontal * self.speed, -self.speed);
        self.radius = tuning.ball_radius;
        self.clear_trail();
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint { pos: self.pos });
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Move one tick along the current velocity
    pub fn advance(&mut self) {
        self.record_trail();
        self.pos += self.vel;
    }

    /// Raise speed by one increment (capped) while keeping the heading
    pub fn apply_speed_increase(&mut self, tuning: &Tuning) {
        self.speed = (self.speed + tuning.ball_speed_increase).min(tuning.max_ball_speed);
        let angle = self.vel.y.atan2(self.vel.x);
        self.vel = Vec2::new(angle.cos(), angle.sin()) * self.speed;
    }

    /// Current heading, `atan2(dy, dx)`
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed during a match)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Keyboard speed in pixels per tick
    pub speed: f32,
    /// Horizontal velocity this tick
    pub dx: f32,
}

impl Paddle {
    pub fn new(canvas: &Canvas, tuning: &Tuning) -> Self {
        let mut paddle = Self {
            x: 0.0,
            y: 0.0,
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            speed: tuning.paddle_speed,
            dx: 0.0,
        };
        paddle.reset(canvas, tuning);
        paddle
    }

    /// Centre horizontally at the fixed baseline, stationary
    pub fn reset(&mut self, canvas: &Canvas, tuning: &Tuning) {
        self.width = tuning.paddle_width;
        self.height = tuning.paddle_height;
        self.speed = tuning.paddle_speed;
        self.x = canvas.width / 2.0 - self.width / 2.0;
        self.y = canvas.height - tuning.paddle_bottom_offset;
        self.dx = 0.0;
    }

    pub fn set_intent(&mut self, direction: Direction) {
        self.dx = match direction {
            Direction::Left => -self.speed,
            Direction::Right => self.speed,
            Direction::None => 0.0,
        };
    }

    /// Apply velocity and keep the paddle inside the play area
    pub fn advance(&mut self, canvas: &Canvas) {
        self.x = self.clamp_x(self.x + self.dx, canvas);
    }

    /// Centre the paddle on a pointer, even one reported outside the canvas.
    ///
    /// `dx` becomes the distance travelled, so bounce nudges see pointer motion.
    pub fn set_position_from_pointer(&mut self, pointer_x: f32, canvas: &Canvas) {
        let pointer_x = pointer_x.clamp(0.0, canvas.width);
        let new_x = self.clamp_x(pointer_x - self.width / 2.0, canvas);
        self.dx = new_x - self.x;
        self.x = new_x;
    }

    fn clamp_x(&self, x: f32, canvas: &Canvas) -> f32 {
        x.clamp(0.0, (canvas.width - self.width).max(0.0))
    }

    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Strict overlap between the ball's bounding square and the paddle
    pub fn intersects(&self, ball: &Ball) -> bool {
        ball.pos.x + ball.radius > self.x
            && ball.pos.x - ball.radius < self.x + self.width
            && ball.pos.y + ball.radius > self.y
            && ball.pos.y - ball.radius < self.y + self.height
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub canvas: Canvas,
    pub tuning: Tuning,
    pub phase: MatchPhase,
    pub score: u64,
    /// Paddle hits this match
    pub hits: u32,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    pub ball: Ball,
    pub paddle: Paddle,
    rng: Pcg32,
}

impl GameState {
    /// Create a new match waiting to start
    pub fn new(canvas: Canvas, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::new(&canvas, &tuning, &mut rng);
        let paddle = Paddle::new(&canvas, &tuning);
        Self {
            seed,
            canvas,
            tuning,
            phase: MatchPhase::Idle,
            score: 0,
            hits: 0,
            time_ticks: 0,
            ball,
            paddle,
            rng,
        }
    }

    /// Idle -> Running. Returns false if the match was not idle.
    pub fn start(&mut self) -> bool {
        if self.phase != MatchPhase::Idle {
            return false;
        }
        self.phase = MatchPhase::Running;
        log::info!("Match started");
        true
    }

    /// Running <-> Paused
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            MatchPhase::Running => MatchPhase::Paused,
            MatchPhase::Paused => MatchPhase::Running,
            other => other,
        };
    }

    /// Fresh ball and paddle, zero score, back to Idle
    pub fn restart(&mut self) {
        self.ball.reset(&self.canvas, &self.tuning, &mut self.rng);
        self.paddle.reset(&self.canvas, &self.tuning);
        self.score = 0;
        self.hits = 0;
        self.time_ticks = 0;
        self.phase = MatchPhase::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }
}
