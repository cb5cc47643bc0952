//! Scene assembly
//!
//! Reads a match snapshot and emits every triangle for one frame, back to
//! front. Never mutates the simulation.

use glam::Vec2;
use rand::Rng;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Ball, GameState, Paddle};

const SPARKLE_COUNT: usize = 20;
const CIRCLE_SEGMENTS: u32 = 24;
const GLOW_WIDTH: f32 = 10.0;

/// Build the frame for `state`. Sparkle positions come from `rng`.
pub fn build_scene(state: &GameState, settings: &Settings, rng: &mut impl Rng) -> Vec<Vertex> {
    let canvas = state.canvas;
    let mut vertices = Vec::with_capacity(1024);

    if settings.center_line {
        vertices.extend(shapes::dashed_vline(
            canvas.width / 2.0,
            canvas.height,
            5.0,
            15.0,
            2.0,
            colors::with_alpha(colors::NEON_TEAL, 0.5),
        ));
    }

    if settings.trails {
        vertices.extend(trail(&state.ball));
    }
    vertices.extend(ball(&state.ball, settings.glow));
    vertices.extend(paddle(&state.paddle, settings.glow));

    if settings.sparkles {
        for _ in 0..SPARKLE_COUNT {
            let pos = Vec2::new(
                rng.random_range(0.0..canvas.width),
                rng.random_range(0.0..canvas.height),
            );
            let alpha = rng.random_range(0.0..0.3);
            vertices.extend(shapes::circle(
                pos,
                1.0,
                colors::with_alpha(colors::NEON_TEAL, alpha),
                6,
            ));
        }
    }

    vertices
}

/// Fading circles, faintest at the oldest position
fn trail(ball: &Ball) -> Vec<Vertex> {
    let len = ball.trail.len() as f32;
    let mut vertices = Vec::new();
    for (i, point) in ball.trail.iter().enumerate() {
        let alpha = (i as f32 + 1.0) / len * 0.3;
        vertices.extend(shapes::circle(
            point.pos,
            ball.radius * 0.8,
            colors::with_alpha(colors::NEON_TEAL, alpha),
            CIRCLE_SEGMENTS,
        ));
    }
    vertices
}

fn ball(ball: &Ball, glow: bool) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if glow {
        vertices.extend(shapes::glow_ring(
            ball.pos,
            ball.radius,
            ball.radius + GLOW_WIDTH,
            colors::with_alpha(colors::NEON_TEAL, 0.6),
            CIRCLE_SEGMENTS,
        ));
    }
    vertices.extend(shapes::circle(ball.pos, ball.radius, colors::NEON_BLUE, CIRCLE_SEGMENTS));
    // Highlight offset up-left, like a radial gradient
    vertices.extend(shapes::circle(
        ball.pos - Vec2::splat(ball.radius / 3.0),
        ball.radius * 0.5,
        colors::NEON_TEAL,
        CIRCLE_SEGMENTS / 2,
    ));
    vertices
}

fn paddle(paddle: &Paddle, glow: bool) -> Vec<Vertex> {
    let min = Vec2::new(paddle.x, paddle.y);
    let half = Vec2::new(paddle.width, paddle.height / 2.0);
    let mut vertices = Vec::new();
    if glow {
        vertices.extend(shapes::rect(
            min - Vec2::splat(GLOW_WIDTH / 2.0),
            Vec2::new(paddle.width, paddle.height) + Vec2::splat(GLOW_WIDTH),
            colors::with_alpha(colors::NEON_TEAL, 0.15),
            colors::with_alpha(colors::NEON_TEAL, 0.15),
        ));
    }
    // Teal -> blue -> teal
    vertices.extend(shapes::rect(min, half, colors::NEON_TEAL, colors::NEON_BLUE));
    vertices.extend(shapes::rect(
        min + Vec2::new(0.0, half.y),
        half,
        colors::NEON_BLUE,
        colors::NEON_TEAL,
    ));
    vertices.extend(shapes::rect_outline(
        min,
        Vec2::new(paddle.width, paddle.height),
        2.0,
        colors::NEON_TEAL,
    ));
    vertices
}
