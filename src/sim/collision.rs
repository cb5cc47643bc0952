//! Collision detection and response
//!
//! The play area is a rectangle with three reflecting walls. The bottom edge is
//! open: crossing it ends the match instead of bouncing.

use glam::Vec2;

use super::state::{Ball, Canvas, Paddle};
use crate::sign;
use crate::tuning::Tuning;

/// Walls touched during one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub side: bool,
    pub top: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.side || self.top
    }
}

impl Ball {
    /// Reflect off the left, right and top walls.
    ///
    /// The ball is pulled back inside the wall it crossed so a large step can
    /// never leave it stuck on the far side.
    pub fn resolve_wall_collision(&mut self, canvas: &Canvas) -> WallHits {
        let mut hits = WallHits::default();
        let r = self.radius;

        if self.pos.x - r <= 0.0 || self.pos.x + r >= canvas.width {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(r, (canvas.width - r).max(r));
            hits.side = true;
        }

        if self.pos.y - r <= 0.0 {
            self.vel.y = -self.vel.y;
            self.pos.y = r;
            hits.top = true;
        }

        hits
    }

    /// True once the ball has fully passed the bottom edge
    pub fn is_out_of_bounds(&self, canvas: &Canvas) -> bool {
        self.pos.y - self.radius > canvas.height
    }
}

/// Normalized contact offset along the paddle: -1 (left edge) to 1 (right edge)
pub fn hit_offset(ball: &Ball, paddle: &Paddle) -> f32 {
    ((ball.pos.x - paddle.center()) / paddle.half_width()).clamp(-1.0, 1.0)
}

/// Outgoing angle from vertical for a paddle contact.
///
/// Contact offset picks up to `max_bounce_angle`; a moving paddle adds a fixed
/// nudge in its direction of travel.
pub fn bounce_angle(ball: &Ball, paddle: &Paddle, tuning: &Tuning) -> f32 {
    hit_offset(ball, paddle) * tuning.max_bounce_angle + sign(paddle.dx) * tuning.paddle_nudge
}

/// Velocity for a given bounce angle; always heads up, away from the paddle
pub fn bounce_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball_at(canvas: &Canvas, pos: Vec2, vel: Vec2) -> Ball {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ball = Ball::new(canvas, &Tuning::default(), &mut rng);
        ball.pos = pos;
        ball.vel = vel;
        ball.speed = vel.length();
        ball
    }

    #[test]
    fn test_left_wall_reflects_and_clamps() {
        let canvas = Canvas::new(800.0, 600.0);
        let mut ball = ball_at(&canvas, Vec2::new(-20.0, 300.0), Vec2::new(-5.0, 1.0));
        let hits = ball.resolve_wall_collision(&canvas);
        assert!(hits.side && !hits.top);
        assert_eq!(ball.vel.x, 5.0);
        assert_eq!(ball.pos.x, ball.radius);
    }

    #[test]
    fn test_right_wall_reflects_and_clamps() {
        let canvas = Canvas::new(800.0, 600.0);
        let mut ball = ball_at(&canvas, Vec2::new(850.0, 300.0), Vec2::new(7.0, 1.0));
        ball.resolve_wall_collision(&canvas);
        assert_eq!(ball.vel.x, -7.0);
        assert_eq!(ball.pos.x, 800.0 - ball.radius);
    }

    #[test]
    fn test_top_wall_reflects() {
        let canvas = Canvas::new(800.0, 600.0);
        let mut ball = ball_at(&canvas, Vec2::new(400.0, 2.0), Vec2::new(1.0, -3.0));
        let hits = ball.resolve_wall_collision(&canvas);
        assert!(hits.top && !hits.side);
        assert_eq!(ball.vel.y, 3.0);
        assert_eq!(ball.pos.y, ball.radius);
    }

    #[test]
    fn test_bottom_is_not_reflected() {
        let canvas = Canvas::new(800.0, 600.0);
        let mut ball = ball_at(&canvas, Vec2::new(400.0, 605.0), Vec2::new(0.0, 3.0));
        let hits = ball.resolve_wall_collision(&canvas);
        assert!(!hits.any());
        assert_eq!(ball.vel.y, 3.0);
        assert!(!ball.is_out_of_bounds(&canvas));

        ball.pos.y = 600.0 + ball.radius + 0.5;
        assert!(ball.is_out_of_bounds(&canvas));
    }

    #[test]
    fn test_contained_for_100_frames() {
        let canvas = Canvas::new(800.0, 600.0);
        let mut ball = ball_at(&canvas, Vec2::new(400.0, 300.0), Vec2::new(3.0, -3.0));
        for _ in 0..100 {
            ball.advance();
            ball.resolve_wall_collision(&canvas);
            assert!(!ball.is_out_of_bounds(&canvas));
            assert!(ball.pos.x >= ball.radius && ball.pos.x <= canvas.width - ball.radius);
            assert!(ball.pos.y >= ball.radius && ball.pos.y <= canvas.height);
        }
    }

    #[test]
    fn test_dead_center_bounce_goes_straight_up() {
        let canvas = Canvas::new(800.0, 600.0);
        let tuning = Tuning::default();
        let mut paddle = Paddle::new(&canvas, &tuning);
        paddle.x = 340.0;
        let ball = ball_at(&canvas, Vec2::new(400.0, paddle.y), Vec2::new(0.0, 3.0));

        let angle = bounce_angle(&ball, &paddle, &tuning);
        let vel = bounce_velocity(angle, 3.2);
        assert!(vel.x.abs() < 1e-6);
        assert_eq!(vel.y, -3.2);
    }

    #[test]
    fn test_edge_hit_angle_is_clamped() {
        let canvas = Canvas::new(800.0, 600.0);
        let tuning = Tuning::default();
        let paddle = Paddle::new(&canvas, &tuning);
        // Ball centre beyond the right edge but still overlapping
        let ball = ball_at(&canvas, Vec2::new(paddle.x + paddle.width + 4.0, paddle.y), Vec2::ZERO);
        assert_eq!(hit_offset(&ball, &paddle), 1.0);
        assert!((bounce_angle(&ball, &paddle, &tuning) - tuning.max_bounce_angle).abs() < 1e-6);
    }

    #[test]
    fn test_moving_paddle_nudges_angle() {
        let canvas = Canvas::new(800.0, 600.0);
        let tuning = Tuning::default();
        let mut paddle = Paddle::new(&canvas, &tuning);
        let ball = ball_at(&canvas, Vec2::new(paddle.center(), paddle.y), Vec2::ZERO);

        paddle.dx = -tuning.paddle_speed;
        assert!((bounce_angle(&ball, &paddle, &tuning) + tuning.paddle_nudge).abs() < 1e-6);
        paddle.dx = 2.5;
        assert!((bounce_angle(&ball, &paddle, &tuning) - tuning.paddle_nudge).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_wall_collision_keeps_ball_inside(
            x in -50.0f32..850.0,
            y in -50.0f32..700.0,
            vx in -12.0f32..12.0,
            vy in -12.0f32..12.0,
        ) {
            let canvas = Canvas::new(800.0, 600.0);
            let mut ball = ball_at(&canvas, Vec2::new(x, y), Vec2::new(vx, vy));
            let hits = ball.resolve_wall_collision(&canvas);
            if hits.side {
                prop_assert!(ball.pos.x >= ball.radius);
                prop_assert!(ball.pos.x <= canvas.width - ball.radius);
            }
            if hits.top {
                prop_assert!(ball.pos.y >= ball.radius);
            }
            if hits.any() {
                prop_assert!(ball.pos.x >= ball.radius && ball.pos.x <= canvas.width - ball.radius);
            }
        }

        #[test]
        fn prop_bounce_always_heads_up(angle in -1.5f32..1.5, speed in 0.1f32..12.0) {
            let vel = bounce_velocity(angle, speed);
            prop_assert!(vel.y < 0.0);
            prop_assert!((vel.length() - speed).abs() < 1e-3);
        }
    }
}
