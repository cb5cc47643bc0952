//! Input state tracking
//!
//! Collects raw keyboard and pointer events between frames and resolves them
//! into one paddle control per tick. Once a pointer has moved during a match
//! it stays authoritative until the next restart.

use crate::sim::{Direction, PaddleControl};

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    pointer_x: Option<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left(&mut self, pressed: bool) {
        self.left = pressed;
    }

    pub fn set_right(&mut self, pressed: bool) {
        self.right = pressed;
    }

    /// Record a pointer position in canvas pixels
    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn pointer_active(&self) -> bool {
        self.pointer_x.is_some()
    }

    /// Hand steering back to the keyboard (new match)
    pub fn reset_pointer(&mut self) {
        self.pointer_x = None;
    }

    /// Keyboard direction; right wins when both keys are held
    pub fn direction(&self) -> Direction {
        if self.right {
            Direction::Right
        } else if self.left {
            Direction::Left
        } else {
            Direction::None
        }
    }

    pub fn paddle_control(&self) -> PaddleControl {
        match self.pointer_x {
            Some(x) => PaddleControl::Pointer(x),
            None => PaddleControl::Keys(self.direction()),
        }
    }
}

/// Map a client-space pointer x onto the canvas.
///
/// Positions left or right of the canvas snap to its edges so the paddle can
/// still be driven while the pointer is outside the play surface.
pub fn pointer_from_client(client_x: f32, rect_left: f32, rect_right: f32, canvas_width: f32) -> f32 {
    if client_x < rect_left {
        0.0
    } else if client_x > rect_right {
        canvas_width
    } else {
        client_x - rect_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_resolve_direction() {
        let mut input = InputState::new();
        assert_eq!(input.paddle_control(), PaddleControl::Keys(Direction::None));
        input.set_left(true);
        assert_eq!(input.paddle_control(), PaddleControl::Keys(Direction::Left));
        input.set_right(true);
        assert_eq!(input.direction(), Direction::Right);
        input.set_right(false);
        input.set_left(false);
        assert_eq!(input.direction(), Direction::None);
    }

    #[test]
    fn test_pointer_wins_until_reset() {
        let mut input = InputState::new();
        input.set_left(true);
        input.pointer_moved(321.0);
        assert_eq!(input.paddle_control(), PaddleControl::Pointer(321.0));
        input.reset_pointer();
        assert_eq!(input.paddle_control(), PaddleControl::Keys(Direction::Left));
    }

    #[test]
    fn test_pointer_from_client_snaps_to_edges() {
        assert_eq!(pointer_from_client(50.0, 100.0, 900.0, 800.0), 0.0);
        assert_eq!(pointer_from_client(950.0, 100.0, 900.0, 800.0), 800.0);
        assert_eq!(pointer_from_client(500.0, 100.0, 900.0, 800.0), 400.0);
    }
}
