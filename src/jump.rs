//! Jump buffering.
//!
//! A press is remembered for `buffer_time` seconds. If the character is on the
//! ground (coyote time included) at any step inside that window, the jump is
//! honoured and the press is consumed.

use bevy::prelude::*;

use crate::adhesion::within_window;

/// Where the jump input currently is in its lifecycle.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    /// No usable press.
    #[default]
    Idle,
    /// A press is waiting for ground.
    Buffered,
    /// The last press launched a jump.
    Consumed,
}

/// Jump input buffer.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct JumpBuffer {
    last_input_time: f32,
    consumed: bool,
}

impl Default for JumpBuffer {
    fn default() -> Self {
        Self {
            last_input_time: f32::NEG_INFINITY,
            consumed: false,
        }
    }
}

impl JumpBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a jump press. A fresh press always re-arms the buffer.
    pub fn press(&mut self, now: f32) {
        self.last_input_time = now;
        self.consumed = false;
    }

    /// Time of the last unconsumed press, or negative infinity.
    pub fn last_input_time(&self) -> f32 {
        self.last_input_time
    }

    /// Whether a press is still inside the buffer window.
    pub fn is_buffered(&self, now: f32, buffer_time: f32) -> bool {
        self.last_input_time.is_finite() && within_window(now - self.last_input_time, buffer_time)
    }

    /// Current lifecycle state.
    pub fn state(&self, now: f32, buffer_time: f32) -> JumpState {
        if self.consumed {
            JumpState::Consumed
        } else if self.is_buffered(now, buffer_time) {
            JumpState::Buffered
        } else {
            JumpState::Idle
        }
    }

    /// Honour a buffered press if the character is on the ground.
    ///
    /// On success the press is consumed; the caller must also release the
    /// ground contact so the same press cannot launch twice.
    pub fn try_consume(&mut self, on_ground: bool, now: f32, buffer_time: f32) -> bool {
        if !on_ground || !self.is_buffered(now, buffer_time) {
            return false;
        }
        self.last_input_time = f32::NEG_INFINITY;
        self.consumed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let buffer = JumpBuffer::new();
        assert_eq!(buffer.state(0.0, 0.1), JumpState::Idle);
        assert_eq!(buffer.last_input_time(), f32::NEG_INFINITY);
    }

    #[test]
    fn press_buffers_until_window_elapses() {
        let mut buffer = JumpBuffer::new();
        buffer.press(1.0);

        assert_eq!(buffer.state(1.0, 0.1), JumpState::Buffered);
        assert_eq!(buffer.state(1.05, 0.1), JumpState::Buffered);
        assert_eq!(buffer.state(1.2, 0.1), JumpState::Idle);
    }

    #[test]
    fn landing_inside_buffer_honours_jump() {
        let mut buffer = JumpBuffer::new();
        let t0 = 1.0;
        buffer.press(t0);

        // Airborne for a few steps
        assert!(!buffer.try_consume(false, t0 + 0.02, 0.1));
        assert!(!buffer.try_consume(false, t0 + 0.04, 0.1));
        // Ground at +0.05
        assert!(buffer.try_consume(true, t0 + 0.05, 0.1));
        assert_eq!(buffer.state(t0 + 0.05, 0.1), JumpState::Consumed);
    }

    #[test]
    fn landing_after_buffer_drops_jump() {
        let mut buffer = JumpBuffer::new();
        let t0 = 1.0;
        buffer.press(t0);

        assert!(!buffer.try_consume(true, t0 + 0.2, 0.1));
        assert_eq!(buffer.state(t0 + 0.2, 0.1), JumpState::Idle);
    }

    #[test]
    fn single_press_launches_once() {
        let mut buffer = JumpBuffer::new();
        buffer.press(0.0);

        assert!(buffer.try_consume(true, 0.0, 0.1));
        assert!(!buffer.try_consume(true, 1.0 / 60.0, 0.1));
        assert!(!buffer.try_consume(true, 2.0 / 60.0, 0.1));
    }

    #[test]
    fn fresh_press_rearms_after_consumption() {
        let mut buffer = JumpBuffer::new();
        buffer.press(0.0);
        assert!(buffer.try_consume(true, 0.0, 0.1));

        buffer.press(0.5);
        assert_eq!(buffer.state(0.5, 0.1), JumpState::Buffered);
        assert!(buffer.try_consume(true, 0.55, 0.1));
    }

    #[test]
    fn fresh_press_restarts_window() {
        let mut buffer = JumpBuffer::new();
        buffer.press(0.0);
        buffer.press(0.08);
        // Window now runs from the second press
        assert!(buffer.try_consume(true, 0.15, 0.1));
    }

    #[test]
    fn zero_buffer_only_honours_same_step() {
        let mut buffer = JumpBuffer::new();
        buffer.press(2.0);
        assert!(!buffer.try_consume(true, 2.01, 0.0));

        buffer.press(3.0);
        assert!(buffer.try_consume(true, 3.0, 0.0));
    }
}
