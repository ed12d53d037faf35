//! Platform abstraction layer
//!
//! The host engine owns the window, the frame loop and input polling. It
//! drives the game through [`FrameHandler`] and hands over an
//! [`InputSnapshot`] each frame.

pub mod input;

pub use input::{ButtonState, InputSnapshot, Key, MouseButton};

/// Per-frame callback contract implemented by the game
pub trait FrameHandler {
    /// Called once before the first frame. Returning `false` aborts startup.
    fn on_create(&mut self) -> bool;

    /// Called once per rendered frame with the seconds since the last one.
    /// Returning `false` stops the loop.
    fn on_update(&mut self, elapsed: f32, input: &InputSnapshot) -> bool;
}
