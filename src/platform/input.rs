//! Polled input state
//!
//! A snapshot of the mouse and keyboard as the host saw them this frame.
//! Edge states (`pressed`/`released`) are true only on the frame the
//! transition happened.

use std::collections::HashMap;

use glam::Vec2;

/// Edge and level state of one button or key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Went down this frame
    pub pressed: bool,
    /// Is down
    pub held: bool,
    /// Went up this frame
    pub released: bool,
}

impl ButtonState {
    pub const UP: Self = Self {
        pressed: false,
        held: false,
        released: false,
    };

    pub const PRESSED: Self = Self {
        pressed: true,
        held: true,
        released: false,
    };

    pub const HELD: Self = Self {
        pressed: false,
        held: true,
        released: false,
    };

    pub const RELEASED: Self = Self {
        pressed: false,
        held: false,
        released: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    W,
    Escape,
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Mouse position in screen pixels
    pub mouse: Vec2,
    buttons: HashMap<MouseButton, ButtonState>,
    keys: HashMap<Key, ButtonState>,
}

impl InputSnapshot {
    pub fn new(mouse: Vec2) -> Self {
        Self {
            mouse,
            ..Default::default()
        }
    }

    pub fn with_button(mut self, button: MouseButton, state: ButtonState) -> Self {
        self.set_button(button, state);
        self
    }

    pub fn with_key(mut self, key: Key, state: ButtonState) -> Self {
        self.set_key(key, state);
        self
    }

    pub fn set_button(&mut self, button: MouseButton, state: ButtonState) {
        self.buttons.insert(button, state);
    }

    pub fn set_key(&mut self, key: Key, state: ButtonState) {
        self.keys.insert(key, state);
    }

    pub fn button(&self, button: MouseButton) -> ButtonState {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    pub fn key(&self, key: Key) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }
}
