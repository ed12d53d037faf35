//! Rendering interface
//!
//! The host engine implements [`Canvas`]; the simulation only describes what
//! to draw. Sprites are owned by the host and registered per body kind.

pub mod scene;

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::BodyKind;

pub use scene::{draw_aim, draw_body, draw_bodies, draw_terrain};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const SKY: Self = Self::rgb(0, 0, 255);
    pub const GROUND: Self = Self::rgb(0, 255, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const DARK_GREEN: Self = Self::rgb(0, 128, 0);
    pub const GREY: Self = Self::rgb(192, 192, 192);
}

/// Wireframe color for a body kind
pub fn body_color(kind: BodyKind) -> Color {
    match kind {
        BodyKind::Dummy => Color::WHITE,
        BodyKind::Debris => Color::DARK_GREEN,
        BodyKind::Missile => Color::YELLOW,
        BodyKind::Worm => Color::GREY,
    }
}

/// Drawing surface provided by the host engine. Coordinates are screen pixels.
pub trait Canvas {
    /// Host-side sprite handle
    type Sprite;

    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn draw_circle_outline(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn draw_rotated_sprite(&mut self, sprite: &Self::Sprite, center: Vec2, angle: f32, scale: f32);
}

/// Sprites keyed by body kind
#[derive(Debug, Clone)]
pub struct SpriteRegistry<S> {
    sprites: HashMap<BodyKind, S>,
}

impl<S> Default for SpriteRegistry<S> {
    fn default() -> Self {
        Self {
            sprites: HashMap::new(),
        }
    }
}

impl<S> SpriteRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the sprite for a kind
    pub fn insert(&mut self, kind: BodyKind, sprite: S) -> Option<S> {
        self.sprites.insert(kind, sprite)
    }

    pub fn get(&self, kind: BodyKind) -> Option<&S> {
        self.sprites.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
