//! Crater - destructible terrain artillery simulation
//!
//! Core modules:
//! - `sim`: Terrain, noise, bodies, collision response and explosions
//! - `settings`: Data-driven simulation parameters
//! - `platform`: Frame callback contract and polled input snapshot
//! - `renderer`: Canvas abstraction the host engine implements
//! - `game`: Aiming/shooting interaction on top of the simulation

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use game::Game;
pub use settings::Settings;

use glam::Vec2;
use rand::Rng;

/// Simulation configuration constants
pub mod consts {
    /// Terrain grid dimensions
    pub const TERRAIN_WIDTH: usize = 800;
    pub const TERRAIN_HEIGHT: usize = 400;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 10.0;
    /// Physics sub-steps per rendered frame
    pub const SUB_STEPS: u32 = 5;

    /// Collision probe rays swept over the leading hemisphere
    pub const PROBE_COUNT: u32 = 9;
    pub const PROBE_SPREAD: f32 = std::f32::consts::PI;

    /// Below this post-bounce speed a body freezes
    pub const REST_SPEED: f32 = 0.1;

    /// Debris bodies spawned per unit of blast radius
    pub const DEBRIS_PER_RADIUS: f32 = 2.0;
    /// Floor on squared distance when computing blast impulse
    pub const IMPULSE_FLOOR: f32 = 0.1;
    /// Blast radius requested by a missile on impact
    pub const MISSILE_BLAST_RADIUS: f32 = 20.0;

    /// Terrain noise defaults
    pub const NOISE_OCTAVES: u32 = 8;
    pub const NOISE_BASE_DROP: f32 = 2.0;
    /// 2D fields look better with a gentler falloff
    pub const NOISE_BASE_DROP_2D: f32 = 1.2;

    /// Body defaults per kind
    pub const DUMMY_RADIUS: f32 = 4.0;
    pub const DUMMY_FRICTION: f32 = 0.8;
    pub const DEBRIS_RADIUS: f32 = 4.0;
    pub const DEBRIS_FRICTION: f32 = 0.8;
    pub const DEBRIS_BOUNCES: i32 = 5;
    pub const MISSILE_RADIUS: f32 = 2.5;
    pub const MISSILE_FRICTION: f32 = 0.5;
    pub const WORM_RADIUS: f32 = 3.5;
    pub const WORM_FRICTION: f32 = 0.2;

    /// Aiming: charge gained per second while fire is held
    pub const CHARGE_RATE: f32 = 0.75;
    /// Missile launch speed at full charge
    pub const MISSILE_MAX_SPEED: f32 = 40.0;
    /// Mouse distance from the screen edge that scrolls the camera
    pub const SCROLL_BORDER: f32 = 50.0;
    /// Camera scroll speed (pixels/s)
    pub const SCROLL_SPEED: f32 = 120.0;
    /// Blast radius of a right click
    pub const CLICK_BLAST_RADIUS: f32 = 10.0;
    /// Worms dropped onto a fresh map
    pub const WORM_COUNT: usize = 4;
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Uniform sample in [0, 1]
#[inline]
pub fn random_unit<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(0.0..=1.0)
}

/// Uniform sample in [-1, 1]
#[inline]
pub fn random_signed<R: Rng>(rng: &mut R) -> f32 {
    random_unit(rng) * 2.0 - 1.0
}
