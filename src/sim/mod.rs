//! Terrain and physics simulation
//!
//! All simulation logic lives here. It is single-threaded and has no
//! rendering or platform dependencies:
//! - Seeded RNG only
//! - Bodies stored in spawn order, removed only at the end of a frame
//! - Fixed sub-step count per frame

pub mod collision;
pub mod explosion;
pub mod noise;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{ProbeResult, probe_terrain, reflect_velocity, respond};
pub use explosion::{blast_impulse, debris_count, trigger};
pub use noise::{NoiseField, NoiseField1D, NoiseField2D};
pub use state::{Body, BodyKind, Reaction, SimEvent, Turn, TurnPhase, World};
pub use terrain::{CellState, Terrain};
pub use tick::{BlastCommand, SpawnCommand, TickInput, step, tick};
