//! World state and body types
//!
//! Everything the simulation mutates lives here: the terrain, the ordered
//! body list, the turn state of the aiming interaction and the per-tick
//! event log.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;

/// Which kind of body this is; decides radius, friction, bounce budget and
/// what happens on the terminal bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// Inert marker, bounces forever
    Dummy,
    /// Explosion fragment, dies after a few bounces
    Debris,
    /// Projectile, dies and explodes on first impact
    Missile,
    /// Player-controlled body, bounces forever with heavy damping
    Worm,
}

impl BodyKind {
    pub fn radius(self) -> f32 {
        match self {
            BodyKind::Dummy => DUMMY_RADIUS,
            BodyKind::Debris => DEBRIS_RADIUS,
            BodyKind::Missile => MISSILE_RADIUS,
            BodyKind::Worm => WORM_RADIUS,
        }
    }

    pub fn friction(self) -> f32 {
        match self {
            BodyKind::Dummy => DUMMY_FRICTION,
            BodyKind::Debris => DEBRIS_FRICTION,
            BodyKind::Missile => MISSILE_FRICTION,
            BodyKind::Worm => WORM_FRICTION,
        }
    }

    /// Collisions tolerated before the terminal reaction; -1 is unlimited
    pub fn bounce_budget(self) -> i32 {
        match self {
            BodyKind::Dummy | BodyKind::Worm => -1,
            BodyKind::Debris => DEBRIS_BOUNCES,
            BodyKind::Missile => 0,
        }
    }
}

/// What the simulation must do after a body's terminal bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    None,
    TriggerLargeExplosion,
}

/// A circular physics body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Accumulated acceleration, cleared every sub-step
    pub acc: Vec2,
    pub radius: f32,
    /// Velocity multiplier applied on every bounce
    pub friction: f32,
    /// Remaining bounces; -1 unlimited, 0 terminal, negative after it fired
    pub bounce_budget: i32,
    /// At rest, skipped by integration until disturbed
    pub stable: bool,
    /// Marked for removal at the end of the frame
    pub dead: bool,
}

impl Body {
    pub fn new(id: u32, kind: BodyKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            radius: kind.radius(),
            friction: kind.friction(),
            bounce_budget: kind.bounce_budget(),
            stable: false,
            dead: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Direction of travel (radians); 0 when at rest
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    /// Overwrite velocity and wake the body up
    pub fn disturb(&mut self, vel: Vec2) {
        self.vel = vel;
        self.stable = false;
    }

    /// Reaction to the bounce that takes the budget to exactly zero
    pub fn on_terminal_bounce(&mut self) -> Reaction {
        match self.kind {
            BodyKind::Dummy | BodyKind::Worm => Reaction::None,
            BodyKind::Debris => {
                self.dead = true;
                Reaction::None
            }
            BodyKind::Missile => {
                self.dead = true;
                Reaction::TriggerLargeExplosion
            }
        }
    }
}

/// Something that happened during the last tick, for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Spawned { id: u32, kind: BodyKind },
    TerminalBounce { id: u32, kind: BodyKind, pos: Vec2 },
    Exploded { center: Vec2, radius: f32, carved: usize, debris: usize },
    Removed { id: u32, kind: BodyKind },
    TurnStarted { worm: u32 },
}

/// Phase of the current player turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Controlled worm is aiming and charging
    Aiming,
    /// A launched missile is still alive
    InFlight { projectile: u32 },
}

/// Aiming/shooting state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Worm currently in control
    pub worm: Option<u32>,
    pub phase: TurnPhase,
    /// Aim direction (radians)
    pub aim_angle: f32,
    /// Launch power in [0, 1]
    pub charge: f32,
}

impl Default for Turn {
    fn default() -> Self {
        Self {
            worm: None,
            phase: TurnPhase::Aiming,
            aim_angle: -std::f32::consts::FRAC_PI_4, // Up and to the right
            charge: 0.0,
        }
    }
}

/// The complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub terrain: Terrain,
    /// Live bodies in spawn order (also draw order)
    pub bodies: Vec<Body>,
    pub turn: Turn,
    /// Events from the most recent tick
    pub events: Vec<SimEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Validate settings and generate terrain from them
    pub fn new(settings: Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let terrain = Terrain::generate(&settings)?;
        Ok(Self::with_terrain(settings, terrain))
    }

    /// World over an existing terrain
    pub fn with_terrain(settings: Settings, terrain: Terrain) -> Self {
        // Different stream from the terrain noise so debris doesn't mirror the hills
        let rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(1));
        Self {
            settings,
            terrain,
            bodies: Vec::new(),
            turn: Turn::default(),
            events: Vec::new(),
            time_ticks: 0,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a body and return its ID
    pub fn spawn(&mut self, kind: BodyKind, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_body_id();
        self.bodies.push(Body::new(id, kind, pos).with_velocity(vel));
        self.events.push(SimEvent::Spawned { id, kind });
        log::debug!("Spawned {:?} #{} at ({:.1}, {:.1})", kind, id, pos.x, pos.y);
        id
    }

    /// Drop a worm onto the terrain surface in column `x`
    pub fn spawn_worm_on_surface(&mut self, x: usize) -> Option<u32> {
        let surface = self.terrain.surface_height(x)?;
        let pos = Vec2::new(x as f32 + 0.5, surface as f32 - WORM_RADIUS - 1.0);
        Some(self.spawn(BodyKind::Worm, pos, Vec2::ZERO))
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// IDs of live worms in spawn order
    pub fn worm_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.bodies
            .iter()
            .filter(|b| b.kind == BodyKind::Worm && !b.dead)
            .map(|b| b.id)
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Remove every dead body in one pass, keeping the order of the rest
    pub fn prune_dead(&mut self) -> usize {
        let before = self.bodies.len();
        for body in self.bodies.iter().filter(|b| b.dead) {
            self.events.push(SimEvent::Removed {
                id: body.id,
                kind: body.kind,
            });
        }
        self.bodies.retain(|b| !b.dead);
        let removed = before - self.bodies.len();
        if removed > 0 {
            log::trace!("Pruned {} dead bodies, {} remain", removed, self.bodies.len());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::CellState;

    fn empty_world() -> World {
        World::with_terrain(Settings::default(), Terrain::new(100, 100).unwrap())
    }

    #[test]
    fn test_kind_defaults() {
        let worm = Body::new(1, BodyKind::Worm, Vec2::ZERO);
        assert_eq!(worm.bounce_budget, -1);
        assert!(worm.friction < Body::new(2, BodyKind::Dummy, Vec2::ZERO).friction);

        let missile = Body::new(3, BodyKind::Missile, Vec2::ZERO);
        assert_eq!(missile.bounce_budget, 0);
        assert!(missile.radius > 0.0);

        let debris = Body::new(4, BodyKind::Debris, Vec2::ZERO);
        assert_eq!(debris.bounce_budget, DEBRIS_BOUNCES);
    }

    #[test]
    fn test_terminal_reactions() {
        let mut dummy = Body::new(1, BodyKind::Dummy, Vec2::ZERO);
        assert_eq!(dummy.on_terminal_bounce(), Reaction::None);
        assert!(!dummy.dead);

        let mut debris = Body::new(2, BodyKind::Debris, Vec2::ZERO);
        assert_eq!(debris.on_terminal_bounce(), Reaction::None);
        assert!(debris.dead);

        let mut missile = Body::new(3, BodyKind::Missile, Vec2::ZERO);
        assert_eq!(missile.on_terminal_bounce(), Reaction::TriggerLargeExplosion);
        assert!(missile.dead);
    }

    #[test]
    fn test_disturb_wakes_body() {
        let mut body = Body::new(1, BodyKind::Dummy, Vec2::ZERO);
        body.stable = true;
        body.disturb(Vec2::new(3.0, -1.0));
        assert!(!body.stable);
        assert_eq!(body.vel, Vec2::new(3.0, -1.0));
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut world = empty_world();
        let a = world.spawn(BodyKind::Dummy, Vec2::new(10.0, 10.0), Vec2::ZERO);
        let b = world.spawn(BodyKind::Worm, Vec2::new(20.0, 10.0), Vec2::ZERO);
        assert_ne!(a, b);
        assert_eq!(world.bodies.len(), 2);
        assert_eq!(world.body(b).unwrap().kind, BodyKind::Worm);
        assert_eq!(world.worm_ids().collect::<Vec<_>>(), vec![b]);
        assert_eq!(world.events.len(), 2);
    }

    #[test]
    fn test_prune_keeps_order() {
        let mut world = empty_world();
        let ids: Vec<u32> = (0..5)
            .map(|i| world.spawn(BodyKind::Dummy, Vec2::new(i as f32, 0.0), Vec2::ZERO))
            .collect();
        world.body_mut(ids[1]).unwrap().dead = true;
        world.body_mut(ids[3]).unwrap().dead = true;

        assert_eq!(world.prune_dead(), 2);
        let remaining: Vec<u32> = world.bodies.iter().map(|b| b.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[4]]);
        assert!(world.events.contains(&SimEvent::Removed {
            id: ids[1],
            kind: BodyKind::Dummy
        }));
    }

    #[test]
    fn test_spawn_worm_on_surface() {
        let mut terrain = Terrain::new(10, 20).unwrap();
        for x in 0..10 {
            for y in 15..20 {
                terrain.set_cell(x, y, CellState::Ground).unwrap();
            }
        }
        let mut world = World::with_terrain(Settings::default(), terrain);
        let id = world.spawn_worm_on_surface(4).unwrap();
        let worm = world.body(id).unwrap();
        assert!(worm.pos.y + worm.radius < 15.0);
        assert!(world.spawn_worm_on_surface(40).is_none());
    }
}
