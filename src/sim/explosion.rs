//! Explosions: crater carving, blast impulse and debris

use glam::Vec2;

use super::state::{BodyKind, SimEvent, World};
use crate::random_signed;

/// Blast velocity for a body at offset `dir` from the epicenter.
///
/// Falls off with distance (`dir / |dir|²`) and scales with `radius²`. The
/// squared distance is floored at `floor` so a body sitting on the epicenter
/// gets a large but finite kick instead of a division by zero.
#[inline]
pub fn blast_impulse(dir: Vec2, radius: f32, floor: f32) -> Vec2 {
    let divisor = dir.length_squared().max(floor);
    dir / divisor * (radius * radius)
}

/// Number of debris fragments thrown out by a blast
#[inline]
pub fn debris_count(radius: f32, per_radius: f32) -> usize {
    (radius * per_radius).round().max(0.0) as usize
}

/// Detonate at `center`: carve the crater, overwrite the velocity of every
/// live body with the blast impulse, then throw out debris.
///
/// Debris spawned here is not affected by its own blast. A non-positive
/// radius does nothing. Returns the number of debris bodies spawned.
pub fn trigger(world: &mut World, center: Vec2, radius: f32) -> usize {
    if !(radius > 0.0) || !center.is_finite() {
        log::debug!("Ignoring explosion with radius {radius} at {center}");
        return 0;
    }

    let carved = world.terrain.carve_circle(center, radius);

    let floor = world.settings.impulse_floor;
    for body in world.bodies.iter_mut().filter(|b| !b.dead) {
        body.disturb(blast_impulse(body.pos - center, radius, floor));
    }

    let count = debris_count(radius, world.settings.debris_per_radius);
    for _ in 0..count {
        let vel = Vec2::new(
            random_signed(world.rng()) * radius * 2.0,
            random_signed(world.rng()) * radius * 2.0,
        );
        world.spawn(BodyKind::Debris, center, vel);
    }

    log::debug!(
        "Explosion at ({:.1}, {:.1}) r={}: carved {} cells, {} debris",
        center.x,
        center.y,
        radius,
        carved,
        count
    );
    world.events.push(SimEvent::Exploded {
        center,
        radius,
        carved,
        debris: count,
    });
    count
}
