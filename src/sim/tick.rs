//! Per-frame simulation tick
//!
//! Applies queued commands, advances the aiming turn, integrates every body
//! over a fixed number of sub-steps and prunes the dead.

use glam::Vec2;

use super::collision::{probe_terrain, respond};
use super::explosion;
use super::state::{BodyKind, Reaction, SimEvent, TurnPhase, World};
use crate::consts::{CHARGE_RATE, MISSILE_MAX_SPEED, MISSILE_RADIUS};
use crate::direction;

/// Request to add a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnCommand {
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Request to detonate at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastCommand {
    pub center: Vec2,
    pub radius: f32,
}

/// Commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub spawns: Vec<SpawnCommand>,
    pub blasts: Vec<BlastCommand>,
    /// World-space point the controlled worm aims at
    pub aim_at: Option<Vec2>,
    /// Fire is held: build up launch power
    pub charging: bool,
    /// Fire was released: launch with the current power
    pub fire: bool,
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    world.events.clear();
    world.time_ticks += 1;

    for spawn in &input.spawns {
        world.spawn(spawn.kind, spawn.pos, spawn.vel);
    }
    for blast in &input.blasts {
        explosion::trigger(world, blast.center, blast.radius);
    }

    update_turn(world, input, dt);

    // Every sub-step integrates over the full frame dt
    for _ in 0..world.settings.sub_steps {
        step(world, dt);
    }

    world.prune_dead();
}

/// One physics sub-step over all awake, living bodies.
///
/// Bodies that leave the map through the bottom or sides are marked dead.
///
/// Explosions requested by terminal bounces go off after every body has
/// moved, and see the body list as it is at that point.
pub fn step(world: &mut World, dt: f32) {
    let gravity = Vec2::new(0.0, world.settings.gravity);
    let probe_count = world.settings.probe_count;
    let probe_spread = world.settings.probe_spread;
    let rest_speed = world.settings.rest_speed;
    let mut blasts: Vec<Vec2> = Vec::new();

    for body in world.bodies.iter_mut() {
        if body.stable || body.dead {
            continue;
        }

        body.acc += gravity;
        body.vel += body.acc * dt;
        let potential = body.pos + body.vel * dt;

        let probe = probe_terrain(
            &world.terrain,
            potential,
            body.radius,
            body.vel,
            probe_count,
            probe_spread,
        );

        if probe.hit {
            if let Some(reaction) = respond(body, probe.response, rest_speed) {
                log::debug!("{:?} #{} terminal bounce: {:?}", body.kind, body.id, reaction);
                world.events.push(SimEvent::TerminalBounce {
                    id: body.id,
                    kind: body.kind,
                    pos: body.pos,
                });
                if reaction == Reaction::TriggerLargeExplosion {
                    blasts.push(body.pos);
                }
            }
        } else {
            body.pos = potential;
        }

        body.acc = Vec2::ZERO;

        if world.terrain.has_left(body.pos, body.radius) {
            log::trace!("{:?} #{} left the map at {}", body.kind, body.id, body.pos);
            body.dead = true;
        }
    }

    let radius = world.settings.missile_blast_radius;
    for center in blasts {
        explosion::trigger(world, center, radius);
    }
}

/// Aim, charge and fire for the controlled worm; hand over the turn once
/// the launched missile is gone
fn update_turn(world: &mut World, input: &TickInput, dt: f32) {
    if let TurnPhase::InFlight { projectile } = world.turn.phase {
        if world.body(projectile).is_some() {
            return;
        }
        advance_turn(world);
    }

    let worm = world
        .turn
        .worm
        .and_then(|id| world.body(id))
        .filter(|b| !b.dead)
        .map(|b| (b.pos, b.radius));
    let (worm_pos, worm_radius) = match worm {
        Some(worm) => worm,
        None => {
            advance_turn(world);
            match world.turn.worm.and_then(|id| world.body(id)) {
                Some(b) => (b.pos, b.radius),
                None => return,
            }
        }
    };

    if let Some(target) = input.aim_at {
        let to_target = target - worm_pos;
        if to_target.length_squared() > f32::EPSILON {
            world.turn.aim_angle = to_target.y.atan2(to_target.x);
        }
    }

    if input.charging {
        world.turn.charge = (world.turn.charge + CHARGE_RATE * dt).min(1.0);
    }

    if input.fire && world.turn.charge > 0.0 {
        let dir = direction(world.turn.aim_angle);
        let origin = worm_pos + dir * (worm_radius + MISSILE_RADIUS + 1.0);
        let vel = dir * world.turn.charge * MISSILE_MAX_SPEED;
        let id = world.spawn(BodyKind::Missile, origin, vel);
        log::info!(
            "Worm #{} fired missile #{} at {:.2} rad, power {:.2}",
            world.turn.worm.unwrap_or_default(),
            id,
            world.turn.aim_angle,
            world.turn.charge
        );
        world.turn.phase = TurnPhase::InFlight { projectile: id };
        world.turn.charge = 0.0;
    }
}

/// Give control to the next living worm after the current one (by ID, wrapping)
fn advance_turn(world: &mut World) {
    let worms: Vec<u32> = world.worm_ids().collect();
    let next = world
        .turn
        .worm
        .and_then(|current| worms.iter().copied().find(|&id| id > current))
        .or_else(|| worms.iter().copied().min());

    world.turn.worm = next;
    world.turn.phase = TurnPhase::Aiming;
    world.turn.charge = 0.0;
    if let Some(worm) = next {
        log::info!("Turn passes to worm #{}", worm);
        world.events.push(SimEvent::TurnStarted { worm });
    }
}
