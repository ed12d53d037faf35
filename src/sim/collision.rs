//! Terrain collision detection and response
//!
//! Grid terrain has no surface geometry, so the surface normal is estimated:
//! rays are cast from the body's next position across the hemisphere facing
//! its direction of travel, and the offsets of every ray that lands in ground
//! are summed. The negated sum points away from the terrain.

use glam::Vec2;

use super::state::{Body, Reaction};
use super::terrain::{CellState, Terrain};
use crate::direction;

/// Result of a probe sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    /// At least one probe landed in ground
    pub hit: bool,
    /// Sum of the offsets (probe point minus center) of all hitting probes
    pub response: Vec2,
    /// Number of hitting probes
    pub hits: u32,
}

impl ProbeResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            response: Vec2::ZERO,
            hits: 0,
        }
    }
}

/// Angle of probe `i` of `count`, spread evenly across `spread` centered on `heading`
#[inline]
fn probe_angle(heading: f32, spread: f32, i: u32, count: u32) -> f32 {
    if count <= 1 {
        return heading;
    }
    heading - spread / 2.0 + spread * i as f32 / (count - 1) as f32
}

/// Sweep `count` rays of length `radius` from `center` over the leading
/// hemisphere of `velocity`. Probes off the grid are skipped.
pub fn probe_terrain(
    terrain: &Terrain,
    center: Vec2,
    radius: f32,
    velocity: Vec2,
    count: u32,
    spread: f32,
) -> ProbeResult {
    let heading = velocity.y.atan2(velocity.x);
    let mut result = ProbeResult::miss();

    for i in 0..count {
        let offset = direction(probe_angle(heading, spread, i, count)) * radius;
        if terrain.probe(center + offset) == Some(CellState::Ground) {
            result.hit = true;
            result.hits += 1;
            result.response += offset;
        }
    }
    result
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce `body` off the surface described by a probe `response`.
///
/// Reflects and damps the velocity, freezes the body below `rest_speed` and
/// spends one bounce. Returns the body's reaction if this bounce was its
/// terminal one. The budget is pushed below zero afterwards so the reaction
/// can only fire once.
pub fn respond(body: &mut Body, response: Vec2, rest_speed: f32) -> Option<Reaction> {
    // A response that sums to zero has no usable normal; only friction applies
    let normal = (-response).normalize_or_zero();
    body.vel = reflect_velocity(body.vel, normal) * body.friction;

    if body.vel.length() < rest_speed {
        body.vel = Vec2::ZERO;
        body.stable = true;
    }

    if body.bounce_budget > 0 {
        body.bounce_budget -= 1;
        None
    } else if body.bounce_budget == 0 {
        let reaction = body.on_terminal_bounce();
        body.bounce_budget -= 1;
        Some(reaction)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BodyKind;
    use std::f32::consts::PI;

    /// Ground everywhere below row `floor`
    fn floor_terrain(floor: i32) -> Terrain {
        let mut terrain = Terrain::new(64, 64).unwrap();
        for y in floor..64 {
            for x in 0..64 {
                terrain.set_cell(x, y, CellState::Ground).unwrap();
            }
        }
        terrain
    }

    #[test]
    fn test_probe_angles_cover_hemisphere() {
        let angles: Vec<f32> = (0..9).map(|i| probe_angle(0.0, PI, i, 9)).collect();
        assert!((angles[0] + PI / 2.0).abs() < 1e-6);
        assert!((angles[8] - PI / 2.0).abs() < 1e-6);
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - PI / 8.0).abs() < 1e-6);
        }
        assert_eq!(probe_angle(1.25, PI, 0, 1), 1.25);
    }

    #[test]
    fn test_probe_detects_floor_below() {
        let terrain = floor_terrain(40);
        let result = probe_terrain(&terrain, Vec2::new(32.0, 37.0), 4.0, Vec2::new(0.0, 5.0), 9, PI);
        assert!(result.hit);
        // Floor is below, so the summed offsets point down
        assert!(result.response.y > 0.0);
        assert!(result.response.x.abs() < 1e-4);
    }

    #[test]
    fn test_probe_ignores_terrain_behind() {
        let terrain = floor_terrain(40);
        // Same spot but moving up, away from the floor
        let result = probe_terrain(&terrain, Vec2::new(32.0, 37.0), 4.0, Vec2::new(0.0, -5.0), 9, PI);
        assert!(!result.hit);
        assert_eq!(result.response, Vec2::ZERO);
    }

    #[test]
    fn test_probe_skips_out_of_bounds() {
        let terrain = floor_terrain(40);
        let result = probe_terrain(&terrain, Vec2::new(-20.0, -20.0), 4.0, Vec2::new(1.0, 1.0), 9, PI);
        assert_eq!(result, ProbeResult::miss());
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(3.0, 4.0), Vec2::new(0.0, -1.0));
        assert!((reflected - Vec2::new(3.0, -4.0)).length() < 1e-6);
    }

    #[test]
    fn test_respond_bounces_and_damps() {
        let mut body = Body::new(1, BodyKind::Dummy, Vec2::ZERO).with_velocity(Vec2::new(0.0, 10.0));
        let reaction = respond(&mut body, Vec2::new(0.0, 4.0), 0.1);
        assert_eq!(reaction, None);
        assert!((body.vel - Vec2::new(0.0, -8.0)).length() < 1e-5);
        assert!(!body.stable);
        assert_eq!(body.bounce_budget, -1);
    }

    #[test]
    fn test_rest_threshold_freezes_slow_body() {
        let mut body = Body::new(1, BodyKind::Dummy, Vec2::ZERO).with_velocity(Vec2::new(0.0, 0.05));
        body.friction = 1.0;
        respond(&mut body, Vec2::new(0.0, 1.0), 0.1);
        assert!(body.stable);
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_rest_threshold_keeps_faster_body_moving() {
        let mut body = Body::new(1, BodyKind::Dummy, Vec2::ZERO).with_velocity(Vec2::new(0.0, 0.2));
        body.friction = 1.0;
        respond(&mut body, Vec2::new(0.0, 1.0), 0.1);
        assert!(!body.stable);
        assert!((body.vel.length() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_response_does_not_produce_nan() {
        let mut body = Body::new(1, BodyKind::Dummy, Vec2::ZERO).with_velocity(Vec2::new(5.0, 0.0));
        respond(&mut body, Vec2::ZERO, 0.1);
        assert!(body.vel.is_finite());
        assert!((body.vel - Vec2::new(4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_terminal_reaction_fires_exactly_once() {
        let mut body = Body::new(1, BodyKind::Debris, Vec2::ZERO).with_velocity(Vec2::new(0.0, 50.0));
        let mut fired = 0;
        let mut last_budget = body.bounce_budget;
        for _ in 0..20 {
            body.vel = Vec2::new(0.0, 50.0);
            if respond(&mut body, Vec2::new(0.0, 1.0), 0.1).is_some() {
                fired += 1;
            }
            assert!(body.bounce_budget <= last_budget);
            last_budget = body.bounce_budget;
        }
        assert_eq!(fired, 1);
        assert!(body.dead);
    }

    #[test]
    fn test_missile_requests_explosion_on_first_impact() {
        let mut body = Body::new(1, BodyKind::Missile, Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0));
        let reaction = respond(&mut body, Vec2::new(1.0, 0.0), 0.1);
        assert_eq!(reaction, Some(Reaction::TriggerLargeExplosion));
        assert!(body.dead);
        assert_eq!(body.bounce_budget, -1);
        assert_eq!(respond(&mut body, Vec2::new(1.0, 0.0), 0.1), None);
    }
}
