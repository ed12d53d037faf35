//! Drawing the world onto a canvas
//!
//! `camera` is the world-space position of the canvas's top-left pixel.

use glam::Vec2;

use super::{Canvas, Color, SpriteRegistry, body_color};
use crate::direction;
use crate::sim::{Body, BodyKind, CellState, Terrain, TurnPhase, World};

/// Distance of the crosshair from the aiming worm
const CROSSHAIR_DISTANCE: f32 = 8.0;
/// Extra length of the power line at full charge
const CHARGE_LINE_LENGTH: f32 = 12.0;

/// Paint the visible window of the terrain one pixel per cell
pub fn draw_terrain<C: Canvas>(canvas: &mut C, terrain: &Terrain, camera: Vec2) {
    let (cam_x, cam_y) = (camera.x.floor() as i64, camera.y.floor() as i64);
    let (width, height) = (terrain.width() as i64, terrain.height() as i64);

    // Clip the screen rectangle to the grid
    let x0 = cam_x.max(0);
    let y0 = cam_y.max(0);
    let x1 = (cam_x + canvas.width() as i64).min(width);
    let y1 = (cam_y + canvas.height() as i64).min(height);

    let cells = terrain.cells();
    for y in y0..y1 {
        for x in x0..x1 {
            let color = match cells[(y * width + x) as usize] {
                CellState::Sky => Color::SKY,
                CellState::Ground => Color::GROUND,
            };
            canvas.draw_pixel((x - cam_x) as i32, (y - cam_y) as i32, color);
        }
    }
}

/// Draw one body: its registered sprite turned to face the direction of
/// travel, or a wireframe circle with a heading line
pub fn draw_body<C: Canvas>(
    canvas: &mut C,
    body: &Body,
    camera: Vec2,
    sprites: &SpriteRegistry<C::Sprite>,
) {
    let center = body.pos - camera;
    // Worms stay upright; everything else points where it's going
    let angle = match body.kind {
        BodyKind::Worm => 0.0,
        _ => body.heading(),
    };

    match sprites.get(body.kind) {
        Some(sprite) => canvas.draw_rotated_sprite(sprite, center, angle, 1.0),
        None => {
            let color = body_color(body.kind);
            canvas.draw_circle_outline(center, body.radius, color);
            canvas.draw_line(center, center + direction(angle) * body.radius, color);
        }
    }
}

/// Draw every live body in collection order
pub fn draw_bodies<C: Canvas>(
    canvas: &mut C,
    bodies: &[Body],
    camera: Vec2,
    sprites: &SpriteRegistry<C::Sprite>,
) {
    for body in bodies.iter().filter(|b| !b.dead) {
        draw_body(canvas, body, camera, sprites);
    }
}

/// Crosshair and power line for the worm whose turn it is
pub fn draw_aim<C: Canvas>(canvas: &mut C, world: &World, camera: Vec2) {
    if world.turn.phase != TurnPhase::Aiming {
        return;
    }
    let Some(worm) = world.turn.worm.and_then(|id| world.body(id)) else {
        return;
    };

    let center = worm.pos - camera;
    let dir = direction(world.turn.aim_angle);
    canvas.draw_circle_outline(center + dir * CROSSHAIR_DISTANCE, 1.5, Color::RED);
    if world.turn.charge > 0.0 {
        let tip = center + dir * (worm.radius + CHARGE_LINE_LENGTH * world.turn.charge);
        canvas.draw_line(center + dir * worm.radius, tip, Color::YELLOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_canvas::{DrawCall, RecordingCanvas};
    use crate::settings::Settings;

    fn small_terrain() -> Terrain {
        let mut terrain = Terrain::new(8, 6).unwrap();
        for x in 0..8 {
            terrain.set_cell(x, 5, CellState::Ground).unwrap();
        }
        terrain
    }

    #[test]
    fn test_terrain_pixels_match_cells() {
        let terrain = small_terrain();
        let mut canvas = RecordingCanvas::new(8, 6);
        draw_terrain(&mut canvas, &terrain, Vec2::ZERO);

        let pixels: Vec<_> = canvas.pixels().collect();
        assert_eq!(pixels.len(), 48);
        assert!(pixels.contains(&(3, 5, Color::GROUND)));
        assert!(pixels.contains(&(3, 4, Color::SKY)));
    }

    #[test]
    fn test_terrain_draw_is_clipped_to_grid() {
        let terrain = small_terrain();
        let mut canvas = RecordingCanvas::new(4, 4);
        // Window hangs off the bottom-right corner
        draw_terrain(&mut canvas, &terrain, Vec2::new(6.0, 4.0));
        let pixels: Vec<_> = canvas.pixels().collect();
        assert_eq!(pixels.len(), 4);
        assert!(pixels.contains(&(0, 1, Color::GROUND)));

        let mut off_grid = RecordingCanvas::new(4, 4);
        draw_terrain(&mut off_grid, &terrain, Vec2::new(-100.0, -100.0));
        assert!(off_grid.calls.is_empty());
    }

    #[test]
    fn test_body_without_sprite_is_wireframe() {
        let body = Body::new(1, BodyKind::Dummy, Vec2::new(10.0, 10.0)).with_velocity(Vec2::new(1.0, 0.0));
        let mut canvas = RecordingCanvas::new(32, 32);
        draw_body(&mut canvas, &body, Vec2::new(5.0, 5.0), &SpriteRegistry::new());

        assert_eq!(
            canvas.calls[0],
            DrawCall::Circle(Vec2::new(5.0, 5.0), body.radius, Color::WHITE)
        );
        assert_eq!(
            canvas.calls[1],
            DrawCall::Line(Vec2::new(5.0, 5.0), Vec2::new(9.0, 5.0), Color::WHITE)
        );
    }

    #[test]
    fn test_registered_sprite_is_used() {
        let mut sprites = SpriteRegistry::new();
        sprites.insert(BodyKind::Missile, "missile");
        let missile = Body::new(1, BodyKind::Missile, Vec2::new(10.0, 10.0)).with_velocity(Vec2::new(0.0, 3.0));
        let mut dead = Body::new(2, BodyKind::Missile, Vec2::new(20.0, 10.0));
        dead.dead = true;

        let mut canvas = RecordingCanvas::new(32, 32);
        draw_bodies(&mut canvas, &[missile, dead], Vec2::ZERO, &sprites);

        assert_eq!(canvas.calls.len(), 1);
        let DrawCall::Sprite(name, center, angle, _) = canvas.calls[0] else {
            panic!("expected sprite call, got {:?}", canvas.calls[0]);
        };
        assert_eq!(name, "missile");
        assert_eq!(center, Vec2::new(10.0, 10.0));
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_aim_drawn_only_while_aiming() {
        let mut world = World::with_terrain(Settings::default(), small_terrain());
        let worm = world.spawn(BodyKind::Worm, Vec2::new(4.0, 2.0), Vec2::ZERO);
        world.turn.worm = Some(worm);
        world.turn.charge = 0.5;

        let mut canvas = RecordingCanvas::new(8, 6);
        draw_aim(&mut canvas, &world, Vec2::ZERO);
        assert_eq!(canvas.calls.len(), 2);

        world.turn.phase = TurnPhase::InFlight { projectile: 99 };
        let mut canvas = RecordingCanvas::new(8, 6);
        draw_aim(&mut canvas, &world, Vec2::ZERO);
        assert!(canvas.calls.is_empty());
    }
}
