//! Turn-based artillery game on top of the simulation
//!
//! Maps the host's polled input to simulation commands:
//! - Mouse aims the controlled worm; hold Space to charge, release to fire
//! - Left click drops a dummy, middle click a missile, `W` a worm
//! - Right click detonates at the cursor
//! - Mouse at the screen edge scrolls the camera
//! - Escape quits

use glam::Vec2;

use crate::consts::*;
use crate::platform::{FrameHandler, InputSnapshot, Key, MouseButton};
use crate::renderer::{self, Canvas, SpriteRegistry};
use crate::settings::Settings;
use crate::sim::{BlastCommand, BodyKind, SpawnCommand, TickInput, World, tick};

pub struct Game {
    settings: Settings,
    /// Screen size in pixels
    viewport: Vec2,
    /// World-space position of the screen's top-left corner
    camera: Vec2,
    world: Option<World>,
}

impl Game {
    pub fn new(settings: Settings, viewport: Vec2) -> Self {
        Self {
            settings,
            viewport,
            camera: Vec2::ZERO,
            world: None,
        }
    }

    /// The running world, once `on_create` succeeded
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Screen position to world position
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        self.camera + screen
    }

    /// Draw terrain, bodies and the aim indicator
    pub fn draw<C: Canvas>(&self, canvas: &mut C, sprites: &SpriteRegistry<C::Sprite>) {
        let Some(world) = &self.world else {
            return;
        };
        renderer::draw_terrain(canvas, &world.terrain, self.camera);
        renderer::draw_bodies(canvas, &world.bodies, self.camera, sprites);
        renderer::draw_aim(canvas, world, self.camera);
    }

    /// Push the camera when the mouse sits near a screen edge, keeping the
    /// view inside the terrain
    fn scroll_camera(&mut self, mouse: Vec2, elapsed: f32) {
        let step = SCROLL_SPEED * elapsed;
        if mouse.x < SCROLL_BORDER {
            self.camera.x -= step;
        }
        if mouse.x > self.viewport.x - SCROLL_BORDER {
            self.camera.x += step;
        }
        if mouse.y < SCROLL_BORDER {
            self.camera.y -= step;
        }
        if mouse.y > self.viewport.y - SCROLL_BORDER {
            self.camera.y += step;
        }

        let max = Vec2::new(
            self.settings.terrain_width as f32 - self.viewport.x,
            self.settings.terrain_height as f32 - self.viewport.y,
        )
        .max(Vec2::ZERO);
        self.camera = self.camera.clamp(Vec2::ZERO, max);
    }

    /// Translate this frame's input into simulation commands
    fn commands(&self, input: &InputSnapshot) -> TickInput {
        let cursor = self.to_world(input.mouse);
        let mut commands = TickInput {
            aim_at: Some(cursor),
            charging: input.key(Key::Space).held,
            fire: input.key(Key::Space).released,
            ..Default::default()
        };

        let spawn = |kind| SpawnCommand {
            kind,
            pos: cursor,
            vel: Vec2::ZERO,
        };
        if input.button(MouseButton::Left).pressed {
            commands.spawns.push(spawn(BodyKind::Dummy));
        }
        if input.button(MouseButton::Middle).pressed {
            commands.spawns.push(spawn(BodyKind::Missile));
        }
        if input.key(Key::W).pressed {
            commands.spawns.push(spawn(BodyKind::Worm));
        }
        if input.button(MouseButton::Right).pressed {
            commands.blasts.push(BlastCommand {
                center: cursor,
                radius: CLICK_BLAST_RADIUS,
            });
        }
        commands
    }
}

impl FrameHandler for Game {
    fn on_create(&mut self) -> bool {
        let mut world = match World::new(self.settings.clone()) {
            Ok(world) => world,
            Err(e) => {
                log::error!("Failed to create world: {e}");
                return false;
            }
        };

        // Spread the worms evenly across the map
        let width = world.terrain.width();
        for i in 1..=WORM_COUNT {
            let x = i * width / (WORM_COUNT + 1);
            if world.spawn_worm_on_surface(x).is_none() {
                log::warn!("No ground in column {x}, skipping worm");
            }
        }

        log::info!(
            "World ready: {}x{} terrain, {} worms",
            world.terrain.width(),
            world.terrain.height(),
            world.worm_ids().count()
        );
        self.world = Some(world);
        true
    }

    fn on_update(&mut self, elapsed: f32, input: &InputSnapshot) -> bool {
        if input.key(Key::Escape).pressed {
            log::info!("Quit requested");
            return false;
        }

        self.scroll_camera(input.mouse, elapsed);
        let commands = self.commands(input);
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        tick(world, &commands, elapsed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ButtonState;
    use crate::renderer::test_canvas::RecordingCanvas;
    use crate::sim::{CellState, SimEvent, TurnPhase};

    const DT: f32 = 1.0 / 30.0;

    fn small_settings() -> Settings {
        Settings {
            terrain_width: 200,
            terrain_height: 100,
            ..Settings::with_seed(3)
        }
    }

    fn created_game() -> Game {
        let mut game = Game::new(small_settings(), Vec2::new(160.0, 80.0));
        assert!(game.on_create());
        game
    }

    /// Mouse parked mid-screen so the camera stays put
    fn centered() -> InputSnapshot {
        InputSnapshot::new(Vec2::new(80.0, 40.0))
    }

    #[test]
    fn test_create_places_worms() {
        let game = created_game();
        let world = game.world().unwrap();
        assert_eq!(world.worm_ids().count(), WORM_COUNT);
        for id in world.worm_ids() {
            let worm = world.body(id).unwrap();
            assert_ne!(world.terrain.probe(worm.pos), Some(CellState::Ground));
        }
    }

    #[test]
    fn test_create_fails_on_bad_settings() {
        let settings = Settings {
            sub_steps: 0,
            ..small_settings()
        };
        let mut game = Game::new(settings, Vec2::new(10.0, 10.0));
        assert!(!game.on_create());
        assert!(game.world().is_none());
        assert!(!game.on_update(DT, &centered()));
    }

    #[test]
    fn test_escape_stops() {
        let mut game = created_game();
        assert!(game.on_update(DT, &centered()));
        let quit = centered().with_key(Key::Escape, ButtonState::PRESSED);
        assert!(!game.on_update(DT, &quit));
    }

    #[test]
    fn test_clicks_spawn_at_cursor() {
        let mut game = created_game();
        let before = game.world().unwrap().bodies.len();
        let click = centered()
            .with_button(MouseButton::Left, ButtonState::PRESSED)
            .with_key(Key::W, ButtonState::PRESSED);
        game.on_update(DT, &click);

        let world = game.world().unwrap();
        assert_eq!(world.bodies.len(), before + 2);
        assert!(world.events.iter().any(|e| matches!(
            e,
            SimEvent::Spawned {
                kind: BodyKind::Dummy,
                ..
            }
        )));
    }

    #[test]
    fn test_right_click_carves_at_cursor() {
        let mut game = created_game();
        // Point at ground: bottom of the map, inside the screen
        let target = Vec2::new(100.0, 95.0);
        game.world_mut()
            .unwrap()
            .terrain
            .set_cell(100, 95, CellState::Ground)
            .unwrap();
        let click = InputSnapshot::new(target).with_button(MouseButton::Right, ButtonState::PRESSED);
        // Camera is at the origin so screen == world; avoid the scroll border
        game.viewport = Vec2::new(400.0, 400.0);
        game.on_update(DT, &click);

        let world = game.world().unwrap();
        assert_eq!(world.terrain.cell_at(100, 95).unwrap(), CellState::Sky);
        assert!(world.events.iter().any(|e| matches!(e, SimEvent::Exploded { .. })));
    }

    #[test]
    fn test_hold_and_release_fires() {
        let mut game = created_game();
        let hold = centered().with_key(Key::Space, ButtonState::HELD);
        for _ in 0..10 {
            game.on_update(DT, &hold);
        }
        assert!(game.world().unwrap().turn.charge > 0.0);

        let release = centered().with_key(Key::Space, ButtonState::RELEASED);
        game.on_update(DT, &release);
        assert!(matches!(
            game.world().unwrap().turn.phase,
            TurnPhase::InFlight { .. }
        ));
    }

    #[test]
    fn test_camera_scrolls_and_clamps() {
        let mut game = created_game();
        let right_edge = InputSnapshot::new(Vec2::new(159.0, 40.0));
        for _ in 0..600 {
            game.on_update(DT, &right_edge);
        }
        // 200 wide map, 160 wide screen
        assert_eq!(game.camera().x, 40.0);
        assert_eq!(game.camera().y, 0.0);

        let left_edge = InputSnapshot::new(Vec2::new(0.0, 40.0));
        for _ in 0..600 {
            game.on_update(DT, &left_edge);
        }
        assert_eq!(game.camera().x, 0.0);
    }

    #[test]
    fn test_draw_covers_screen() {
        let game = created_game();
        let mut canvas = RecordingCanvas::new(160, 80);
        game.draw(&mut canvas, &SpriteRegistry::new());
        assert!(canvas.pixels().count() == 160 * 80);
    }
}
