//! Crater headless runner
//!
//! Generates a world, plays one scripted turn (aim, charge, fire) and logs
//! what happened. Pass a settings JSON path as the first argument to
//! override the defaults. Set `RUST_LOG=debug` to see every spawn and blast.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use crater::Settings;
    use crater::platform::{ButtonState, FrameHandler, InputSnapshot, Key};
    use crater::sim::SimEvent;
    use glam::Vec2;

    const FRAMES: usize = 900;
    const ELAPSED: f32 = 1.0 / 60.0;

    env_logger::init();
    log::info!("Crater (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Can't load settings from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut game = crater::Game::new(settings, Vec2::new(256.0, 256.0));
    if !game.on_create() {
        std::process::exit(1);
    }
    let ground_before = game.world().map_or(0, |w| w.terrain.ground_count());

    // Aim right of center, charge for one second, release, then watch
    let cursor = Vec2::new(200.0, 128.0);
    let mut explosions = 0;
    let mut frames = 0;
    for frame in 0..FRAMES {
        let space = match frame {
            0..60 => ButtonState::HELD,
            60 => ButtonState::RELEASED,
            _ => ButtonState::UP,
        };
        let input = InputSnapshot::new(cursor).with_key(Key::Space, space);
        frames += 1;
        if !game.on_update(ELAPSED, &input) {
            break;
        }
        if let Some(world) = game.world() {
            explosions += world
                .events
                .iter()
                .filter(|e| matches!(e, SimEvent::Exploded { .. }))
                .count();
        }
    }

    if let Some(world) = game.world() {
        log::info!(
            "Ran {} frames: {} explosions, {} ground cells destroyed, {} bodies alive, turn at worm {:?}",
            frames,
            explosions,
            ground_before.saturating_sub(world.terrain.ground_count()),
            world.bodies.len(),
            world.turn.worm
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host engine drives `crater::Game` directly on the web
}
