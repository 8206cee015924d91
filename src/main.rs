use std::sync::Arc;

use anyhow::Context;
use glam::Vec2;
use parking_lot::Mutex;
use skyhop::{
    config::load_config,
    constants::LOOP_TIME,
    events::PointerEvent,
    factory::HeadlessFactory,
    game::Game,
    logging,
    session::{Session, SessionController},
};
use tracing::{debug, info};

/// Simulated seconds before the demo stops on its own.
const DEMO_DURATION_SECS: f32 = 120.0;

/// Steers the ball toward the next platform by dragging, the way a player would.
#[derive(Default)]
struct Autopilot {
    /// Player x when the drag began.
    start_x: Option<f32>,
}

impl Autopilot {
    fn steer(&mut self, game: &mut Game) -> Option<PointerEvent> {
        let position = game.player_position()?;
        let config = game.config();
        let center = Vec2::new(config.viewport_width * 0.5, 0.0);

        let Some(start_x) = self.start_x else {
            self.start_x = Some(position.x);
            return Some(PointerEvent::press(center));
        };

        let target = game
            .pool()
            .active()
            .filter(|p| p.position.z > position.z + 0.5)
            .min_by(|a, b| a.position.z.total_cmp(&b.position.z))?;

        let pointer_dx = (target.position.x - start_x) / config.drag_speed;
        let screen_x = center.x + pointer_dx / config.pointer_world_scale;
        Some(PointerEvent::drag(Vec2::new(screen_x, 0.0)))
    }
}

pub fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let config = load_config().context("Could not load configuration")?;
    let session = Arc::new(Mutex::new(Session::new()));
    let factory = Arc::new(Mutex::new(HeadlessFactory::default()));

    let mut game = Game::builder(config)
        .entity_factory(factory.clone())
        .session_controller(session.clone())
        .build()
        .context("Could not build game")?;

    session.lock().start();
    info!(loop_time = ?LOOP_TIME, "Starting game loop");

    let dt = LOOP_TIME.as_secs_f32();
    let mut autopilot = Autopilot::default();
    let mut elapsed = 0.0;
    while elapsed < DEMO_DURATION_SECS && !session.lock().is_over() {
        if let Some(event) = autopilot.steer(&mut game) {
            game.push_pointer(event);
        }
        game.advance(dt);
        elapsed += dt;
    }

    let distance = game.player_position().map(|p| p.z).unwrap_or_default();
    let pool = game.pool();
    debug!(
        platforms = pool.len(),
        capacity = pool.capacity(),
        overflow = pool.overflow_count(),
        entities = factory.lock().len(),
        "Pool usage"
    );
    info!(
        elapsed = format!("{:.1}s", elapsed),
        distance = format!("{:.1}", distance),
        "{}",
        session.lock().summary().replace('\n', " | ")
    );

    game.teardown();
    Ok(())
}
