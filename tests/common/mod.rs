#![allow(dead_code)]

use std::sync::Arc;

use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::Vec3;
use parking_lot::Mutex;
use skyhop::{
    config::RunnerConfig,
    error::GameError,
    events::{ContactEvent, PointerEvent},
    factory::{FactoryResource, HeadlessFactory},
    session::{SessionController, SessionResource},
    systems::{
        CameraRig, Contacts, DeltaTime, PlatformPool, PlatformStreamer, PlayerBundle, PointerProjection, PointerTracker,
    },
};

/// A session controller that records every call made into it.
#[derive(Debug, Default)]
pub struct RecordingSession {
    pub scores: u32,
    pub game_overs: u32,
    pub over: bool,
    pub paused: bool,
}

impl SessionController for RecordingSession {
    fn on_score(&mut self) {
        self.scores += 1;
    }

    fn on_game_over(&mut self) {
        self.game_overs += 1;
        self.over = true;
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

pub type SharedSession = Arc<Mutex<RecordingSession>>;
pub type SharedFactory = Arc<Mutex<HeadlessFactory>>;

/// Default tuning with a fixed seed, so platform placement is reproducible.
pub fn test_config() -> RunnerConfig {
    RunnerConfig {
        seed: Some(42),
        ..Default::default()
    }
}

/// Same as [`test_config`], but with a spacing that accumulates exactly in `f32`.
pub fn exact_spacing_config() -> RunnerConfig {
    RunnerConfig {
        platform_spacing_z: 5.5,
        ..test_config()
    }
}

pub fn shared_factory() -> SharedFactory {
    Arc::new(Mutex::new(HeadlessFactory::default()))
}

pub fn shared_session() -> SharedSession {
    Arc::new(Mutex::new(RecordingSession::default()))
}

/// Creates a world holding every resource the runner's systems read, with a cold pool and no player.
pub fn create_test_world(config: RunnerConfig) -> (World, SharedFactory, SharedSession) {
    let factory = shared_factory();
    let session = shared_session();
    let mut world = World::new();

    world.init_resource::<Events<GameError>>();
    world.init_resource::<Events<PointerEvent>>();
    world.init_resource::<Events<ContactEvent>>();

    let pool = {
        let mut factory = factory.lock();
        PlatformPool::warm(config.max_platforms, &mut *factory)
    };
    world.insert_resource(pool);
    world.insert_resource(PlatformStreamer::from_config(&config));
    world.insert_resource(CameraRig::looking_at(
        config.player_start(),
        config.camera_offset,
        config.camera_smooth_speed,
    ));
    world.insert_resource(PointerProjection::from_config(&config));
    world.insert_resource(PointerTracker::default());
    world.insert_resource(Contacts::default());
    world.insert_resource(DeltaTime {
        seconds: config.fixed_timestep,
    });
    world.insert_resource(FactoryResource(Box::new(factory.clone())));
    world.insert_resource(SessionResource(Box::new(session.clone())));
    world.insert_resource(config);

    (world, factory, session)
}

pub fn spawn_test_player(world: &mut World, position: Vec3) -> Entity {
    let radius = world.resource::<RunnerConfig>().player_radius;
    world.spawn(PlayerBundle::new(position, radius)).id()
}

pub fn send_pointer_event(world: &mut World, event: PointerEvent) {
    world.resource_mut::<Events<PointerEvent>>().send(event);
}

pub fn send_contact_event(world: &mut World, event: ContactEvent) {
    world.resource_mut::<Events<ContactEvent>>().send(event);
}

/// Takes every contact event written so far.
pub fn drain_contact_events(world: &mut World) -> Vec<ContactEvent> {
    world.resource_mut::<Events<ContactEvent>>().drain().collect()
}

pub fn drain_errors(world: &mut World) -> Vec<GameError> {
    world.resource_mut::<Events<GameError>>().drain().collect()
}

pub fn assert_approx(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "Expected {expected} ± 1e-4, got {actual}"
    );
}
