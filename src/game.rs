//! This module contains the main game loop wiring.

use bevy_ecs::change_detection::Mut;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use glam::Vec3;
use tracing::{debug, error, info, warn};

use crate::config::RunnerConfig;
use crate::constants::MAX_FIXED_STEPS_PER_FRAME;
use crate::error::{Collaborator, GameError, GameResult};
use crate::events::{ContactEvent, PointerEvent};
use crate::factory::{EntityFactory, FactoryResource};
use crate::session::{SessionController, SessionResource};
use crate::systems::{
    self, profile, CameraRig, Contacts, DeltaTime, DragAnchor, MotionState, PlatformPool, PlatformStreamer, PlayerBundle,
    PlayerControlled, PointerProjection, PointerTracker, Position, SystemId, SystemTimings, Timing, Velocity,
};

/// Collects the collaborators a [`Game`] depends on. Both are required.
pub struct GameBuilder {
    config: RunnerConfig,
    factory: Option<Box<dyn EntityFactory>>,
    session: Option<Box<dyn SessionController>>,
}

impl GameBuilder {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            factory: None,
            session: None,
        }
    }

    pub fn entity_factory(mut self, factory: impl EntityFactory) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn session_controller(mut self, session: impl SessionController) -> Self {
        self.session = Some(Box::new(session));
        self
    }

    /// Validates the configuration, warms the platform pool and spawns the player.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MissingCollaborator` if either collaborator was not provided,
    /// and `GameError::Config` if the configuration is invalid. No partially wired game is
    /// ever returned.
    pub fn build(self) -> GameResult<Game> {
        let GameBuilder {
            config,
            factory,
            session,
        } = self;

        let mut factory = factory.ok_or(GameError::MissingCollaborator(Collaborator::EntityFactory))?;
        let session = session.ok_or(GameError::MissingCollaborator(Collaborator::SessionController))?;
        config.validate()?;

        info!(
            max_platforms = config.max_platforms,
            spacing = config.platform_spacing_z,
            "Starting game initialization"
        );

        let capacity = config.pool_capacity();
        debug!(capacity, "Warming platform pool");
        let mut pool = PlatformPool::warm(capacity, factory.as_mut());
        let mut streamer = PlatformStreamer::from_config(&config);
        streamer.warm_up(&mut pool, factory.as_mut())?;

        let mut world = World::default();
        Game::setup_ecs(&mut world);

        let start = config.player_start();
        world.spawn(PlayerBundle::new(start, config.player_radius));

        world.insert_resource(CameraRig::looking_at(start, config.camera_offset, config.camera_smooth_speed));
        world.insert_resource(PointerProjection::from_config(&config));
        world.insert_resource(PointerTracker::default());
        world.insert_resource(Contacts::default());
        world.insert_resource(DeltaTime {
            seconds: config.fixed_timestep,
        });
        world.insert_resource(SystemTimings::default());
        world.insert_resource(Timing::default());
        world.insert_resource(pool);
        world.insert_resource(streamer);
        world.insert_resource(FactoryResource(factory));
        world.insert_resource(SessionResource(session));
        world.insert_resource(config);

        let mut fixed_schedule = Schedule::default();
        let mut update_schedule = Schedule::default();
        Game::configure_schedules(&mut fixed_schedule, &mut update_schedule);

        info!("Game initialization completed successfully");
        Ok(Game {
            world,
            fixed_schedule,
            update_schedule,
            accumulator: 0.0,
        })
    }
}

fn session_running(session: Res<SessionResource>) -> bool {
    session.running()
}

/// The runner's state: an ECS world plus the physics and update schedules that drive it.
///
/// The caller owns the loop. Each frame it either calls [`Game::advance`], or drives the
/// two phases itself with [`Game::fixed_tick`] and [`Game::tick`]. Both phases stand still
/// while the session is paused or over.
pub struct Game {
    pub world: World,
    fixed_schedule: Schedule,
    update_schedule: Schedule,
    accumulator: f32,
}

impl Game {
    pub fn builder(config: RunnerConfig) -> GameBuilder {
        GameBuilder::new(config)
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<PointerEvent>(world);
        EventRegistry::register_event::<ContactEvent>(world);
    }

    fn configure_schedules(fixed: &mut Schedule, update: &mut Schedule) {
        let player_motion_system = profile(SystemId::PlayerMotion, systems::player_motion_system);
        let physics_step_system = profile(SystemId::Physics, systems::physics_step_system);
        let contact_detection_system = profile(SystemId::Contacts, systems::contact_detection_system);
        let collision_resolver_system = profile(SystemId::Collision, systems::collision_resolver_system);
        let platform_spawn_system = profile(SystemId::Spawn, systems::platform_spawn_system);
        let platform_retire_system = profile(SystemId::Retire, systems::platform_retire_system);
        let camera_follow_system = profile(SystemId::Camera, systems::camera_follow_system);

        fixed.add_systems(
            (
                player_motion_system,
                physics_step_system.run_if(session_running),
                contact_detection_system.run_if(session_running),
                collision_resolver_system,
            )
                .chain()
                .run_if(session_running),
        );

        update.add_systems(
            (platform_spawn_system, platform_retire_system, camera_follow_system)
                .chain()
                .run_if(session_running),
        );
    }

    /// Runs one physics step of `dt` seconds.
    ///
    /// While the session is paused, queued pointer and contact events are held for the first
    /// step after it resumes.
    pub fn fixed_tick(&mut self, dt: f32) {
        self.world.insert_resource(DeltaTime { seconds: dt });
        let paused = self.world.resource::<SessionResource>().0.is_paused();
        self.fixed_schedule.run(&mut self.world);

        if !paused {
            self.world.resource_mut::<Events<PointerEvent>>().update();
            self.world.resource_mut::<Events<ContactEvent>>().update();
        }
        self.drain_errors();
    }

    /// Runs one update (spawning, retirement, camera) of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.world.insert_resource(DeltaTime { seconds: dt });

        let start = std::time::Instant::now();
        self.update_schedule.run(&mut self.world);
        let total_duration = start.elapsed();

        if let (Some(timings), Some(timing)) = (
            self.world.get_resource::<SystemTimings>(),
            self.world.get_resource::<Timing>(),
        ) {
            let tick = timing.increment_tick();
            timings.add_timing(SystemId::Total, total_duration);

            let frame_budget = std::time::Duration::from_secs_f32(dt * 1.2);
            if total_duration > frame_budget {
                let systems = timings
                    .slowest_systems()
                    .iter()
                    .map(|(id, duration)| format!("{} ({:.2?})", id, duration))
                    .collect::<Vec<String>>()
                    .join(", ");
                warn!(
                    total = format!("{:.3?}", total_duration),
                    tick, systems, "Frame took longer than expected"
                );
            }
        }

        self.drain_errors();
    }

    /// Runs as many fixed steps as `frame_dt` covers (carrying the remainder), then one update.
    ///
    /// Returns the number of fixed steps taken.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let step = self.world.resource::<RunnerConfig>().fixed_timestep;
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= step && steps < MAX_FIXED_STEPS_PER_FRAME {
            self.fixed_tick(step);
            self.accumulator -= step;
            steps += 1;
        }
        if steps == MAX_FIXED_STEPS_PER_FRAME && self.accumulator >= step {
            warn!(dropped = self.accumulator, "Physics fell behind, dropping accumulated time");
            self.accumulator = 0.0;
        }

        self.tick(frame_dt);
        steps
    }

    /// Queues a pointer event for the next physics step.
    pub fn push_pointer(&mut self, event: PointerEvent) {
        self.world.resource_mut::<Events<PointerEvent>>().send(event);
    }

    /// Puts the run back at its starting state without recreating anything.
    ///
    /// Every platform returns to the pool, the runway is rebuilt, and the player is moved
    /// back to the start. Score is the session controller's business.
    pub fn restart(&mut self) -> GameResult<()> {
        info!("Restarting run");
        let config = self.world.resource::<RunnerConfig>().clone();

        self.world.resource_scope(|world, mut pool: Mut<PlatformPool>| {
            world.resource_scope(|world, mut streamer: Mut<PlatformStreamer>| {
                let mut factory = world.resource_mut::<FactoryResource>();
                let active: Vec<_> = pool.active().map(|p| p.id).collect();
                for id in active {
                    streamer.retire(id, &mut pool, factory.0.as_mut())?;
                }
                streamer.reset();
                streamer.warm_up(&mut pool, factory.0.as_mut())
            })
        })?;

        let start = config.player_start();
        let mut players = self
            .world
            .query_filtered::<(&mut Position, &mut Velocity, &mut MotionState, &mut DragAnchor), With<PlayerControlled>>();
        for (mut position, mut velocity, mut state, mut anchor) in players.iter_mut(&mut self.world) {
            position.0 = start;
            velocity.0 = Vec3::ZERO;
            *state = MotionState::default();
            anchor.0 = None;
        }

        self.world
            .insert_resource(CameraRig::looking_at(start, config.camera_offset, config.camera_smooth_speed));
        self.world.resource_mut::<Contacts>().platforms.clear();
        self.world.resource_mut::<PointerTracker>().reset();
        self.world.resource_mut::<Events<PointerEvent>>().clear();
        self.world.resource_mut::<Events<ContactEvent>>().clear();
        self.accumulator = 0.0;
        Ok(())
    }

    /// Destroys every pooled platform through the factory.
    pub fn teardown(mut self) {
        if let (Some(pool), Some(mut factory)) = (
            self.world.remove_resource::<PlatformPool>(),
            self.world.remove_resource::<FactoryResource>(),
        ) {
            pool.teardown(factory.0.as_mut());
        }
        info!("Game torn down");
    }

    fn drain_errors(&mut self) {
        let mut errors = self.world.resource_mut::<Events<GameError>>();
        for e in errors.drain() {
            error!(error = %e, "System reported an error");
        }
    }

    fn player<T: bevy_ecs::component::Component + Copy>(&mut self) -> Option<T> {
        self.world
            .query_filtered::<&T, With<PlayerControlled>>()
            .single(&self.world)
            .ok()
            .copied()
    }

    pub fn player_position(&mut self) -> Option<Vec3> {
        self.player::<Position>().map(|p| p.0)
    }

    pub fn player_velocity(&mut self) -> Option<Vec3> {
        self.player::<Velocity>().map(|v| v.0)
    }

    pub fn motion_state(&mut self) -> Option<MotionState> {
        self.player::<MotionState>()
    }

    pub fn pool(&self) -> &PlatformPool {
        self.world.resource::<PlatformPool>()
    }

    pub fn streamer(&self) -> &PlatformStreamer {
        self.world.resource::<PlatformStreamer>()
    }

    pub fn camera(&self) -> &CameraRig {
        self.world.resource::<CameraRig>()
    }

    pub fn config(&self) -> &RunnerConfig {
        self.world.resource::<RunnerConfig>()
    }
}
