//! Keeps a runway of platforms ahead of the player and retires the ones left behind.

use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::Vec3;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use smallvec::SmallVec;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::{GameError, PoolError};
use crate::factory::{EntityFactory, FactoryResource};
use crate::systems::camera::CameraRig;
use crate::systems::components::{PlayerControlled, Position};
use crate::systems::pool::{PlatformId, PlatformPool};

#[derive(Resource, Debug)]
pub struct PlatformStreamer {
    last_spawn_z: f32,
    spacing_z: f32,
    min_x: f32,
    max_x: f32,
    max_platforms: usize,
    deactivation_threshold: f32,
    rng: SmallRng,
}

impl PlatformStreamer {
    pub fn new(config: &RunnerConfig, rng: SmallRng) -> Self {
        Self {
            last_spawn_z: 0.0,
            spacing_z: config.platform_spacing_z,
            min_x: config.min_x,
            max_x: config.max_x,
            max_platforms: config.max_platforms,
            deactivation_threshold: config.deactivation_threshold,
            rng,
        }
    }

    /// Builds a streamer seeded from the config, or from the thread RNG when no seed is set.
    pub fn from_config(config: &RunnerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self::new(config, rng)
    }

    pub fn last_spawn_z(&self) -> f32 {
        self.last_spawn_z
    }

    /// Places the first platform at the origin and resets the spawn cursor.
    pub fn spawn_first(&mut self, pool: &mut PlatformPool, factory: &mut dyn EntityFactory) -> Result<PlatformId, PoolError> {
        let id = pool.acquire(factory);
        pool.place(id, Vec3::ZERO, factory)?;
        self.last_spawn_z = 0.0;
        debug!(%id, "Spawned first platform");
        Ok(id)
    }

    /// Places a platform one spacing further along z, at a random x within bounds.
    pub fn spawn_next(&mut self, pool: &mut PlatformPool, factory: &mut dyn EntityFactory) -> Result<PlatformId, PoolError> {
        let id = pool.acquire(factory);
        self.last_spawn_z += self.spacing_z;
        let x = self.rng.random_range(self.min_x..=self.max_x);
        let position = Vec3::new(x, 0.0, self.last_spawn_z);
        pool.place(id, position, factory)?;
        debug!(%id, x, z = self.last_spawn_z, "Spawned platform");
        Ok(id)
    }

    /// Populates the visible stretch: the first platform plus `max_platforms - 1` more.
    pub fn warm_up(&mut self, pool: &mut PlatformPool, factory: &mut dyn EntityFactory) -> Result<(), PoolError> {
        self.spawn_first(pool, factory)?;
        for _ in 1..self.max_platforms {
            self.spawn_next(pool, factory)?;
        }
        Ok(())
    }

    /// True while the runway ahead of the player is shorter than `max_platforms` spacings.
    pub fn should_spawn(&self, player_z: f32) -> bool {
        player_z > self.last_spawn_z - self.max_platforms as f32 * self.spacing_z
    }

    /// Spawns at most one platform if the player has closed in on the end of the runway.
    pub fn tick(
        &mut self,
        player_z: f32,
        pool: &mut PlatformPool,
        factory: &mut dyn EntityFactory,
    ) -> Result<Option<PlatformId>, PoolError> {
        if !self.should_spawn(player_z) {
            return Ok(None);
        }
        self.spawn_next(pool, factory).map(Some)
    }

    pub fn is_behind(&self, platform_z: f32, camera_z: f32) -> bool {
        platform_z < camera_z - self.deactivation_threshold
    }

    /// Deactivates a platform and returns it to the pool.
    pub fn retire(&mut self, id: PlatformId, pool: &mut PlatformPool, factory: &mut dyn EntityFactory) -> Result<(), PoolError> {
        pool.release(id, factory)?;
        debug!(%id, "Retired platform");
        Ok(())
    }

    /// Retires every active platform that has fallen too far behind the camera.
    pub fn retire_behind(
        &mut self,
        camera_z: f32,
        pool: &mut PlatformPool,
        factory: &mut dyn EntityFactory,
    ) -> Result<SmallVec<[PlatformId; 4]>, PoolError> {
        let behind: SmallVec<[PlatformId; 4]> = pool
            .active()
            .filter(|p| self.is_behind(p.position.z, camera_z))
            .map(|p| p.id)
            .collect();

        for id in &behind {
            self.retire(*id, pool, factory)?;
        }
        Ok(behind)
    }

    pub fn reset(&mut self) {
        self.last_spawn_z = 0.0;
    }
}

/// Extends the runway when the player gets close to its end.
pub fn platform_spawn_system(
    mut streamer: ResMut<PlatformStreamer>,
    mut pool: ResMut<PlatformPool>,
    mut factory: ResMut<FactoryResource>,
    players: Query<&Position, With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let position = match players.single() {
        Ok(position) => position,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for platform spawning: {}",
                e
            )));
            return;
        }
    };

    if let Err(e) = streamer.tick(position.0.z, &mut pool, factory.0.as_mut()) {
        errors.write(e.into());
    }
}

/// Returns platforms that have fallen behind the camera to the pool.
pub fn platform_retire_system(
    mut streamer: ResMut<PlatformStreamer>,
    mut pool: ResMut<PlatformPool>,
    mut factory: ResMut<FactoryResource>,
    camera: Res<CameraRig>,
    mut errors: EventWriter<GameError>,
) {
    if let Err(e) = streamer.retire_behind(camera.position.z, &mut pool, factory.0.as_mut()) {
        errors.write(e.into());
    }
}
