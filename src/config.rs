//! Load-time tuning for a run.
//!
//! Every value has a default in [`crate::constants`]; any of them can be overridden with a
//! `RUNNER_`-prefixed environment variable (e.g. `RUNNER_MAX_PLATFORMS=8`). The values are
//! immutable for the lifetime of a session.

use bevy_ecs::resource::Resource;
use figment::{providers::Env, Figment};
use glam::Vec3;
use serde::Deserialize;

use crate::constants::{self, camera, platform, player, pointer, MAX_FIXED_STEPS_PER_FRAME};
use crate::error::{ConfigError, GameError, GameResult};

/// Validated runner configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct RunnerConfig {
    /// Vertical velocity applied on landing.
    pub upward_force: f32,
    pub forward_speed: f32,
    pub gravity_multiplier: f32,
    pub drag_speed: f32,
    pub min_x: f32,
    pub max_x: f32,
    /// Number of platforms kept in the runway ahead of the player.
    pub max_platforms: usize,
    /// Platforms created up front; `None` sizes the pool from [`RunnerConfig::steady_state_demand`].
    pub pool_capacity: Option<usize>,
    pub platform_spacing_z: f32,
    pub deactivation_threshold: f32,

    pub gravity_y: f32,
    pub fall_limit_y: f32,
    pub fixed_timestep: f32,
    pub player_radius: f32,
    pub player_start_y: f32,
    pub platform_half_extents: Vec3,
    pub camera_offset: Vec3,
    pub camera_smooth_speed: f32,
    pub pointer_world_scale: f32,
    pub viewport_width: f32,
    /// Seed for platform placement; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            upward_force: player::UPWARD_FORCE,
            forward_speed: player::FORWARD_SPEED,
            gravity_multiplier: player::GRAVITY_MULTIPLIER,
            drag_speed: player::DRAG_SPEED,
            min_x: platform::MIN_X,
            max_x: platform::MAX_X,
            max_platforms: platform::MAX_PLATFORMS,
            pool_capacity: None,
            platform_spacing_z: platform::SPACING_Z,
            deactivation_threshold: platform::DEACTIVATION_THRESHOLD,
            gravity_y: constants::GRAVITY_Y,
            fall_limit_y: constants::FALL_LIMIT_Y,
            fixed_timestep: constants::FIXED_TIMESTEP,
            player_radius: player::RADIUS,
            player_start_y: player::START_Y,
            platform_half_extents: platform::HALF_EXTENTS,
            camera_offset: camera::OFFSET,
            camera_smooth_speed: camera::SMOOTH_SPEED,
            pointer_world_scale: pointer::WORLD_SCALE,
            viewport_width: pointer::VIEWPORT_WIDTH,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Checks the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.max_platforms == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.min_x > self.max_x {
            return Err(ConfigError::InvertedBounds {
                min: self.min_x,
                max: self.max_x,
            });
        }
        for (field, value) in [
            ("platform_spacing_z", self.platform_spacing_z),
            ("fixed_timestep", self.fixed_timestep),
            ("player_radius", self.player_radius),
            ("camera_smooth_speed", self.camera_smooth_speed),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("deactivation_threshold", self.deactivation_threshold),
            ("upward_force", self.upward_force),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.gravity_multiplier < 1.0 {
            return Err(ConfigError::GravityMultiplier(self.gravity_multiplier));
        }
        if let Some(capacity) = self.pool_capacity {
            let demand = self.steady_state_demand();
            if capacity < demand {
                return Err(ConfigError::PoolTooSmall { capacity, demand });
            }
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 22] {
        [
            ("upward_force", self.upward_force),
            ("forward_speed", self.forward_speed),
            ("gravity_multiplier", self.gravity_multiplier),
            ("drag_speed", self.drag_speed),
            ("min_x", self.min_x),
            ("max_x", self.max_x),
            ("platform_spacing_z", self.platform_spacing_z),
            ("deactivation_threshold", self.deactivation_threshold),
            ("gravity_y", self.gravity_y),
            ("fall_limit_y", self.fall_limit_y),
            ("fixed_timestep", self.fixed_timestep),
            ("player_radius", self.player_radius),
            ("player_start_y", self.player_start_y),
            ("platform_half_width", self.platform_half_extents.x),
            ("platform_half_height", self.platform_half_extents.y),
            ("platform_half_depth", self.platform_half_extents.z),
            ("camera_offset_x", self.camera_offset.x),
            ("camera_offset_y", self.camera_offset.y),
            ("camera_offset_z", self.camera_offset.z),
            ("camera_smooth_speed", self.camera_smooth_speed),
            ("pointer_world_scale", self.pointer_world_scale),
            ("viewport_width", self.viewport_width),
        ]
    }

    /// Length of the populated stretch ahead of the player.
    pub fn runway_length(&self) -> f32 {
        self.max_platforms as f32 * self.platform_spacing_z
    }

    /// Upper bound on the platforms alive at once.
    ///
    /// A spawn fires as soon as the player passes `last_spawn_z - runway_length`, so the
    /// newest platform can sit up to one spacing past the runway. Behind the player, platforms
    /// live until they are `deactivation_threshold` behind the camera, which trails the player
    /// by its offset plus the smoothing lag (`forward_speed / camera_smooth_speed`) plus at
    /// most one frame of physics steps.
    pub fn steady_state_demand(&self) -> usize {
        let lag = self.forward_speed.abs() / self.camera_smooth_speed;
        let frame = self.forward_speed.abs() * self.fixed_timestep * MAX_FIXED_STEPS_PER_FRAME as f32;
        let trailing = (self.deactivation_threshold - self.camera_offset.z + lag + frame).max(0.0);
        let ahead = self.runway_length() + self.platform_spacing_z;
        (((ahead + trailing) / self.platform_spacing_z).ceil() as usize).saturating_add(1)
    }

    /// Platforms created when the pool is warmed.
    pub fn pool_capacity(&self) -> usize {
        self.pool_capacity.unwrap_or_else(|| self.steady_state_demand())
    }

    pub fn player_start(&self) -> Vec3 {
        Vec3::new(0.0, self.player_start_y, 0.0)
    }
}

/// Raw configuration as read from the environment; validated and converted into [`RunnerConfig`].
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_upward_force")]
    upward_force: f32,
    #[serde(default = "default_forward_speed")]
    forward_speed: f32,
    #[serde(default = "default_gravity_multiplier")]
    gravity_multiplier: f32,
    #[serde(default = "default_drag_speed")]
    drag_speed: f32,
    #[serde(default = "default_min_x")]
    min_x: f32,
    #[serde(default = "default_max_x")]
    max_x: f32,
    #[serde(default = "default_max_platforms")]
    max_platforms: usize,
    pool_capacity: Option<usize>,
    #[serde(default = "default_platform_spacing_z")]
    platform_spacing_z: f32,
    #[serde(default = "default_deactivation_threshold")]
    deactivation_threshold: f32,

    #[serde(default = "default_gravity_y")]
    gravity_y: f32,
    #[serde(default = "default_fall_limit_y")]
    fall_limit_y: f32,
    #[serde(default = "default_fixed_timestep")]
    fixed_timestep: f32,
    #[serde(default = "default_player_radius")]
    player_radius: f32,
    #[serde(default = "default_player_start_y")]
    player_start_y: f32,

    // Vectors are flattened so each axis can be set from its own variable
    #[serde(default = "default_platform_half_width")]
    platform_half_width: f32,
    #[serde(default = "default_platform_half_height")]
    platform_half_height: f32,
    #[serde(default = "default_platform_half_depth")]
    platform_half_depth: f32,
    #[serde(default = "default_camera_offset_y")]
    camera_offset_y: f32,
    #[serde(default = "default_camera_offset_z")]
    camera_offset_z: f32,
    #[serde(default = "default_camera_smooth_speed")]
    camera_smooth_speed: f32,

    #[serde(default = "default_pointer_world_scale")]
    pointer_world_scale: f32,
    #[serde(default = "default_viewport_width")]
    viewport_width: f32,

    seed: Option<u64>,
}

impl TryFrom<RawConfig> for RunnerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let config = RunnerConfig {
            upward_force: raw.upward_force,
            forward_speed: raw.forward_speed,
            gravity_multiplier: raw.gravity_multiplier,
            drag_speed: raw.drag_speed,
            min_x: raw.min_x,
            max_x: raw.max_x,
            max_platforms: raw.max_platforms,
            pool_capacity: raw.pool_capacity,
            platform_spacing_z: raw.platform_spacing_z,
            deactivation_threshold: raw.deactivation_threshold,
            gravity_y: raw.gravity_y,
            fall_limit_y: raw.fall_limit_y,
            fixed_timestep: raw.fixed_timestep,
            player_radius: raw.player_radius,
            player_start_y: raw.player_start_y,
            platform_half_extents: Vec3::new(raw.platform_half_width, raw.platform_half_height, raw.platform_half_depth),
            camera_offset: Vec3::new(camera::OFFSET.x, raw.camera_offset_y, raw.camera_offset_z),
            camera_smooth_speed: raw.camera_smooth_speed,
            pointer_world_scale: raw.pointer_world_scale,
            viewport_width: raw.viewport_width,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_upward_force() -> f32 {
    player::UPWARD_FORCE
}

fn default_forward_speed() -> f32 {
    player::FORWARD_SPEED
}

fn default_gravity_multiplier() -> f32 {
    player::GRAVITY_MULTIPLIER
}

fn default_drag_speed() -> f32 {
    player::DRAG_SPEED
}

fn default_min_x() -> f32 {
    platform::MIN_X
}

fn default_max_x() -> f32 {
    platform::MAX_X
}

fn default_max_platforms() -> usize {
    platform::MAX_PLATFORMS
}

fn default_platform_spacing_z() -> f32 {
    platform::SPACING_Z
}

fn default_deactivation_threshold() -> f32 {
    platform::DEACTIVATION_THRESHOLD
}

fn default_gravity_y() -> f32 {
    constants::GRAVITY_Y
}

fn default_fall_limit_y() -> f32 {
    constants::FALL_LIMIT_Y
}

fn default_fixed_timestep() -> f32 {
    constants::FIXED_TIMESTEP
}

fn default_player_radius() -> f32 {
    player::RADIUS
}

fn default_player_start_y() -> f32 {
    player::START_Y
}

fn default_platform_half_width() -> f32 {
    platform::HALF_EXTENTS.x
}

fn default_platform_half_height() -> f32 {
    platform::HALF_EXTENTS.y
}

fn default_platform_half_depth() -> f32 {
    platform::HALF_EXTENTS.z
}

fn default_camera_offset_y() -> f32 {
    camera::OFFSET.y
}

fn default_camera_offset_z() -> f32 {
    camera::OFFSET.z
}

fn default_camera_smooth_speed() -> f32 {
    camera::SMOOTH_SPEED
}

fn default_pointer_world_scale() -> f32 {
    pointer::WORLD_SCALE
}

fn default_viewport_width() -> f32 {
    pointer::VIEWPORT_WIDTH
}

/// Loads the configuration from `RUNNER_*` environment variables, falling back to defaults.
pub fn load_config() -> GameResult<RunnerConfig> {
    Figment::new()
        .merge(Env::prefixed("RUNNER_"))
        .extract::<RunnerConfig>()
        .map_err(|e| GameError::Config(ConfigError::Load(e.to_string())))
}
