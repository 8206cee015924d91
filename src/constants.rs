//! This module contains all the tuning constants used by the runner.

use std::time::Duration;

/// Target duration of one rendered frame for the demo loop.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Length of one physics step, in seconds.
pub const FIXED_TIMESTEP: f32 = 0.02;
/// Upper bound on physics steps run for a single frame, so a long stall cannot snowball.
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;

/// Baseline gravity applied by the physics step, in units/s².
pub const GRAVITY_Y: f32 = -9.81;
/// Falling below this height ends the run.
pub const FALL_LIMIT_Y: f32 = -5.0;

pub mod player {
    /// Vertical velocity given to the ball when it lands on a platform.
    pub const UPWARD_FORCE: f32 = 7.0;
    /// Constant forward (z) velocity.
    pub const FORWARD_SPEED: f32 = 4.6;
    /// Gravity scale applied while descending.
    pub const GRAVITY_MULTIPLIER: f32 = 2.0;
    /// World units moved per world unit of pointer drag.
    pub const DRAG_SPEED: f32 = 2.5;
    pub const RADIUS: f32 = 0.5;
    /// Height the ball is dropped from at the start of a run.
    pub const START_Y: f32 = 2.0;
}

pub mod platform {
    use glam::Vec3;

    pub const MAX_PLATFORMS: usize = 5;
    /// Distance between consecutive platforms along z.
    pub const SPACING_Z: f32 = 5.6;
    pub const MIN_X: f32 = -4.0;
    pub const MAX_X: f32 = 4.0;
    /// How far behind the camera a platform may fall before it is retired.
    pub const DEACTIVATION_THRESHOLD: f32 = 10.0;
    pub const HALF_EXTENTS: Vec3 = Vec3::new(1.5, 0.25, 2.5);
}

pub mod camera {
    use glam::Vec3;

    pub const OFFSET: Vec3 = Vec3::new(0.0, 5.0, -10.0);
    pub const SMOOTH_SPEED: f32 = 5.0;
}

pub mod pointer {
    /// World units covered by one screen pixel on the drag plane.
    pub const WORLD_SCALE: f32 = 0.01;
    pub const VIEWPORT_WIDTH: f32 = 1080.0;
}
