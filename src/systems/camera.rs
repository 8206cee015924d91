//! Smoothed camera that trails the player; its position also drives platform retirement.

use bevy_ecs::{
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::Vec3;

use crate::systems::components::{DeltaTime, PlayerControlled, Position};

/// A camera trailing the player at a fixed offset, smoothing height and depth changes.
///
/// The camera never moves sideways; only y and z track the player.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub offset: Vec3,
    pub smooth_speed: f32,
}

impl CameraRig {
    /// Places the camera at its resting offset from `target`.
    pub fn looking_at(target: Vec3, offset: Vec3, smooth_speed: f32) -> Self {
        Self {
            position: target + offset,
            offset,
            smooth_speed,
        }
    }

    pub fn desired_position(&self, target: Vec3) -> Vec3 {
        Vec3::new(self.position.x, target.y + self.offset.y, target.z + self.offset.z)
    }

    pub fn follow(&mut self, target: Vec3, dt: f32) {
        let t = (self.smooth_speed * dt).clamp(0.0, 1.0);
        self.position = self.position.lerp(self.desired_position(target), t);
    }
}

pub fn camera_follow_system(
    mut camera: ResMut<CameraRig>,
    delta_time: Res<DeltaTime>,
    players: Query<&Position, With<PlayerControlled>>,
) {
    if let Ok(position) = players.single() {
        camera.follow(position.0, delta_time.seconds);
    }
}
