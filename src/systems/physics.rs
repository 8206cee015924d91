//! The engine side of the simulation: baseline gravity, integration and contact detection.

use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::Vec3;
use smallvec::SmallVec;
use tracing::trace;

use crate::config::RunnerConfig;
use crate::error::GameError;
use crate::events::{ContactEvent, EntityKind};
use crate::systems::components::{Collider, DeltaTime, PlayerControlled, Position, Velocity};
use crate::systems::pool::{PlatformId, PlatformPool};

/// Semi-implicit Euler step under baseline gravity.
pub fn integrate(position: &mut Vec3, velocity: &mut Vec3, gravity_y: f32, dt: f32) {
    velocity.y += gravity_y * dt;
    *position += *velocity * dt;
}

/// Sphere against axis-aligned box, touching counts as overlapping.
pub fn sphere_overlaps_box(center: Vec3, radius: f32, box_center: Vec3, half_extents: Vec3) -> bool {
    let closest = center.clamp(box_center - half_extents, box_center + half_extents);
    center.distance_squared(closest) <= radius * radius
}

/// Platforms the player is currently touching.
#[derive(Resource, Debug, Default)]
pub struct Contacts {
    pub platforms: SmallVec<[PlatformId; 4]>,
}

pub fn physics_step_system(
    config: Res<RunnerConfig>,
    delta_time: Res<DeltaTime>,
    mut players: Query<(&mut Position, &mut Velocity), With<PlayerControlled>>,
) {
    for (mut position, mut velocity) in players.iter_mut() {
        integrate(&mut position.0, &mut velocity.0, config.gravity_y, delta_time.seconds);
    }
}

/// Emits a begin event for each platform the player starts touching and an end event for
/// each one it stops touching (including platforms retired while touched).
///
/// A player arriving from above is moved to rest on the platform's top face.
pub fn contact_detection_system(
    config: Res<RunnerConfig>,
    pool: Res<PlatformPool>,
    mut contacts: ResMut<Contacts>,
    mut players: Query<(&mut Position, &Collider), With<PlayerControlled>>,
    mut events: EventWriter<ContactEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (mut position, collider) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for contact detection: {}",
                e
            )));
            return;
        }
    };

    let half_extents = config.platform_half_extents;

    contacts.platforms.retain(|id| {
        let touching = pool
            .get(*id)
            .is_some_and(|p| p.active && sphere_overlaps_box(position.0, collider.radius, p.position, half_extents));
        if !touching {
            trace!(%id, "Contact ended");
            events.write(ContactEvent::End(EntityKind::Platform));
        }
        touching
    });

    for platform in pool.active() {
        if contacts.platforms.contains(&platform.id)
            || !sphere_overlaps_box(position.0, collider.radius, platform.position, half_extents)
        {
            continue;
        }

        let top = platform.position.y + half_extents.y;
        if position.0.y >= top {
            position.0.y = position.0.y.max(top + collider.radius);
        }

        trace!(id = %platform.id, "Contact began");
        contacts.platforms.push(platform.id);
        events.write(ContactEvent::Begin(EntityKind::Platform));
    }
}
