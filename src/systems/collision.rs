//! Turns platform contacts into bounces and score.

use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use glam::Vec3;
use tracing::{debug, trace};

use crate::config::RunnerConfig;
use crate::error::GameError;
use crate::events::{ContactEvent, EntityKind};
use crate::session::{SessionController, SessionResource};
use crate::systems::components::{MotionState, PlayerControlled, Velocity};

/// Applies one contact event to the player's grounded state and velocity.
///
/// Landing on a platform zeroes the vertical velocity, bounces the player up by
/// `upward_force` and scores, unless the session is already over. Leaving a platform only
/// marks the player airborne. The state is a single flag, not a contact count: leaving
/// one of two touched platforms clears it.
pub fn resolve_contact(
    event: ContactEvent,
    state: &mut MotionState,
    velocity: &mut Vec3,
    upward_force: f32,
    session: &mut dyn SessionController,
) {
    match event {
        ContactEvent::Begin(EntityKind::Platform) => {
            *state = MotionState::Grounded;
            velocity.y = 0.0;
            velocity.y += upward_force;

            if !session.is_over() {
                session.on_score();
            }
            debug!(bounce = upward_force, "Landed on platform");
        }
        ContactEvent::End(EntityKind::Platform) => {
            *state = MotionState::Airborne;
            trace!("Left platform");
        }
        ContactEvent::Begin(kind) | ContactEvent::End(kind) => {
            trace!(%kind, "Ignoring contact with non-platform object");
        }
    }
}

pub fn collision_resolver_system(
    config: Res<RunnerConfig>,
    mut contacts: EventReader<ContactEvent>,
    mut session: ResMut<SessionResource>,
    mut players: Query<(&mut Velocity, &mut MotionState), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    if contacts.is_empty() {
        return;
    }

    let (mut velocity, mut state) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            contacts.clear();
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for collision resolution: {}",
                e
            )));
            return;
        }
    };

    for event in contacts.read() {
        resolve_contact(
            *event,
            &mut state,
            &mut velocity.0,
            config.upward_force,
            session.0.as_mut(),
        );
    }
}
