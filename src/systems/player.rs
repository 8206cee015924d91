//! Per-tick player motion: constant forward speed, fast fall, lateral drag and the fall check.

use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use glam::Vec3;
use tracing::{debug, trace};

use crate::config::RunnerConfig;
use crate::error::GameError;
use crate::events::{PointerEvent, PointerPhase};
use crate::session::SessionResource;
use crate::systems::components::{DeltaTime, Drag, DragAnchor, MotionState, PlayerControlled, Position, Velocity};
use crate::systems::input::{PointerProjection, PointerTracker};

/// Forces the forward component of the velocity, leaving x and y alone.
pub fn apply_forward_motion(velocity: &mut Vec3, forward_speed: f32) {
    velocity.z = forward_speed;
}

/// Extra gravity while descending, on top of the baseline applied by the physics step.
///
/// Only steepens a fall; ascent and grounded motion are untouched.
pub fn apply_fast_fall(velocity: &mut Vec3, state: MotionState, gravity_y: f32, gravity_multiplier: f32, dt: f32) {
    if !state.is_grounded() && velocity.y < 0.0 {
        velocity.y += gravity_y * (gravity_multiplier - 1.0) * dt;
    }
}

/// The x the player should be at for the current pointer position, clamped to the lane.
pub fn drag_target_x(drag: &Drag, pointer_x: f32, drag_speed: f32, min_x: f32, max_x: f32) -> f32 {
    let dx = pointer_x - drag.pointer_x;
    (drag.player_start.x + dx * drag_speed).clamp(min_x, max_x)
}

pub fn has_fallen(position: Vec3, fall_limit_y: f32) -> bool {
    position.y < fall_limit_y
}

/// Applies one pointer event to the player's drag state and position.
pub fn apply_pointer(
    phase: PointerPhase,
    pointer_x: f32,
    position: &mut Vec3,
    anchor: &mut DragAnchor,
    config: &RunnerConfig,
) {
    match phase {
        PointerPhase::Press => {
            anchor.0 = Some(Drag {
                pointer_x,
                player_start: *position,
            });
            trace!(pointer_x, "Drag started");
        }
        PointerPhase::Move => {
            if let Some(drag) = &anchor.0 {
                position.x = drag_target_x(drag, pointer_x, config.drag_speed, config.min_x, config.max_x);
            }
        }
        PointerPhase::Release => {
            anchor.0 = None;
            trace!("Drag released");
        }
    }
}

/// Advances the player by one physics tick.
///
/// Runs before the physics step, so the velocity it leaves behind is the one integrated
/// this tick. Ends the run through the session controller once the player falls out of
/// the world.
#[allow(clippy::too_many_arguments)]
pub fn player_motion_system(
    config: Res<RunnerConfig>,
    delta_time: Res<DeltaTime>,
    projection: Res<PointerProjection>,
    mut tracker: ResMut<PointerTracker>,
    mut pointer_events: EventReader<PointerEvent>,
    mut session: ResMut<SessionResource>,
    mut players: Query<(&mut Position, &mut Velocity, &MotionState, &mut DragAnchor), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let (mut position, mut velocity, state, mut anchor) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player motion: {}",
                e
            )));
            return;
        }
    };

    if session.0.is_over() {
        return;
    }

    apply_forward_motion(&mut velocity.0, config.forward_speed);
    apply_fast_fall(
        &mut velocity.0,
        *state,
        config.gravity_y,
        config.gravity_multiplier,
        delta_time.seconds,
    );

    for event in pointer_events.read() {
        if let Some(phase) = tracker.accept(event) {
            let pointer_x = projection.world_x(event.position);
            apply_pointer(phase, pointer_x, &mut position.0, &mut anchor, &config);
        }
    }

    if has_fallen(position.0, config.fall_limit_y) {
        debug!(y = position.0.y, "Player fell out of the world");
        session.0.on_game_over();
    }
}
