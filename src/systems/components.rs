use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec3;

/// A tag component for the entity driven by pointer input.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// World-space position.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec3);

/// Linear velocity, in units per second.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec3);

/// Whether the player is resting on a platform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Grounded,
    Airborne,
}

impl MotionState {
    pub fn is_grounded(self) -> bool {
        matches!(self, MotionState::Grounded)
    }
}

/// Captured at pointer press: where the pointer was, and where the player was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Pointer x on the drag plane, in world units.
    pub pointer_x: f32,
    pub player_start: Vec3,
}

/// The drag in progress, if any.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct DragAnchor(pub Option<Drag>);

/// Sphere collider around the entity's position.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub velocity: Velocity,
    pub motion_state: MotionState,
    pub drag: DragAnchor,
    pub collider: Collider,
}

impl PlayerBundle {
    pub fn new(start: Vec3, radius: f32) -> Self {
        Self {
            player: PlayerControlled,
            position: Position(start),
            velocity: Velocity::default(),
            motion_state: MotionState::default(),
            drag: DragAnchor::default(),
            collider: Collider { radius },
        }
    }
}

/// Length of the current phase step, in seconds.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime {
    pub seconds: f32,
}
