use bevy_ecs::prelude::*;
use glam::Vec2;
use strum_macros::Display;

/// Identifies a pointer (mouse or a single touch contact).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The mouse, or the first finger on a touch screen.
    pub const PRIMARY: PointerId = PointerId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

/// A normalized pointer or touch event, carrying a screen-space position.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn press(position: Vec2) -> Self {
        Self::primary(PointerPhase::Press, position)
    }

    pub fn drag(position: Vec2) -> Self {
        Self::primary(PointerPhase::Move, position)
    }

    pub fn release(position: Vec2) -> Self {
        Self::primary(PointerPhase::Release, position)
    }

    fn primary(phase: PointerPhase, position: Vec2) -> Self {
        Self {
            pointer: PointerId::PRIMARY,
            phase,
            position,
        }
    }

    pub fn with_pointer(self, pointer: PointerId) -> Self {
        Self { pointer, ..self }
    }
}

/// What kind of object the player touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Platform,
    Scenery,
}

/// Edge-triggered contact between the player and another object.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEvent {
    Begin(EntityKind),
    End(EntityKind),
}
