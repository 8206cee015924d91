//! Pointer filtering and the screen-to-world projection used for lateral drag.

use bevy_ecs::resource::Resource;
use glam::Vec2;

use crate::config::RunnerConfig;
use crate::events::{PointerEvent, PointerId, PointerPhase};

/// Follows a single pointer at a time; contacts beyond the first are ignored until it lifts.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PointerTracker {
    active: Option<PointerId>,
}

impl PointerTracker {
    /// Returns the phase to act on, or `None` if the event belongs to an ignored pointer.
    pub fn accept(&mut self, event: &PointerEvent) -> Option<PointerPhase> {
        match (event.phase, self.active) {
            (PointerPhase::Press, None) => {
                self.active = Some(event.pointer);
                Some(PointerPhase::Press)
            }
            // A repeated press from the active pointer re-anchors the drag
            (PointerPhase::Press, Some(active)) if active == event.pointer => Some(PointerPhase::Press),
            (PointerPhase::Release, Some(active)) if active == event.pointer => {
                self.active = None;
                Some(PointerPhase::Release)
            }
            (PointerPhase::Move, Some(active)) if active == event.pointer => Some(PointerPhase::Move),
            _ => None,
        }
    }

    pub fn active(&self) -> Option<PointerId> {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}

/// Maps screen coordinates onto the drag plane in front of the camera.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PointerProjection {
    /// World units per screen pixel.
    pub scale: f32,
    pub viewport_width: f32,
}

impl PointerProjection {
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            scale: config.pointer_world_scale,
            viewport_width: config.viewport_width,
        }
    }

    /// World x under the given screen position, relative to the camera's center line.
    pub fn world_x(&self, screen: Vec2) -> f32 {
        (screen.x - self.viewport_width * 0.5) * self.scale
    }
}
