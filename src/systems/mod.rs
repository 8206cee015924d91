//! The Entity-Component-System (ECS) module.
//!
//! This module contains the components, resources and systems driving a run: the player's
//! motion and collision state machine, the engine-side physics step, and the platform
//! pool with its streamer.

pub mod camera;
pub mod collision;
pub mod components;
pub mod input;
pub mod physics;
pub mod player;
pub mod pool;
pub mod profiling;
pub mod streamer;

pub use self::camera::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::input::*;
pub use self::physics::*;
pub use self::player::*;
pub use self::pool::*;
pub use self::profiling::*;
pub use self::streamer::*;
