//! Skyhop: the core of an endless runner.
//!
//! A ball moves forward at a constant speed, is steered sideways by dragging, and bounces
//! on a stream of platforms recycled through a fixed-capacity pool. Rendering, scoring UI
//! and input devices live outside; they plug in through [`factory::EntityFactory`],
//! [`session::SessionController`] and [`events::PointerEvent`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg_attr(coverage_nightly, coverage(off))]
pub mod logging;

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod factory;
pub mod game;
pub mod session;
pub mod systems;
