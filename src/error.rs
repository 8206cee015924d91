//! Centralized error types for the runner.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;
use strum_macros::Display;

use crate::systems::pool::PlatformId;

/// Main error type for the runner.
///
/// This is the primary error type that should be used in public APIs. It doubles as an
/// ECS event so systems can report failures without unwinding the schedule.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(Collaborator),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// The external collaborators a game must be wired with before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "title_case")]
pub enum Collaborator {
    EntityFactory,
    SessionController,
}

/// Errors raised while loading or validating the runner configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Platform pool must hold at least one platform")]
    EmptyPool,

    #[error("Lateral bounds are inverted: min_x ({min}) > max_x ({max})")]
    InvertedBounds { min: f32, max: f32 },

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("Gravity multiplier must be at least 1.0, got {0}")]
    GravityMultiplier(f32),

    #[error("Pool capacity {capacity} is below the {demand} platforms a run keeps alive")]
    PoolTooSmall { capacity: usize, demand: usize },
}

/// Errors related to platform pool bookkeeping.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("Platform {0} was never issued by this pool")]
    UnknownPlatform(PlatformId),
}

/// Result type for runner operations.
pub type GameResult<T> = Result<T, GameError>;
