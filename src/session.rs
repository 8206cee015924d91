//! The session controller seam, plus the default in-process session.

use std::sync::Arc;

use bevy_ecs::resource::Resource;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Owns score, the win/lose state and pausing. The core reports into it and polls it every tick.
pub trait SessionController: Send + Sync + 'static {
    /// The player landed on a platform.
    fn on_score(&mut self);
    /// The player fell out of the world.
    fn on_game_over(&mut self);
    fn is_over(&self) -> bool;
    /// While paused, neither the physics nor the update phase advances.
    fn is_paused(&self) -> bool {
        false
    }
}

impl<T: SessionController> SessionController for Arc<Mutex<T>> {
    fn on_score(&mut self) {
        self.lock().on_score()
    }

    fn on_game_over(&mut self) {
        self.lock().on_game_over()
    }

    fn is_over(&self) -> bool {
        self.lock().is_over()
    }

    fn is_paused(&self) -> bool {
        self.lock().is_paused()
    }
}

/// ECS resource owning the session controller a game was wired with.
#[derive(Resource)]
pub struct SessionResource(pub Box<dyn SessionController>);

impl SessionResource {
    /// Whether the simulation should advance this tick.
    pub fn running(&self) -> bool {
        !self.0.is_over() && !self.0.is_paused()
    }
}

/// High-level stage of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStage {
    /// Waiting for the player to start; the world is frozen.
    #[default]
    Waiting,
    Playing,
    Paused,
    Over,
}

/// The default session: a score counter with start, pause, game-over and restart.
#[derive(Debug, Default, Clone)]
pub struct Session {
    stage: SessionStage,
    score: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Leaves the waiting stage. Has no effect once the run has started.
    pub fn start(&mut self) {
        if self.stage != SessionStage::Waiting {
            return;
        }
        info!("Run started");
        self.stage = SessionStage::Playing;
    }

    pub fn toggle_pause(&mut self) {
        self.stage = match self.stage {
            SessionStage::Playing => {
                info!("Run paused");
                SessionStage::Paused
            }
            SessionStage::Paused => {
                info!("Run resumed");
                SessionStage::Playing
            }
            stage => stage,
        };
    }

    /// Resets the score and goes straight back to playing.
    pub fn restart(&mut self) {
        info!(previous_score = self.score, "Run restarted");
        self.score = 0;
        self.stage = SessionStage::Playing;
    }

    /// The text shown on the game-over screen.
    pub fn summary(&self) -> String {
        match self.stage {
            SessionStage::Over => format!("Game Over\nScore: {}", self.score),
            _ => format!("Score: {}", self.score),
        }
    }
}

impl SessionController for Session {
    fn on_score(&mut self) {
        if self.is_over() {
            return;
        }
        self.score += 1;
        debug!(score = self.score, "Score increased");
    }

    fn on_game_over(&mut self) {
        if self.is_over() {
            return;
        }
        self.stage = SessionStage::Over;
        info!(score = self.score, "Game over");
    }

    fn is_over(&self) -> bool {
        self.stage == SessionStage::Over
    }

    fn is_paused(&self) -> bool {
        matches!(self.stage, SessionStage::Waiting | SessionStage::Paused)
    }
}
