//! Fixed-capacity platform pool.
//!
//! Every platform the runner will use is created up front and parked, inactive, in a FIFO
//! ready queue. Spawning takes from the front of the queue; retirement puts the platform
//! back at the end. When the queue runs dry the pool falls back to creating a new platform,
//! which keeps the run alive but means capacity does not match the spawn/retire cadence,
//! so every such fallback is logged and counted.

use std::collections::VecDeque;
use std::fmt::Display;

use bevy_ecs::resource::Resource;
use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::error::PoolError;
use crate::factory::{EntityFactory, EntityHandle};

/// Slot index of a platform inside its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformId(pub usize);

impl Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "platform[{}]", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub id: PlatformId,
    pub handle: EntityHandle,
    pub position: Vec3,
    pub active: bool,
}

#[derive(Resource, Debug)]
pub struct PlatformPool {
    platforms: Vec<Platform>,
    ready: VecDeque<PlatformId>,
    capacity: usize,
    overflow: u32,
}

impl PlatformPool {
    /// Creates `capacity` platforms through the factory, all inactive and ready for use.
    pub fn warm(capacity: usize, factory: &mut dyn EntityFactory) -> Self {
        let mut pool = Self {
            platforms: Vec::with_capacity(capacity),
            ready: VecDeque::with_capacity(capacity),
            capacity,
            overflow: 0,
        };

        for _ in 0..capacity {
            let id = pool.create(factory);
            pool.ready.push_back(id);
        }

        debug!(capacity, "Platform pool warmed");
        pool
    }

    fn create(&mut self, factory: &mut dyn EntityFactory) -> PlatformId {
        let id = PlatformId(self.platforms.len());
        let handle = factory.create();
        factory.deactivate(handle);
        self.platforms.push(Platform {
            id,
            handle,
            position: Vec3::ZERO,
            active: false,
        });
        id
    }

    /// Hands out the platform that has been waiting longest.
    ///
    /// If none is waiting, a new platform is created and adopted by the pool.
    pub fn acquire(&mut self, factory: &mut dyn EntityFactory) -> PlatformId {
        if let Some(id) = self.ready.pop_front() {
            trace!(%id, ready = self.ready.len(), "Platform acquired");
            return id;
        }

        self.overflow += 1;
        let id = self.create(factory);
        warn!(
            %id,
            capacity = self.capacity,
            total = self.platforms.len(),
            overflow = self.overflow,
            "Platform pool exhausted, created an extra platform"
        );
        id
    }

    /// Moves a platform into place and activates it.
    pub fn place(&mut self, id: PlatformId, position: Vec3, factory: &mut dyn EntityFactory) -> Result<(), PoolError> {
        let platform = self.platforms.get_mut(id.0).ok_or(PoolError::UnknownPlatform(id))?;
        platform.position = position;
        platform.active = true;
        factory.set_position(platform.handle, position);
        factory.activate(platform.handle);
        Ok(())
    }

    /// Deactivates a platform and queues it for reuse. Releasing a queued platform again is a no-op.
    pub fn release(&mut self, id: PlatformId, factory: &mut dyn EntityFactory) -> Result<(), PoolError> {
        let platform = self.platforms.get_mut(id.0).ok_or(PoolError::UnknownPlatform(id))?;

        if self.ready.contains(&id) {
            trace!(%id, "Platform already pooled, ignoring release");
            return Ok(());
        }

        platform.active = false;
        factory.deactivate(platform.handle);
        self.ready.push_back(id);
        trace!(%id, ready = self.ready.len(), "Platform released");
        Ok(())
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.get(id.0)
    }

    /// Active platforms, in slot order.
    pub fn active(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Platforms waiting in the ready queue.
    pub fn inactive_count(&self) -> usize {
        self.ready.len()
    }

    /// Total platforms in existence, extra ones from overflow included.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times `acquire` had to create a platform because the queue was empty.
    pub fn overflow_count(&self) -> u32 {
        self.overflow
    }

    /// The ready queue, front first.
    pub fn ready(&self) -> impl Iterator<Item = PlatformId> + '_ {
        self.ready.iter().copied()
    }

    /// Destroys every platform. The pool is unusable afterwards.
    pub fn teardown(self, factory: &mut dyn EntityFactory) {
        debug!(total = self.platforms.len(), "Tearing down platform pool");
        for platform in self.platforms {
            factory.destroy(platform.handle);
        }
    }
}
