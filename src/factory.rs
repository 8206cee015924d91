//! The entity factory seam: everything renderable the core needs is created and toggled through it.

use std::fmt::Display;
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use glam::Vec3;
use parking_lot::Mutex;

/// Opaque handle to an entity owned by an [`EntityFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u32);

impl Display for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Creates and manipulates the renderable, physical entities backing platforms.
///
/// The core never inspects what a handle refers to; it only asks the factory to create,
/// toggle, move and finally destroy it.
pub trait EntityFactory: Send + Sync + 'static {
    fn create(&mut self) -> EntityHandle;
    fn activate(&mut self, handle: EntityHandle);
    fn deactivate(&mut self, handle: EntityHandle);
    fn set_position(&mut self, handle: EntityHandle, position: Vec3);
    /// Called once per entity when the pool is torn down.
    fn destroy(&mut self, handle: EntityHandle);
}

/// Shared factories let the caller keep a handle while the game owns another.
impl<T: EntityFactory> EntityFactory for Arc<Mutex<T>> {
    fn create(&mut self) -> EntityHandle {
        self.lock().create()
    }

    fn activate(&mut self, handle: EntityHandle) {
        self.lock().activate(handle)
    }

    fn deactivate(&mut self, handle: EntityHandle) {
        self.lock().deactivate(handle)
    }

    fn set_position(&mut self, handle: EntityHandle, position: Vec3) {
        self.lock().set_position(handle, position)
    }

    fn destroy(&mut self, handle: EntityHandle) {
        self.lock().destroy(handle)
    }
}

/// ECS resource owning the factory a game was wired with.
#[derive(Resource)]
pub struct FactoryResource(pub Box<dyn EntityFactory>);

/// The state a [`HeadlessFactory`] keeps for each entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessEntity {
    pub position: Vec3,
    pub active: bool,
    pub destroyed: bool,
}

/// An in-memory factory with no renderer behind it, used by the demo binary and tests.
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    entities: Vec<HeadlessEntity>,
}

impl HeadlessFactory {
    pub fn get(&self, handle: EntityHandle) -> Option<&HeadlessEntity> {
        self.entities.get(handle.0 as usize)
    }

    /// Number of entities ever created, destroyed ones included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|e| e.active && !e.destroyed).count()
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut HeadlessEntity> {
        let entity = self.entities.get_mut(handle.0 as usize);
        if entity.is_none() {
            tracing::warn!(%handle, "Headless factory received an unknown handle");
        }
        entity
    }
}

impl EntityFactory for HeadlessFactory {
    fn create(&mut self) -> EntityHandle {
        let handle = EntityHandle(self.entities.len() as u32);
        self.entities.push(HeadlessEntity {
            position: Vec3::ZERO,
            active: true,
            destroyed: false,
        });
        handle
    }

    fn activate(&mut self, handle: EntityHandle) {
        if let Some(entity) = self.entity_mut(handle) {
            entity.active = true;
        }
    }

    fn deactivate(&mut self, handle: EntityHandle) {
        if let Some(entity) = self.entity_mut(handle) {
            entity.active = false;
        }
    }

    fn set_position(&mut self, handle: EntityHandle, position: Vec3) {
        if let Some(entity) = self.entity_mut(handle) {
            entity.position = position;
        }
    }

    fn destroy(&mut self, handle: EntityHandle) {
        if let Some(entity) = self.entity_mut(handle) {
            entity.active = false;
            entity.destroyed = true;
        }
    }
}
