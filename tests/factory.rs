use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use skyhop::factory::{EntityFactory, EntityHandle, HeadlessEntity, HeadlessFactory};
use speculoos::prelude::*;

#[test]
fn test_headless_factory_tracks_entities() {
    let mut factory = HeadlessFactory::default();
    let first = factory.create();
    let second = factory.create();

    assert_eq!(first, EntityHandle(0));
    assert_eq!(second, EntityHandle(1));
    assert_that(&factory.active_count()).is_equal_to(2);

    factory.deactivate(first);
    factory.set_position(second, Vec3::new(1.0, 0.0, 5.0));
    factory.destroy(second);

    assert_eq!(
        factory.get(first),
        Some(&HeadlessEntity {
            position: Vec3::ZERO,
            active: false,
            destroyed: false,
        })
    );
    assert_eq!(
        factory.get(second),
        Some(&HeadlessEntity {
            position: Vec3::new(1.0, 0.0, 5.0),
            active: false,
            destroyed: true,
        })
    );
    assert_that(&factory.active_count()).is_equal_to(0);
}

#[test]
fn test_unknown_handles_are_ignored() {
    let mut factory = HeadlessFactory::default();
    factory.activate(EntityHandle(4));
    factory.destroy(EntityHandle(4));

    assert_that(&factory.is_empty()).is_true();
}

#[test]
fn test_shared_factory_forwards_calls() {
    let shared = Arc::new(Mutex::new(HeadlessFactory::default()));
    let mut handle_for_game: Box<dyn EntityFactory> = Box::new(shared.clone());

    let entity = handle_for_game.create();
    handle_for_game.set_position(entity, Vec3::Z);

    assert_eq!(shared.lock().get(entity).map(|e| e.position), Some(Vec3::Z));
    assert_that(&entity.to_string()).is_equal_to("#0".to_string());
}
