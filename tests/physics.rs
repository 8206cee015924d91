use bevy_ecs::{query::With, system::RunSystemOnce, world::World};
use glam::Vec3;
use pretty_assertions::assert_eq;
use skyhop::{
    events::{ContactEvent, EntityKind},
    factory::FactoryResource,
    systems::{
        contact_detection_system, integrate, physics_step_system, sphere_overlaps_box, Contacts, PlatformId,
        PlatformPool, PlayerControlled, Position, Velocity,
    },
};
use speculoos::prelude::*;

mod common;

fn player_position(world: &mut World) -> Vec3 {
    world
        .query_filtered::<&Position, With<PlayerControlled>>()
        .single(world)
        .map(|p| p.0)
        .expect("Player should exist")
}

fn move_player(world: &mut World, position: Vec3) {
    let mut query = world.query_filtered::<&mut Position, With<PlayerControlled>>();
    query.single_mut(world).expect("Player should exist").0 = position;
}

/// Activates the first pooled platform at `position`.
fn place_platform(world: &mut World, position: Vec3) -> PlatformId {
    world.resource_scope(|world, mut pool: bevy_ecs::change_detection::Mut<PlatformPool>| {
        let mut factory = world.resource_mut::<FactoryResource>();
        let id = pool.acquire(factory.0.as_mut());
        pool.place(id, position, factory.0.as_mut()).unwrap();
        id
    })
}

#[test]
fn test_integrate_applies_gravity_before_moving() {
    let mut position = Vec3::new(0.0, 2.0, 0.0);
    let mut velocity = Vec3::new(0.0, 0.0, 5.0);

    integrate(&mut position, &mut velocity, -10.0, 0.5);

    assert_eq!(velocity, Vec3::new(0.0, -5.0, 5.0));
    assert_eq!(position, Vec3::new(0.0, -0.5, 2.5));
}

#[test]
fn test_sphere_box_overlap() {
    let half = Vec3::new(1.5, 0.25, 1.5);

    // Resting exactly on the top face counts as touching
    assert_that(&sphere_overlaps_box(Vec3::new(0.0, 0.75, 0.0), 0.5, Vec3::ZERO, half)).is_true();
    assert_that(&sphere_overlaps_box(Vec3::new(0.0, 0.8, 0.0), 0.5, Vec3::ZERO, half)).is_false();
    assert_that(&sphere_overlaps_box(Vec3::new(1.9, 0.5, 0.0), 0.5, Vec3::ZERO, half)).is_true();
    assert_that(&sphere_overlaps_box(Vec3::new(2.1, 0.0, 0.0), 0.5, Vec3::ZERO, half)).is_false();
}

#[test]
fn test_physics_step_moves_player() {
    let (mut world, _, _) = common::create_test_world(common::test_config());
    let player = common::spawn_test_player(&mut world, Vec3::new(0.0, 2.0, 0.0));
    world.get_mut::<Velocity>(player).unwrap().0 = Vec3::new(0.0, 0.0, 4.6);

    world
        .run_system_once(physics_step_system)
        .expect("System should run successfully");

    let velocity = world.get::<Velocity>(player).unwrap().0;
    common::assert_approx(velocity.y, -9.81 * 0.02);
    let position = player_position(&mut world);
    common::assert_approx(position.z, 4.6 * 0.02);
    assert_that(&position.y).is_less_than(2.0);
}

#[test]
fn test_contact_begins_once_and_snaps_to_top() {
    let (mut world, _, _) = common::create_test_world(common::test_config());
    common::spawn_test_player(&mut world, Vec3::new(0.0, 0.6, 0.0));
    let id = place_platform(&mut world, Vec3::ZERO);

    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");

    assert_eq!(
        common::drain_contact_events(&mut world),
        vec![ContactEvent::Begin(EntityKind::Platform)]
    );
    assert_that(&player_position(&mut world).y).is_equal_to(0.75);
    assert_eq!(world.resource::<Contacts>().platforms.to_vec(), vec![id]);

    // Still touching: no new edge
    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");
    assert_that(&common::drain_contact_events(&mut world).is_empty()).is_true();
}

#[test]
fn test_contact_ends_when_player_leaves() {
    let (mut world, _, _) = common::create_test_world(common::test_config());
    common::spawn_test_player(&mut world, Vec3::new(0.0, 0.75, 0.0));
    place_platform(&mut world, Vec3::ZERO);

    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");
    common::drain_contact_events(&mut world);

    move_player(&mut world, Vec3::new(0.0, 2.0, 0.5));
    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");

    assert_eq!(
        common::drain_contact_events(&mut world),
        vec![ContactEvent::End(EntityKind::Platform)]
    );
    assert_that(&world.resource::<Contacts>().platforms.is_empty()).is_true();
}

#[test]
fn test_contact_ends_when_platform_is_retired() {
    let (mut world, _, _) = common::create_test_world(common::test_config());
    common::spawn_test_player(&mut world, Vec3::new(0.0, 0.75, 0.0));
    let id = place_platform(&mut world, Vec3::ZERO);

    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");
    common::drain_contact_events(&mut world);

    world.resource_scope(|world, mut pool: bevy_ecs::change_detection::Mut<PlatformPool>| {
        let mut factory = world.resource_mut::<FactoryResource>();
        pool.release(id, factory.0.as_mut()).unwrap();
    });
    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");

    assert_eq!(
        common::drain_contact_events(&mut world),
        vec![ContactEvent::End(EntityKind::Platform)]
    );
}

#[test]
fn test_inactive_platforms_are_not_touched() {
    let (mut world, _, _) = common::create_test_world(common::test_config());
    common::spawn_test_player(&mut world, Vec3::new(0.0, 0.5, 0.0));

    // Warm platforms sit at the origin, but none is active
    world
        .run_system_once(contact_detection_system)
        .expect("System should run successfully");

    assert_that(&common::drain_contact_events(&mut world).is_empty()).is_true();
    assert_that(&player_position(&mut world).y).is_equal_to(0.5);
}
