use glam::Vec2;
use skyhop::{
    config::RunnerConfig,
    events::{PointerEvent, PointerId, PointerPhase},
    systems::{PointerProjection, PointerTracker},
};
use speculoos::prelude::*;

#[test]
fn test_tracker_follows_first_pointer_only() {
    let mut tracker = PointerTracker::default();
    let second = PointerId(3);

    assert_that(&tracker.accept(&PointerEvent::press(Vec2::ZERO))).is_equal_to(Some(PointerPhase::Press));
    assert_that(&tracker.active()).is_equal_to(Some(PointerId::PRIMARY));

    // A second finger is ignored for its whole lifetime
    assert_that(&tracker.accept(&PointerEvent::press(Vec2::ONE).with_pointer(second))).is_none();
    assert_that(&tracker.accept(&PointerEvent::drag(Vec2::ONE).with_pointer(second))).is_none();
    assert_that(&tracker.accept(&PointerEvent::release(Vec2::ONE).with_pointer(second))).is_none();

    assert_that(&tracker.accept(&PointerEvent::drag(Vec2::X))).is_equal_to(Some(PointerPhase::Move));
    assert_that(&tracker.accept(&PointerEvent::release(Vec2::X))).is_equal_to(Some(PointerPhase::Release));
    assert_that(&tracker.active()).is_none();
}

#[test]
fn test_tracker_ignores_moves_without_press() {
    let mut tracker = PointerTracker::default();

    assert_that(&tracker.accept(&PointerEvent::drag(Vec2::X))).is_none();
    assert_that(&tracker.accept(&PointerEvent::release(Vec2::X))).is_none();
}

#[test]
fn test_repeated_press_from_active_pointer_is_accepted() {
    let mut tracker = PointerTracker::default();
    let second = PointerId(2);

    tracker.accept(&PointerEvent::press(Vec2::ZERO));
    assert_that(&tracker.accept(&PointerEvent::press(Vec2::X))).is_equal_to(Some(PointerPhase::Press));
    assert_that(&tracker.active()).is_equal_to(Some(PointerId::PRIMARY));

    // Other pointers still cannot steal the drag
    assert_that(&tracker.accept(&PointerEvent::press(Vec2::X).with_pointer(second))).is_none();
}

#[test]
fn test_second_pointer_can_take_over_after_release() {
    let mut tracker = PointerTracker::default();
    let second = PointerId(1);

    tracker.accept(&PointerEvent::press(Vec2::ZERO));
    tracker.accept(&PointerEvent::release(Vec2::ZERO));

    assert_that(&tracker.accept(&PointerEvent::press(Vec2::ZERO).with_pointer(second)))
        .is_equal_to(Some(PointerPhase::Press));
    assert_that(&tracker.active()).is_equal_to(Some(second));
}

#[test]
fn test_tracker_reset_drops_active_pointer() {
    let mut tracker = PointerTracker::default();
    tracker.accept(&PointerEvent::press(Vec2::ZERO));

    tracker.reset();
    assert_that(&tracker.active()).is_none();
}

#[test]
fn test_projection_is_centered_on_viewport() {
    let projection = PointerProjection::from_config(&RunnerConfig {
        pointer_world_scale: 0.5,
        viewport_width: 800.0,
        ..Default::default()
    });

    assert_that(&projection.world_x(Vec2::new(400.0, 123.0))).is_equal_to(0.0);
    assert_that(&projection.world_x(Vec2::new(500.0, 0.0))).is_equal_to(50.0);
    assert_that(&projection.world_x(Vec2::new(0.0, 0.0))).is_equal_to(-200.0);
}
