#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn disambiguator() -> GestureDisambiguator {
    GestureDisambiguator::new(2.0, 0.03, 0.05)
}

fn touch(id: PointerId, x: f64, y: f64) -> PointerEvent {
    PointerEvent::touch(id, Point::new(x, y))
}

fn zoom_deltas(routes: &[Route]) -> Vec<f64> {
    routes
        .iter()
        .filter_map(|r| match r {
            Route::Zoom { delta } => Some(*delta),
            _ => None,
        })
        .collect()
}

// =============================================================
// PinchTracker
// =============================================================

#[test]
fn tracker_without_anchor_anchors_first() {
    let mut t = PinchTracker::new();
    assert!(t.update(100.0, 2.0).is_none());
    assert_eq!(t.anchor(), Some(100.0));
}

#[test]
fn tracker_within_dead_zone_is_silent() {
    let mut t = PinchTracker::anchored(100.0);
    assert!(t.update(101.5, 2.0).is_none());
    assert!(t.update(98.0, 2.0).is_none());
    assert_eq!(t.anchor(), Some(100.0));
}

#[test]
fn tracker_steady_spread_steps_once() {
    let mut t = PinchTracker::anchored(100.0);
    assert_eq!(t.update(103.33, 2.0), Some(PinchDirection::Out));
    assert!(t.update(106.67, 2.0).is_none());
    assert!(t.update(110.0, 2.0).is_none());
}

#[test]
fn tracker_reversal_steps_again() {
    let mut t = PinchTracker::anchored(100.0);
    assert_eq!(t.update(105.0, 2.0), Some(PinchDirection::Out));
    assert_eq!(t.update(100.0, 2.0), Some(PinchDirection::In));
    assert_eq!(t.update(106.0, 2.0), Some(PinchDirection::Out));
}

#[test]
fn tracker_ignores_non_finite_distance() {
    let mut t = PinchTracker::anchored(100.0);
    assert!(t.update(f64::NAN, 2.0).is_none());
    assert!(t.update(f64::INFINITY, 2.0).is_none());
    assert_eq!(t.anchor(), Some(100.0));
}

#[test]
fn tracker_reset_forgets_latch() {
    let mut t = PinchTracker::anchored(100.0);
    t.update(105.0, 2.0);
    t.reset();
    assert!(t.anchor().is_none());
    t.update(105.0, 2.0);
    assert_eq!(t.update(110.0, 2.0), Some(PinchDirection::Out));
}

// =============================================================
// Single pointer
// =============================================================

#[test]
fn primary_mouse_press_routes_to_press() {
    let mut g = disambiguator();
    let ev = PointerEvent::mouse(Point::new(10.0, 20.0));
    assert_eq!(g.pointer_down(&ev, &Viewport::default(), false), Route::Press { screen: Point::new(10.0, 20.0) });
    assert_eq!(g.state(), GestureState::Single { pointer: ev.id, kind: PointerKind::Mouse });
}

#[test]
fn secondary_mouse_press_is_ignored() {
    let mut g = disambiguator();
    let ev = PointerEvent::mouse(Point::default()).with_button(Button::Secondary);
    assert_eq!(g.pointer_down(&ev, &Viewport::default(), false), Route::Ignore);
    assert_eq!(g.pointer_up(ev.id), Route::Ignore);
    assert!(g.is_neutral());
}

#[test]
fn drag_pointer_moves_and_releases() {
    let mut g = disambiguator();
    let ev = PointerEvent::mouse(Point::new(0.0, 0.0));
    g.pointer_down(&ev, &Viewport::default(), false);
    let moved = PointerEvent::mouse(Point::new(5.0, 6.0));
    assert_eq!(g.pointer_move(&moved), Route::Drag { screen: Point::new(5.0, 6.0) });
    assert_eq!(g.pointer_up(ev.id), Route::Release);
    assert!(g.is_neutral());
}

#[test]
fn hover_move_is_ignored() {
    let mut g = disambiguator();
    assert_eq!(g.pointer_move(&PointerEvent::mouse(Point::new(1.0, 1.0))), Route::Ignore);
}

// =============================================================
// Pan
// =============================================================

#[test]
fn middle_button_pan_is_cumulative_from_origin() {
    let mut g = disambiguator();
    let vp = Viewport { pan_x: 10.0, pan_y: -5.0, zoom: 1.0 };
    let down = PointerEvent::mouse(Point::new(100.0, 100.0)).with_button(Button::Middle);
    assert_eq!(g.pointer_down(&down, &vp, false), Route::BeginPan);

    let m1 = PointerEvent { screen: Point::new(120.0, 90.0), ..down };
    assert_eq!(g.pointer_move(&m1), Route::Pan { pan_x: 30.0, pan_y: -15.0 });

    let m2 = PointerEvent { screen: Point::new(150.0, 150.0), ..m1 };
    assert_eq!(g.pointer_move(&m2), Route::Pan { pan_x: 60.0, pan_y: 45.0 });

    assert_eq!(g.pointer_up(down.id), Route::End);
    assert!(g.is_neutral());
}

#[test]
fn ctrl_primary_starts_pan() {
    let mut g = disambiguator();
    let down = PointerEvent::mouse(Point::default()).with_modifiers(Modifiers::ctrl());
    assert_eq!(g.pointer_down(&down, &Viewport::default(), false), Route::BeginPan);
}

// =============================================================
// Pinch
// =============================================================

#[test]
fn second_touch_on_armed_press_begins_pinch() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    assert!(matches!(g.pointer_down(&touch(1, 0.0, 0.0), &vp, false), Route::Press { .. }));
    assert_eq!(g.pointer_down(&touch(2, 100.0, 0.0), &vp, false), Route::BeginPinch);
    assert!(matches!(g.state(), GestureState::Pinching { first: 1, second: 2, .. }));
}

#[test]
fn second_touch_during_drag_is_ignored() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_move(&touch(1, 10.0, 0.0));
    assert_eq!(g.pointer_down(&touch(2, 100.0, 0.0), &vp, true), Route::Ignore);
    assert_eq!(g.state(), GestureState::Single { pointer: 1, kind: PointerKind::Touch });
    // The stray touch moving must not reach the drag.
    assert_eq!(g.pointer_move(&touch(2, 120.0, 0.0)), Route::Ignore);
}

#[test]
fn touch_on_mouse_press_does_not_pinch() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    let mouse = PointerEvent::mouse(Point::new(0.0, 0.0));
    assert!(matches!(g.pointer_down(&mouse, &vp, false), Route::Press { .. }));
    assert_eq!(g.pointer_down(&touch(2, 100.0, 0.0), &vp, false), Route::Ignore);
    assert_eq!(g.state(), GestureState::Single { pointer: mouse.id, kind: PointerKind::Mouse });
    assert_eq!(g.pointer_move(&touch(2, 150.0, 0.0)), Route::Ignore);
    assert!(matches!(g.pointer_move(&mouse), Route::Drag { .. }));
}

#[test]
fn gradual_spread_over_three_moves_zooms_once() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);

    let routes = [
        g.pointer_move(&touch(2, 103.33, 0.0)),
        g.pointer_move(&touch(2, 106.67, 0.0)),
        g.pointer_move(&touch(2, 110.0, 0.0)),
    ];
    assert_eq!(zoom_deltas(&routes), vec![0.03]);
}

#[test]
fn pinch_in_zooms_out() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);
    assert_eq!(g.pointer_move(&touch(1, 10.0, 0.0)), Route::Zoom { delta: -0.03 });
}

#[test]
fn pinch_wobble_inside_dead_zone_does_nothing() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);
    for x in [101.0, 99.0, 101.9, 98.1] {
        assert_eq!(g.pointer_move(&touch(2, x, 0.0)), Route::Ignore);
    }
}

#[test]
fn lifting_one_pinch_finger_drains_without_drag() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);

    assert_eq!(g.pointer_up(2), Route::End);
    assert_eq!(g.state(), GestureState::Draining);
    assert_eq!(g.pointer_move(&touch(1, 50.0, 50.0)), Route::Ignore);
    assert_eq!(g.pointer_up(1), Route::Ignore);
    assert!(g.is_neutral());
}

#[test]
fn third_touch_during_pinch_is_ignored() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);
    assert_eq!(g.pointer_down(&touch(3, 50.0, 50.0), &vp, false), Route::Ignore);
    assert_eq!(g.active_pointers(), 3);
    assert_eq!(g.pointer_move(&touch(3, 500.0, 50.0)), Route::Ignore);
}

#[test]
fn new_session_after_drain_starts_fresh() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);
    g.pointer_up(1);
    g.pointer_up(2);
    assert!(matches!(g.pointer_down(&touch(3, 5.0, 5.0), &vp, false), Route::Press { .. }));
}

// =============================================================
// Cancel
// =============================================================

#[test]
fn cancel_all_releases_drag() {
    let mut g = disambiguator();
    g.pointer_down(&PointerEvent::mouse(Point::default()), &Viewport::default(), false);
    assert_eq!(g.cancel_all(), Route::Release);
    assert!(g.is_neutral());
}

#[test]
fn cancel_all_ends_pinch() {
    let mut g = disambiguator();
    let vp = Viewport::default();
    g.pointer_down(&touch(1, 0.0, 0.0), &vp, false);
    g.pointer_down(&touch(2, 100.0, 0.0), &vp, false);
    assert_eq!(g.cancel_all(), Route::End);
    assert_eq!(g.active_pointers(), 0);
}

#[test]
fn cancel_all_when_neutral_is_ignore() {
    let mut g = disambiguator();
    assert_eq!(g.cancel_all(), Route::Ignore);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn plain_wheel_is_ignored() {
    let g = disambiguator();
    assert_eq!(g.wheel(WheelDelta::vertical(100.0), Modifiers::default()), Route::Ignore);
}

#[test]
fn ctrl_wheel_down_zooms_out() {
    let g = disambiguator();
    assert_eq!(g.wheel(WheelDelta::vertical(100.0), Modifiers::ctrl()), Route::Zoom { delta: -0.05 });
}

#[test]
fn ctrl_wheel_up_zooms_in() {
    let g = disambiguator();
    assert_eq!(g.wheel(WheelDelta::vertical(-3.0), Modifiers::ctrl()), Route::Zoom { delta: 0.05 });
}

#[test]
fn ctrl_wheel_zero_suppresses() {
    let g = disambiguator();
    assert_eq!(g.wheel(WheelDelta { dx: 40.0, dy: 0.0 }, Modifiers::ctrl()), Route::Suppress);
}

#[test]
fn wheel_during_pointer_session_is_ignored() {
    let mut g = disambiguator();
    g.pointer_down(&PointerEvent::mouse(Point::default()), &Viewport::default(), false);
    assert_eq!(g.wheel(WheelDelta::vertical(100.0), Modifiers::ctrl()), Route::Ignore);
}
