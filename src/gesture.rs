//! Gesture disambiguation: decides what a pointer session is for.
//!
//! Every pointer event passes through [`GestureDisambiguator`] before anything
//! else sees it. The first press of a session picks its meaning:
//!
//! | First press | Session |
//! |-------------|---------|
//! | mouse middle, or mouse primary + ctrl | canvas pan |
//! | mouse primary, or one touch | element drag candidate |
//! | second touch while the candidate has not moved | pinch zoom |
//!
//! Once chosen, a session keeps its meaning until every pointer is up. A
//! pointer that lifts early leaves the session *draining*: remaining pointers
//! are tracked but routed nowhere, so a pinch that loses one finger never turns
//! into a drag and a drag never turns into a pan.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::camera::{Point, Viewport};
use crate::input::{Button, Modifiers, PointerEvent, PointerId, PointerKind, WheelDelta};

/// Direction of a pinch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchDirection {
    /// Fingers moving apart (zoom in).
    Out,
    /// Fingers moving together (zoom out).
    In,
}

impl PinchDirection {
    /// `+1.0` for [`PinchDirection::Out`], `-1.0` for [`PinchDirection::In`].
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Out => 1.0,
            Self::In => -1.0,
        }
    }
}

/// Turns a stream of finger distances into discrete zoom steps.
///
/// The tracker remembers the distance it last acted on. When the fingers
/// have moved more than the dead zone away from it, the anchor follows them
/// and a step fires, unless the previous step went the same way. A steady
/// spread therefore yields one step; a reversal yields another. A long pinch
/// in one direction zooms by a single step for the whole gesture, not a step
/// per move event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinchTracker {
    anchor: Option<f64>,
    latched: Option<PinchDirection>,
}

impl PinchTracker {
    /// Tracker with no known distance yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker anchored at a known starting distance.
    #[must_use]
    pub fn anchored(distance: f64) -> Self {
        Self { anchor: distance.is_finite().then_some(distance), latched: None }
    }

    #[must_use]
    pub fn anchor(&self) -> Option<f64> {
        self.anchor
    }

    /// Feed the current finger distance. Returns a direction when a step fires.
    pub fn update(&mut self, distance: f64, dead_zone: f64) -> Option<PinchDirection> {
        if !distance.is_finite() {
            return None;
        }
        let Some(anchor) = self.anchor else {
            self.anchor = Some(distance);
            return None;
        };
        let delta = distance - anchor;
        if delta.abs() <= dead_zone {
            return None;
        }
        let direction = if delta > 0.0 { PinchDirection::Out } else { PinchDirection::In };
        self.anchor = Some(distance);
        if self.latched == Some(direction) {
            return None;
        }
        self.latched = Some(direction);
        Some(direction)
    }

    /// Forget the anchor and latch; the next distance re-anchors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The kind of pointer session in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No pointers down.
    Neutral,
    /// One pointer pressed for a possible element drag.
    Single { pointer: PointerId, kind: PointerKind },
    /// Canvas pan following one pointer.
    Panning {
        pointer: PointerId,
        /// Screen position at pan start.
        start: Point,
        /// Viewport pan at pan start.
        origin_pan: Point,
    },
    /// Two-finger pinch zoom.
    Pinching { first: PointerId, second: PointerId, tracker: PinchTracker },
    /// Session over; waiting for the remaining pointers to lift.
    Draining,
}

/// Where the engine should send an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    /// Nothing to do.
    Ignore,
    /// Pointer-down for selection and a possible drag.
    Press { screen: Point },
    /// Move of the drag pointer.
    Drag { screen: Point },
    /// The drag pointer lifted.
    Release,
    /// A canvas pan began.
    BeginPan,
    /// Set the viewport pan to this offset.
    Pan { pan_x: f64, pan_y: f64 },
    /// A pinch began; any armed drag must be dropped.
    BeginPinch,
    /// Change zoom by `delta` (before clamping).
    Zoom { delta: f64 },
    /// A pan or pinch finished.
    End,
    /// Swallow the event's default action without changing anything.
    Suppress,
}

/// Classifies pointer and wheel events into drag, pan, pinch, or wheel zoom.
#[derive(Debug)]
pub struct GestureDisambiguator {
    state: GestureState,
    /// Screen positions of every pointer currently down.
    active: BTreeMap<PointerId, Point>,
    pinch_dead_zone: f64,
    pinch_step: f64,
    wheel_step: f64,
}

impl GestureDisambiguator {
    #[must_use]
    pub fn new(pinch_dead_zone: f64, pinch_step: f64, wheel_step: f64) -> Self {
        Self { state: GestureState::Neutral, active: BTreeMap::new(), pinch_dead_zone, pinch_step, wheel_step }
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        matches!(self.state, GestureState::Neutral) && self.active.is_empty()
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.active.len()
    }

    /// Classify a pointer-down.
    ///
    /// `drag_locked` is true once the drag controller has applied a move; a
    /// second touch then cannot start a pinch.
    pub fn pointer_down(&mut self, ev: &PointerEvent, viewport: &Viewport, drag_locked: bool) -> Route {
        self.active.insert(ev.id, ev.screen);

        match self.state {
            GestureState::Neutral => {
                if ev.requests_pan() {
                    self.state = GestureState::Panning {
                        pointer: ev.id,
                        start: ev.screen,
                        origin_pan: Point::new(viewport.pan_x, viewport.pan_y),
                    };
                    debug!(pointer = ev.id, "pan started");
                    Route::BeginPan
                } else if ev.is_touch() || ev.button == Button::Primary {
                    self.state = GestureState::Single { pointer: ev.id, kind: ev.kind };
                    trace!(pointer = ev.id, "single-pointer press");
                    Route::Press { screen: ev.screen }
                } else {
                    trace!(pointer = ev.id, button = ?ev.button, "press ignored");
                    Route::Ignore
                }
            }
            // Only a touch joining a touch makes a pinch; a touch landing on a
            // mouse press falls through and is ignored.
            GestureState::Single { pointer, kind: PointerKind::Touch } if ev.is_touch() && pointer != ev.id => {
                if drag_locked {
                    debug!(pointer = ev.id, "second touch ignored; drag in progress");
                    return Route::Ignore;
                }
                let Some(&first_pos) = self.active.get(&pointer) else {
                    return Route::Ignore;
                };
                let tracker = PinchTracker::anchored(first_pos.distance(ev.screen));
                self.state = GestureState::Pinching { first: pointer, second: ev.id, tracker };
                debug!(first = pointer, second = ev.id, anchor = ?tracker.anchor(), "pinch started");
                Route::BeginPinch
            }
            _ => {
                trace!(pointer = ev.id, state = ?self.state, "extra pointer ignored");
                Route::Ignore
            }
        }
    }

    /// Classify a pointer-move. Moves of pointers that are not down are hover and ignored.
    pub fn pointer_move(&mut self, ev: &PointerEvent) -> Route {
        let Some(pos) = self.active.get_mut(&ev.id) else {
            return Route::Ignore;
        };
        *pos = ev.screen;

        match self.state {
            GestureState::Single { pointer, .. } if pointer == ev.id => Route::Drag { screen: ev.screen },
            GestureState::Panning { pointer, start, origin_pan } if pointer == ev.id => {
                let delta = ev.screen - start;
                Route::Pan { pan_x: origin_pan.x + delta.x, pan_y: origin_pan.y + delta.y }
            }
            GestureState::Pinching { first, second, mut tracker } if ev.id == first || ev.id == second => {
                let (Some(&a), Some(&b)) = (self.active.get(&first), self.active.get(&second)) else {
                    return Route::Ignore;
                };
                let stepped = tracker.update(a.distance(b), self.pinch_dead_zone);
                self.state = GestureState::Pinching { first, second, tracker };
                match stepped {
                    Some(direction) => {
                        debug!(?direction, "pinch step");
                        Route::Zoom { delta: direction.sign() * self.pinch_step }
                    }
                    None => Route::Ignore,
                }
            }
            _ => Route::Ignore,
        }
    }

    /// Classify a pointer-up (or pointer-cancel) for pointer `id`.
    pub fn pointer_up(&mut self, id: PointerId) -> Route {
        if self.active.remove(&id).is_none() {
            return Route::Ignore;
        }

        let route = match self.state {
            GestureState::Single { pointer, .. } if pointer == id => Route::Release,
            GestureState::Panning { pointer, .. } if pointer == id => {
                debug!(pointer, "pan ended");
                Route::End
            }
            GestureState::Pinching { first, second, .. } if id == first || id == second => {
                debug!(pointer = id, "pinch ended");
                Route::End
            }
            GestureState::Draining | GestureState::Neutral => {
                if self.active.is_empty() {
                    self.state = GestureState::Neutral;
                }
                return Route::Ignore;
            }
            _ => return Route::Ignore,
        };

        self.state = if self.active.is_empty() { GestureState::Neutral } else { GestureState::Draining };
        route
    }

    /// Drop every pointer, e.g. when the pointer leaves the canvas.
    ///
    /// Returns the route that ends whatever session was running.
    pub fn cancel_all(&mut self) -> Route {
        let route = match self.state {
            GestureState::Single { .. } => Route::Release,
            GestureState::Panning { .. } | GestureState::Pinching { .. } => Route::End,
            GestureState::Neutral | GestureState::Draining => Route::Ignore,
        };
        if !self.is_neutral() {
            debug!(state = ?self.state, pointers = self.active.len(), "gesture cancelled");
        }
        self.active.clear();
        self.state = GestureState::Neutral;
        route
    }

    /// Classify a wheel event.
    ///
    /// Only ctrl + wheel zooms; plain wheel keeps its default scroll. Wheel
    /// input is ignored entirely while any pointer session is running.
    #[must_use]
    pub fn wheel(&self, delta: WheelDelta, modifiers: Modifiers) -> Route {
        if !self.is_neutral() {
            trace!("wheel ignored during pointer session");
            return Route::Ignore;
        }
        if !modifiers.ctrl {
            return Route::Ignore;
        }
        if delta.dy > 0.0 {
            Route::Zoom { delta: -self.wheel_step }
        } else if delta.dy < 0.0 {
            Route::Zoom { delta: self.wheel_step }
        } else {
            Route::Suppress
        }
    }
}
