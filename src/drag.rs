//! Drag controller: moves one element through a pointer-down / move / up sequence.
//!
//! ```text
//!   Idle --press--> Armed --move--> Dragging --release--> Idle
//!                     |                 ^  |
//!                     +--release/cancel-+  +--move (repeat)
//! ```
//!
//! `Armed` exists so a plain click selects without writing a position. The
//! first move both enters `Dragging` and applies that move. Every write is
//! clamped to the editable bounds; there is no rollback, so the last written
//! position is the committed one.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use tracing::{debug, trace};

use crate::camera::{Point, Size};
use crate::doc::{Element, ElementId, ElementPatch, Scene};

/// Where the drag controller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Pointer went down on an element; nothing has moved yet.
    Armed {
        id: ElementId,
        /// Pointer position minus element position, in canvas space.
        grab_offset: Point,
    },
    /// At least one move has been applied.
    Dragging { id: ElementId, grab_offset: Point },
}

/// Single-pointer drag state machine.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Id of the element held by an armed or active drag.
    #[must_use]
    pub fn active_id(&self) -> Option<ElementId> {
        match self.state {
            DragState::Idle => None,
            DragState::Armed { id, .. } | DragState::Dragging { id, .. } => Some(id),
        }
    }

    /// Arm a drag of `element`, grabbed at `canvas_pt`.
    ///
    /// Returns false (and changes nothing) if a drag is already armed or active.
    pub fn press(&mut self, element: &Element, canvas_pt: Point) -> bool {
        if !self.is_idle() {
            trace!(id = %element.id, "press ignored; drag already in progress");
            return false;
        }
        let grab_offset = canvas_pt - element.position;
        self.state = DragState::Armed { id: element.id, grab_offset };
        debug!(id = %element.id, ?grab_offset, "drag armed");
        true
    }

    /// Apply a pointer move at `canvas_pt`, writing the clamped position into `scene`.
    ///
    /// Returns the new position, or `None` when idle. If the held element has
    /// disappeared from the scene the drag ends.
    pub fn pointer_move(&mut self, canvas_pt: Point, scene: &mut Scene, bounds: Size) -> Option<Point> {
        let (id, grab_offset) = match self.state {
            DragState::Idle => return None,
            DragState::Armed { id, grab_offset } => {
                debug!(%id, "drag started");
                (id, grab_offset)
            }
            DragState::Dragging { id, grab_offset } => (id, grab_offset),
        };

        let Some(size) = scene.get(&id).map(|e| e.size) else {
            debug!(%id, "dragged element vanished; ending drag");
            self.state = DragState::Idle;
            return None;
        };

        self.state = DragState::Dragging { id, grab_offset };
        let position = clamp_position(canvas_pt - grab_offset, size, bounds);
        scene.mutate(&id, &ElementPatch::position(position));
        trace!(%id, x = position.x, y = position.y, "drag move");
        Some(position)
    }

    /// End the drag. Returns the element id if any position was written.
    pub fn release(&mut self) -> Option<ElementId> {
        let committed = match self.state {
            DragState::Dragging { id, .. } => {
                debug!(%id, "drag committed");
                Some(id)
            }
            DragState::Armed { .. } | DragState::Idle => None,
        };
        self.state = DragState::Idle;
        committed
    }

    /// Drop an armed drag without committing. Has no effect once dragging.
    ///
    /// Returns whether the controller went back to idle.
    pub fn disarm(&mut self) -> bool {
        match self.state {
            DragState::Armed { id, .. } => {
                debug!(%id, "armed drag abandoned");
                self.state = DragState::Idle;
                true
            }
            DragState::Idle => true,
            DragState::Dragging { .. } => false,
        }
    }
}

/// Clamp one axis to `[0, max(0, bound - extent)]`. Non-finite input clamps to 0.
#[must_use]
pub fn clamp_axis(value: f64, extent: f64, bound: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let upper = (bound - extent).max(0.0);
    value.clamp(0.0, upper)
}

/// Clamp an element's top-left corner so it stays inside `bounds`.
///
/// An element larger than the bounds is pinned to the leading edge.
#[must_use]
pub fn clamp_position(position: Point, size: Size, bounds: Size) -> Point {
    Point::new(
        clamp_axis(position.x, size.width, bounds.width),
        clamp_axis(position.y, size.height, bounds.height),
    )
}
