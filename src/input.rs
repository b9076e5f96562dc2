//! Input model: pointer devices, buttons, modifier keys, and wheel deltas.
//!
//! These are the raw events the host shell forwards from the DOM. They carry
//! screen coordinates; conversion to canvas space happens in the engine once
//! the gesture disambiguator has decided where an event goes.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Host-assigned pointer identifier (the DOM `pointerId`).
pub type PointerId = i32;

/// Pointer id used for mouse events when the host does not track one.
pub const MOUSE_POINTER_ID: PointerId = 1;

/// Which kind of device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button (or a touch contact).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Only ctrl held.
    #[must_use]
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }
}

/// A pointer-down, move, or up event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub button: Button,
    /// Position in screen space (CSS pixels).
    pub screen: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary-button mouse event with no modifiers.
    #[must_use]
    pub fn mouse(screen: Point) -> Self {
        Self {
            id: MOUSE_POINTER_ID,
            kind: PointerKind::Mouse,
            button: Button::Primary,
            screen,
            modifiers: Modifiers::default(),
        }
    }

    /// Touch contact `id` at `screen`.
    #[must_use]
    pub fn touch(id: PointerId, screen: Point) -> Self {
        Self { id, kind: PointerKind::Touch, button: Button::Primary, screen, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_button(self, button: Button) -> Self {
        Self { button, ..self }
    }

    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    #[must_use]
    pub fn is_touch(&self) -> bool {
        self.kind == PointerKind::Touch
    }

    /// Whether this press asks for a canvas pan rather than an element drag:
    /// middle mouse button, or primary mouse button with ctrl held.
    #[must_use]
    pub fn requests_pan(&self) -> bool {
        self.kind == PointerKind::Mouse
            && (self.button == Button::Middle || (self.button == Button::Primary && self.modifiers.ctrl))
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    #[must_use]
    pub fn vertical(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }
}
