//! Render projection: lays the scene out in local (canvas-element) pixels.
//!
//! The projection is a pure function of the scene and viewport. The editor
//! and the read-only preview both paint from it, so they always agree on
//! where an element appears. It applies the same transform as
//! [`Viewport::canvas_to_local`], which makes it the exact inverse of the
//! pointer path through [`crate::camera::to_canvas_space`].

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use serde::Serialize;

use crate::camera::{Rect, Viewport};
use crate::doc::{Element, ElementId, ElementKind, Scene};

/// One element as it should appear on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedElement {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Screen rectangle relative to the canvas element's top-left corner.
    pub rect: Rect,
    pub rotation: f64,
    pub z_index: i64,
    pub color: String,
    pub content: String,
    pub selected: bool,
}

impl ProjectedElement {
    fn from_element(element: &Element, viewport: &Viewport, selected: bool) -> Self {
        let origin = viewport.canvas_to_local(element.position);
        Self {
            id: element.id,
            kind: element.kind,
            rect: Rect::new(
                origin.x,
                origin.y,
                element.size.width * viewport.zoom,
                element.size.height * viewport.zoom,
            ),
            rotation: element.rotation,
            z_index: element.z_index,
            color: element.color.clone(),
            content: element.content.clone(),
            selected,
        }
    }
}

/// Project every element of `scene` through `viewport`, in paint order
/// (ascending z-index, so later entries occlude earlier ones).
#[must_use]
pub fn project(scene: &Scene, viewport: &Viewport) -> Vec<ProjectedElement> {
    let selected = scene.selected_id();
    scene
        .elements()
        .iter()
        .map(|e| ProjectedElement::from_element(e, viewport, selected == Some(e.id)))
        .collect()
}

/// Read-only view of a scene for preview rendering.
///
/// Holds a shared borrow, so nothing can mutate the scene while a preview
/// is alive. Selection is never shown.
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    scene: &'a Scene,
    viewport: Viewport,
}

impl<'a> Preview<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene, viewport: Viewport) -> Self {
        Self { scene, viewport }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scene.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Same layout as [`project`], with every `selected` flag cleared.
    #[must_use]
    pub fn project(&self) -> Vec<ProjectedElement> {
        self.scene
            .elements()
            .iter()
            .map(|e| ProjectedElement::from_element(e, &self.viewport, false))
            .collect()
    }
}
