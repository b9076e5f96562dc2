//! Hit-testing against placed elements.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{Element, ElementId};

/// Return the topmost element whose bounding box contains `canvas_pt`.
///
/// Boxes are axis-aligned (`position .. position + size`, edges included);
/// rotation is cosmetic and ignored. The result depends only on `z_index`,
/// not on the order of `elements`.
#[must_use]
pub fn hit_test(canvas_pt: Point, elements: &[Element]) -> Option<ElementId> {
    elements
        .iter()
        .filter(|e| e.contains(canvas_pt))
        .max_by_key(|e| e.z_index)
        .map(|e| e.id)
}
