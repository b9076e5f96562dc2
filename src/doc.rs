//! Document model: placed elements, their kinds, and the z-ordered scene.
//!
//! This module defines what sits on a canvas (`Element`, `ElementKind`), a
//! sparse-update type for edits (`ElementPatch`), and the store that owns all
//! live elements of one canvas (`Scene`).
//!
//! The scene keeps its elements in ascending `z_index` order at all times.
//! New elements are only ever appended on top, so the newest element always
//! holds the maximum z-index and no external caller can assign one. After
//! every mutation the scene re-checks its invariants; a violation is logged
//! and healed in place instead of surfacing to the caller.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::camera::{Point, Rect, Size};
use crate::consts::SPAWN_EXTENT;

/// Unique identifier for a placed element.
pub type ElementId = Uuid;

// =============================================================
// Kinds
// =============================================================

/// The kind of a placed element. Chooses defaults only, never behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// Sticky note.
    Note,
    /// Free text block.
    Text,
    /// Plain shape.
    Shape,
    /// Connector between other elements.
    Connector,
    /// Image placeholder.
    Image,
    /// Portfolio project card.
    ProjectCard,
    /// Portfolio skill card.
    SkillCard,
    /// Portfolio story card.
    StoryCard,
    /// Portfolio achievement card.
    AchievementCard,
}

/// Per-kind creation defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDefaults {
    pub size: Size,
    pub color: &'static str,
    pub content: &'static str,
    /// Lowercase display name, used in toolbars and default card copy.
    pub label: &'static str,
}

impl ElementKind {
    /// Every kind, in toolbar order.
    pub const ALL: [ElementKind; 9] = [
        Self::Note,
        Self::Text,
        Self::Shape,
        Self::Connector,
        Self::Image,
        Self::ProjectCard,
        Self::SkillCard,
        Self::StoryCard,
        Self::AchievementCard,
    ];

    /// Creation defaults for this kind.
    #[must_use]
    pub fn defaults(self) -> KindDefaults {
        let (width, height, color, content, label) = match self {
            Self::Note => (200.0, 150.0, "#FEF3C7", "New sticky note", "note"),
            Self::Text => (300.0, 100.0, "#FFFFFF", "Click to edit text", "text"),
            Self::Shape => (100.0, 100.0, "#DBEAFE", "", "shape"),
            Self::Connector => (150.0, 50.0, "#F3E8FF", "New element", "connector"),
            Self::Image => (200.0, 150.0, "#F0FDF4", "New element", "image"),
            Self::ProjectCard => (200.0, 150.0, "#3B82F6", "New project", "project"),
            Self::SkillCard => (120.0, 120.0, "#22C55E", "New skill", "skill"),
            Self::StoryCard => (180.0, 100.0, "#A855F7", "New story", "story"),
            Self::AchievementCard => (160.0, 120.0, "#EAB308", "New achievement", "achievement"),
        };
        KindDefaults { size: Size::new(width, height), color, content, label }
    }

    /// Whether this kind is one of the portfolio cards.
    #[must_use]
    pub fn is_card(self) -> bool {
        matches!(self, Self::ProjectCard | Self::SkillCard | Self::StoryCard | Self::AchievementCard)
    }

    fn default_metadata(self) -> serde_json::Value {
        if self.is_card() {
            serde_json::json!({
                "description": format!("Add your {} details here...", self.defaults().label),
            })
        } else {
            serde_json::json!({})
        }
    }
}

// =============================================================
// Elements
// =============================================================

/// A placed element as stored in the scene and handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, fixed at creation.
    pub id: ElementId,
    /// Kind that chose the defaults below.
    pub kind: ElementKind,
    /// Top-left corner in canvas space. Never negative.
    pub position: Point,
    /// Extent in canvas units.
    pub size: Size,
    /// Stacking order; higher values paint on top. Unique within a scene.
    pub z_index: i64,
    /// Clockwise rotation in degrees. Cosmetic only.
    pub rotation: f64,
    /// Text payload.
    pub content: String,
    /// CSS colour string.
    pub color: String,
    /// Kind-specific extras, opaque to the engine.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Element {
    /// Whether `pt` (canvas space) lies within the element's bounding box.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        Rect::from_origin_size(self.position, self.size).contains(pt)
    }
}

/// Sparse update for an element. Only present fields are applied.
///
/// Carries no `z_index`: stacking order is assigned by the scene on insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New top-left corner, clamped to be non-negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// New text payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Metadata keys to merge or remove (null values delete keys).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ElementPatch {
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Self::default() }
    }
}

// =============================================================
// Invariants
// =============================================================

/// A broken scene invariant. Reported by [`Scene::check_invariants`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("element id {0} appears more than once")]
    DuplicateId(ElementId),
    #[error("duplicate z-index {z_index} on {first} and {second}")]
    DuplicateZIndex { z_index: i64, first: ElementId, second: ElementId },
    #[error("z-order out of sequence at {0}")]
    Unordered(ElementId),
    #[error("invalid size {width}x{height} on {id}")]
    InvalidSize { id: ElementId, width: f64, height: f64 },
    #[error("invalid position ({x}, {y}) on {id}")]
    InvalidPosition { id: ElementId, x: f64, y: f64 },
    #[error("selection references missing element {0}")]
    DanglingSelection(ElementId),
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn valid_extent(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

// =============================================================
// Scene
// =============================================================

/// Ordered collection of elements plus the current selection for one canvas.
#[derive(Debug)]
pub struct Scene {
    /// Ascending by `z_index`; the last element is on top.
    elements: Vec<Element>,
    selected_id: Option<ElementId>,
    spawn_origin: Point,
    spawn_extent: f64,
    rng: StdRng,
}

impl Scene {
    /// Create an empty scene that scatters new elements across
    /// `(100, 100) ..= (300, 300)`.
    #[must_use]
    pub fn new() -> Self {
        let (seed, _) = Uuid::new_v4().as_u64_pair();
        Self {
            elements: Vec::new(),
            selected_id: None,
            spawn_origin: Point::new(100.0, 100.0),
            spawn_extent: SPAWN_EXTENT,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Scatter new elements across `origin .. origin + extent` on both axes.
    #[must_use]
    pub fn with_spawn(mut self, origin: Point, extent: f64) -> Self {
        self.spawn_origin = Point::new(non_negative(origin.x), non_negative(origin.y));
        self.spawn_extent = non_negative(extent);
        self
    }

    /// Replace the spawn-jitter generator with a deterministic one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // --- Mutations ---

    /// Create an element of `kind` on top of the stack and return a copy.
    pub fn add(&mut self, kind: ElementKind) -> Element {
        let defaults = kind.defaults();
        let z_index = self.next_z_index();
        let element = Element {
            id: Uuid::new_v4(),
            kind,
            position: self.spawn_position(),
            size: defaults.size,
            z_index,
            rotation: 0.0,
            content: defaults.content.to_string(),
            color: defaults.color.to_string(),
            metadata: kind.default_metadata(),
        };
        debug!(id = %element.id, ?kind, z_index = element.z_index, "element added");
        self.elements.push(element.clone());
        self.ensure_invariants();
        element
    }

    /// Remove an element, clearing the selection if it pointed at it.
    ///
    /// Unknown ids are ignored.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        let removed = self.elements.remove(index);
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = None;
        }
        debug!(%id, "element removed");
        self.ensure_invariants();
        Some(removed)
    }

    /// Copy an element under a fresh id on top of the stack.
    ///
    /// Position, size, and payload are copied verbatim; callers nudge the copy
    /// themselves if overlap matters.
    pub fn duplicate(&mut self, id: &ElementId) -> Option<Element> {
        let source = self.get(id)?.clone();
        let copy = Element { id: Uuid::new_v4(), z_index: self.next_z_index(), ..source };
        debug!(source = %id, id = %copy.id, z_index = copy.z_index, "element duplicated");
        self.elements.push(copy.clone());
        self.ensure_invariants();
        Some(copy)
    }

    /// Raise an element above every other one. Returns its new z-index, or
    /// `None` for unknown ids. An element already on top keeps its index.
    pub fn bring_to_front(&mut self, id: &ElementId) -> Option<i64> {
        let current = self.get(id)?.z_index;
        if current == self.max_z_index() {
            return Some(current);
        }
        let z_index = self.next_z_index();
        let index = self.index_of(id)?;
        let mut element = self.elements.remove(index);
        element.z_index = z_index;
        debug!(%id, z_index, "element raised");
        self.elements.push(element);
        self.ensure_invariants();
        Some(z_index)
    }

    /// Shallow-merge `patch` into an element. Returns false for unknown ids.
    pub fn mutate(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
            return false;
        };
        if let Some(position) = patch.position {
            element.position = Point::new(non_negative(position.x), non_negative(position.y));
        }
        if let Some(ref content) = patch.content {
            element.content.clone_from(content);
        }
        if let Some(ref color) = patch.color {
            element.color.clone_from(color);
        }
        if let Some(rotation) = patch.rotation {
            if rotation.is_finite() {
                element.rotation = rotation;
            }
        }
        if let Some(ref metadata) = patch.metadata {
            merge_metadata(&mut element.metadata, metadata);
        }
        self.ensure_invariants();
        true
    }

    /// Select an element, or clear the selection with `None`.
    ///
    /// Returns whether the selection changed. Unknown ids leave it untouched.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        if let Some(ref id) = id {
            if self.index_of(id).is_none() {
                return false;
            }
        }
        if self.selected_id == id {
            return false;
        }
        self.selected_id = id;
        true
    }

    /// Replace all elements with a persisted snapshot, healing anything invalid.
    pub fn load_snapshot(&mut self, mut elements: Vec<Element>) {
        elements.sort_by_key(|e| e.z_index);
        self.elements = elements;
        self.selected_id = None;
        self.ensure_invariants();
    }

    /// Remove every element and clear the selection.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected_id = None;
    }

    // --- Queries ---

    /// Elements in paint order (ascending z-index).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected_id
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selected_id.as_ref().and_then(|id| self.get(id))
    }

    /// Highest z-index in use, or 0 for an empty scene.
    #[must_use]
    pub fn max_z_index(&self) -> i64 {
        self.elements.last().map_or(0, |e| e.z_index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialise the elements as an ordered JSON array.
    ///
    /// # Errors
    ///
    /// Returns `Err` if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.elements)
    }

    // --- Invariants ---

    /// Verify ordering, uniqueness, geometry, and selection invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        let mut prev: Option<&Element> = None;
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(InvariantViolation::DuplicateId(element.id));
            }
            if let Some(prev) = prev {
                if prev.z_index == element.z_index {
                    return Err(InvariantViolation::DuplicateZIndex {
                        z_index: element.z_index,
                        first: prev.id,
                        second: element.id,
                    });
                }
                if prev.z_index > element.z_index {
                    return Err(InvariantViolation::Unordered(element.id));
                }
            }
            if !valid_extent(element.size.width) || !valid_extent(element.size.height) {
                return Err(InvariantViolation::InvalidSize {
                    id: element.id,
                    width: element.size.width,
                    height: element.size.height,
                });
            }
            if !valid_extent(element.position.x) || !valid_extent(element.position.y) {
                return Err(InvariantViolation::InvalidPosition {
                    id: element.id,
                    x: element.position.x,
                    y: element.position.y,
                });
            }
            prev = Some(element);
        }
        if let Some(id) = self.selected_id {
            if self.index_of(&id).is_none() {
                return Err(InvariantViolation::DanglingSelection(id));
            }
        }
        Ok(())
    }

    /// Renormalise the scene so every invariant holds again.
    ///
    /// Keeps the existing paint order (ties broken by current position),
    /// renumbers z-indices to `1..=n`, resets invalid sizes to the kind
    /// default, clamps positions to be non-negative, and drops a dangling
    /// selection.
    pub fn heal(&mut self) {
        self.elements.sort_by_key(|e| e.z_index);
        let mut seen = HashSet::with_capacity(self.elements.len());
        for (z, element) in (1_i64..).zip(self.elements.iter_mut()) {
            element.z_index = z;
            if !seen.insert(element.id) {
                element.id = Uuid::new_v4();
                seen.insert(element.id);
            }
            if !valid_extent(element.size.width) || !valid_extent(element.size.height) {
                element.size = element.kind.defaults().size;
            }
            element.position = Point::new(non_negative(element.position.x), non_negative(element.position.y));
        }
        if let Some(id) = self.selected_id {
            if self.index_of(&id).is_none() {
                self.selected_id = None;
            }
        }
    }

    fn ensure_invariants(&mut self) {
        if let Err(violation) = self.check_invariants() {
            error!(%violation, "scene invariant violated; renormalising");
            self.heal();
        }
    }

    // --- Internals ---

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    /// One above the current top. Renumbers the stack first if the top
    /// index has no successor.
    fn next_z_index(&mut self) -> i64 {
        if let Some(next) = self.max_z_index().checked_add(1) {
            return next;
        }
        error!(max = self.max_z_index(), "z-index space exhausted; renormalising");
        self.heal();
        self.max_z_index().saturating_add(1)
    }

    fn spawn_position(&mut self) -> Point {
        let mut jitter = || {
            if self.spawn_extent > 0.0 {
                self.rng.random_range(0.0..self.spawn_extent)
            } else {
                0.0
            }
        };
        let dx = jitter();
        let dy = jitter();
        Point::new(self.spawn_origin.x + dx, self.spawn_origin.y + dy)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `incoming` object keys into `target`; null values delete keys.
fn merge_metadata(target: &mut serde_json::Value, incoming: &serde_json::Value) {
    let Some(incoming) = incoming.as_object() else {
        return;
    };
    if !target.is_object() {
        *target = serde_json::json!({});
    }
    if let Some(existing) = target.as_object_mut() {
        for (k, v) in incoming {
            if v.is_null() {
                existing.remove(k);
            } else {
                existing.insert(k.clone(), v.clone());
            }
        }
    }
}
