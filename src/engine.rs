use serde::Serialize;
use tracing::{debug, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Point, Rect, Size, Viewport, to_canvas_space};
use crate::config::{BoundsPolicy, EngineConfig};
use crate::doc::{Element, ElementId, ElementKind, ElementPatch, Scene};
use crate::drag::{DragController, DragState};
use crate::gesture::{GestureDisambiguator, GestureState, Route};
use crate::hit::hit_test;
use crate::input::{Modifiers, PointerEvent, PointerId, WheelDelta};
use crate::projection::{Preview, ProjectedElement, project};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers and commands for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId, patch: ElementPatch },
    ElementDeleted { id: ElementId },
    /// An element was restacked; the host persists the new z-index.
    ElementRaised { id: ElementId, z_index: i64 },
    SelectionChanged(Option<ElementId>),
    ViewportChanged(Viewport),
    /// The host should call `preventDefault()` on the DOM event.
    PreventDefault,
    SetCursor(&'static str),
    RenderNeeded,
}

/// Whether the canvas accepts edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Edit,
    /// Read-only: input handlers and commands do nothing.
    Preview,
}

/// Read model handed to presentation collaborators.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SceneView<'a> {
    pub elements: &'a [Element],
    pub selected_id: Option<ElementId>,
    pub viewport: Viewport,
    pub mode: Mode,
}

impl SceneView<'_> {
    /// Serialise the view for the host shell.
    ///
    /// # Errors
    ///
    /// Returns `Err` if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug)]
pub struct EngineCore {
    scene: Scene,
    viewport: Viewport,
    config: EngineConfig,
    drag: DragController,
    gesture: GestureDisambiguator,
    mode: Mode,
    /// Canvas element rectangle in screen space, once the host has measured it.
    container: Option<Rect>,
    dpr: f64,
    /// Element whose content is open in the host's text editor.
    editing: Option<ElementId>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh session for one canvas with the given tuning.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scene: Scene::new().with_spawn(config.spawn_origin, config.spawn_extent),
            viewport: Viewport::with_zoom(config.zoom.clamp(config.default_zoom)),
            drag: DragController::new(),
            gesture: GestureDisambiguator::new(config.pinch_dead_zone_px, config.pinch_step, config.wheel_step),
            mode: Mode::Edit,
            container: None,
            dpr: 1.0,
            editing: None,
            config,
        }
    }

    /// Make spawn positions deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.scene = std::mem::take(&mut self.scene).with_seed(seed);
        self
    }

    // --- Mode ---

    /// Switch between editing and preview. Entering preview drops any
    /// pointer session and open edit.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        debug!(?mode, "mode changed");
        let mut actions = Vec::new();
        if mode == Mode::Preview {
            self.gesture.cancel_all();
            if let Some(id) = self.drag.release() {
                actions.extend(self.commit_drag(id));
            }
            self.editing = None;
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn is_preview(&self) -> bool {
        self.mode == Mode::Preview
    }

    // --- Data inputs ---

    /// Hydrate the scene from a persisted, ordered element array.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) -> Vec<Action> {
        self.gesture.cancel_all();
        self.drag.release();
        self.editing = None;
        self.scene.load_snapshot(elements);
        vec![Action::SelectionChanged(None), Action::RenderNeeded]
    }

    // --- Viewport ---

    /// Record the canvas element's screen rectangle and device pixel ratio.
    ///
    /// Non-finite or empty rectangles are ignored and the previous
    /// measurement (or the fallback size) stays in effect.
    pub fn set_viewport(&mut self, bounds: Rect, dpr: f64) -> Vec<Action> {
        let measurable = [bounds.left, bounds.top, bounds.width, bounds.height].iter().all(|v| v.is_finite())
            && bounds.width > 0.0
            && bounds.height > 0.0;
        if measurable {
            self.container = Some(bounds);
        } else {
            debug!(?bounds, "ignoring unmeasurable container");
        }
        if dpr.is_finite() && dpr > 0.0 {
            self.dpr = dpr;
        }
        vec![Action::RenderNeeded]
    }

    /// Pan back to the origin and restore the configured default zoom.
    pub fn reset_viewport(&mut self) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        self.replace_viewport(Viewport::with_zoom(self.config.zoom.clamp(self.config.default_zoom)))
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_by(self.config.button_step)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_by(-self.config.button_step)
    }

    /// Set the zoom factor directly, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let zoom = self.config.zoom.clamp(zoom);
        self.replace_viewport(Viewport { zoom, ..self.viewport })
    }

    fn zoom_by(&mut self, delta: f64) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let zoom = self.config.zoom.step(self.viewport.zoom, delta);
        self.replace_viewport(Viewport { zoom, ..self.viewport })
    }

    fn replace_viewport(&mut self, viewport: Viewport) -> Vec<Action> {
        if viewport == self.viewport {
            return Vec::new();
        }
        self.viewport = viewport;
        trace!(pan_x = viewport.pan_x, pan_y = viewport.pan_y, zoom = viewport.zoom, "viewport changed");
        vec![Action::ViewportChanged(viewport), Action::RenderNeeded]
    }

    /// Change the logical page size used by [`BoundsPolicy::Page`].
    pub fn set_page_size(&mut self, page: Size) -> Vec<Action> {
        if !(page.width.is_finite() && page.height.is_finite() && page.width > 0.0 && page.height > 0.0) {
            debug!(?page, "ignoring invalid page size");
            return Vec::new();
        }
        self.config.page = page;
        vec![Action::RenderNeeded]
    }

    // --- Commands ---

    /// Add an element of `kind` on top of the stack.
    pub fn add_element(&mut self, kind: ElementKind) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let element = self.scene.add(kind);
        vec![Action::ElementCreated(element), Action::RenderNeeded]
    }

    /// Delete an element. Unknown ids are ignored.
    pub fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let was_selected = self.scene.selected_id() == Some(*id);
        if self.scene.remove(id).is_none() {
            trace!(%id, "delete of unknown element ignored");
            return Vec::new();
        }
        if self.editing == Some(*id) {
            debug!(%id, "edit cancelled; element deleted");
            self.editing = None;
        }
        if self.drag.active_id() == Some(*id) {
            self.drag.release();
        }
        let mut actions = vec![Action::ElementDeleted { id: *id }];
        if was_selected {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Copy an element to the top of the stack under a new id.
    pub fn duplicate_element(&mut self, id: &ElementId) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        match self.scene.duplicate(id) {
            Some(copy) => vec![Action::ElementCreated(copy), Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Move an element to the top of the stack.
    pub fn bring_to_front(&mut self, id: &ElementId) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let before = self.scene.get(id).map(|e| e.z_index);
        match self.scene.bring_to_front(id) {
            Some(z_index) if before != Some(z_index) => {
                vec![Action::ElementRaised { id: *id, z_index }, Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    pub fn set_color(&mut self, id: &ElementId, color: &str) -> Vec<Action> {
        self.apply_patch(id, ElementPatch::color(color))
    }

    pub fn set_content(&mut self, id: &ElementId, content: &str) -> Vec<Action> {
        self.apply_patch(id, ElementPatch::content(content))
    }

    /// Apply an arbitrary patch (position, rotation, metadata, ...).
    pub fn update_element(&mut self, id: &ElementId, patch: ElementPatch) -> Vec<Action> {
        self.apply_patch(id, patch)
    }

    fn apply_patch(&mut self, id: &ElementId, patch: ElementPatch) -> Vec<Action> {
        if self.is_preview() || !self.scene.mutate(id, &patch) {
            return Vec::new();
        }
        vec![Action::ElementUpdated { id: *id, patch }, Action::RenderNeeded]
    }

    /// Select an element, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<ElementId>) -> Vec<Action> {
        if self.is_preview() || !self.scene.select(id) {
            return Vec::new();
        }
        vec![Action::SelectionChanged(self.scene.selected_id()), Action::RenderNeeded]
    }

    // --- Content editing ---

    /// Open an edit session on `id`, returning the text to seed the editor.
    pub fn begin_edit(&mut self, id: &ElementId) -> Option<String> {
        if self.is_preview() {
            return None;
        }
        let content = self.scene.get(id)?.content.clone();
        self.editing = Some(*id);
        debug!(%id, "edit started");
        Some(content)
    }

    /// Write the edited text back and close the session.
    pub fn commit_edit(&mut self, text: &str) -> Vec<Action> {
        let Some(id) = self.editing.take() else {
            return Vec::new();
        };
        debug!(%id, "edit committed");
        self.apply_patch(&id, ElementPatch::content(text))
    }

    /// Close the edit session without writing.
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.editing.take() {
            debug!(%id, "edit cancelled");
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, ev: &PointerEvent) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let route = self.gesture.pointer_down(ev, &self.viewport, self.drag.is_dragging());
        self.dispatch(route)
    }

    pub fn on_pointer_move(&mut self, ev: &PointerEvent) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let route = self.gesture.pointer_move(ev);
        self.dispatch(route)
    }

    pub fn on_pointer_up(&mut self, id: PointerId) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let route = self.gesture.pointer_up(id);
        self.dispatch(route)
    }

    /// Pointer left the canvas: end every session, keeping the last position.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let route = self.gesture.cancel_all();
        let mut actions = self.dispatch(route);
        if let Some(id) = self.drag.release() {
            actions.extend(self.commit_drag(id));
        }
        actions
    }

    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if self.is_preview() {
            return Vec::new();
        }
        let route = self.gesture.wheel(delta, modifiers);
        self.dispatch(route)
    }

    fn dispatch(&mut self, route: Route) -> Vec<Action> {
        match route {
            Route::Ignore => Vec::new(),
            Route::Press { screen } => self.press(screen),
            Route::Drag { screen } => {
                let pt = self.screen_to_canvas(screen);
                let bounds = self.bounds();
                if self.drag.pointer_move(pt, &mut self.scene, bounds).is_some() {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Route::Release => match self.drag.release() {
                Some(id) => self.commit_drag(id),
                None => Vec::new(),
            },
            Route::BeginPan => vec![Action::PreventDefault, Action::SetCursor("grabbing")],
            Route::Pan { pan_x, pan_y } => self.replace_viewport(Viewport { pan_x, pan_y, ..self.viewport }),
            Route::BeginPinch => {
                self.drag.disarm();
                vec![Action::PreventDefault]
            }
            Route::Zoom { delta } => {
                let mut actions = vec![Action::PreventDefault];
                let zoom = self.config.zoom.step(self.viewport.zoom, delta);
                actions.extend(self.replace_viewport(Viewport { zoom, ..self.viewport }));
                actions
            }
            Route::End => vec![Action::SetCursor("default")],
            Route::Suppress => vec![Action::PreventDefault],
        }
    }

    fn press(&mut self, screen: Point) -> Vec<Action> {
        let pt = self.screen_to_canvas(screen);
        let hit = hit_test(pt, self.scene.elements());
        let mut actions = Vec::new();
        if self.scene.select(hit) {
            actions.push(Action::SelectionChanged(hit));
            actions.push(Action::RenderNeeded);
        }
        if let Some(element) = hit.and_then(|id| self.scene.get(&id)) {
            self.drag.press(element, pt);
            actions.push(Action::SetCursor("grabbing"));
        }
        actions
    }

    fn commit_drag(&self, id: ElementId) -> Vec<Action> {
        let Some(element) = self.scene.get(&id) else {
            return Vec::new();
        };
        vec![
            Action::ElementUpdated { id, patch: ElementPatch::position(element.position) },
            Action::SetCursor("default"),
            Action::RenderNeeded,
        ]
    }

    fn screen_to_canvas(&self, screen: Point) -> Point {
        let origin = self.container.unwrap_or_default();
        to_canvas_space(screen, &self.viewport, &origin)
    }

    // --- Queries ---

    /// Measured canvas size, or the configured fallback before measurement.
    #[must_use]
    pub fn container_size(&self) -> Size {
        self.container.map_or(self.config.fallback_container, |r| r.size())
    }

    /// Size dragged elements are clamped against.
    #[must_use]
    pub fn bounds(&self) -> Size {
        match self.config.bounds {
            BoundsPolicy::Container => self.container_size(),
            BoundsPolicy::Page => self.config.page,
        }
    }

    /// Read model for presentation collaborators.
    #[must_use]
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            elements: self.scene.elements(),
            selected_id: self.scene.selected_id(),
            viewport: self.viewport,
            mode: self.mode,
        }
    }

    /// Screen layout of every element in paint order.
    #[must_use]
    pub fn projection(&self) -> Vec<ProjectedElement> {
        match self.mode {
            Mode::Edit => project(&self.scene, &self.viewport),
            Mode::Preview => self.preview().project(),
        }
    }

    /// Read-only projection of the current scene and viewport.
    #[must_use]
    pub fn preview(&self) -> Preview<'_> {
        Preview::new(&self.scene, self.viewport)
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.scene.selected_id()
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.scene.get(id)
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Self {
        Self { canvas, core: EngineCore::with_config(config) }
    }

    // --- Delegated commands ---

    pub fn load_snapshot(&mut self, elements: Vec<Element>) -> Vec<Action> {
        self.core.load_snapshot(elements)
    }

    pub fn add_element(&mut self, kind: ElementKind) -> Vec<Action> {
        self.core.add_element(kind)
    }

    pub fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        self.core.delete_element(id)
    }

    pub fn duplicate_element(&mut self, id: &ElementId) -> Vec<Action> {
        self.core.duplicate_element(id)
    }

    pub fn bring_to_front(&mut self, id: &ElementId) -> Vec<Action> {
        self.core.bring_to_front(id)
    }

    pub fn set_color(&mut self, id: &ElementId, color: &str) -> Vec<Action> {
        self.core.set_color(id, color)
    }

    pub fn set_content(&mut self, id: &ElementId, content: &str) -> Vec<Action> {
        self.core.set_content(id, content)
    }

    pub fn reset_viewport(&mut self) -> Vec<Action> {
        self.core.reset_viewport()
    }

    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        self.core.set_mode(mode)
    }

    // --- Viewport ---

    /// Update the canvas element's screen rectangle and device pixel ratio,
    /// resizing the backing store to match.
    pub fn set_viewport(&mut self, bounds: Rect, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(bounds, dpr);
        let size = self.core.container_size();
        let dpr = self.core.dpr();
        self.canvas.set_width(backing_px(size.width * dpr));
        self.canvas.set_height(backing_px(size.height * dpr));
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, ev: &PointerEvent) -> Vec<Action> {
        self.core.on_pointer_down(ev)
    }

    pub fn on_pointer_move(&mut self, ev: &PointerEvent) -> Vec<Action> {
        self.core.on_pointer_move(ev)
    }

    pub fn on_pointer_up(&mut self, id: PointerId) -> Vec<Action> {
        self.core.on_pointer_up(id)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(delta, modifiers)
    }

    // --- Render ---

    /// Draw the current projection to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        let size = self.core.container_size();
        render::draw(&ctx, &self.core.projection(), size, self.core.dpr())
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.core.selection()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.viewport()
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.core.element(id)
    }

    #[must_use]
    pub fn view(&self) -> SceneView<'_> {
        self.core.view()
    }
}

/// Round a CSS-pixel extent to a whole backing-store dimension.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_px(value: f64) -> u32 {
    if value.is_finite() { value.round().clamp(0.0, f64::from(u32::MAX)) as u32 } else { 0 }
}
