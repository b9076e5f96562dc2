//! Editor workspace: one independent session per canvas.
//!
//! The page canvas and the whiteboard canvas never share elements, selection,
//! or viewport. Switching canvases throws the target's session away and
//! starts it fresh, so nothing from an earlier visit bleeds into the next.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::camera::Size;
use crate::config::EngineConfig;
use crate::engine::{Action, EngineCore};

/// Which canvas a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasKind {
    /// Fixed-size page with a chosen [`PageSize`].
    #[default]
    Page,
    /// Free-form whiteboard.
    Whiteboard,
}

/// Logical page dimensions for the page canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// 1920 x 1080.
    #[default]
    Presentation,
    /// 816 x 1056 (8.5 x 11 in at 96 dpi).
    Letter,
    /// 405 x 720.
    Mobile,
    /// 800 x 800.
    Square,
    /// Any user-chosen size.
    Custom(Size),
}

impl PageSize {
    /// The selectable presets, in menu order. `Custom` starts at 800 x 1000.
    pub const PRESETS: [PageSize; 5] = [
        Self::Presentation,
        Self::Letter,
        Self::Mobile,
        Self::Square,
        Self::Custom(Size { width: 800.0, height: 1000.0 }),
    ];

    /// Display name, as shown in the page-size menu.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Presentation => "Presentation (16:9)",
            Self::Letter => "Letter (8.5×11)",
            Self::Mobile => "Mobile (9:16)",
            Self::Square => "Square",
            Self::Custom(_) => "Custom",
        }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        match *self {
            Self::Presentation => Size::new(1920.0, 1080.0),
            Self::Letter => Size::new(816.0, 1056.0),
            Self::Mobile => Size::new(405.0, 720.0),
            Self::Square => Size::new(800.0, 800.0),
            Self::Custom(size) => size,
        }
    }

    /// Look up a preset by display name, ignoring case and surrounding space.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::PRESETS.into_iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

/// Owns the per-canvas sessions and the page size.
#[derive(Debug)]
pub struct Workspace {
    active: CanvasKind,
    page: EngineCore,
    whiteboard: EngineCore,
    page_size: PageSize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Page and whiteboard sessions from their presets, page canvas active.
    #[must_use]
    pub fn new() -> Self {
        Self::with_configs(EngineConfig::page(), EngineConfig::whiteboard())
    }

    /// Sessions from explicit configs. The page canvas starts with the
    /// presentation page size.
    #[must_use]
    pub fn with_configs(page: EngineConfig, whiteboard: EngineConfig) -> Self {
        let page_size = PageSize::default();
        let mut page = EngineCore::with_config(page);
        page.set_page_size(page_size.size());
        Self { active: CanvasKind::Page, page, whiteboard: EngineCore::with_config(whiteboard), page_size }
    }

    #[must_use]
    pub fn active(&self) -> CanvasKind {
        self.active
    }

    /// Session of the active canvas.
    #[must_use]
    pub fn core(&self) -> &EngineCore {
        self.session(self.active)
    }

    /// Mutable session of the active canvas.
    pub fn core_mut(&mut self) -> &mut EngineCore {
        match self.active {
            CanvasKind::Page => &mut self.page,
            CanvasKind::Whiteboard => &mut self.whiteboard,
        }
    }

    #[must_use]
    pub fn session(&self, kind: CanvasKind) -> &EngineCore {
        match kind {
            CanvasKind::Page => &self.page,
            CanvasKind::Whiteboard => &self.whiteboard,
        }
    }

    /// Make `kind` the active canvas with a fresh session.
    ///
    /// Switching to the canvas that is already active changes nothing.
    pub fn switch_to(&mut self, kind: CanvasKind) -> Vec<Action> {
        if kind == self.active {
            return Vec::new();
        }
        let fresh = EngineCore::with_config(self.session(kind).config().clone());
        match kind {
            CanvasKind::Page => self.page = fresh,
            CanvasKind::Whiteboard => self.whiteboard = fresh,
        }
        self.active = kind;
        debug!(?kind, "canvas switched");
        let viewport = self.core().viewport();
        vec![Action::SelectionChanged(None), Action::ViewportChanged(viewport), Action::RenderNeeded]
    }

    // --- Page size ---

    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: PageSize) -> Vec<Action> {
        let dims = size.size();
        let actions = self.page.set_page_size(dims);
        if actions.is_empty() {
            return actions;
        }
        self.page_size = size;
        debug!(name = size.name(), width = dims.width, height = dims.height, "page size changed");
        actions
    }

    /// Select a preset by display name. Unknown names are ignored.
    pub fn set_page_size_by_name(&mut self, name: &str) -> Vec<Action> {
        match PageSize::from_name(name) {
            Some(size) => self.set_page_size(size),
            None => {
                warn!(name, "unknown page size");
                Vec::new()
            }
        }
    }

    /// Use a custom page size. Non-positive or non-finite sizes are ignored.
    pub fn set_custom_page_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.set_page_size(PageSize::Custom(Size::new(width, height)))
    }
}
