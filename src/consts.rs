//! Shared numeric constants for the engine.

// ── Zoom ────────────────────────────────────────────────────────

/// Lowest zoom factor on the page canvas.
pub const PAGE_ZOOM_MIN: f64 = 0.25;

/// Lowest zoom factor on the whiteboard canvas.
pub const WHITEBOARD_ZOOM_MIN: f64 = 0.5;

/// Highest zoom factor on either canvas.
pub const ZOOM_MAX: f64 = 2.0;

/// Zoom the page canvas opens at, so a full presentation page fits the window.
pub const PAGE_DEFAULT_ZOOM: f64 = 0.48;

/// Zoom change per ctrl + wheel tick.
pub const WHEEL_ZOOM_STEP: f64 = 0.05;

/// Zoom change per pinch step.
pub const PINCH_ZOOM_STEP: f64 = 0.03;

/// Zoom change per toolbar zoom-in / zoom-out command.
pub const BUTTON_ZOOM_STEP: f64 = 0.1;

/// Finger-distance change (screen pixels) a pinch must exceed before it zooms.
pub const PINCH_DEAD_ZONE_PX: f64 = 2.0;

// ── Bounds ──────────────────────────────────────────────────────

/// Container width assumed until the host reports a measured size.
pub const FALLBACK_CONTAINER_WIDTH: f64 = 800.0;

/// Container height assumed until the host reports a measured size.
pub const FALLBACK_CONTAINER_HEIGHT: f64 = 600.0;

/// Side length of the square region new elements are scattered across.
pub const SPAWN_EXTENT: f64 = 200.0;

// ── Rendering ───────────────────────────────────────────────────

/// Selection outline dash length in screen pixels.
pub const SELECTION_DASH_PX: f64 = 4.0;

/// Selection outline colour.
pub const SELECTION_STROKE: &str = "#1E90FF";

/// Swatches offered by the colour inspector, grouped in fours by hue.
pub const PALETTE: [&str; 24] = [
    "#FEF3C7", "#FDE68A", "#FCD34D", "#F59E0B", // yellows
    "#DBEAFE", "#93C5FD", "#60A5FA", "#3B82F6", // blues
    "#F3E8FF", "#C4B5FD", "#A78BFA", "#8B5CF6", // purples
    "#F0FDF4", "#86EFAC", "#4ADE80", "#22C55E", // greens
    "#FEF2F2", "#FCA5A5", "#F87171", "#EF4444", // reds
    "#FFFFFF", "#F9FAFB", "#F3F4F6", "#E5E7EB", // grays
];
