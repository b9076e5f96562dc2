//! Engine configuration: zoom limits, gesture tuning, and drag bounds.
//!
//! Hosts usually start from one of the two presets ([`EngineConfig::page`],
//! [`EngineConfig::whiteboard`]), optionally overlay a JSON document, then
//! apply environment overrides:
//!
//! - `EASEL_ZOOM_MIN` / `EASEL_ZOOM_MAX`
//! - `EASEL_PINCH_DEAD_ZONE_PX`
//! - `EASEL_PINCH_STEP`
//! - `EASEL_WHEEL_STEP`
//!
//! Unset or unparsable variables keep the current value.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::camera::{Point, Size, ZoomRange};
use crate::consts::{
    BUTTON_ZOOM_STEP, FALLBACK_CONTAINER_HEIGHT, FALLBACK_CONTAINER_WIDTH, PAGE_DEFAULT_ZOOM, PAGE_ZOOM_MIN,
    PINCH_DEAD_ZONE_PX, PINCH_ZOOM_STEP, SPAWN_EXTENT, WHEEL_ZOOM_STEP, WHITEBOARD_ZOOM_MIN, ZOOM_MAX,
};

/// What a dragged element's trailing edge is clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// The measured canvas container (fallback size until measured).
    #[default]
    Container,
    /// The logical page size, independent of zoom and window size.
    Page,
}

/// A configuration value that cannot drive the engine.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid zoom range {min}..={max}")]
    ZoomRange { min: f64, max: f64 },
    #[error("default zoom {zoom} outside {min}..={max}")]
    DefaultZoom { zoom: f64, min: f64, max: f64 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("pinch dead zone must be non-negative, got {0}")]
    DeadZone(f64),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom: ZoomRange,
    /// Zoom applied on creation and by `reset_viewport`.
    pub default_zoom: f64,
    pub pinch_dead_zone_px: f64,
    pub pinch_step: f64,
    pub wheel_step: f64,
    /// Zoom-in / zoom-out command step.
    pub button_step: f64,
    /// Container size assumed until the host measures the canvas.
    pub fallback_container: Size,
    /// Top-left corner of the region new elements are scattered across.
    pub spawn_origin: Point,
    pub spawn_extent: f64,
    pub bounds: BoundsPolicy,
    /// Logical page size, used by [`BoundsPolicy::Page`].
    pub page: Size,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::whiteboard()
    }
}

impl EngineConfig {
    /// Free-form whiteboard canvas.
    #[must_use]
    pub fn whiteboard() -> Self {
        Self {
            zoom: ZoomRange::new(WHITEBOARD_ZOOM_MIN, ZOOM_MAX),
            default_zoom: 1.0,
            pinch_dead_zone_px: PINCH_DEAD_ZONE_PX,
            pinch_step: PINCH_ZOOM_STEP,
            wheel_step: WHEEL_ZOOM_STEP,
            button_step: BUTTON_ZOOM_STEP,
            fallback_container: Size::new(FALLBACK_CONTAINER_WIDTH, FALLBACK_CONTAINER_HEIGHT),
            spawn_origin: Point::new(100.0, 100.0),
            spawn_extent: SPAWN_EXTENT,
            bounds: BoundsPolicy::Container,
            page: Size::new(1920.0, 1080.0),
        }
    }

    /// Fixed-size page canvas, zoomed out so a presentation page fits.
    #[must_use]
    pub fn page() -> Self {
        Self {
            zoom: ZoomRange::new(PAGE_ZOOM_MIN, ZOOM_MAX),
            default_zoom: PAGE_DEFAULT_ZOOM,
            spawn_origin: Point::new(50.0, 50.0),
            ..Self::whiteboard()
        }
    }

    /// Parse a JSON object over the whiteboard defaults and validate it.
    ///
    /// Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed input, or the first
    /// validation failure.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `EASEL_*` environment overrides.
    ///
    /// If the overridden config fails validation it is discarded with a
    /// warning and `self` is returned unchanged.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        let overridden = Self {
            zoom: ZoomRange::new(env_parse("EASEL_ZOOM_MIN", self.zoom.min), env_parse("EASEL_ZOOM_MAX", self.zoom.max)),
            pinch_dead_zone_px: env_parse("EASEL_PINCH_DEAD_ZONE_PX", self.pinch_dead_zone_px),
            pinch_step: env_parse("EASEL_PINCH_STEP", self.pinch_step),
            wheel_step: env_parse("EASEL_WHEEL_STEP", self.wheel_step),
            ..self.clone()
        };
        match overridden.validate() {
            Ok(()) => overridden,
            Err(error) => {
                warn!(%error, "ignoring invalid environment overrides");
                self
            }
        }
    }

    /// Check ranges and steps.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ZoomRange { min, max } = self.zoom;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::ZoomRange { min, max });
        }
        if !(self.default_zoom >= min && self.default_zoom <= max) {
            return Err(ConfigError::DefaultZoom { zoom: self.default_zoom, min, max });
        }
        for (field, value) in [
            ("pinch_step", self.pinch_step),
            ("wheel_step", self.wheel_step),
            ("button_step", self.button_step),
            ("fallback_container.width", self.fallback_container.width),
            ("fallback_container.height", self.fallback_container.height),
            ("page.width", self.page.width),
            ("page.height", self.page.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.pinch_dead_zone_px.is_finite() && self.pinch_dead_zone_px >= 0.0) {
            return Err(ConfigError::DeadZone(self.pinch_dead_zone_px));
        }
        Ok(())
    }
}

/// Read and parse an environment variable, falling back to `default`.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, raw = %raw, "unparsable environment value; keeping default");
                default
            }
        },
        Err(_) => default,
    }
}
