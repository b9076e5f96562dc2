//! Direct-manipulation canvas engine for a visual page and whiteboard editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive core of the editor: translating raw pointer and wheel events
//! into element drags, canvas pans, and zoom steps; hit-testing and selection;
//! z-ordering; and projecting the scene onto the screen. The host JavaScript
//! layer wires DOM events to the engine, applies the returned
//! [`engine::Action`]s, and renders toolbars and inspectors from the read
//! model.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Element types and the z-ordered [`doc::Scene`] |
//! | [`camera`] | Viewport, zoom range, and coordinate conversions |
//! | [`input`] | Pointer, button, modifier, and wheel event types |
//! | [`gesture`] | Classifies pointer sessions as drag, pan, or pinch |
//! | [`drag`] | Element drag state machine and bounds clamping |
//! | [`hit`] | Hit-testing against placed elements |
//! | [`projection`] | Scene-to-screen layout and the read-only preview |
//! | [`render`] | Canvas 2D painter |
//! | [`config`] | Engine tuning, presets, and env overrides |
//! | [`workspace`] | Per-canvas sessions and page sizes |
//! | [`consts`] | Shared numeric constants (zoom limits, steps, palette) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod projection;
pub mod render;
pub mod workspace;
