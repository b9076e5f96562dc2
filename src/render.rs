//! Canvas painter for a projected scene.
//!
//! Input comes from [`crate::projection`] and is already in local pixels, so
//! the only transform applied here is the device pixel ratio. Nothing in this
//! module writes to the scene. Failed `Canvas2D` calls surface as `JsValue`
//! errors for [`crate::engine::Engine::render`] to hand back to the host.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Size;
use crate::consts::{SELECTION_DASH_PX, SELECTION_STROKE};
use crate::doc::ElementKind;
use crate::projection::ProjectedElement;

/// Horizontal text padding inside an element, in screen pixels.
const TEXT_PADDING_PX: f64 = 8.0;

const DARK_TEXT: &str = "#1F2937";
const LIGHT_TEXT: &str = "#FFFFFF";
const OUTLINE: &str = "rgba(31, 41, 55, 0.25)";

/// Draw every projected element, then the selection outline.
///
/// `size` is the canvas element's CSS size. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Propagates the first failing `Canvas2D` call.
pub fn draw(ctx: &CanvasRenderingContext2d, elements: &[ProjectedElement], size: Size, dpr: f64) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, size.width, size.height);

    // Input is already in paint order (bottom first).
    for el in elements {
        draw_element(ctx, el)?;
    }

    for el in elements.iter().filter(|e| e.selected) {
        draw_selection(ctx, el)?;
    }

    Ok(())
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element(ctx: &CanvasRenderingContext2d, el: &ProjectedElement) -> Result<(), JsValue> {
    ctx.save();
    translate_and_rotate(ctx, el)?;
    let (w, h) = (el.rect.width, el.rect.height);

    match el.kind {
        ElementKind::Connector => draw_connector(ctx, el),
        ElementKind::Image => draw_image_placeholder(ctx, el),
        ElementKind::Text => {
            ctx.set_fill_style_str(&el.color);
            ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        }
        _ => {
            ctx.set_fill_style_str(&el.color);
            ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
            ctx.set_stroke_style_str(OUTLINE);
            ctx.set_line_width(1.0);
            ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
        }
    }

    let text_color = if el.kind.is_card() { LIGHT_TEXT } else { DARK_TEXT };
    draw_text(ctx, el, text_color)?;
    ctx.restore();
    Ok(())
}

/// A connector is drawn as a line across its box with a head at the right end.
fn draw_connector(ctx: &CanvasRenderingContext2d, el: &ProjectedElement) {
    let hw = el.rect.width / 2.0;
    let head = (el.rect.height * 0.3).min(hw);

    ctx.set_stroke_style_str(DARK_TEXT);
    ctx.set_fill_style_str(DARK_TEXT);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(-hw, 0.0);
    ctx.line_to(hw - head, 0.0);
    ctx.stroke();

    ctx.begin_path();
    ctx.move_to(hw, 0.0);
    ctx.line_to(hw - head, -head / 2.0);
    ctx.line_to(hw - head, head / 2.0);
    ctx.close_path();
    ctx.fill();
}

/// Image elements carry no pixels; draw a crossed placeholder frame.
fn draw_image_placeholder(ctx: &CanvasRenderingContext2d, el: &ProjectedElement) {
    let (w, h) = (el.rect.width, el.rect.height);
    let (x, y) = (-w / 2.0, -h / 2.0);

    ctx.set_fill_style_str(&el.color);
    ctx.fill_rect(x, y, w, h);
    ctx.set_stroke_style_str(OUTLINE);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(x, y, w, h);
    ctx.begin_path();
    ctx.move_to(x, y);
    ctx.line_to(x + w, y + h);
    ctx.move_to(x + w, y);
    ctx.line_to(x, y + h);
    ctx.stroke();
}

// =============================================================
// Text
// =============================================================

#[allow(clippy::cast_precision_loss)]
fn draw_text(ctx: &CanvasRenderingContext2d, el: &ProjectedElement, color: &str) -> Result<(), JsValue> {
    if el.content.trim().is_empty() {
        return Ok(());
    }

    let font_size = (el.rect.height / 6.0).clamp(6.0, 24.0);
    let line_height = font_size * 1.25;
    let frame = TextFrame {
        max_width: (el.rect.width - 2.0 * TEXT_PADDING_PX).max(1.0),
        max_lines: max_lines(el.rect.height, line_height),
    };

    ctx.save();
    ctx.set_fill_style_str(color);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{font_size}px sans-serif"));

    // A failed measurement never fits, so the text degrades to ellipses.
    let measure = |s: &str| ctx.measure_text(s).map_or(f64::INFINITY, |m| m.width());
    let lines = frame.layout(&el.content, measure);

    let first_y = -line_height * (lines.len().saturating_sub(1) as f64) / 2.0;
    for (row, line) in lines.iter().enumerate() {
        ctx.fill_text(line, 0.0, first_y + row as f64 * line_height)?;
    }

    ctx.restore();
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn max_lines(height: f64, line_height: f64) -> usize {
    ((height / line_height).floor() as usize).max(1)
}

/// Box that element text is laid out into.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextFrame {
    pub max_width: f64,
    pub max_lines: usize,
}

impl TextFrame {
    /// Greedy word wrap within the frame. Words too wide for a line, and the
    /// last visible line when rows overflow, end in `...`.
    pub(crate) fn layout(self, text: &str, measure: impl Fn(&str) -> f64) -> Vec<String> {
        let fits = |s: &str| measure(s) <= self.max_width;
        let mut rows: Vec<String> = Vec::new();

        for paragraph in text.lines() {
            let mut row = String::new();
            for word in paragraph.split_whitespace() {
                let joined = if row.is_empty() { word.to_owned() } else { format!("{row} {word}") };
                if fits(&joined) {
                    row = joined;
                    continue;
                }
                if !row.is_empty() {
                    rows.push(row);
                }
                row = truncate_to_fit(word, &fits);
            }
            rows.push(row);
        }

        if rows.len() > self.max_lines {
            rows.truncate(self.max_lines);
            if let Some(tail) = rows.pop() {
                rows.push(truncate_to_fit(&format!("{tail}..."), &fits));
            }
        }
        rows
    }
}

/// Drop trailing characters until `text` plus an ellipsis fits.
fn truncate_to_fit(text: &str, fits: &impl Fn(&str) -> bool) -> String {
    let text = text.trim();
    if fits(text) {
        return text.to_owned();
    }
    let body = text.trim_end_matches("...");
    let cut_points = body.char_indices().map(|(i, _)| i).rev();
    for end in cut_points {
        let candidate = format!("{}...", body[..end].trim_end());
        if fits(&candidate) {
            return candidate;
        }
    }
    "...".to_owned()
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, el: &ProjectedElement) -> Result<(), JsValue> {
    ctx.save();
    translate_and_rotate(ctx, el)?;

    let (w, h) = (el.rect.width, el.rect.height);
    ctx.set_stroke_style_str(SELECTION_STROKE);
    ctx.set_line_width(1.0);
    let dash_array = js_sys::Array::new();
    dash_array.push(&SELECTION_DASH_PX.into());
    dash_array.push(&SELECTION_DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.stroke_rect(-w / 2.0 - 2.0, -h / 2.0 - 2.0, w + 4.0, h + 4.0);
    ctx.set_line_dash(&js_sys::Array::new())?;

    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Move the origin to the element's centre and apply its rotation.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, el: &ProjectedElement) -> Result<(), JsValue> {
    let cx = el.rect.left + el.rect.width / 2.0;
    let cy = el.rect.top + el.rect.height / 2.0;
    ctx.translate(cx, cy)?;
    ctx.rotate(el.rotation.to_radians())?;
    Ok(())
}
