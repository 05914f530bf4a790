//! Canvas2D renderer.
//!
//! Draws a `Surface` to an HTML `<canvas>` via `CanvasRenderingContext2d`:
//! background pixels, one outline and label per shape, the dashed draft
//! box, resize handles for a single selection, and the marquee.

use bbox_core::Bounds;
use bbox_render::{Bitmap, Handle, Surface, VisualShape};
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

const MARQUEE_FILL: &str = "rgba(79, 195, 247, 0.12)";
const MARQUEE_STROKE: &str = "rgba(79, 195, 247, 0.8)";
const HANDLE_FILL: &str = "#FFFFFF";

/// Render the whole surface. Clears first.
pub fn render_surface(ctx: &CanvasRenderingContext2d, surface: &Surface) {
    ctx.clear_rect(0.0, 0.0, surface.width(), surface.height());

    if let Some(bg) = surface.background() {
        draw_background(ctx, bg);
    }

    for shape in surface.shapes() {
        draw_shape(ctx, shape);
    }

    if let Some(draft) = surface.provisional() {
        set_dash(ctx, &[6.0, 4.0]);
        draw_shape(ctx, draft);
        set_dash(ctx, &[]);
    }

    if let [index] = surface.active()
        && let Some(shape) = surface.shapes().get(*index)
    {
        draw_handles(ctx, shape, surface.style().handle_size / 2.0);
    }

    if let Some(area) = surface.marquee() {
        draw_marquee(ctx, &area);
    }
}

fn draw_background(ctx: &CanvasRenderingContext2d, bg: &Bitmap) {
    let image =
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(bg.pixels()), bg.width(), bg.height());
    match image {
        Ok(image) => {
            if let Err(e) = ctx.put_image_data(&image, 0.0, 0.0) {
                log::warn!("put_image_data failed: {e:?}");
            }
        }
        Err(e) => log::warn!("background not drawable, leaving blank: {e:?}"),
    }
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &VisualShape) {
    let b = shape.bounds();
    let color = shape.outline.color.to_css();
    ctx.set_stroke_style_str(&color);
    ctx.set_line_width(shape.outline.stroke_width);
    ctx.stroke_rect(b.left, b.top, b.width, b.height);

    if !shape.label.text.is_empty() {
        ctx.set_font(&label_font(shape.label.font_size));
        ctx.set_fill_style_str(&color);
        let _ = ctx.fill_text(&shape.label.text, shape.label.anchor.x, shape.label.anchor.y);
    }
}

fn draw_handles(ctx: &CanvasRenderingContext2d, shape: &VisualShape, half: f64) {
    let bounds = shape.bounds();
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(&shape.outline.color.to_css());
    ctx.set_fill_style_str(HANDLE_FILL);
    for handle in Handle::ALL {
        let c = handle.position(&bounds);
        ctx.fill_rect(c.x - half, c.y - half, half * 2.0, half * 2.0);
        ctx.stroke_rect(c.x - half, c.y - half, half * 2.0, half * 2.0);
    }
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, area: &Bounds) {
    ctx.set_fill_style_str(MARQUEE_FILL);
    ctx.fill_rect(area.left, area.top, area.width, area.height);
    ctx.set_stroke_style_str(MARQUEE_STROKE);
    ctx.set_line_width(1.0);
    set_dash(ctx, &[4.0, 4.0]);
    ctx.stroke_rect(area.left, area.top, area.width, area.height);
    set_dash(ctx, &[]);
}

fn set_dash(ctx: &CanvasRenderingContext2d, pattern: &[f64]) {
    let segments: js_sys::Array = pattern.iter().map(|&v| JsValue::from_f64(v)).collect();
    let _ = ctx.set_line_dash(&segments);
}

fn label_font(size: f64) -> String {
    format!("{size}px system-ui, sans-serif")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_uses_configured_size() {
        assert_eq!(label_font(14.0), "14px system-ui, sans-serif");
        assert_eq!(label_font(10.5), "10.5px system-ui, sans-serif");
    }
}
