//! Surface → Vello drawing commands.
//!
//! Emits the background image, every outline, the draft box, the marquee,
//! and the resize handles of a single selection into a Vello `Scene`.

use crate::shape::{Handle, VisualShape};
use crate::surface::Surface;
use bbox_core::{Bounds, Color as BoxColor};
use kurbo::{Affine, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

const MARQUEE_FILL: Color = Color::from_rgba8(79, 195, 247, 30);
const MARQUEE_STROKE: Color = Color::from_rgba8(79, 195, 247, 200);
const HANDLE_FILL: Color = Color::from_rgba8(255, 255, 255, 255);

/// Paint the whole surface to a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`.
pub fn paint_surface(scene: &mut Scene, surface: &Surface) {
    if let Some(bg) = surface.background() {
        scene.draw_image(&bg.to_image(), Affine::IDENTITY);
    }

    for shape in surface.shapes() {
        paint_shape(scene, shape, None);
    }

    if let Some(draft) = surface.provisional() {
        paint_shape(scene, draft, Some([6.0, 4.0]));
    }

    if let [index] = surface.active()
        && let Some(shape) = surface.shapes().get(*index)
    {
        paint_handles(scene, shape, surface.style().handle_size / 2.0);
    }

    if let Some(area) = surface.marquee() {
        let rect = to_rect(&area);
        scene.fill(Fill::NonZero, Affine::IDENTITY, MARQUEE_FILL, None, &rect);
        scene.stroke(
            &Stroke::new(1.0).with_dashes(0.0, [4.0, 4.0]),
            Affine::IDENTITY,
            MARQUEE_STROKE,
            None,
            &rect,
        );
    }
}

fn paint_shape(scene: &mut Scene, shape: &VisualShape, dashes: Option<[f64; 2]>) {
    let mut stroke = Stroke::new(shape.outline.stroke_width);
    if let Some(pattern) = dashes {
        stroke = stroke.with_dashes(0.0, pattern);
    }
    scene.stroke(
        &stroke,
        Affine::IDENTITY,
        to_peniko(&shape.outline.color),
        None,
        &shape.outline.rect(),
    );
    if !shape.label.text.is_empty() {
        // Glyph shaping needs a font context; the DOM renderer draws labels.
        log::trace!(
            "LABEL {:?} at ({}, {})",
            shape.label.text,
            shape.label.anchor.x,
            shape.label.anchor.y
        );
    }
}

fn paint_handles(scene: &mut Scene, shape: &VisualShape, half: f64) {
    let bounds = shape.bounds();
    let color = to_peniko(&shape.outline.color);
    for handle in Handle::ALL {
        let c = handle.position(&bounds);
        let rect = Rect::from_center_size((c.x, c.y), (half * 2.0, half * 2.0));
        scene.fill(Fill::NonZero, Affine::IDENTITY, HANDLE_FILL, None, &rect);
        scene.stroke(&Stroke::new(1.0), Affine::IDENTITY, color, None, &rect);
    }
}

fn to_rect(b: &Bounds) -> Rect {
    Rect::from_origin_size((b.left, b.top), (b.width, b.height))
}

fn to_peniko(c: &BoxColor) -> Color {
    let [r, g, b, a] = c.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}
