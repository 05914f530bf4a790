//! Visual shapes: the on-surface projection of a box.
//!
//! A `VisualShape` owns both of its primitives, the outline rectangle and
//! the label text above it, so they always move and die together.

use bbox_core::{Bbox, Bounds, Color, EditorConfig, Point};

/// Drawing parameters shared by every shape on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub color: Color,
    pub stroke_width: f64,
    pub selected_stroke_width: f64,
    pub label_font_size: f64,
    pub label_gap: f64,
    pub handle_size: f64,
}

impl ShapeStyle {
    pub fn new(color: Color, config: &EditorConfig) -> Self {
        Self {
            color,
            stroke_width: config.stroke_width,
            selected_stroke_width: config.selected_stroke_width,
            label_font_size: config.label_font_size,
            label_gap: config.label_gap,
            handle_size: config.handle_size,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(Color::default(), &EditorConfig::default())
    }
}

/// Rectangle outline primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub bounds: Bounds,
    pub color: Color,
    pub stroke_width: f64,
}

impl Outline {
    pub fn rect(&self) -> kurbo::Rect {
        kurbo::Rect::from_origin_size(
            (self.bounds.left, self.bounds.top),
            (self.bounds.width, self.bounds.height),
        )
    }
}

/// Text primitive; `anchor` is the left end of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelText {
    pub text: String,
    pub anchor: kurbo::Point,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualShape {
    pub outline: Outline,
    pub label: LabelText,
    selected: bool,
}

impl VisualShape {
    pub fn new(bbox: &Bbox, style: &ShapeStyle) -> Self {
        Self {
            outline: Outline {
                bounds: bbox.bounds,
                color: style.color,
                stroke_width: style.stroke_width,
            },
            label: LabelText {
                text: bbox.label.clone(),
                anchor: label_anchor(&bbox.bounds, style),
                font_size: style.label_font_size,
            },
            selected: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.outline.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds, style: &ShapeStyle) {
        self.outline.bounds = bounds;
        self.label.anchor = label_anchor(&bounds, style);
    }

    pub fn set_text(&mut self, text: &str) {
        self.label.text.clear();
        self.label.text.push_str(text);
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Selected shapes get the thicker outline.
    pub fn set_selected(&mut self, selected: bool, style: &ShapeStyle) {
        self.selected = selected;
        self.outline.stroke_width = if selected {
            style.selected_stroke_width
        } else {
            style.stroke_width
        };
    }
}

fn label_anchor(bounds: &Bounds, style: &ShapeStyle) -> kurbo::Point {
    kurbo::Point::new(bounds.left, bounds.top - style.label_gap)
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// The eight resize controls around a selected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Centre of this handle on `b`.
    pub fn position(self, b: &Bounds) -> Point {
        let cx = b.left + b.width / 2.0;
        let cy = b.top + b.height / 2.0;
        match self {
            Handle::TopLeft => Point::new(b.left, b.top),
            Handle::Top => Point::new(cx, b.top),
            Handle::TopRight => Point::new(b.right(), b.top),
            Handle::Right => Point::new(b.right(), cy),
            Handle::BottomRight => Point::new(b.right(), b.bottom()),
            Handle::Bottom => Point::new(cx, b.bottom()),
            Handle::BottomLeft => Point::new(b.left, b.bottom()),
            Handle::Left => Point::new(b.left, cy),
        }
    }

    /// Geometry after dragging this handle of `start` to `p`.
    ///
    /// The opposite side stays put. Dragging past it flips the box rather
    /// than producing a negative size.
    pub fn resize(self, start: &Bounds, p: Point) -> Bounds {
        let (l, t, r, btm) = (start.left, start.top, start.right(), start.bottom());
        let (a, b) = match self {
            Handle::TopLeft => (p, Point::new(r, btm)),
            Handle::Top => (Point::new(l, p.y), Point::new(r, btm)),
            Handle::TopRight => (Point::new(l, btm), p),
            Handle::Right => (Point::new(l, t), Point::new(p.x, btm)),
            Handle::BottomRight => (Point::new(l, t), p),
            Handle::Bottom => (Point::new(l, t), Point::new(r, p.y)),
            Handle::BottomLeft => (Point::new(r, t), p),
            Handle::Left => (Point::new(p.x, t), Point::new(r, btm)),
        };
        Bounds::from_corners(a, b)
    }
}
