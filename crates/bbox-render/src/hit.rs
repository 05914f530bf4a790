//! Hit testing: point → shape lookup.
//!
//! Shapes are painted in index order, so the last one is topmost and is
//! checked first.

use crate::shape::{Handle, VisualShape};
use bbox_core::{Bounds, Point};

/// Find the topmost shape under `p`.
/// Returns `None` if only the background is hit.
pub fn hit_shape(shapes: &[VisualShape], p: Point) -> Option<usize> {
    shapes.iter().rposition(|s| s.bounds().contains(p))
}

/// Find the resize handle of `shape` under `p`, if any. `tolerance` is
/// half the side of each square handle.
pub fn hit_handle(shape: &VisualShape, p: Point, tolerance: f64) -> Option<Handle> {
    let bounds = shape.bounds();
    let target = kurbo::Point::new(p.x, p.y);
    Handle::ALL.into_iter().find(|h| {
        let c = h.position(&bounds);
        kurbo::Rect::from_center_size((c.x, c.y), (tolerance * 2.0, tolerance * 2.0))
            .contains(target)
    })
}

/// Find all shapes whose outline intersects `area`.
/// Used for marquee (box) selection.
pub fn shapes_in_rect(shapes: &[VisualShape], area: &Bounds) -> Vec<usize> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| s.bounds().intersects(area))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeStyle;
    use bbox_core::Bbox;

    fn shapes() -> Vec<VisualShape> {
        let style = ShapeStyle::default();
        [
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            Bounds::new(50.0, 50.0, 100.0, 100.0),
            Bounds::new(300.0, 300.0, 10.0, 10.0),
        ]
        .iter()
        .map(|b| VisualShape::new(&Bbox::unlabeled(*b), &style))
        .collect()
    }

    #[test]
    fn topmost_shape_wins() {
        let shapes = shapes();
        assert_eq!(hit_shape(&shapes, Point::new(75.0, 75.0)), Some(1));
        assert_eq!(hit_shape(&shapes, Point::new(10.0, 10.0)), Some(0));
        assert_eq!(hit_shape(&shapes, Point::new(200.0, 10.0)), None);
    }

    #[test]
    fn handle_hit_uses_tolerance() {
        let shapes = shapes();
        assert_eq!(
            hit_handle(&shapes[0], Point::new(103.0, 97.0), 8.0),
            Some(Handle::BottomRight)
        );
        assert_eq!(
            hit_handle(&shapes[0], Point::new(50.0, 1.0), 8.0),
            Some(Handle::Top)
        );
        assert_eq!(hit_handle(&shapes[0], Point::new(50.0, 50.0), 8.0), None);
    }

    #[test]
    fn marquee_collects_intersecting() {
        let shapes = shapes();
        let area = Bounds::new(90.0, 90.0, 20.0, 20.0);
        assert_eq!(shapes_in_rect(&shapes, &area), vec![0, 1]);
        let far = Bounds::new(290.0, 290.0, 5.0, 5.0);
        assert!(shapes_in_rect(&shapes, &far).is_empty());
    }
}
