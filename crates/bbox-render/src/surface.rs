//! Render surface: the single owner of visual shapes.
//!
//! The surface mirrors the box store one shape per box, in the same order.
//! It also implements the native manipulation a retained-mode canvas gives
//! you for free: click-to-select, shift-toggle, drag-to-move, handle resize,
//! and marquee selection. Those gestures never touch the box store directly;
//! they report `SurfaceEvent`s and the editor pulls geometry back.

use crate::hit::{hit_handle, hit_shape, shapes_in_rect};
use crate::image::Bitmap;
use crate::shape::{Handle, ShapeStyle, VisualShape};
use bbox_core::{Bbox, Bounds, Point};

/// Marquee drags smaller than this (in both axes) count as a plain click.
const MARQUEE_MIN: f64 = 2.0;

/// Notifications produced by user manipulation of the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The set of active (selected) shapes changed. Sorted, unique.
    SelectionChanged(Vec<usize>),
    /// A shape's geometry was changed by a drag or resize that just ended.
    ShapeModified(usize),
}

#[derive(Debug, Clone)]
enum Gesture {
    Move { last: Point, moved: bool },
    Resize { index: usize, handle: Handle, start: Bounds },
    Marquee { origin: Point, current: Point, additive: bool },
}

pub struct Surface {
    width: f64,
    height: f64,
    background: Option<Bitmap>,
    style: ShapeStyle,
    shapes: Vec<VisualShape>,
    /// Active shape indices, sorted.
    active: Vec<usize>,
    /// In-progress drawn box, not yet backed by the store.
    provisional: Option<VisualShape>,
    gesture: Option<Gesture>,
    /// Bumped on every (re)build so listeners can tell surface instances apart.
    generation: u64,
    disposed: bool,
}

impl Surface {
    /// Build a surface with one shape per box, in order.
    pub fn build(
        width: f64,
        height: f64,
        background: Option<Bitmap>,
        boxes: &[Bbox],
        style: ShapeStyle,
    ) -> Self {
        let mut surface = Self {
            width,
            height,
            background: None,
            style,
            shapes: Vec::new(),
            active: Vec::new(),
            provisional: None,
            gesture: None,
            generation: 0,
            disposed: true,
        };
        surface.populate(width, height, background, boxes);
        surface
    }

    /// Tear down every shape and the background, then build afresh.
    /// The old drawable state is gone before the new one exists.
    pub fn rebuild(
        &mut self,
        width: f64,
        height: f64,
        background: Option<Bitmap>,
        boxes: &[Bbox],
        style: ShapeStyle,
    ) {
        self.dispose();
        self.style = style;
        self.populate(width, height, background, boxes);
    }

    /// Release every shape, the draft, any gesture, and the background.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        log::debug!(
            "disposing surface generation {} ({} shapes)",
            self.generation,
            self.shapes.len()
        );
        self.shapes.clear();
        self.active.clear();
        self.provisional = None;
        self.gesture = None;
        self.background = None;
        self.disposed = true;
    }

    fn populate(&mut self, width: f64, height: f64, background: Option<Bitmap>, boxes: &[Bbox]) {
        self.width = width;
        self.height = height;
        self.background = background;
        self.shapes = boxes
            .iter()
            .map(|b| VisualShape::new(b, &self.style))
            .collect();
        self.generation += 1;
        self.disposed = false;
        log::debug!(
            "built surface generation {} ({width}x{height}, {} shapes)",
            self.generation,
            self.shapes.len()
        );
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn background(&self) -> Option<&Bitmap> {
        self.background.as_ref()
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn shapes(&self) -> &[VisualShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape_bounds(&self, index: usize) -> Option<Bounds> {
        self.shapes.get(index).map(VisualShape::bounds)
    }

    pub fn active(&self) -> &[usize] {
        &self.active
    }

    pub fn provisional(&self) -> Option<&VisualShape> {
        self.provisional.as_ref()
    }

    /// Current marquee rectangle while a rubber-band selection is dragged.
    pub fn marquee(&self) -> Option<Bounds> {
        match self.gesture {
            Some(Gesture::Marquee {
                origin, current, ..
            }) => Some(Bounds::from_corners(origin, current)),
            _ => None,
        }
    }

    // ─── Shape lifecycle ─────────────────────────────────────────────────

    /// Attach a shape at the end of the list. Returns its index.
    pub fn add_shape(&mut self, bbox: &Bbox) -> usize {
        self.shapes.push(VisualShape::new(bbox, &self.style));
        self.shapes.len() - 1
    }

    /// Detach the shapes at `indices` (pre-removal positions, single pass)
    /// and clear the active selection. Returns `true` if any were removed.
    pub fn remove_shapes(&mut self, indices: &[usize]) -> bool {
        let before = self.shapes.len();
        let mut position = 0;
        self.shapes.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
        self.clear_active();
        self.gesture = None;
        self.shapes.len() != before
    }

    /// Replace every shape, keeping background and generation.
    pub fn replace_shapes(&mut self, boxes: &[Bbox]) {
        self.clear_active();
        self.gesture = None;
        self.shapes = boxes
            .iter()
            .map(|b| VisualShape::new(b, &self.style))
            .collect();
    }

    /// Update a label's text in place. No-op for an out-of-range index.
    pub fn set_label(&mut self, index: usize, text: &str) -> bool {
        match self.shapes.get_mut(index) {
            Some(shape) => {
                shape.set_text(text);
                true
            }
            None => false,
        }
    }

    pub fn set_bounds(&mut self, index: usize, bounds: Bounds) -> bool {
        match self.shapes.get_mut(index) {
            Some(shape) => {
                shape.set_bounds(bounds, &self.style);
                true
            }
            None => false,
        }
    }

    /// Make exactly `indices` active. Out-of-range indices are dropped.
    /// Returns `true` if the active set changed.
    pub fn set_active(&mut self, indices: &[usize]) -> bool {
        let mut next: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.shapes.len())
            .collect();
        next.sort_unstable();
        next.dedup();
        if next == self.active {
            return false;
        }
        self.active = next;
        self.restyle();
        true
    }

    fn clear_active(&mut self) {
        self.active.clear();
        self.restyle();
    }

    fn restyle(&mut self) {
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            shape.set_selected(self.active.binary_search(&i).is_ok(), &self.style);
        }
    }

    /// Show, resize, or (with `None`) discard the draft shape.
    pub fn set_provisional(&mut self, bounds: Option<Bounds>) {
        match (bounds, self.provisional.as_mut()) {
            (Some(b), Some(shape)) => shape.set_bounds(b, &self.style),
            (Some(b), None) => {
                self.provisional = Some(VisualShape::new(&Bbox::unlabeled(b), &self.style));
            }
            (None, _) => self.provisional = None,
        }
    }

    pub fn clear_provisional(&mut self) {
        self.set_provisional(None);
    }

    // ─── Native manipulation ─────────────────────────────────────────────

    /// Pointer pressed on the surface. `additive` is the shift modifier.
    pub fn pointer_down(&mut self, p: Point, additive: bool) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();

        // A single active shape exposes resize handles.
        if let [index] = self.active[..]
            && let Some(shape) = self.shapes.get(index)
            && let Some(handle) = hit_handle(shape, p, self.style.handle_size)
        {
            self.gesture = Some(Gesture::Resize {
                index,
                handle,
                start: shape.bounds(),
            });
            return events;
        }

        match hit_shape(&self.shapes, p) {
            Some(hit) => {
                let mut next = self.active.clone();
                if additive {
                    // Shift+click: toggle in/out of the selection
                    match next.iter().position(|&i| i == hit) {
                        Some(pos) => {
                            next.remove(pos);
                        }
                        None => next.push(hit),
                    }
                } else if !next.contains(&hit) {
                    next = vec![hit];
                }
                if self.set_active(&next) {
                    events.push(SurfaceEvent::SelectionChanged(self.active.clone()));
                }
                if self.active.contains(&hit) {
                    self.gesture = Some(Gesture::Move {
                        last: p,
                        moved: false,
                    });
                }
            }
            None => {
                if !additive && self.set_active(&[]) {
                    events.push(SurfaceEvent::SelectionChanged(Vec::new()));
                }
                self.gesture = Some(Gesture::Marquee {
                    origin: p,
                    current: p,
                    additive,
                });
            }
        }
        events
    }

    /// Pointer moved. Geometry changes are applied to shapes live; the
    /// store learns about them on release.
    pub fn pointer_move(&mut self, p: Point) {
        match self.gesture.as_mut() {
            Some(Gesture::Move { last, moved }) => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                if dx == 0.0 && dy == 0.0 {
                    return;
                }
                *last = p;
                *moved = true;
                for &i in &self.active {
                    if let Some(shape) = self.shapes.get_mut(i) {
                        let moved_bounds = shape.bounds().translate(dx, dy);
                        shape.set_bounds(moved_bounds, &self.style);
                    }
                }
            }
            Some(Gesture::Resize {
                index,
                handle,
                start,
            }) => {
                let next = handle.resize(start, p);
                if let Some(shape) = self.shapes.get_mut(*index) {
                    shape.set_bounds(next, &self.style);
                }
            }
            Some(Gesture::Marquee { current, .. }) => *current = p,
            None => {}
        }
    }

    /// Pointer released: finish the gesture and report what changed.
    pub fn pointer_up(&mut self, p: Point) -> Vec<SurfaceEvent> {
        self.pointer_move(p);
        let mut events = Vec::new();
        match self.gesture.take() {
            Some(Gesture::Move { moved: true, .. }) => {
                events.extend(self.active.iter().map(|&i| SurfaceEvent::ShapeModified(i)));
            }
            Some(Gesture::Resize { index, start, .. }) => {
                if self.shape_bounds(index).is_some_and(|b| b != start) {
                    events.push(SurfaceEvent::ShapeModified(index));
                }
            }
            Some(Gesture::Marquee {
                origin, additive, ..
            }) => {
                let area = Bounds::from_corners(origin, p);
                if area.width > MARQUEE_MIN || area.height > MARQUEE_MIN {
                    let mut next = shapes_in_rect(&self.shapes, &area);
                    if additive {
                        next.extend_from_slice(&self.active);
                    }
                    if self.set_active(&next) {
                        events.push(SurfaceEvent::SelectionChanged(self.active.clone()));
                    }
                }
            }
            Some(Gesture::Move { moved: false, .. }) | None => {}
        }
        events
    }

    /// Abandon any gesture in flight without reporting it.
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }
}
