//! Interaction controller: draw-mode state machine, quick-add placement
//! and the current selection.
//!
//! The controller never touches the store or the surface. It turns pointer
//! input into `DraftEvent`s that the session applies.

use bbox_core::{Bounds, EditorConfig, Point};
use smallvec::SmallVec;

// ─── Drawing ─────────────────────────────────────────────────────────────

/// In-progress box between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftBox {
    pub origin: Point,
    pub current: Point,
}

impl DraftBox {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            current: origin,
        }
    }

    /// Normalized rectangle spanned by origin and current pointer.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.origin, self.current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawMode {
    #[default]
    Idle,
    /// Waiting for the pointer-down that starts a draft.
    Armed,
    Drawing(DraftBox),
}

/// What the session must do with the provisional shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DraftEvent {
    Started(Bounds),
    Resized(Bounds),
    /// Promote to a permanent box.
    Finished(Bounds),
}

// ─── Quick-add ───────────────────────────────────────────────────────────

/// Deterministic placement for quick-added boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuickAddPlacement {
    clicks: u32,
}

impl QuickAddPlacement {
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Bounds for the next quick-add, advancing the counter.
    pub fn next(&mut self, width: f64, height: f64, config: &EditorConfig) -> Bounds {
        let offset = config.quick_add_step * f64::from(self.clicks);
        self.clicks += 1;
        Bounds::new(
            width * config.quick_add_origin + offset,
            height * config.quick_add_origin + offset,
            width * config.quick_add_size,
            height * config.quick_add_size,
        )
    }

    pub fn reset(&mut self) {
        self.clicks = 0;
    }
}

// ─── Selection ───────────────────────────────────────────────────────────

/// Selected box indices. Sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    indices: SmallVec<[usize; 4]>,
}

impl Selection {
    pub fn from_indices(indices: &[usize]) -> Self {
        let mut sel: SmallVec<[usize; 4]> = indices.iter().copied().collect();
        sel.sort_unstable();
        sel.dedup();
        Self { indices: sel }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Lowest selected index.
    pub fn primary(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

// ─── Controller ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InteractionController {
    mode: DrawMode,
    quick_add: QuickAddPlacement,
    selection: Selection,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Arm drawing mode. Returns `false` if already armed or drawing, so
    /// repeated triggers never stack a second capture.
    pub fn start_drawing(&mut self) -> bool {
        if self.mode != DrawMode::Idle {
            log::debug!("start_drawing ignored: already {:?}", self.mode);
            return false;
        }
        self.mode = DrawMode::Armed;
        true
    }

    /// Whether pointer input belongs to the draw state machine right now.
    pub fn pointer_capture(&self) -> bool {
        self.mode != DrawMode::Idle
    }

    /// A draft exists, so move/up belong to it.
    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, DrawMode::Drawing(_))
    }

    pub fn pointer_down(&mut self, p: Point) -> Option<DraftEvent> {
        match self.mode {
            DrawMode::Armed => {
                let draft = DraftBox::new(p);
                self.mode = DrawMode::Drawing(draft);
                Some(DraftEvent::Started(draft.bounds()))
            }
            _ => None,
        }
    }

    pub fn pointer_move(&mut self, p: Point) -> Option<DraftEvent> {
        match &mut self.mode {
            DrawMode::Drawing(draft) => {
                draft.current = p;
                Some(DraftEvent::Resized(draft.bounds()))
            }
            _ => None,
        }
    }

    /// Finish the draft and return to idle.
    pub fn pointer_up(&mut self, p: Point) -> Option<DraftEvent> {
        let DrawMode::Drawing(mut draft) = self.mode else {
            return None;
        };
        draft.current = p;
        self.mode = DrawMode::Idle;
        let bounds = draft.bounds();
        if bounds.is_empty() {
            log::warn!(
                "committing zero-area box at ({}, {}) {}x{}",
                bounds.left,
                bounds.top,
                bounds.width,
                bounds.height
            );
        }
        Some(DraftEvent::Finished(bounds))
    }

    /// Drop any draft and disarm. Returns `true` if a draft was in flight.
    pub fn cancel(&mut self) -> bool {
        let had_draft = self.is_drawing();
        self.mode = DrawMode::Idle;
        had_draft
    }

    pub fn next_quick_add(&mut self, width: f64, height: f64, config: &EditorConfig) -> Bounds {
        self.quick_add.next(width, height, config)
    }

    pub fn reset_quick_add(&mut self) {
        self.quick_add.reset();
    }

    pub fn quick_add_clicks(&self) -> u32 {
        self.quick_add.clicks()
    }

    /// Re-derive the selection from the surface's active shapes.
    pub fn on_selection_changed(&mut self, active: &[usize]) {
        self.selection = Selection::from_indices(active);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
