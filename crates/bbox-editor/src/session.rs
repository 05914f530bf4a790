//! Annotator session: the single entry point for a mounted widget.
//!
//! Composes the sync engine, interaction controller, label editor and
//! emitter. Every public operation runs to completion and leaves the store,
//! surface, selection and label field consistent; any operation that changes
//! the box collection ends with exactly one emission.

use crate::controller::{DraftEvent, InteractionController};
use crate::emit::{HostBridge, SyncEmitter};
use crate::input::{InputEvent, Modifiers};
use crate::label::{LabelEditor, LabelField};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{BoxMutation, SyncEngine};
use bbox_core::{Bbox, HostArgs, HostArgsError, HostResult, Point};
use bbox_render::{Surface, SurfaceEvent};

pub struct Annotator<H: HostBridge> {
    engine: SyncEngine,
    controller: InteractionController,
    labels: LabelEditor,
    emitter: SyncEmitter,
    host: H,
    mounted: bool,
}

impl<H: HostBridge> Annotator<H> {
    /// Validate `args`, build the surface, report the frame height and
    /// emit the initial value.
    pub fn new(args: HostArgs, host: H) -> Result<Self, HostArgsError> {
        let engine = SyncEngine::from_args(args)?;
        let labels = LabelEditor::new(engine.config().label_commit);
        let mut annotator = Self {
            engine,
            controller: InteractionController::new(),
            labels,
            emitter: SyncEmitter::new(),
            host,
            mounted: true,
        };
        annotator.announce();
        Ok(annotator)
    }

    /// Rebuild from new host arguments (dimensions, image or rects changed).
    /// Invalid arguments are rejected and the current surface stays up.
    pub fn rebuild(&mut self, args: HostArgs) -> Result<(), HostArgsError> {
        self.flush_label();
        self.engine.rebuild(args)?;
        self.controller.cancel();
        self.controller.clear_selection();
        self.labels.set_commit_mode(self.engine.config().label_commit);
        self.refresh_labels();
        self.mounted = true;
        self.announce();
        Ok(())
    }

    fn announce(&mut self) {
        let height = self.engine.surface.height() + self.engine.config().toolbar_height;
        self.host.set_frame_height(height);
        self.emit();
    }

    fn emit(&mut self) {
        if !self.mounted {
            return;
        }
        self.emitter
            .emit(&self.engine.store, &self.engine.surface, &mut self.host);
    }

    fn apply(&mut self, mutation: BoxMutation) -> bool {
        if !self.mounted {
            log::debug!("ignoring {mutation:?} on an unmounted annotator");
            return false;
        }
        self.engine.apply_mutation(mutation)
    }

    fn refresh_labels(&mut self) {
        self.labels
            .refresh(self.controller.selection(), &self.engine.store);
    }

    fn sync_selection_from_surface(&mut self) {
        self.controller.on_selection_changed(self.engine.surface.active());
        self.refresh_labels();
    }

    /// Commit a held-back label edit so the host never reads stale output.
    fn flush_label(&mut self) {
        if let Some(mutation) = self.labels.commit(self.controller.selection())
            && self.apply(mutation)
        {
            self.emit();
        }
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: InputEvent) {
        let p = event.position();
        match event {
            InputEvent::PointerDown { .. } => self.pointer_down(p, event.modifiers()),
            InputEvent::PointerMove { .. } => self.pointer_move(p),
            InputEvent::PointerUp { .. } => self.pointer_up(p),
        }
    }

    pub fn pointer_down(&mut self, p: Point, modifiers: Modifiers) {
        if !self.mounted {
            return;
        }
        self.flush_label();
        if self.controller.pointer_capture() {
            if let Some(draft) = self.controller.pointer_down(p) {
                self.apply_draft(draft);
            }
            return;
        }
        let events = self.engine.surface.pointer_down(p, modifiers.shift);
        self.handle_surface_events(events);
    }

    pub fn pointer_move(&mut self, p: Point) {
        if !self.mounted {
            return;
        }
        // Armed without a draft: a surface gesture begun before arming
        // still owns the pointer until release.
        if self.controller.is_drawing() {
            if let Some(draft) = self.controller.pointer_move(p) {
                self.apply_draft(draft);
            }
            return;
        }
        self.engine.surface.pointer_move(p);
    }

    pub fn pointer_up(&mut self, p: Point) {
        if !self.mounted {
            return;
        }
        if self.controller.is_drawing() {
            if let Some(draft) = self.controller.pointer_up(p) {
                self.apply_draft(draft);
            }
            return;
        }
        let events = self.engine.surface.pointer_up(p);
        self.handle_surface_events(events);
    }

    fn apply_draft(&mut self, draft: DraftEvent) {
        match draft {
            DraftEvent::Started(bounds) | DraftEvent::Resized(bounds) => {
                self.engine.surface.set_provisional(Some(bounds));
            }
            DraftEvent::Finished(bounds) => {
                self.engine.surface.clear_provisional();
                self.apply(BoxMutation::Add(Bbox::unlabeled(bounds)));
                let index = self.engine.store.len() - 1;
                self.engine.surface.set_active(&[index]);
                self.sync_selection_from_surface();
                self.emit();
            }
        }
    }

    fn handle_surface_events(&mut self, events: Vec<SurfaceEvent>) {
        let mut modified = false;
        for event in events {
            match event {
                SurfaceEvent::SelectionChanged(active) => {
                    log::trace!("selection changed: {active:?}");
                    self.sync_selection_from_surface();
                }
                SurfaceEvent::ShapeModified(index) => {
                    if let Some(bounds) = self.engine.surface.shape_bounds(index) {
                        modified |= self.apply(BoxMutation::SetBounds { index, bounds });
                    }
                }
            }
        }
        if modified {
            self.emit();
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Dispatch a document-level key press. Returns `true` if it mapped to
    /// a shortcut.
    pub fn key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return false;
        };
        log::debug!("shortcut {key:?} -> {}", action.name());
        match action {
            ShortcutAction::QuickAdd => self.quick_add(),
            ShortcutAction::StartDrawing => {
                self.start_drawing();
            }
            ShortcutAction::RemoveSelected => {
                self.remove_selected();
            }
            ShortcutAction::Reset => self.reset(),
            ShortcutAction::ClearAll => self.clear_all(),
        }
        true
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Add a default-sized box at the next offset position.
    pub fn quick_add(&mut self) {
        if !self.mounted {
            return;
        }
        self.flush_label();
        let (width, height) = (self.engine.surface.width(), self.engine.surface.height());
        let bounds = self
            .controller
            .next_quick_add(width, height, self.engine.config());
        self.apply(BoxMutation::Add(Bbox::unlabeled(bounds)));
        self.emit();
    }

    /// Arm drawing mode. Returns `false` if it was already armed, in which
    /// case nothing changes.
    pub fn start_drawing(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.flush_label();
        self.controller.start_drawing()
    }

    /// Remove every selected box. Returns `false` with nothing selected.
    pub fn remove_selected(&mut self) -> bool {
        self.flush_label();
        let indices = self.controller.selection().as_slice().to_vec();
        if indices.is_empty() {
            return false;
        }
        let removed = self.apply(BoxMutation::Remove(indices));
        self.controller.clear_selection();
        self.refresh_labels();
        if removed {
            self.emit();
        }
        removed
    }

    /// Restore the host-supplied initial boxes.
    pub fn reset(&mut self) {
        if !self.mounted {
            return;
        }
        self.flush_label();
        let initial = self.engine.initial().to_vec();
        self.apply(BoxMutation::ReplaceAll(initial));
        self.controller.clear_selection();
        self.refresh_labels();
        self.emit();
    }

    /// Remove every box and restart quick-add placement.
    pub fn clear_all(&mut self) {
        if !self.mounted {
            return;
        }
        self.flush_label();
        self.apply(BoxMutation::ReplaceAll(Vec::new()));
        self.controller.reset_quick_add();
        self.controller.clear_selection();
        self.refresh_labels();
        self.emit();
    }

    /// Make exactly `indices` selected, as a host-side selection would.
    pub fn select(&mut self, indices: &[usize]) {
        self.flush_label();
        self.engine.surface.set_active(indices);
        self.sync_selection_from_surface();
    }

    // ─── Label field ─────────────────────────────────────────────────────

    /// The label input's value changed.
    pub fn set_label_text(&mut self, text: &str) {
        if let Some(mutation) = self.labels.input(text, self.controller.selection())
            && self.apply(mutation)
        {
            self.emit();
        }
    }

    /// Blur / Enter on the label input.
    pub fn commit_label(&mut self) {
        self.flush_label();
    }

    pub fn label_field(&self) -> &LabelField {
        self.labels.field()
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn selection(&self) -> &[usize] {
        self.controller.selection().as_slice()
    }

    pub fn boxes(&self) -> &[Bbox] {
        self.engine.store.as_slice()
    }

    pub fn surface(&self) -> &Surface {
        &self.engine.surface
    }

    /// What the host would receive if we emitted now.
    pub fn result(&self) -> HostResult {
        SyncEmitter::collect(&self.engine.store, &self.engine.surface)
    }

    /// Whether draw-mode pointer listeners must be live.
    pub fn pointer_capture(&self) -> bool {
        self.controller.pointer_capture()
    }

    pub fn quick_add_clicks(&self) -> u32 {
        self.controller.quick_add_clicks()
    }

    pub fn emitted(&self) -> u64 {
        self.emitter.emitted()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ─── Teardown ────────────────────────────────────────────────────────

    /// Drop any draft and gesture and dispose the surface. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if self.controller.cancel() {
            log::debug!("unmount cancelled an in-progress draw");
        }
        self.engine.surface.clear_provisional();
        self.engine.surface.cancel_gesture();
        self.engine.surface.dispose();
        self.mounted = false;
    }
}

impl<H: HostBridge> Drop for Annotator<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
