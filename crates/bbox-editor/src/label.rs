//! Label editor: the text field bound to the current selection.
//!
//! The field shows the primary (lowest) selected box's label. An edit
//! applies to every selected box, which makes multi-select plus typing a
//! batch rename.

use crate::controller::Selection;
use crate::sync::BoxMutation;
use bbox_core::{BoxStore, LabelCommit};

/// What the host's label input should display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelField {
    pub value: String,
    /// Disabled while nothing is selected.
    pub enabled: bool,
}

#[derive(Debug, Default)]
pub struct LabelEditor {
    commit_mode: LabelCommit,
    field: LabelField,
    pending: bool,
}

impl LabelEditor {
    pub fn new(commit_mode: LabelCommit) -> Self {
        Self {
            commit_mode,
            ..Self::default()
        }
    }

    pub fn set_commit_mode(&mut self, commit_mode: LabelCommit) {
        self.commit_mode = commit_mode;
    }

    pub fn field(&self) -> &LabelField {
        &self.field
    }

    /// An edit is held back, waiting for blur / Enter.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Re-read the field from the store after the selection changed.
    /// Any pending edit must have been committed first.
    pub fn refresh(&mut self, selection: &Selection, store: &BoxStore) {
        if self.pending {
            log::debug!("discarding pending label {:?}", self.field.value);
            self.pending = false;
        }
        self.field = match selection.primary().and_then(|i| store.get(i)) {
            Some(b) => LabelField {
                value: b.label.clone(),
                enabled: true,
            },
            None => LabelField::default(),
        };
    }

    /// The user typed into the field.
    pub fn input(&mut self, text: &str, selection: &Selection) -> Option<BoxMutation> {
        if !self.field.enabled || selection.is_empty() {
            return None;
        }
        self.field.value = text.to_string();
        match self.commit_mode {
            LabelCommit::Live => Some(relabel(selection, text)),
            LabelCommit::Deferred => {
                self.pending = true;
                None
            }
        }
    }

    /// Blur / Enter: flush a held-back edit.
    pub fn commit(&mut self, selection: &Selection) -> Option<BoxMutation> {
        if !std::mem::take(&mut self.pending) || selection.is_empty() {
            return None;
        }
        Some(relabel(selection, &self.field.value))
    }
}

fn relabel(selection: &Selection, label: &str) -> BoxMutation {
    BoxMutation::Relabel {
        indices: selection.as_slice().to_vec(),
        label: label.to_string(),
    }
}
