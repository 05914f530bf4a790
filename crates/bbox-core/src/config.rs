//! Editor tuning knobs.
//!
//! Every field has a default, so hosts may pass a partial `config` object
//! (or none at all) alongside the regular arguments.

use serde::{Deserialize, Serialize};

/// When label edits reach the box store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelCommit {
    /// Every keystroke relabels the selection.
    #[default]
    Live,
    /// Edits are held until blur / Enter.
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// First quick-add position as a fraction of surface width/height.
    pub quick_add_origin: f64,
    /// Quick-add box size as a fraction of surface width/height.
    pub quick_add_size: f64,
    /// Per-click offset in pixels so repeated quick-adds don't overlap.
    pub quick_add_step: f64,
    pub stroke_width: f64,
    pub selected_stroke_width: f64,
    pub label_font_size: f64,
    /// Vertical gap between a label's baseline and its outline.
    pub label_gap: f64,
    /// Resize-handle hit tolerance (half the handle's side).
    pub handle_size: f64,
    /// Height of host-side controls below the canvas.
    pub toolbar_height: f64,
    pub label_commit: LabelCommit,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quick_add_origin: 0.15,
            quick_add_size: 0.2,
            quick_add_step: 3.0,
            stroke_width: 2.0,
            selected_stroke_width: 4.0,
            label_font_size: 14.0,
            label_gap: 4.0,
            handle_size: 8.0,
            toolbar_height: 48.0,
            label_commit: LabelCommit::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: EditorConfig =
            serde_json::from_str(r#"{"quickAddStep": 5, "labelCommit": "deferred"}"#).unwrap();
        assert_eq!(cfg.quick_add_step, 5.0);
        assert_eq!(cfg.label_commit, LabelCommit::Deferred);
        assert_eq!(cfg.quick_add_size, 0.2);
        assert_eq!(cfg.stroke_width, 2.0);
    }
}
