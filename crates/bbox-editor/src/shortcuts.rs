//! Keyboard shortcut mapping.
//!
//! Maps single keys to semantic `ShortcutAction`s. The map lives in Rust so
//! the wasm bridge and native hosts agree on it.
//!
//! | Key | Action |
//! |-----|--------|
//! | `a` | quick-add a default box |
//! | `d` | enter drawing mode |
//! | `Delete` / `Backspace` | remove selected boxes |
//! | `r` | reset to the host-supplied boxes |
//! | `c` | clear all boxes |

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    QuickAdd,
    StartDrawing,
    RemoveSelected,
    Reset,
    ClearAll,
}

impl ShortcutAction {
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::QuickAdd => "quickAdd",
            ShortcutAction::StartDrawing => "startDrawing",
            ShortcutAction::RemoveSelected => "removeSelected",
            ShortcutAction::Reset => "reset",
            ShortcutAction::ClearAll => "clearAll",
        }
    }
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"a"`, `"Delete"`).
    /// Chords with Ctrl/Alt/Meta belong to the host and browser, so they
    /// never resolve. Shift is tolerated (caps).
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.has_command() {
            return None;
        }
        match key {
            "a" | "A" => Some(ShortcutAction::QuickAdd),
            "d" | "D" => Some(ShortcutAction::StartDrawing),
            "Delete" | "Backspace" => Some(ShortcutAction::RemoveSelected),
            "r" | "R" => Some(ShortcutAction::Reset),
            "c" | "C" => Some(ShortcutAction::ClearAll),
            _ => None,
        }
    }
}
