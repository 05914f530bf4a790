//! Input abstraction layer.
//!
//! Normalizes pointer events into surface coordinates. The host sees
//! client (viewport) coordinates; the canvas may be CSS-scaled, so every
//! event goes through a `SurfaceTransform` before reaching the editor.

use bbox_core::Point;

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Any chord modifier other than shift.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A normalized pointer event, already in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64, modifiers: Modifiers },
    PointerMove { x: f64, y: f64, modifiers: Modifiers },
    PointerUp { x: f64, y: f64, modifiers: Modifiers },
}

impl InputEvent {
    pub fn position(&self) -> Point {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Point::new(x, y),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match *self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. } => modifiers,
        }
    }
}

/// Maps client coordinates onto the surface.
///
/// `left`/`top`/`css_width`/`css_height` come from the element's bounding
/// client rect; `width`/`height` are the surface's intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    pub left: f64,
    pub top: f64,
    pub css_width: f64,
    pub css_height: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceTransform {
    /// Identity transform for an unscaled surface at the client origin.
    pub fn identity(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            css_width: width,
            css_height: height,
            width,
            height,
        }
    }

    pub fn to_surface(&self, client_x: f64, client_y: f64) -> Point {
        let sx = if self.css_width > 0.0 {
            self.width / self.css_width
        } else {
            1.0
        };
        let sy = if self.css_height > 0.0 {
            self.height / self.css_height
        } else {
            1.0
        };
        Point::new((client_x - self.left) * sx, (client_y - self.top) * sy)
    }
}
