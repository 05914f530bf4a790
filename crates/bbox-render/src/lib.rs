pub mod hit;
pub mod image;
pub mod paint;
pub mod shape;
pub mod surface;

pub use image::{Bitmap, ImageError};
pub use shape::{Handle, ShapeStyle, VisualShape};
pub use surface::{Surface, SurfaceEvent};
