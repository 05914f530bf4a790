pub mod color;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod store;

pub use color::Color;
pub use config::{EditorConfig, LabelCommit};
pub use error::HostArgsError;
pub use host::{HostArgs, HostResult, RectRecord};
pub use model::{Bbox, Bounds, Point};
pub use store::BoxStore;
