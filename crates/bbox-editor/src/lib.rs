pub mod controller;
pub mod emit;
pub mod input;
pub mod label;
pub mod session;
pub mod shortcuts;
pub mod sync;

pub use emit::{HostBridge, SyncEmitter};
pub use session::Annotator;
