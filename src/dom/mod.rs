// ============================================================================
// DOM MODULE - Helpers para manipulación DOM
// ============================================================================

pub mod element;
pub mod builder;
pub mod events;
pub mod focus;

pub use element::*;
pub use builder::*;
pub use events::*;
pub use focus::{restore_focus, snapshot_focus, FocusSnapshot};
