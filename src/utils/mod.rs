// Utils compartidos

pub mod constants;
pub mod storage;
pub mod jwt;
pub mod text;
pub mod fallback;
pub mod clinical_text;

pub use constants::*;
pub use storage::{browser_storage, MemoryStorage, TokenStorage};
