//! Per-user state persistence and spreadsheet files

pub mod sheets;
pub mod store;
pub mod xlsx;

// Re-exports for convenience
pub use sheets::SheetStore;
pub use store::{FsUserStore, UserStore};
