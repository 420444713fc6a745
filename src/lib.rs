//! Sheetstash - Telegram bot that collects line-delimited account records
//! into per-user spreadsheet files.
//!
//! This library provides all the functionality for the bot: the input
//! classifier, the per-user state store, the spreadsheet accessor, and
//! the Telegram dispatch shell.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, and logging
//! - `classify`: message format classification and row construction
//! - `storage`: per-user state files and spreadsheet persistence
//! - `telegram`: Telegram bot integration and handlers

pub mod classify;
pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use classify::{classify, ClassifyInput, Rejection, Row};
pub use core::{config, AppError, AppResult};
pub use storage::{FsUserStore, SheetStore, UserStore};
pub use telegram::{create_bot, schema, HandlerDeps};
