//! External interactions
//!
//! - Dataset and schema loading from disk
//! - Writing export artifacts
//! - Shell-command export handler

pub mod download;
pub mod loader;
pub mod pipe_export;

pub use download::{saved_message, write_artifact};
pub use loader::{load_dataset, load_schema};
pub use pipe_export::CommandExportHandler;
