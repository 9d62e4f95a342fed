//! Shotkeep - keep or discard game screenshots as they are taken
//!
//! This crate watches a folder for new JPEG screenshots and asks, one at a
//! time, whether each should be kept. Declined screenshots are deleted.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod picker;
pub mod prompt;
pub mod watch;

// Re-export primary types for convenience
pub use config::{ConfigStore, UserConfig};
pub use domain::{
    is_screenshot_name, Decision, DeleteMode, IgnoreReason, Outcome, ProcessedSet,
    ScreenshotHandler, SessionStatistics,
};
pub use error::{Result, ShotkeepError};
pub use picker::{prompt_for_folder, FolderPicker, TerminalFolderPicker};
pub use prompt::{DecisionPrompt, TerminalPrompt};
pub use watch::{SessionEnd, WatchSession};
