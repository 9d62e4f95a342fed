//! Screenshot decisions, the processed-name guard and session statistics

pub mod handler;

pub use handler::{DeleteMode, ScreenshotHandler};

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;

/// Extensions recognised as screenshots. Matching is case-sensitive.
pub const SCREENSHOT_EXTENSIONS: [&str; 2] = [".jpg", ".jpeg"];

/// The user's answer for a single detected file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Delete,
}

/// Why a creation event produced no prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Directory,
    NotScreenshot,
    AlreadyProcessed,
}

/// What the handler did with one creation event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored(IgnoreReason),
    Kept,
    Deleted,
    /// Deletion was attempted and failed; the name stays processed
    DeleteFailed(String),
    /// The question could not be asked or answered; the file is untouched
    PromptFailed(String),
    /// The question was interrupted, or the session stopped before the
    /// answer could be acted on
    Abandoned,
}

/// Returns true if `file_name` ends in `.jpg` or `.jpeg`
pub fn is_screenshot_name(file_name: &str) -> bool {
    SCREENSHOT_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

/// Final path component as an owned string, if the path has one
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// File names already evaluated during the current watch session.
///
/// Names are only ever added. A name that failed to delete stays here, so
/// it is never asked about again in the same session.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    names: HashSet<String>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns false if the name was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Counters for one watch session
#[derive(Debug, Clone)]
pub struct SessionStatistics {
    pub started_at: DateTime<Utc>,
    pub kept: usize,
    pub deleted: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl Default for SessionStatistics {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            kept: 0,
            deleted: 0,
            failed: 0,
            ignored: 0,
        }
    }
}

impl SessionStatistics {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Ignored(_) | Outcome::PromptFailed(_) => self.ignored += 1,
            Outcome::Kept => self.kept += 1,
            Outcome::Deleted => self.deleted += 1,
            Outcome::DeleteFailed(_) => self.failed += 1,
            Outcome::Abandoned => {}
        }
    }

    /// Number of files the user was asked about and answered
    pub fn decided(&self) -> usize {
        self.kept + self.deleted + self.failed
    }

    pub fn summary(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.started_at).num_minutes();
        format!(
            "{} screenshot(s) reviewed in {} min: {} kept, {} deleted, {} failed to delete",
            self.decided(),
            minutes,
            self.kept,
            self.deleted,
            self.failed
        )
    }
}
