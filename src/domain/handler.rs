use super::{file_name_of, is_screenshot_name, Decision, IgnoreReason, Outcome};
use super::{ProcessedSet, SessionStatistics};
use crate::error::ShotkeepError;
use crate::prompt::DecisionPrompt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Time given to the writing process to finish flushing a new file
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How a declined screenshot is removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the file permanently
    #[default]
    Remove,
    /// Move the file to the OS recycle bin
    Trash,
}

/// Handles creation events one at a time: filter, settle, ask, delete.
#[derive(Debug)]
pub struct ScreenshotHandler<P> {
    prompt: P,
    processed: ProcessedSet,
    stats: SessionStatistics,
    settle_delay: Duration,
    delete_mode: DeleteMode,
    dry_run: bool,
}

impl<P: DecisionPrompt> ScreenshotHandler<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            processed: ProcessedSet::new(),
            stats: SessionStatistics::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            delete_mode: DeleteMode::default(),
            dry_run: false,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_delete_mode(mut self, delete_mode: DeleteMode) -> Self {
        self.delete_mode = delete_mode;
        self
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    pub fn statistics(&self) -> &SessionStatistics {
        &self.stats
    }

    /// Handles a creation event for `path` with no way to be stopped
    pub fn handle_created(&mut self, path: &Path) -> Outcome {
        let never = AtomicBool::new(false);
        self.handle_created_until(path, &never)
    }

    /// Handles a creation event for `path`, giving up if `stop` is raised.
    ///
    /// `stop` is checked after the settle delay and again once the question
    /// is answered; in both cases the file is left untouched and the outcome
    /// is [`Outcome::Abandoned`]. Prompt failures other than interruption
    /// leave the file untouched as [`Outcome::PromptFailed`].
    pub fn handle_created_until(&mut self, path: &Path, stop: &AtomicBool) -> Outcome {
        let outcome = self.evaluate(path, stop);
        self.stats.record(&outcome);
        outcome
    }

    fn evaluate(&mut self, path: &Path, stop: &AtomicBool) -> Outcome {
        if path.is_dir() {
            return Outcome::Ignored(IgnoreReason::Directory);
        }

        let name = match file_name_of(path) {
            Some(name) => name,
            None => return Outcome::Ignored(IgnoreReason::NotScreenshot),
        };

        if self.processed.contains(&name) {
            tracing::debug!(file = %name, "already processed, skipping");
            return Outcome::Ignored(IgnoreReason::AlreadyProcessed);
        }

        if !is_screenshot_name(&name) {
            return Outcome::Ignored(IgnoreReason::NotScreenshot);
        }

        tracing::info!(file = %name, "new screenshot detected");

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
        if stop.load(Ordering::SeqCst) {
            tracing::info!(file = %name, "stopping, not asking about file");
            return Outcome::Abandoned;
        }
        self.processed.insert(name.clone());

        let decision = match self.prompt.ask(&name) {
            Ok(decision) => decision,
            Err(ShotkeepError::Interrupted) => {
                tracing::info!(file = %name, "question interrupted, leaving file untouched");
                return Outcome::Abandoned;
            }
            Err(e) => {
                tracing::error!(file = %name, "prompt failed, leaving file untouched: {}", e);
                return Outcome::PromptFailed(e.to_string());
            }
        };

        if stop.load(Ordering::SeqCst) {
            tracing::info!(file = %name, answer = ?decision, "answered after stop, leaving file untouched");
            return Outcome::Abandoned;
        }

        match decision {
            Decision::Keep => {
                tracing::info!(file = %name, "kept");
                Outcome::Kept
            }
            Decision::Delete => self.delete(path, &name),
        }
    }

    fn delete(&self, path: &Path, name: &str) -> Outcome {
        if self.dry_run {
            tracing::info!(file = %name, "[DRY RUN] would delete");
            return Outcome::Deleted;
        }

        let result = match self.delete_mode {
            DeleteMode::Remove => fs::remove_file(path),
            DeleteMode::Trash => {
                trash::delete(path).map_err(|e| io::Error::other(e.to_string()))
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(file = %name, mode = ?self.delete_mode, "deleted");
                Outcome::Deleted
            }
            Err(e) => {
                tracing::warn!(file = %name, "failed to delete screenshot: {}", e);
                Outcome::DeleteFailed(e.to_string())
            }
        }
    }
}
