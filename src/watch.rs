//! Folder watch loop feeding the screenshot handler

use crate::domain::{Outcome, ScreenshotHandler, SessionStatistics};
use crate::error::Result;
use crate::prompt::DecisionPrompt;
use notify::event::CreateKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

/// How often the loop wakes up to check the stop flag while idle
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Why a watch session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The stop flag was raised
    Stopped,
    /// Ctrl+C was pressed while a question was open
    Interrupted,
    /// The watcher went away and no more events can arrive
    Disconnected,
}

/// One watch session over a single folder, non-recursive
pub struct WatchSession<P> {
    folder: PathBuf,
    handler: ScreenshotHandler<P>,
    poll_interval: Duration,
}

impl<P: DecisionPrompt> WatchSession<P> {
    pub fn new(folder: impl Into<PathBuf>, handler: ScreenshotHandler<P>) -> Self {
        Self {
            folder: folder.into(),
            handler,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn handler(&self) -> &ScreenshotHandler<P> {
        &self.handler
    }

    pub fn statistics(&self) -> &SessionStatistics {
        self.handler.statistics()
    }

    /// Subscribes to the folder and handles creation events until `stop` is
    /// raised or a question is interrupted. The subscription is released
    /// before returning.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<SessionEnd> {
        let (tx, rx) = channel();
        let mut watcher: RecommendedWatcher = Watcher::new(tx, notify::Config::default())?;
        watcher.watch(&self.folder, RecursiveMode::NonRecursive)?;

        tracing::info!(folder = %self.folder.display(), "watching for new screenshots");
        println!("Watching {} (Ctrl+C to stop)", self.folder.display());

        let end = self.drain(&rx, stop);

        if let Err(e) = watcher.unwatch(&self.folder) {
            tracing::debug!(folder = %self.folder.display(), "unwatch failed: {}", e);
        }
        tracing::info!(folder = %self.folder.display(), reason = ?end, "watch session ended");
        Ok(end)
    }

    /// Handles events from `rx` strictly one at a time
    pub fn drain(&mut self, rx: &Receiver<notify::Result<Event>>, stop: &AtomicBool) -> SessionEnd {
        loop {
            if stop.load(Ordering::SeqCst) {
                return SessionEnd::Stopped;
            }

            match rx.recv_timeout(self.poll_interval) {
                Ok(Ok(event)) => {
                    if let Some(end) = self.handle_event(event, stop) {
                        return end;
                    }
                }
                Ok(Err(e)) => tracing::warn!("watch error: {}", e),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return SessionEnd::Disconnected,
            }
        }
    }

    fn handle_event(&mut self, event: Event, stop: &AtomicBool) -> Option<SessionEnd> {
        match event.kind {
            EventKind::Create(CreateKind::Folder) => return None,
            EventKind::Create(_) => {}
            _ => return None,
        }

        for path in &event.paths {
            if stop.load(Ordering::SeqCst) {
                return Some(SessionEnd::Stopped);
            }
            if self.handler.handle_created_until(path, stop) == Outcome::Abandoned {
                if stop.load(Ordering::SeqCst) {
                    return Some(SessionEnd::Stopped);
                }
                return Some(SessionEnd::Interrupted);
            }
        }
        None
    }
}
