//! Startup flow and the watch session lifecycle

use crate::cli::AppConfig;
use crate::config::ConfigStore;
use crate::domain::{ScreenshotHandler, SessionStatistics};
use crate::error::{Result, ShotkeepError};
use crate::picker::{prompt_for_folder, FolderPicker};
use crate::prompt::DecisionPrompt;
use crate::watch::{SessionEnd, WatchSession};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for the watch thread after a shutdown request. A
/// question left open past this is abandoned.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Summary of a finished session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub end: SessionEnd,
    /// Missing when the watch thread was still blocked on a question at exit
    pub statistics: Option<SessionStatistics>,
}

impl SessionReport {
    /// True when a question was still open after the shutdown grace period
    pub fn is_abandoned(&self) -> bool {
        self.statistics.is_none()
    }
}

/// Returns the folder to watch, asking for one if none is saved.
///
/// A saved folder that is no longer a directory is treated as unsaved.
/// `None` means the user cancelled and nothing should be watched.
pub fn resolve_folder<P: FolderPicker>(
    store: &ConfigStore,
    picker: &mut P,
    reset: bool,
) -> Result<Option<PathBuf>> {
    if !reset {
        if let Some(folder) = store.load() {
            if folder.is_dir() {
                return Ok(Some(folder));
            }
            tracing::warn!(folder = %folder.display(), "saved screenshot folder is missing, asking again");
        }
    }

    prompt_for_folder(picker, store)
}

/// Builds the handler and session for `folder` from the app config
pub fn build_session<P: DecisionPrompt>(
    folder: PathBuf,
    prompt: P,
    config: &AppConfig,
) -> WatchSession<P> {
    let mut handler = ScreenshotHandler::new(prompt)
        .with_settle_delay(config.settle_delay)
        .with_delete_mode(config.delete_mode);
    handler.set_dry_run(config.dry_run);
    WatchSession::new(folder, handler)
}

/// Runs `session` on a blocking thread until it ends on its own or
/// `shutdown` completes.
pub async fn run_until<P, F>(session: WatchSession<P>, shutdown: F) -> Result<SessionReport>
where
    P: DecisionPrompt + Send + 'static,
    F: Future<Output = ()>,
{
    run_until_with_grace(session, shutdown, SHUTDOWN_GRACE).await
}

/// Like [`run_until`], with an explicit wait for the watch thread after
/// shutdown.
///
/// If the thread is still blocked on a question when `grace` runs out, the
/// report has no statistics. The thread is left behind and will not act on
/// the late answer, but it still holds the runtime open: the caller is
/// expected to exit the process.
pub async fn run_until_with_grace<P, F>(
    mut session: WatchSession<P>,
    shutdown: F,
    grace: Duration,
) -> Result<SessionReport>
where
    P: DecisionPrompt + Send + 'static,
    F: Future<Output = ()>,
{
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let mut task = tokio::task::spawn_blocking(move || {
        let end = session.run(&flag);
        end.map(|end| SessionReport {
            end,
            statistics: Some(session.statistics().clone()),
        })
    });

    tokio::select! {
        joined = &mut task => flatten(joined),
        _ = shutdown => {
            tracing::info!("shutdown requested");
            stop.store(true, Ordering::SeqCst);

            match tokio::time::timeout(grace, task).await {
                Ok(joined) => flatten(joined),
                Err(_) => {
                    tracing::warn!("a question is still open, abandoning it");
                    Ok(SessionReport {
                        end: SessionEnd::Stopped,
                        statistics: None,
                    })
                }
            }
        }
    }
}

fn flatten(
    joined: std::result::Result<Result<SessionReport>, tokio::task::JoinError>,
) -> Result<SessionReport> {
    joined.map_err(|e| ShotkeepError::Io(io::Error::other(e.to_string())))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, DeleteMode};
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.json"))
    }

    #[test]
    fn test_first_run_asks_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let shots = temp_dir.path().join("shots");
        fs::create_dir(&shots).unwrap();

        let calls = Cell::new(0);
        let chosen = shots.clone();
        let mut picker = || -> Result<Option<PathBuf>> {
            calls.set(calls.get() + 1);
            Ok(Some(chosen.clone()))
        };
        assert_eq!(
            resolve_folder(&store, &mut picker, false).unwrap(),
            Some(shots.clone())
        );
        assert_eq!(calls.get(), 1);

        // Second start loads the saved folder without asking
        assert_eq!(
            resolve_folder(&store, &mut picker, false).unwrap(),
            Some(shots)
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_cancelled_first_run_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let mut picker = || -> Result<Option<PathBuf>> { Ok(None) };

        assert_eq!(resolve_folder(&store, &mut picker, false).unwrap(), None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_stale_folder_asks_again() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save(&temp_dir.path().join("deleted")).unwrap();

        let replacement = temp_dir.path().to_path_buf();
        let expected = replacement.clone();
        let mut picker = move || -> Result<Option<PathBuf>> { Ok(Some(replacement.clone())) };

        assert_eq!(
            resolve_folder(&store, &mut picker, false).unwrap(),
            Some(expected.clone())
        );
        assert_eq!(store.load(), Some(expected));
    }

    #[test]
    fn test_reset_ignores_saved_folder() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let old = temp_dir.path().join("old");
        let new = temp_dir.path().join("new");
        fs::create_dir(&old).unwrap();
        fs::create_dir(&new).unwrap();
        store.save(&old).unwrap();

        let chosen = new.clone();
        let mut picker = move || -> Result<Option<PathBuf>> { Ok(Some(chosen.clone())) };
        assert_eq!(
            resolve_folder(&store, &mut picker, true).unwrap(),
            Some(new.clone())
        );
        assert_eq!(store.load(), Some(new));
    }

    #[test]
    fn test_build_session_applies_config() {
        let config = AppConfig {
            settle_delay: Duration::ZERO,
            dry_run: true,
            delete_mode: DeleteMode::Trash,
            ..AppConfig::default()
        };
        let prompt = |_: &str| -> Result<Decision> { Ok(Decision::Keep) };
        let session = build_session(PathBuf::from("shots"), prompt, &config);

        assert_eq!(session.folder(), PathBuf::from("shots").as_path());
        assert!(session.handler().is_dry_run());
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = |_: &str| -> Result<Decision> { Ok(Decision::Keep) };
        let session = build_session(temp_dir.path().to_path_buf(), prompt, &AppConfig::default());

        let report = run_until(session, tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap();
        assert_eq!(report.end, SessionEnd::Stopped);
        let stats = report.statistics.unwrap();
        assert_eq!(stats.decided(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_question_outliving_grace_is_abandoned() {
        let temp_dir = TempDir::new().unwrap();
        let shot = temp_dir.path().join("shot.jpg");
        fs::write(&shot, b"jpeg").unwrap();

        let asking = Arc::new(AtomicBool::new(false));
        let answered = Arc::new(AtomicBool::new(false));
        let (asking_flag, answered_flag) = (Arc::clone(&asking), Arc::clone(&answered));
        let prompt = move |_: &str| -> Result<Decision> {
            asking_flag.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(600));
            answered_flag.store(true, Ordering::SeqCst);
            Ok(Decision::Delete)
        };

        let config = AppConfig {
            settle_delay: Duration::ZERO,
            ..AppConfig::default()
        };
        let session = build_session(temp_dir.path().to_path_buf(), prompt, &config);

        let folder = temp_dir.path().to_path_buf();
        let watching = Arc::clone(&asking);
        let shutdown = async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            // Re-create the file so the watcher sees a creation event
            fs::remove_file(folder.join("shot.jpg")).unwrap();
            fs::write(folder.join("shot.jpg"), b"jpeg").unwrap();
            while !watching.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };

        let started = std::time::Instant::now();
        let report = run_until_with_grace(session, shutdown, Duration::from_millis(100))
            .await
            .unwrap();
        assert!(report.is_abandoned());
        assert_eq!(report.end, SessionEnd::Stopped);
        assert!(!answered.load(Ordering::SeqCst));
        assert!(started.elapsed() < Duration::from_secs(5));

        // The late "delete" answer must not touch the file
        while !answered.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(shot.exists());
    }

    #[tokio::test]
    async fn test_run_until_reports_watch_failure() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = |_: &str| -> Result<Decision> { Ok(Decision::Keep) };
        let session = build_session(temp_dir.path().join("missing"), prompt, &AppConfig::default());

        let result = run_until(session, std::future::pending::<()>()).await;
        assert!(matches!(result, Err(ShotkeepError::WatchError(_))));
    }
}
