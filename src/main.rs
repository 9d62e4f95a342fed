use shotkeep::app::{build_session, resolve_folder, run_until};
use shotkeep::cli::{AppConfig, Args};
use shotkeep::{ConfigStore, SessionEnd, TerminalFolderPicker, TerminalPrompt};

use chrono::Utc;
use crossterm::terminal::disable_raw_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config: AppConfig = args.into();

    let store = match &config.config_path {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::at_default_location()?,
    };

    // First run (or a stale folder) asks for the folder, then carries on
    let Some(folder) = resolve_folder(&store, &mut TerminalFolderPicker::new(), config.reset_folder)?
    else {
        println!("No screenshot folder set, nothing to watch");
        return Ok(());
    };

    if config.dry_run {
        println!("[DRY RUN] Declined screenshots will not be deleted");
    }

    let session = build_session(folder, TerminalPrompt::new(), &config);
    let report = run_until(session, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    if report.is_abandoned() {
        // The watch thread is still blocked on the open question and would
        // keep the runtime alive, so leave without waiting for it.
        let _ = disable_raw_mode();
        println!("\nQuestion abandoned, exiting");
        std::process::exit(0);
    }

    if report.end == SessionEnd::Disconnected {
        tracing::warn!("folder watcher stopped unexpectedly");
    }

    if let Some(stats) = report.statistics {
        let prefix = if config.dry_run { "[DRY RUN] " } else { "" };
        println!("\n{}{}", prefix, stats.summary(Utc::now()));
    }

    Ok(())
}
