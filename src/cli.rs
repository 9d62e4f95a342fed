// CLI module for argument parsing and configuration

use crate::domain::handler::DEFAULT_SETTLE_DELAY;
use crate::domain::DeleteMode;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Shotkeep - watch a screenshot folder and ask before keeping each new shot
///
/// On first run you are asked for the folder, which is remembered for next time.
/// Answer `y` to keep a screenshot or `n` to delete it.
#[derive(Parser, Debug, Clone)]
#[command(name = "shotkeep")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file holding the screenshot folder
    ///
    /// Defaults to config.json in the platform config directory.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Ask for the screenshot folder again even if one is saved
    #[arg(long = "reset-folder", action = ArgAction::SetTrue)]
    pub reset_folder: bool,

    /// Milliseconds to wait after a screenshot appears before asking
    #[arg(long = "settle-ms", default_value_t = DEFAULT_SETTLE_DELAY.as_millis() as u64)]
    pub settle_ms: u64,

    /// Dry run mode - ask as usual but never delete anything
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Move declined screenshots to the recycle bin instead of deleting them
    #[arg(short = 't', long = "trash", action = ArgAction::SetTrue)]
    pub trash: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref config) = self.config {
            if config.is_dir() {
                return Err(format!(
                    "Config path is a directory: {}",
                    config.display()
                ));
            }
        }

        if self.dry_run && self.trash {
            return Err("--dry-run and --trash cannot be used together".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: Option<PathBuf>,
    pub reset_folder: bool,
    pub settle_delay: Duration,
    pub dry_run: bool,
    pub delete_mode: DeleteMode,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            config_path: args.config,
            reset_folder: args.reset_folder,
            settle_delay: Duration::from_millis(args.settle_ms),
            dry_run: args.dry_run,
            delete_mode: if args.trash {
                DeleteMode::Trash
            } else {
                DeleteMode::Remove
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            config_path: None,
            reset_folder: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
            dry_run: false,
            delete_mode: DeleteMode::Remove,
        }
    }
}
