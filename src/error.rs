//! Error types shared across the crate

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShotkeepError {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("prompt error: {0}")]
    PromptError(String),

    /// The user pressed Ctrl+C while a question was open
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ShotkeepError>;
