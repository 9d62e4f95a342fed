//! First-run folder selection

use crate::config::ConfigStore;
use crate::error::{Result, ShotkeepError};
use dialoguer::Input;
use std::path::{Path, PathBuf};

/// Interactive source of a screenshot folder. `None` means the user cancelled.
pub trait FolderPicker {
    fn pick_folder(&mut self) -> Result<Option<PathBuf>>;
}

impl<F> FolderPicker for F
where
    F: FnMut() -> Result<Option<PathBuf>>,
{
    fn pick_folder(&mut self) -> Result<Option<PathBuf>> {
        self()
    }
}

/// Asks for the folder on the terminal. An empty answer cancels.
#[derive(Debug, Default)]
pub struct TerminalFolderPicker;

impl TerminalFolderPicker {
    pub fn new() -> Self {
        Self
    }
}

impl FolderPicker for TerminalFolderPicker {
    fn pick_folder(&mut self) -> Result<Option<PathBuf>> {
        let answer: String = Input::new()
            .with_prompt("Select your game screenshot folder (blank to cancel)")
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                if input.trim().is_empty() || Path::new(input.trim()).is_dir() {
                    Ok(())
                } else {
                    Err(format!("Not a folder: {}", input.trim()))
                }
            })
            .interact_text()
            .map_err(|e| ShotkeepError::PromptError(e.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }
}

/// Runs the picker and persists the chosen folder.
///
/// On cancellation, or if the picker itself fails, an error is shown and
/// `None` is returned; the caller must not start watching.
pub fn prompt_for_folder<P: FolderPicker>(
    picker: &mut P,
    store: &ConfigStore,
) -> Result<Option<PathBuf>> {
    let folder = match picker.pick_folder() {
        Ok(Some(folder)) => folder,
        Ok(None) => {
            eprintln!("Error: no folder selected");
            tracing::error!("folder selection cancelled");
            return Ok(None);
        }
        Err(e) => {
            eprintln!("Error: no folder selected ({})", e);
            tracing::error!("folder selection failed: {}", e);
            return Ok(None);
        }
    };

    store.save(&folder)?;
    tracing::info!(folder = %folder.display(), config = %store.path().display(), "screenshot folder saved");
    Ok(Some(folder))
}
