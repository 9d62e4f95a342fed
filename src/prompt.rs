//! The keep/delete question asked for each detected screenshot

use crate::domain::Decision;
use crate::error::{Result, ShotkeepError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};

/// Asks the user whether to keep a file. Blocks until answered.
pub trait DecisionPrompt {
    fn ask(&mut self, file_name: &str) -> Result<Decision>;
}

impl<F> DecisionPrompt for F
where
    F: FnMut(&str) -> Result<Decision>,
{
    fn ask(&mut self, file_name: &str) -> Result<Decision> {
        self(file_name)
    }
}

/// Result of mapping one key press while the question is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    Answer(Decision),
    Interrupt,
    None,
}

/// Maps a key press to an answer
pub fn handle_prompt_key(key: KeyEvent) -> PromptKey {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => PromptKey::Interrupt,

        // Keep: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => PromptKey::Answer(Decision::Keep),
        (KeyCode::Char('Y'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            PromptKey::Answer(Decision::Keep)
        }
        (KeyCode::Enter, KeyModifiers::NONE) => PromptKey::Answer(Decision::Keep),

        // Delete: n
        (KeyCode::Char('n'), KeyModifiers::NONE) => PromptKey::Answer(Decision::Delete),
        (KeyCode::Char('N'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            PromptKey::Answer(Decision::Delete)
        }

        _ => PromptKey::None,
    }
}

/// Terminal question read with crossterm in raw mode.
///
/// Raw mode is only held while waiting for the key, so log output between
/// questions renders normally.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_answer() -> Result<Decision> {
        loop {
            let key = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                _ => continue,
            };

            match handle_prompt_key(key) {
                PromptKey::Answer(decision) => return Ok(decision),
                PromptKey::Interrupt => return Err(ShotkeepError::Interrupted),
                PromptKey::None => continue,
            }
        }
    }
}

impl DecisionPrompt for TerminalPrompt {
    fn ask(&mut self, file_name: &str) -> Result<Decision> {
        let mut stdout = io::stdout();
        write!(stdout, "\x07Keep screenshot {}? [Y/n] ", file_name)?;
        stdout.flush()?;

        enable_raw_mode().map_err(|e| ShotkeepError::PromptError(e.to_string()))?;
        let answer = Self::read_answer();
        disable_raw_mode().map_err(|e| ShotkeepError::PromptError(e.to_string()))?;

        match &answer {
            Ok(Decision::Keep) => writeln!(stdout, "keep")?,
            Ok(Decision::Delete) => writeln!(stdout, "delete")?,
            Err(_) => writeln!(stdout)?,
        }
        answer
    }
}
