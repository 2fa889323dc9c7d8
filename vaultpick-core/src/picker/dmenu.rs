//! dmenu backed picker.

use async_trait::async_trait;
use secrecy::SecretString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::PickerSettings;
use crate::error::{PickerError, PickerResult};

use super::Picker;

/// Runs `dmenu` for password entry and credential selection
#[derive(Debug, Clone)]
pub struct DmenuPicker {
    program: PathBuf,
    prompt: String,
    lines: u32,
    background: String,
    foreground: String,
}

impl DmenuPicker {
    /// Creates a picker from the picker settings
    #[must_use]
    pub fn from_settings(settings: &PickerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            prompt: settings.prompt.clone(),
            lines: settings.lines,
            background: settings.background.clone(),
            foreground: settings.foreground.clone(),
        }
    }

    /// Arguments for hidden input: text drawn in the background color
    #[must_use]
    pub fn hidden_args(&self) -> Vec<String> {
        vec![
            "-p".to_string(),
            self.prompt.clone(),
            "-nf".to_string(),
            self.background.clone(),
            "-nb".to_string(),
            self.background.clone(),
            "-sb".to_string(),
            self.foreground.clone(),
        ]
    }

    /// Arguments for case-insensitive list selection
    #[must_use]
    pub fn list_args(&self) -> Vec<String> {
        vec![
            "-nb".to_string(),
            self.background.clone(),
            "-sb".to_string(),
            self.foreground.clone(),
            "-l".to_string(),
            self.lines.to_string(),
            "-i".to_string(),
        ]
    }

    /// Runs the picker, feeds `input`, closes stdin and returns stdout
    ///
    /// dmenu exits non-zero when the user presses escape; that is reported
    /// as empty output rather than an error.
    async fn run(&self, args: &[String], input: &str) -> PickerResult<String> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PickerError::Spawn(format!("{}: {e}", self.program.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| PickerError::Io(format!("Failed to write candidates: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| PickerError::Io(format!("Failed to wait for picker: {e}")))?;

        if !output.status.success() {
            tracing::debug!("Picker exited with {}", output.status);
            return Ok(String::new());
        }

        Ok(strip_newline(&String::from_utf8_lossy(&output.stdout)).to_string())
    }
}

impl Default for DmenuPicker {
    fn default() -> Self {
        Self::from_settings(&PickerSettings::default())
    }
}

/// Removes the line terminator dmenu appends to its output
fn strip_newline(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}

/// Newline-delimited picker input
fn candidate_input(candidates: &[String]) -> String {
    let mut input = String::with_capacity(candidates.iter().map(|c| c.len() + 1).sum());
    for candidate in candidates {
        input.push_str(candidate);
        input.push('\n');
    }
    input
}

#[async_trait]
impl Picker for DmenuPicker {
    async fn prompt_hidden(&self) -> PickerResult<SecretString> {
        let line = self.run(&self.hidden_args(), "").await?;
        Ok(SecretString::from(line))
    }

    async fn select(&self, candidates: &[String]) -> PickerResult<Option<String>> {
        let choice = self
            .run(&self.list_args(), &candidate_input(candidates))
            .await?;
        Ok(if choice.is_empty() { None } else { Some(choice) })
    }
}
