//! Command-backed clipboard sink (xclip by default).

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::ClipboardSettings;
use crate::error::{ClipboardError, ClipboardResult};

use super::ClipboardSink;

/// Replaces the clipboard by piping text into a command
///
/// Defaults to `xclip -selection clipboard`; any program that reads the new
/// contents from stdin works (`wl-copy`, `xsel -ib`).
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Creates a sink running `program` with `args`
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Creates a sink from the clipboard settings
    #[must_use]
    pub fn from_settings(settings: &ClipboardSettings) -> Self {
        Self::new(&settings.program, settings.args.clone())
    }
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::from_settings(&ClipboardSettings::default())
    }
}

#[async_trait]
impl ClipboardSink for CommandClipboard {
    async fn set_contents(&self, text: &str) -> ClipboardResult<()> {
        // xclip forks a selection owner that keeps running; it inherits no
        // pipes from us so waiting on the parent does not block.
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::Spawn(format!("{}: {e}", self.program.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| ClipboardError::CommandFailed(format!("write failed: {e}")))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipboardError::CommandFailed(e.to_string()))?;

        if !status.success() {
            return Err(ClipboardError::CommandFailed(format!(
                "{} exited with {status}",
                self.program.display()
            )));
        }

        Ok(())
    }
}
