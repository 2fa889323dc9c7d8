//! Clipboard controller
//!
//! Puts a secret on the system clipboard for a bounded window and then
//! overwrites it. The window is guarded by an exposure marker on disk so two
//! exposures never overlap: the second one is skipped rather than queued,
//! which keeps an older flush from clearing a newer secret.

mod lock;
mod xclip;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClipboardSettings;
use crate::error::ClipboardResult;

pub use lock::ExposureLock;
pub use xclip::CommandClipboard;

/// Destination for clipboard contents
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    /// Replaces the clipboard contents with `text`
    ///
    /// # Errors
    /// Returns `ClipboardError` if the clipboard could not be written
    async fn set_contents(&self, text: &str) -> ClipboardResult<()>;
}

/// Result of an exposure attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureOutcome {
    /// The secret was copied and later overwritten
    Flushed,
    /// Another exposure owned the window; nothing was written
    Skipped,
}

/// Coordinates clipboard writes with the exposure marker
pub struct ClipboardController {
    sink: Arc<dyn ClipboardSink>,
    lock_path: PathBuf,
    flush_delay: Duration,
}

impl ClipboardController {
    /// Creates a controller
    #[must_use]
    pub fn new(
        sink: Arc<dyn ClipboardSink>,
        lock_path: impl Into<PathBuf>,
        flush_delay: Duration,
    ) -> Self {
        Self {
            sink,
            lock_path: lock_path.into(),
            flush_delay,
        }
    }

    /// Creates a controller using the command sink from `settings`
    #[must_use]
    pub fn from_settings(settings: &ClipboardSettings) -> Self {
        Self::new(
            Arc::new(CommandClipboard::from_settings(settings)),
            &settings.lock_path,
            settings.flush_delay(),
        )
    }

    /// Returns the exposure marker path
    #[must_use]
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Returns the time a secret stays on the clipboard
    #[must_use]
    pub const fn flush_delay(&self) -> Duration {
        self.flush_delay
    }

    /// Copies `secret`, waits the flush delay, then clears the clipboard
    ///
    /// The marker is held for the whole window and removed on every path,
    /// including errors. The delay is never shortened.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError` if the marker cannot be created or the
    /// clipboard cannot be written. A failed initial write skips the delay.
    pub async fn expose_and_flush(
        &self,
        secret: &SecretString,
    ) -> ClipboardResult<ExposureOutcome> {
        let Some(guard) = ExposureLock::try_acquire(&self.lock_path)? else {
            tracing::info!(
                "Clipboard exposure already in progress ({}), skipping",
                self.lock_path.display()
            );
            return Ok(ExposureOutcome::Skipped);
        };

        self.sink.set_contents(secret.expose_secret()).await?;
        tracing::debug!("Secret copied, flushing in {:?}", self.flush_delay);

        tokio::time::sleep(self.flush_delay).await;

        let flushed = self.sink.set_contents("").await;
        guard.release()?;
        flushed?;

        tracing::debug!("Clipboard flushed");
        Ok(ExposureOutcome::Flushed)
    }

    /// Removes an exposure marker left behind by a previous process
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Lock` if the marker exists but cannot be removed.
    pub fn clear_stale_marker(&self) -> ClipboardResult<()> {
        if ExposureLock::remove_stale(&self.lock_path)? {
            tracing::info!("Removed stale exposure marker {}", self.lock_path.display());
        }
        Ok(())
    }
}
