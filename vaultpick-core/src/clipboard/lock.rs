//! Exposure marker: a file whose presence means a secret is on the clipboard.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{ClipboardError, ClipboardResult};

/// Exclusive ownership of the exposure window
///
/// Acquired by creating the marker file with `create_new`, so two workers
/// racing for the window cannot both succeed. The marker is removed on
/// `release` or when the guard is dropped.
#[derive(Debug)]
pub struct ExposureLock {
    path: PathBuf,
    held: bool,
}

impl ExposureLock {
    /// Tries to open the exposure window
    ///
    /// # Returns
    /// `Some(lock)` if the marker was created, `None` if another exposure
    /// already owns it
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Lock` if the marker cannot be created for any
    /// other reason.
    pub fn try_acquire(path: &Path) -> ClipboardResult<Option<Self>> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                // The content is informational only
                let _ = writeln!(file, "pid={}", std::process::id());
                Ok(Some(Self {
                    path: path.to_path_buf(),
                    held: true,
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(lock_error(path, &e)),
        }
    }

    /// Returns true if an exposure window is currently open
    #[must_use]
    pub fn is_active(path: &Path) -> bool {
        path.exists()
    }

    /// Removes a marker left behind by a previous process
    ///
    /// # Returns
    /// `true` if a marker was removed
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Lock` if an existing marker cannot be removed.
    pub fn remove_stale(path: &Path) -> ClipboardResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(lock_error(path, &e)),
        }
    }

    /// Returns the marker path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the exposure window
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Lock` if the marker cannot be removed.
    pub fn release(mut self) -> ClipboardResult<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> ClipboardResult<()> {
        if self.held {
            self.held = false;
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(lock_error(&self.path, &e)),
            }
        }
        Ok(())
    }
}

impl Drop for ExposureLock {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            tracing::warn!("{e}");
        }
    }
}

fn lock_error(path: &Path, e: &io::Error) -> ClipboardError {
    ClipboardError::Lock {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
