//! Picker gateway
//!
//! An interactive external selector used in two modes: hidden free-text
//! input for the master password, and list selection over credential
//! display lines.

mod dmenu;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::PickerResult;
use crate::models::{match_selection, CredentialEntry};

pub use dmenu::DmenuPicker;

/// Abstraction over the external picker process
#[async_trait]
pub trait Picker: Send + Sync {
    /// Reads one line of hidden free-text input
    ///
    /// # Errors
    /// Returns `PickerError` if the picker cannot be run
    async fn prompt_hidden(&self) -> PickerResult<SecretString>;

    /// Lets the user choose one of `candidates`
    ///
    /// # Returns
    /// The chosen line, or `None` if the user cancelled
    ///
    /// # Errors
    /// Returns `PickerError` if the picker cannot be run
    async fn select(&self, candidates: &[String]) -> PickerResult<Option<String>>;
}

/// Shows the entries' display lines and maps the choice back to its entry
///
/// A line that matches no entry exactly is treated like a cancellation.
///
/// # Errors
///
/// Returns `PickerError` if the picker cannot be run.
pub async fn pick_entry(
    picker: &dyn Picker,
    entries: &[CredentialEntry],
) -> PickerResult<Option<CredentialEntry>> {
    let lines: Vec<String> = entries.iter().map(|e| e.display().to_string()).collect();
    let Some(choice) = picker.select(&lines).await? else {
        return Ok(None);
    };

    let entry = match_selection(entries, &choice).cloned();
    if entry.is_none() {
        tracing::debug!("Picker returned a line that matches no entry");
    }
    Ok(entry)
}
