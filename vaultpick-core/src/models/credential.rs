//! Pickable credential entries.

use secrecy::{ExposeSecret, SecretString};

/// Group name used for items that are not in any folder
pub const DEFAULT_GROUP: &str = "Default";

/// A credential offered in the picker
///
/// `display` is the line shown to the user; `secret` is what ends up on the
/// clipboard. The secret is kept as a `SecretString` so it is redacted from
/// `Debug` output and zeroized on drop.
#[derive(Debug, Clone)]
pub struct CredentialEntry {
    display: String,
    secret: SecretString,
}

impl CredentialEntry {
    /// Creates an entry from a prepared display line
    #[must_use]
    pub fn new(display: impl Into<String>, secret: SecretString) -> Self {
        Self {
            display: display.into(),
            secret,
        }
    }

    /// Creates an entry displayed as `"<group>/<name> : <username>"`
    #[must_use]
    pub fn from_login(group: &str, name: &str, username: &str, secret: SecretString) -> Self {
        Self::new(format!("{group}/{name} : {username}"), secret)
    }

    /// Line shown in the picker
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The secret, still wrapped
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// Exposes the secret for use (should be used carefully)
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

// Manual PartialEq implementation since SecretString doesn't implement it
impl PartialEq for CredentialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.display == other.display && self.expose_secret() == other.expose_secret()
    }
}

impl Eq for CredentialEntry {}

/// Sorts entries case-insensitively by display line
///
/// The sort is stable, so entries whose display lines differ only in case
/// keep their listing order.
pub fn sort_entries(entries: &mut [CredentialEntry]) {
    entries.sort_by_cached_key(|e| e.display.to_lowercase());
}

/// Finds the entry whose display line equals the picker output exactly
#[must_use]
pub fn match_selection<'a>(
    entries: &'a [CredentialEntry],
    choice: &str,
) -> Option<&'a CredentialEntry> {
    entries.iter().find(|e| e.display == choice)
}
