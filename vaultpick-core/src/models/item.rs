//! Raw JSON shapes printed by `bw list folders` and `bw list items`.
//!
//! Only the fields the daemon needs are modelled; serde ignores the rest.

use serde::Deserialize;

/// A folder as printed by `bw list folders`
///
/// The synthetic "No Folder" entry has a null id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaultFolder {
    /// Folder id
    #[serde(default)]
    pub id: Option<String>,
    /// Display name
    pub name: String,
}

/// A vault item as printed by `bw list items`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    /// Item name
    pub name: String,
    /// Folder the item lives in, if any
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Login data (absent for notes, cards and identities)
    #[serde(default)]
    pub login: Option<VaultLogin>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Key pair of an ssh-key item
    #[serde(default)]
    pub ssh_key: Option<VaultSshKey>,
}

/// Login section of a vault item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VaultLogin {
    /// Username, may be null
    #[serde(default)]
    pub username: Option<String>,
    /// Password, may be null
    #[serde(default)]
    pub password: Option<String>,
}

/// ssh key section of a vault item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSshKey {
    /// OpenSSH private key
    #[serde(default)]
    pub private_key: Option<String>,
}

impl VaultItem {
    /// Returns the key material to hand to the key agent
    ///
    /// Prefers a dedicated ssh-key item, then the notes, then the login
    /// password. Empty values are skipped.
    #[must_use]
    pub fn agent_payload(&self) -> Option<&str> {
        let ssh_key = self
            .ssh_key
            .as_ref()
            .and_then(|k| k.private_key.as_deref());
        let password = self.login.as_ref().and_then(|l| l.password.as_deref());

        [ssh_key, self.notes.as_deref(), password]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}
