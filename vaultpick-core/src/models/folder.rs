//! Folder index built from `bw list folders`.

use std::collections::HashMap;

use super::item::VaultFolder;

/// Mapping from folder id to display name
///
/// The folder named like the configured agent folder is not part of the
/// mapping; its id is recorded separately so its items can be routed to the
/// key agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderIndex {
    names: HashMap<String, String>,
    agent_folder_id: Option<String>,
}

impl FolderIndex {
    /// Builds an index from the folders printed by the vault CLI
    ///
    /// Folders without an id ("No Folder") are skipped.
    #[must_use]
    pub fn from_folders(
        folders: impl IntoIterator<Item = VaultFolder>,
        agent_folder_name: &str,
    ) -> Self {
        let mut index = Self::default();
        for folder in folders {
            let Some(id) = folder.id else {
                continue;
            };
            if folder.name == agent_folder_name {
                index.agent_folder_id = Some(id);
            } else {
                index.names.insert(id, folder.name);
            }
        }
        index
    }

    /// Returns the display name of a folder
    #[must_use]
    pub fn name(&self, folder_id: &str) -> Option<&str> {
        self.names.get(folder_id).map(String::as_str)
    }

    /// Returns true if the id is either a named folder or the agent folder
    #[must_use]
    pub fn contains(&self, folder_id: &str) -> bool {
        self.names.contains_key(folder_id) || self.is_agent_folder(folder_id)
    }

    /// Returns true if the id is the agent folder
    #[must_use]
    pub fn is_agent_folder(&self, folder_id: &str) -> bool {
        self.agent_folder_id.as_deref() == Some(folder_id)
    }

    /// Returns the agent folder id, if the vault has one
    #[must_use]
    pub fn agent_folder_id(&self) -> Option<&str> {
        self.agent_folder_id.as_deref()
    }

    /// Number of named folders (the agent folder is not counted)
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.agent_folder_id.is_none()
    }

    /// Forgets every folder
    pub fn clear(&mut self) {
        self.names.clear();
        self.agent_folder_id = None;
    }
}
