//! Core data models for `vaultpick`
//!
//! This module defines the raw shapes printed by the vault CLI and the
//! derived structures the daemon works with: the folder index and the
//! pickable credential entries.

mod credential;
mod folder;
mod item;

pub use credential::{match_selection, sort_entries, CredentialEntry, DEFAULT_GROUP};
pub use folder::FolderIndex;
pub use item::{VaultFolder, VaultItem, VaultLogin, VaultSshKey};
