//! Vault CLI trait definition
//!
//! This module defines the `VaultCli` trait: one method per vault command
//! the daemon needs. The process-backed implementation lives in
//! `bitwarden.rs`; tests substitute in-memory fakes.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::VaultResult;
use crate::models::{VaultFolder, VaultItem};

/// Abstraction over the external vault program
#[async_trait]
pub trait VaultCli: Send + Sync {
    /// List every folder
    ///
    /// # Arguments
    /// * `session` - Session token of the unlocked vault, if any
    ///
    /// # Errors
    /// Returns `VaultError` if the command fails or prints malformed output
    async fn list_folders(&self, session: Option<&SecretString>) -> VaultResult<Vec<VaultFolder>>;

    /// List every item
    ///
    /// # Arguments
    /// * `session` - Session token of the unlocked vault, if any
    ///
    /// # Errors
    /// Returns `VaultError` if the command fails or prints malformed output
    async fn list_items(&self, session: Option<&SecretString>) -> VaultResult<Vec<VaultItem>>;

    /// Unlock the vault
    ///
    /// # Returns
    /// The raw session token printed by the vault program
    ///
    /// # Errors
    /// Returns `VaultError` if the password is rejected or no token is printed
    async fn unlock(&self, password: &SecretString) -> VaultResult<SecretString>;

    /// Lock the vault
    ///
    /// # Errors
    /// Returns `VaultError` if the command fails
    async fn lock(&self) -> VaultResult<()>;

    /// Returns the backend identifier (e.g. "bitwarden")
    fn backend_id(&self) -> &'static str;
}
