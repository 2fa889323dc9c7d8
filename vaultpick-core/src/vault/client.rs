//! Vault client: session lifecycle and the memoized credential list.

use secrecy::SecretString;
use std::sync::Arc;

use crate::models::{sort_entries, CredentialEntry, FolderIndex, VaultItem, DEFAULT_GROUP};
use crate::ssh_agent::KeyAgent;

use super::backend::VaultCli;
use super::session::{SessionState, SessionStore};

/// High-level vault operations used by the daemon
///
/// Failures of the underlying CLI never escape this type: listings degrade to
/// empty results and unlock/lock report `false`. Details are logged.
pub struct VaultClient {
    cli: Arc<dyn VaultCli>,
    agent: Arc<dyn KeyAgent>,
    agent_folder: String,
    store: SessionStore,
}

impl VaultClient {
    /// Creates a locked client
    ///
    /// # Arguments
    /// * `cli` - The vault program wrapper
    /// * `agent` - Receives key material from the agent folder
    /// * `agent_folder` - Name of the folder routed to `agent`
    #[must_use]
    pub fn new(
        cli: Arc<dyn VaultCli>,
        agent: Arc<dyn KeyAgent>,
        agent_folder: impl Into<String>,
    ) -> Self {
        Self {
            cli,
            agent,
            agent_folder: agent_folder.into(),
            store: SessionStore::new(),
        }
    }

    /// Returns the shared session store
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the current lock state
    pub async fn state(&self) -> SessionState {
        self.store.state().await
    }

    /// Returns true if no session token is held
    pub async fn is_locked(&self) -> bool {
        self.store.is_locked().await
    }

    /// Refreshes and returns the folder index
    ///
    /// A failing folder listing leaves an empty index.
    pub async fn list_folders(&self) -> FolderIndex {
        let generation = self.store.generation();
        let token = self.store.token().await;
        let folders = self.fetch_folders(token.as_ref()).await;
        self.store.store_folders(generation, folders.clone());
        folders
    }

    async fn fetch_folders(&self, token: Option<&SecretString>) -> FolderIndex {
        match self.cli.list_folders(token).await {
            Ok(folders) => {
                let index = FolderIndex::from_folders(folders, &self.agent_folder);
                tracing::debug!(
                    "Indexed {} folders (agent folder {})",
                    index.len(),
                    if index.agent_folder_id().is_some() {
                        "present"
                    } else {
                        "absent"
                    }
                );
                index
            }
            Err(e) => {
                tracing::warn!("Failed to list vault folders: {e}");
                FolderIndex::default()
            }
        }
    }

    /// Returns the sorted credential list, building it on first use
    ///
    /// A non-empty list is memoized until the vault is locked. A failing item
    /// listing yields an empty list that is not cached, so the next call
    /// tries again. Items in the agent folder are handed to the key agent and
    /// left out of the result.
    ///
    /// Concurrent callers share one rebuild. The cache itself is never locked
    /// across a vault or agent command, so [`VaultClient::lock`] does not
    /// wait for a slow listing; a listing that outlives its session is
    /// returned to its caller but not memoized.
    pub async fn list_credentials(&self) -> Vec<CredentialEntry> {
        let _rebuild = self.store.rebuild_guard().await;
        if let Some(entries) = self.store.credentials() {
            return entries;
        }

        let generation = self.store.generation();
        let token = self.store.token().await;
        let items = match self.cli.list_items(token.as_ref()).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to list vault items: {e}");
                return Vec::new();
            }
        };

        let mut folders = self.store.folders();
        let entries = self
            .build_entries(&mut folders, items, token.as_ref())
            .await;
        if self.store.store_listing(generation, folders, &entries) {
            tracing::info!("Cached {} credentials", entries.len());
        } else {
            tracing::info!(
                "Vault {} during listing, {} credentials not cached",
                SessionState::Locked.as_str(),
                entries.len()
            );
        }
        entries
    }

    async fn build_entries(
        &self,
        folders: &mut FolderIndex,
        items: Vec<VaultItem>,
        token: Option<&SecretString>,
    ) -> Vec<CredentialEntry> {
        // One folder fetch per listing at most: up front when nothing is
        // indexed yet, otherwise on the first unknown folder id.
        let mut folders_fetched = false;
        if folders.is_empty() && items.iter().any(|i| i.folder_id.is_some()) {
            *folders = self.fetch_folders(token).await;
            folders_fetched = true;
        }

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            if let Some(folder_id) = item.folder_id.as_deref() {
                if !folders_fetched && !folders.contains(folder_id) {
                    *folders = self.fetch_folders(token).await;
                    folders_fetched = true;
                }

                if folders.is_agent_folder(folder_id) {
                    if let Some(payload) = item.agent_payload() {
                        self.agent
                            .add_key(&SecretString::from(payload.to_string()))
                            .await;
                    }
                    continue;
                }
            }

            let Some(login) = item.login else {
                tracing::debug!("Skipping '{}': not a login item", item.name);
                continue;
            };

            let group = match item.folder_id.as_deref() {
                None => DEFAULT_GROUP,
                Some(folder_id) => folders.name(folder_id).unwrap_or_else(|| {
                    tracing::debug!("Unknown folder {folder_id} for '{}'", item.name);
                    DEFAULT_GROUP
                }),
            };

            entries.push(CredentialEntry::from_login(
                group,
                &item.name,
                login.username.as_deref().unwrap_or_default(),
                SecretString::from(login.password.unwrap_or_default()),
            ));
        }

        sort_entries(&mut entries);
        entries
    }

    /// Unlocks the vault and stores the session token
    ///
    /// Returns `false` without touching the session if the vault program
    /// rejects the password.
    pub async fn unlock(&self, password: &SecretString) -> bool {
        match self.cli.unlock(password).await {
            Ok(token) => {
                self.store.set_token(token).await;
                tracing::info!(
                    "Vault {} ({})",
                    SessionState::Unlocked.as_str(),
                    self.cli.backend_id()
                );
                true
            }
            Err(e) => {
                tracing::warn!("Vault unlock failed: {e}");
                false
            }
        }
    }

    /// Locks the vault
    ///
    /// Already locked is a successful no-op that runs no command. Otherwise
    /// the token, credentials and folder index are dropped *before* the lock
    /// command runs, so a failing command still leaves the daemon locked
    /// locally while the external vault may remain unlocked.
    pub async fn lock(&self) -> bool {
        if self.store.take_token().await.is_none() {
            tracing::debug!("Vault already {}", SessionState::Locked.as_str());
            return true;
        }
        self.store.clear_cache();

        match self.cli.lock().await {
            Ok(()) => {
                tracing::info!("Vault {}", SessionState::Locked.as_str());
                true
            }
            Err(e) => {
                tracing::warn!("Vault lock command failed: {e}");
                false
            }
        }
    }
}
