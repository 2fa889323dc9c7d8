//! Session state shared between the listener and worker tasks.

use secrecy::SecretString;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;

use crate::models::{CredentialEntry, FolderIndex};

/// Lock state of the vault as seen by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session token is held
    Locked,
    /// A session token is held
    Unlocked,
}

impl SessionState {
    /// Returns a lowercase name for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        }
    }
}

/// Data derived from the vault for the current session
#[derive(Debug, Default)]
pub struct VaultCache {
    /// Folder id to name mapping
    pub folders: FolderIndex,
    /// Sorted credential entries, empty until first listing
    pub credentials: Vec<CredentialEntry>,
}

impl VaultCache {
    /// Drops everything derived from the vault
    pub fn clear(&mut self) {
        self.folders.clear();
        self.credentials.clear();
    }
}

/// Process-wide session token and vault cache
///
/// The lock state is derived from the token: the vault is unlocked exactly
/// when a token is held. The cache mutex is only held for copies in and out,
/// never across an external command, so locking never waits on a listing.
/// Rebuilds are serialized by a separate async mutex; a rebuild that started
/// in an earlier session (see [`SessionStore::generation`]) is not stored.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<SecretString>>,
    generation: AtomicU64,
    cache: Mutex<VaultCache>,
    rebuild: tokio::sync::Mutex<()>,
}

impl SessionStore {
    /// Creates a locked session with an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current lock state
    pub async fn state(&self) -> SessionState {
        if self.token.read().await.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    /// Returns true if no session token is held
    pub async fn is_locked(&self) -> bool {
        self.state().await == SessionState::Locked
    }

    /// Returns a copy of the session token
    pub async fn token(&self) -> Option<SecretString> {
        self.token.read().await.clone()
    }

    /// Stores a new session token
    pub async fn set_token(&self, token: SecretString) {
        *self.token.write().await = Some(token);
    }

    /// Removes and returns the session token
    ///
    /// Ends the current session generation when a token was held.
    pub async fn take_token(&self) -> Option<SecretString> {
        let mut token = self.token.write().await;
        let taken = token.take();
        if taken.is_some() {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        taken
    }

    /// Counter bumped every time a session ends
    ///
    /// Read it before starting a listing and hand it back to
    /// [`SessionStore::store_listing`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Waits for any in-flight rebuild and holds off new ones
    pub async fn rebuild_guard(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.rebuild.lock().await
    }

    fn cache(&self) -> MutexGuard<'_, VaultCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the memoized credentials, if any
    #[must_use]
    pub fn credentials(&self) -> Option<Vec<CredentialEntry>> {
        let cache = self.cache();
        (!cache.credentials.is_empty()).then(|| cache.credentials.clone())
    }

    /// Returns a copy of the folder index
    #[must_use]
    pub fn folders(&self) -> FolderIndex {
        self.cache().folders.clone()
    }

    /// Stores a folder index fetched during `generation`
    ///
    /// Returns false and stores nothing if the session ended meanwhile.
    pub fn store_folders(&self, generation: u64, folders: FolderIndex) -> bool {
        let mut cache = self.cache();
        if generation != self.generation() {
            return false;
        }
        cache.folders = folders;
        true
    }

    /// Stores a listing built during `generation`
    ///
    /// Returns false and stores nothing if the session ended meanwhile.
    pub fn store_listing(
        &self,
        generation: u64,
        folders: FolderIndex,
        credentials: &[CredentialEntry],
    ) -> bool {
        let mut cache = self.cache();
        if generation != self.generation() {
            return false;
        }
        cache.folders = folders;
        cache.credentials = credentials.to_vec();
        true
    }

    /// Clears cached credentials and folders
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    /// Number of cached credential entries
    #[must_use]
    pub fn cached_credentials(&self) -> usize {
        self.cache().credentials.len()
    }
}
