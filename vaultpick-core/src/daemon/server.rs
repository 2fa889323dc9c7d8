//! Datagram listener and the OPEN/CLOSE state machine.

use secrecy::SecretString;
use std::fs::{self, Permissions};
use std::future::Future;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::UnixDatagram;
use tokio::task::JoinHandle;

use crate::clipboard::{ClipboardController, ExposureOutcome};
use crate::config::DaemonSettings;
use crate::error::{DaemonError, DaemonResult};
use crate::notify::{Notifier, NotifySend};
use crate::picker::{pick_entry, DmenuPicker, Picker};
use crate::ssh_agent::SshAgentBridge;
use crate::vault::{BitwardenCli, SessionState, VaultClient};

use super::protocol::{DaemonCommand, MAX_DATAGRAM};

/// Message shown when the vault cannot be unlocked
pub const UNLOCK_FAILED_MESSAGE: &str = "Error in password";
/// Message shown when the vault lock command fails
pub const LOCK_FAILED_MESSAGE: &str = "Error locking";
/// Message shown when an OPEN finds nothing to pick from
pub const NO_CREDENTIALS_MESSAGE: &str = "No credentials available";

/// Collaborators shared by the listener and every worker task
pub struct DaemonServices {
    /// Vault session and credential cache
    pub vault: Arc<VaultClient>,
    /// Password prompt and credential selection
    pub picker: Arc<dyn Picker>,
    /// Clipboard exposure window
    pub clipboard: Arc<ClipboardController>,
    /// User-visible error channel
    pub notifier: Arc<dyn Notifier>,
    /// Title of every notification
    pub notify_title: String,
}

impl DaemonServices {
    /// Wires the process-backed implementations described by `settings`
    #[must_use]
    pub fn from_settings(settings: &DaemonSettings) -> Self {
        let vault = VaultClient::new(
            Arc::new(BitwardenCli::new(&settings.vault.program)),
            Arc::new(SshAgentBridge::from_settings(&settings.agent)),
            settings.vault.agent_folder.clone(),
        );

        Self {
            vault: Arc::new(vault),
            picker: Arc::new(DmenuPicker::from_settings(&settings.picker)),
            clipboard: Arc::new(ClipboardController::from_settings(&settings.clipboard)),
            notifier: Arc::new(NotifySend::from_settings(&settings.notify)),
            notify_title: settings.notify.title.clone(),
        }
    }

    async fn notify(&self, message: &str) {
        self.notifier.notify(&self.notify_title, message).await;
    }
}

/// Long-lived daemon bound to one datagram socket
pub struct VaultPickDaemon {
    socket_path: PathBuf,
    password: Option<SecretString>,
    services: Arc<DaemonServices>,
}

impl VaultPickDaemon {
    /// Creates a daemon around already wired services
    #[must_use]
    pub fn new(socket_path: impl Into<PathBuf>, services: DaemonServices) -> Self {
        Self {
            socket_path: socket_path.into(),
            password: None,
            services: Arc::new(services),
        }
    }

    /// Creates a daemon from settings, including the password override
    #[must_use]
    pub fn from_settings(settings: &DaemonSettings) -> Self {
        let daemon = Self::new(
            &settings.socket_path,
            DaemonServices::from_settings(settings),
        );
        match &settings.vault.password {
            Some(password) => daemon.with_password(password.clone()),
            None => daemon,
        }
    }

    /// Uses `password` for every unlock instead of prompting
    #[must_use]
    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Returns the socket path
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Returns the shared services
    #[must_use]
    pub const fn services(&self) -> &Arc<DaemonServices> {
        &self.services
    }

    /// Returns the current vault lock state
    pub async fn state(&self) -> SessionState {
        self.services.vault.state().await
    }

    /// Binds the socket, replacing a stale one, with owner-only permissions
    ///
    /// # Errors
    ///
    /// Returns `DaemonError` if the stale socket cannot be removed or the new
    /// one cannot be bound.
    pub fn bind(&self) -> DaemonResult<UnixDatagram> {
        if let Err(e) = fs::remove_file(&self.socket_path) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(DaemonError::StaleSocket {
                    path: self.socket_path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let bind_error = |e: io::Error| DaemonError::Bind {
            path: self.socket_path.clone(),
            reason: e.to_string(),
        };

        let socket = UnixDatagram::bind(&self.socket_path).map_err(bind_error)?;
        fs::set_permissions(&self.socket_path, Permissions::from_mode(0o600))
            .map_err(bind_error)?;

        Ok(socket)
    }

    /// Serves until the process exits
    ///
    /// # Errors
    ///
    /// Returns `DaemonError` if the socket cannot be bound.
    pub async fn run(&self) -> DaemonResult<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` completes, then removes the socket
    ///
    /// Commands are handled one at a time in arrival order. OPEN work past
    /// the unlock runs in detached tasks that are not awaited on shutdown.
    ///
    /// # Errors
    ///
    /// Returns `DaemonError` if the socket cannot be bound. Nothing after a
    /// successful bind is fatal.
    pub async fn run_until<F>(&self, shutdown: F) -> DaemonResult<()>
    where
        F: Future<Output = ()>,
    {
        let socket = self.bind()?;
        if let Err(e) = self.services.clipboard.clear_stale_marker() {
            tracing::warn!("{e}");
        }
        tracing::info!("Listening on {}", self.socket_path.display());

        tokio::pin!(shutdown);
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let received = tokio::select! {
                () = &mut shutdown => break,
                received = socket.recv(&mut buf) => received,
            };

            match received {
                Ok(len) => {
                    self.handle_datagram(&buf[..len]).await;
                }
                Err(e) => tracing::warn!("Failed to receive datagram: {e}"),
            }
        }

        tracing::info!("Shutting down");
        drop(socket);
        if let Err(e) = fs::remove_file(&self.socket_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove socket {}: {e}",
                    self.socket_path.display()
                );
            }
        }
        Ok(())
    }

    /// Dispatches one datagram payload
    ///
    /// # Returns
    /// The spawned worker for an OPEN that got past the unlock
    pub async fn handle_datagram(&self, payload: &[u8]) -> Option<JoinHandle<()>> {
        match DaemonCommand::parse(payload) {
            Some(DaemonCommand::Open) => self.handle_open().await,
            Some(DaemonCommand::Close) => {
                self.handle_close().await;
                None
            }
            None => {
                tracing::debug!("Ignoring unknown datagram ({} bytes)", payload.len());
                None
            }
        }
    }

    /// Unlocks if needed, then spawns the select-and-copy worker
    ///
    /// The unlock runs inline, so no other command is processed while the
    /// password prompt is open. A failed unlock notifies the user and spawns
    /// nothing.
    pub async fn handle_open(&self) -> Option<JoinHandle<()>> {
        if self.services.vault.is_locked().await && !self.unlock().await {
            self.services.notify(UNLOCK_FAILED_MESSAGE).await;
            return None;
        }

        let services = Arc::clone(&self.services);
        Some(tokio::spawn(async move {
            select_and_copy(&services).await;
        }))
    }

    async fn unlock(&self) -> bool {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => match self.services.picker.prompt_hidden().await {
                Ok(password) => password,
                Err(e) => {
                    tracing::warn!("Password prompt failed: {e}");
                    return false;
                }
            },
        };
        self.services.vault.unlock(&password).await
    }

    /// Locks the vault; a no-op when already locked
    ///
    /// # Returns
    /// `false` if the lock command failed (the user has been notified)
    pub async fn handle_close(&self) -> bool {
        if self.services.vault.lock().await {
            true
        } else {
            self.services.notify(LOCK_FAILED_MESSAGE).await;
            false
        }
    }
}

/// Worker body for an OPEN: list, pick, expose, flush
///
/// Cancelling the picker ends the worker silently. Errors are reported
/// through the notifier.
pub async fn select_and_copy(services: &DaemonServices) {
    let entries = services.vault.list_credentials().await;
    if entries.is_empty() {
        services.notify(NO_CREDENTIALS_MESSAGE).await;
        return;
    }

    let entry = match pick_entry(services.picker.as_ref(), &entries).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            tracing::debug!("No credential selected");
            return;
        }
        Err(e) => {
            tracing::warn!("{e}");
            services.notify(&e.to_string()).await;
            return;
        }
    };

    match services.clipboard.expose_and_flush(entry.secret()).await {
        Ok(ExposureOutcome::Flushed) => {
            tracing::info!("Copied and flushed '{}'", entry.display());
        }
        Ok(ExposureOutcome::Skipped) => {
            tracing::info!("Skipped '{}': clipboard busy", entry.display());
        }
        Err(e) => {
            tracing::warn!("{e}");
            services.notify(&e.to_string()).await;
        }
    }
}
