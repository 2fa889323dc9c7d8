//! SSH agent bridge
//!
//! Entries stored in the agent folder of the vault are not offered in the
//! picker. Their key material is piped to `ssh-add -` instead, so the keys
//! become usable through the agent while the vault is unlocked.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::AgentSettings;

/// Errors related to SSH agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    /// Failed to start `ssh-add`
    #[error("Failed to launch {program}: {reason}")]
    Spawn {
        /// Program that could not be started
        program: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Failed to add key to agent
    #[error("Failed to add key: {0}")]
    AddKeyFailed(String),

    /// I/O error during agent operation
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SSH agent operations
pub type AgentResult<T> = std::result::Result<T, AgentError>;

/// Destination for key material found in the vault
///
/// Adding a key never fails from the caller's point of view: it runs inline
/// while credentials are being listed and must not abort the listing.
#[async_trait]
pub trait KeyAgent: Send + Sync {
    /// Hands key material to the agent, discarding any failure
    async fn add_key(&self, key: &SecretString);
}

/// `ssh-add` backed key agent bridge
#[derive(Debug, Clone)]
pub struct SshAgentBridge {
    /// Program used to add keys (normally `ssh-add`)
    program: PathBuf,
    /// Path to the agent socket (`SSH_AUTH_SOCK`)
    socket_path: PathBuf,
}

impl SshAgentBridge {
    /// Creates a bridge targeting the given agent socket
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, socket_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            socket_path: socket_path.into(),
        }
    }

    /// Creates a bridge from the agent settings
    #[must_use]
    pub fn from_settings(settings: &AgentSettings) -> Self {
        Self::new(&settings.program, &settings.socket_path)
    }

    /// Returns the agent socket path
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Pipes key material to `ssh-add -`.
    ///
    /// Passphrase prompting is disabled: `SSH_ASKPASS_REQUIRE=never` and no
    /// `DISPLAY`, so an encrypted key fails instead of blocking on a prompt.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Spawn` if the program cannot be started and
    /// `AgentError::AddKeyFailed` if it exits with a non-zero status.
    pub async fn try_add_key(&self, key: &SecretString) -> AgentResult<()> {
        let mut child = Command::new(&self.program)
            .arg("-")
            .env("SSH_AUTH_SOCK", &self.socket_path)
            .env("SSH_ASKPASS_REQUIRE", "never")
            .env_remove("DISPLAY")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AgentError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut material = key.expose_secret().to_string();
            // ssh-add rejects PEM input without a final newline
            if !material.ends_with('\n') {
                material.push('\n');
            }
            stdin.write_all(material.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::AddKeyFailed(stderr.trim().to_string()));
        }

        Ok(())
    }
}

impl Default for SshAgentBridge {
    fn default() -> Self {
        Self::from_settings(&AgentSettings::default())
    }
}

#[async_trait]
impl KeyAgent for SshAgentBridge {
    async fn add_key(&self, key: &SecretString) {
        match self.try_add_key(key).await {
            Ok(()) => tracing::debug!("Added vault key to agent at {}", self.socket_path.display()),
            Err(e) => tracing::debug!("Ignoring key agent failure: {e}"),
        }
    }
}
