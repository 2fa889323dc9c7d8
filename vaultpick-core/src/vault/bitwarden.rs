//! Bitwarden CLI backend
//!
//! Wraps the `bw` program. The session token is never exported into the
//! daemon's own environment; it is handed to each child process through
//! `BW_SESSION`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{VaultError, VaultResult};
use crate::models::{VaultFolder, VaultItem};

use super::backend::VaultCli;

/// Environment variable `bw` reads the session token from
const SESSION_ENV: &str = "BW_SESSION";

/// Environment variable the unlock password is passed through
const PASSWORD_ENV: &str = "VAULTPICK_UNLOCK_PASSWORD";

/// `bw` command-line backend
#[derive(Debug, Clone)]
pub struct BitwardenCli {
    program: PathBuf,
}

impl BitwardenCli {
    /// Creates a backend running the given `bw` executable
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the configured executable
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[&str], session: Option<&SecretString>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .env_remove(SESSION_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(token) = session {
            cmd.env(SESSION_ENV, token.expose_secret());
        }
        cmd
    }

    /// Runs a command and returns its stdout on success
    async fn run(&self, mut cmd: Command, label: &str) -> VaultResult<Vec<u8>> {
        let output = cmd
            .output()
            .await
            .map_err(|e| VaultError::Spawn(format!("{}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VaultError::CommandFailed {
                command: label.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        what: &str,
        session: Option<&SecretString>,
    ) -> VaultResult<Vec<T>> {
        let label = format!("list {what}");
        let stdout = self
            .run(self.command(&["list", what], session), &label)
            .await?;
        parse_json(&stdout)
    }
}

impl Default for BitwardenCli {
    fn default() -> Self {
        Self::new("bw")
    }
}

/// Parses a JSON array printed by `bw list`
///
/// # Errors
///
/// Returns `VaultError::Parse` if the output is not the expected JSON.
pub fn parse_json<T: DeserializeOwned>(stdout: &[u8]) -> VaultResult<Vec<T>> {
    serde_json::from_slice(stdout).map_err(|e| VaultError::Parse(e.to_string()))
}

/// Extracts the session token printed by `bw unlock --raw`
///
/// # Errors
///
/// Returns `VaultError::EmptyToken` if nothing but whitespace was printed.
pub fn parse_token(stdout: &[u8]) -> VaultResult<SecretString> {
    let token = String::from_utf8_lossy(stdout);
    let token = token.trim();
    if token.is_empty() {
        return Err(VaultError::EmptyToken);
    }
    Ok(SecretString::from(token.to_string()))
}

#[async_trait]
impl VaultCli for BitwardenCli {
    async fn list_folders(&self, session: Option<&SecretString>) -> VaultResult<Vec<VaultFolder>> {
        self.list("folders", session).await
    }

    async fn list_items(&self, session: Option<&SecretString>) -> VaultResult<Vec<VaultItem>> {
        self.list("items", session).await
    }

    async fn unlock(&self, password: &SecretString) -> VaultResult<SecretString> {
        // The password travels through the child environment, not argv,
        // so it never shows up in the process list.
        let mut cmd = self.command(&["unlock", "--passwordenv", PASSWORD_ENV, "--raw"], None);
        cmd.env(PASSWORD_ENV, password.expose_secret());

        let stdout = self.run(cmd, "unlock").await?;
        parse_token(&stdout)
    }

    async fn lock(&self) -> VaultResult<()> {
        self.run(self.command(&["lock"], None), "lock").await?;
        Ok(())
    }

    fn backend_id(&self) -> &'static str {
        "bitwarden"
    }
}
