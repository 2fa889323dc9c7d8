//! `vaultpick` Core Library
//!
//! This crate provides the daemon behind `vaultpick`: a datagram listener
//! that unlocks a Bitwarden vault on demand, lets the user pick a credential
//! with dmenu, and puts it on the clipboard for a bounded time.

pub mod clipboard;
pub mod config;
pub mod daemon;
pub mod error;
pub mod models;
pub mod notify;
pub mod picker;
pub mod ssh_agent;
pub mod vault;

pub use clipboard::{
    ClipboardController, ClipboardSink, CommandClipboard, ExposureLock, ExposureOutcome,
};
pub use config::{ConfigManager, DaemonSettings};
pub use daemon::{send_command, DaemonCommand, DaemonServices, VaultPickDaemon};
pub use error::{
    ClipboardError, ClipboardResult, ConfigError, ConfigResult, DaemonError, DaemonResult,
    PickerError, PickerResult, VaultError, VaultResult,
};
pub use models::{CredentialEntry, FolderIndex, VaultFolder, VaultItem};
pub use notify::{Notifier, NotifySend};
pub use picker::{pick_entry, DmenuPicker, Picker};
pub use ssh_agent::{AgentError, AgentResult, KeyAgent, SshAgentBridge};
pub use vault::{BitwardenCli, SessionState, SessionStore, VaultCli, VaultClient};
