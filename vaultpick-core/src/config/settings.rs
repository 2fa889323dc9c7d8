//! Daemon settings model
//!
//! This module defines the settings stored in `config.toml`. Every field has
//! a default so a missing or partial file is always usable.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Accepts `#RGB` and `#RRGGBB` colors as understood by dmenu
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid regex pattern")
});

/// Settings for the whole daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonSettings {
    /// Path of the datagram socket the daemon listens on
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    /// Vault CLI settings
    #[serde(default)]
    pub vault: VaultSettings,
    /// Picker (dmenu) settings
    #[serde(default)]
    pub picker: PickerSettings,
    /// Clipboard exposure settings
    #[serde(default)]
    pub clipboard: ClipboardSettings,
    /// ssh key agent settings
    #[serde(default)]
    pub agent: AgentSettings,
    /// Desktop notification settings
    #[serde(default)]
    pub notify: NotifySettings,
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/bitwarden.sock")
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            vault: VaultSettings::default(),
            picker: PickerSettings::default(),
            clipboard: ClipboardSettings::default(),
            agent: AgentSettings::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl DaemonSettings {
    /// Checks values that serde cannot reject on its own
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.picker.lines == 0 {
            return Err(validation("picker.lines", "must be at least 1"));
        }
        for (field, color) in [
            ("picker.background", &self.picker.background),
            ("picker.foreground", &self.picker.foreground),
        ] {
            if !COLOR_RE.is_match(color) {
                return Err(validation(
                    field,
                    &format!("'{color}' is not a #RGB or #RRGGBB color"),
                ));
            }
        }
        if self.vault.agent_folder.trim().is_empty() {
            return Err(validation("vault.agent_folder", "must not be empty"));
        }
        if self.clipboard.lock_path == self.socket_path {
            return Err(validation(
                "clipboard.lock_path",
                "must differ from the socket path",
            ));
        }
        Ok(())
    }

    /// Expands a leading `~` in every configured path
    pub fn expand_paths(&mut self) {
        self.socket_path = expand_tilde(&self.socket_path);
        self.clipboard.lock_path = expand_tilde(&self.clipboard.lock_path);
        self.agent.socket_path = expand_tilde(&self.agent.socket_path);
        self.vault.program = expand_tilde(&self.vault.program);
        self.picker.program = expand_tilde(&self.picker.program);
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    path.to_str().map_or_else(
        || path.to_path_buf(),
        |s| PathBuf::from(shellexpand::tilde(s).into_owned()),
    )
}

/// Vault CLI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Vault program (Bitwarden CLI)
    #[serde(default = "default_vault_program")]
    pub program: PathBuf,
    /// Name of the folder whose entries are forwarded to the key agent
    #[serde(default = "default_agent_folder")]
    pub agent_folder: String,
    /// Pre-supplied master password (NOT serialized - runtime only)
    #[serde(skip)]
    pub password: Option<SecretString>,
}

fn default_vault_program() -> PathBuf {
    PathBuf::from("bw")
}

fn default_agent_folder() -> String {
    "ssh-keys".to_string()
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            program: default_vault_program(),
            agent_folder: default_agent_folder(),
            password: None,
        }
    }
}

// Manual PartialEq implementation since SecretString doesn't implement it
impl PartialEq for VaultSettings {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program
            && self.agent_folder == other.agent_folder
            && match (&self.password, &other.password) {
                (Some(a), Some(b)) => a.expose_secret() == b.expose_secret(),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for VaultSettings {}

/// Picker (dmenu) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerSettings {
    /// Picker program
    #[serde(default = "default_picker_program")]
    pub program: PathBuf,
    /// Prompt shown in hidden password mode
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Number of visible lines in list mode
    #[serde(default = "default_lines")]
    pub lines: u32,
    /// Normal background color
    #[serde(default = "default_background")]
    pub background: String,
    /// Selection highlight color
    #[serde(default = "default_foreground")]
    pub foreground: String,
}

fn default_picker_program() -> PathBuf {
    PathBuf::from("dmenu")
}

fn default_prompt() -> String {
    "> ".to_string()
}

const fn default_lines() -> u32 {
    5
}

fn default_background() -> String {
    "#222222".to_string()
}

fn default_foreground() -> String {
    "#d79921".to_string()
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            program: default_picker_program(),
            prompt: default_prompt(),
            lines: default_lines(),
            background: default_background(),
            foreground: default_foreground(),
        }
    }
}

/// Clipboard exposure settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardSettings {
    /// Clipboard program reading the new contents on stdin
    #[serde(default = "default_clipboard_program")]
    pub program: PathBuf,
    /// Arguments passed to the clipboard program
    #[serde(default = "default_clipboard_args")]
    pub args: Vec<String>,
    /// Exposure marker path
    #[serde(default = "default_lock_path")]
    pub lock_path: PathBuf,
    /// Seconds a secret stays on the clipboard before it is overwritten
    #[serde(default = "default_flush_timeout")]
    pub flush_timeout_secs: u64,
}

fn default_clipboard_program() -> PathBuf {
    PathBuf::from("xclip")
}

fn default_clipboard_args() -> Vec<String> {
    vec!["-selection".to_string(), "clipboard".to_string()]
}

fn default_lock_path() -> PathBuf {
    PathBuf::from("/tmp/clip.lock")
}

const fn default_flush_timeout() -> u64 {
    20
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            program: default_clipboard_program(),
            args: default_clipboard_args(),
            lock_path: default_lock_path(),
            flush_timeout_secs: default_flush_timeout(),
        }
    }
}

impl ClipboardSettings {
    /// Returns the flush delay as a `Duration`
    #[must_use]
    pub const fn flush_delay(&self) -> Duration {
        Duration::from_secs(self.flush_timeout_secs)
    }
}

/// ssh key agent settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Program used to add keys
    #[serde(default = "default_agent_program")]
    pub program: PathBuf,
    /// Agent socket the keys are added to
    #[serde(default = "default_agent_socket")]
    pub socket_path: PathBuf,
}

fn default_agent_program() -> PathBuf {
    PathBuf::from("ssh-add")
}

fn default_agent_socket() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("ssh-agent.socket")
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            program: default_agent_program(),
            socket_path: default_agent_socket(),
        }
    }
}

/// Desktop notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Notification program
    #[serde(default = "default_notify_program")]
    pub program: PathBuf,
    /// Title used for every notification
    #[serde(default = "default_notify_title")]
    pub title: String,
}

fn default_notify_program() -> PathBuf {
    PathBuf::from("notify-send")
}

fn default_notify_title() -> String {
    "vaultpick".to_string()
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            program: default_notify_program(),
            title: default_notify_title(),
        }
    }
}
