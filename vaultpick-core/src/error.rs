//! Error types for `vaultpick`
//!
//! This module defines the error types used throughout the daemon, one enum
//! per subsystem: configuration, vault CLI, picker, clipboard and the IPC
//! listener. None of these are fatal to a running daemon; they are logged or
//! surfaced to the user through the notifier.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to configuration file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// The reason for validation failure
        reason: String,
    },

    /// Configuration directory could not be determined
    #[error("Configuration directory not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write configuration file
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Failed to deserialize configuration
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),
}

/// Errors raised by the vault CLI wrapper
#[derive(Debug, Error)]
pub enum VaultError {
    /// The vault program could not be started
    #[error("Failed to run vault command: {0}")]
    Spawn(String),

    /// The vault program exited with a non-zero status
    #[error("Vault command `{command}` failed: {stderr}")]
    CommandFailed {
        /// The subcommand that failed (e.g. "list items")
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// The vault program produced output that could not be parsed
    #[error("Failed to parse vault output: {0}")]
    Parse(String),

    /// Unlock succeeded but no session token was printed
    #[error("Vault returned an empty session token")]
    EmptyToken,
}

/// Errors raised by the picker gateway
#[derive(Debug, Error)]
pub enum PickerError {
    /// The picker program could not be started
    #[error("Failed to launch picker: {0}")]
    Spawn(String),

    /// Failed to exchange data with the picker process
    #[error("Picker I/O failed: {0}")]
    Io(String),
}

/// Errors raised by the clipboard controller
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The clipboard program could not be started
    #[error("Failed to launch clipboard command: {0}")]
    Spawn(String),

    /// The clipboard program exited with a non-zero status
    #[error("Clipboard command failed: {0}")]
    CommandFailed(String),

    /// The exposure marker could not be created or removed
    #[error("Exposure lock error at {path}: {reason}")]
    Lock {
        /// Path of the exposure marker
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

/// Errors raised by the IPC listener
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Failed to bind the datagram socket
    #[error("Failed to bind socket {path}: {reason}")]
    Bind {
        /// Socket path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Failed to remove a stale socket file
    #[error("Failed to remove stale socket {path}: {reason}")]
    StaleSocket {
        /// Socket path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Failed to send a command datagram to a running daemon
    #[error("Failed to send command to {path}: {reason}")]
    Send {
        /// Socket path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for vault operations
pub type VaultResult<T> = std::result::Result<T, VaultError>;

/// Result type alias for picker operations
pub type PickerResult<T> = std::result::Result<T, PickerError>;

/// Result type alias for clipboard operations
pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = std::result::Result<T, DaemonError>;
