//! Configuration management for `vaultpick`
//!
//! This module provides the `ConfigManager` for loading and saving the
//! daemon settings in TOML format.

mod manager;
pub mod settings;

pub use manager::ConfigManager;
pub use settings::{
    AgentSettings, ClipboardSettings, DaemonSettings, NotifySettings, PickerSettings,
    VaultSettings,
};
