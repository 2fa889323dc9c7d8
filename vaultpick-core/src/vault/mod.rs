//! Vault access for `vaultpick`
//!
//! This module wraps the external vault program:
//! - `VaultCli`: one method per vault command, implemented by `BitwardenCli`
//! - `SessionStore`: the session token and the per-session cache
//! - `VaultClient`: unlock/lock lifecycle and the memoized credential list

mod backend;
mod bitwarden;
mod client;
mod session;

pub use backend::VaultCli;
pub use bitwarden::{parse_json, parse_token, BitwardenCli};
pub use client::VaultClient;
pub use session::{SessionState, SessionStore, VaultCache};
