//! Daemon core
//!
//! One datagram socket, two command words. `OPEN` unlocks the vault when
//! needed and hands the rest of the work to a background task; `CLOSE` locks
//! it again. The `client` half is what the trigger side of the CLI uses.

mod client;
mod protocol;
mod server;

pub use client::send_command;
pub use protocol::{DaemonCommand, MAX_DATAGRAM};
pub use server::{
    select_and_copy, DaemonServices, VaultPickDaemon, LOCK_FAILED_MESSAGE,
    NO_CREDENTIALS_MESSAGE, UNLOCK_FAILED_MESSAGE,
};
