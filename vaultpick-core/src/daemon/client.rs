//! Trigger side: sends one command to a running daemon.

use std::os::unix::net::UnixDatagram;
use std::path::Path;

use crate::error::{DaemonError, DaemonResult};

use super::protocol::DaemonCommand;

/// Sends `command` to the daemon listening on `socket_path`
///
/// Fire and forget: the daemon sends no reply.
///
/// # Errors
///
/// Returns `DaemonError::Send` if no daemon is listening or the datagram
/// cannot be sent.
pub fn send_command(socket_path: &Path, command: DaemonCommand) -> DaemonResult<()> {
    let send_error = |e: std::io::Error| DaemonError::Send {
        path: socket_path.to_path_buf(),
        reason: e.to_string(),
    };

    let socket = UnixDatagram::unbound().map_err(send_error)?;
    socket
        .send_to(command.as_bytes(), socket_path)
        .map_err(send_error)?;

    tracing::debug!("Sent {command} to {}", socket_path.display());
    Ok(())
}
