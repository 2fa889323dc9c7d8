//! Datagram command words.

use std::fmt;

/// Receive buffer size; longer datagrams are truncated and never match
pub const MAX_DATAGRAM: usize = 16;

/// Command understood by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonCommand {
    /// Unlock if needed, then pick and copy a credential
    Open,
    /// Lock the vault and drop cached state
    Close,
}

impl DaemonCommand {
    /// Decodes a datagram payload
    ///
    /// The whole payload must equal the command word; there is no trimming
    /// and matching is case-sensitive.
    #[must_use]
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload {
            b"OPEN" => Some(Self::Open),
            b"CLOSE" => Some(Self::Close),
            _ => None,
        }
    }

    /// Wire form of the command
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Command word
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
        }
    }
}

impl fmt::Display for DaemonCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
