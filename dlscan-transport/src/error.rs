//! Transport errors

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Failed to connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    #[error("Connection not established within {0:?}")]
    ConnectTimeout(Duration),

    #[error("No data received within {0:?}")]
    ReadTimeout(Duration),

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// True for failures that happen before a connection exists.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            Error::Connect { .. } | Error::ConnectTimeout(_) | Error::InvalidAddress(_)
        )
    }
}
