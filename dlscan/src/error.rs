//! High-level error types

use std::time::Duration;

use dlscan_transport as transport;

pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by a trigger exchange.
///
/// Collapses transport failures into the three kinds a caller can act on:
/// the connection never opened, the reader never answered, or the wire
/// failed mid-exchange. Nothing is retried internally; retry policy
/// belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The TCP connection to the reader could not be established.
    /// No command bytes were sent.
    #[error("Connect failure: {0}")]
    Connect(#[source] transport::Error),

    /// The reader produced no response within the allowed window.
    /// In phase mode the stop command was still written (best effort)
    /// before this error was raised.
    #[error("No response within {0:?}")]
    Timeout(Duration),

    /// The connection was established but the exchange failed on it.
    #[error("Transport failure: {0}")]
    Transport(#[source] transport::Error),
}

impl Error {
    /// True when the connection could not be established
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Connect(_))
    }

    /// True when the reader never answered within the timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

impl From<transport::Error> for Error {
    fn from(err: transport::Error) -> Self {
        match err {
            transport::Error::ReadTimeout(timeout) => Error::Timeout(timeout),
            e if e.is_connect_failure() => Error::Connect(e),
            e => Error::Transport(e),
        }
    }
}
