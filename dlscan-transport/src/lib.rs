//! Transport layer for Datalogic reader communication
//!
//! Provides the TCP channel a trigger exchange runs over, in two flavors:
//! [`TcpTransport`] (async, Tokio) and [`blocking::TcpTransport`] (poll
//! loop on the calling thread).

pub mod blocking;
pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Receive buffer capacity for the single read of an exchange.
///
/// Reader responses are short (scan data or a status line). The decoded
/// result is always truncated to the bytes actually read, never padded to
/// this capacity.
pub const RECV_BUFFER_SIZE: usize = 8192;

/// Default connect timeout, distinct from the per-exchange response timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport trait for async device channels
#[async_trait]
pub trait Transport: Send {
    /// Connect to the device
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from the device (graceful shutdown)
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive raw bytes: at most one read, bounded by `timeout`
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
