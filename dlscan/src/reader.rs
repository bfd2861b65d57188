//! Async trigger interface

use std::time::Duration;

use tracing::{debug, info, warn};

use dlscan_transport::{self as transport, TcpTransport, Transport};

use crate::encoding;
use crate::error::Result;

/// A Datalogic reader reachable over TCP/IP.
///
/// Holds only the target address. Every trigger call opens its own
/// connection and tears it down before returning, so a `Reader` can be
/// shared freely and calls may run concurrently, each on its own socket.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use dlscan::Reader;
///
/// #[tokio::main]
/// async fn main() -> dlscan::Result<()> {
///     let reader = Reader::new("192.168.1.100", 51236);
///
///     // Phase mode: start command, one response, stop command
///     let code = reader
///         .read_phase("T", "S", Duration::from_secs(2))
///         .await?;
///     println!("Scanned: {}", code);
///
///     Ok(())
/// }
/// ```
pub struct Reader {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl Reader {
    /// Create a new reader handle
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: transport::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set connection timeout (default: 5s)
    ///
    /// Distinct from the per-call response timeout: exceeding it is a
    /// connect failure, never a response timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Trigger a phase-mode read: start command, one response, stop command.
    ///
    /// The stop command is written even when the response never arrives, so
    /// the reader does not keep streaming into a dead connection; in that
    /// case the timeout error still takes precedence over any failure of
    /// the stop write.
    ///
    /// # Errors
    ///
    /// [`Error::Connect`](crate::Error::Connect) if no connection could be
    /// established, [`Error::Timeout`](crate::Error::Timeout) if the reader
    /// did not answer within `timeout`, [`Error::Transport`](crate::Error::Transport)
    /// for any other failure on the established connection.
    pub async fn read_phase(
        &self,
        start_cmd: &str,
        stop_cmd: &str,
        timeout: Duration,
    ) -> Result<String> {
        self.exchange(start_cmd, Some(stop_cmd), timeout).await
    }

    /// Trigger a one-shot read: single start command, single response.
    ///
    /// No stop command exists in this mode, so none is sent on any path.
    pub async fn read_once(&self, cmd: &str, timeout: Duration) -> Result<String> {
        self.exchange(cmd, None, timeout).await
    }

    /// One full exchange on a fresh connection.
    ///
    /// The connection never outlives this call: the normal paths shut it
    /// down explicitly, and dropping the transport closes the socket on
    /// every other path.
    async fn exchange(
        &self,
        start_cmd: &str,
        stop_cmd: Option<&str>,
        timeout: Duration,
    ) -> Result<String> {
        info!("Triggering {}:{}...", self.host, self.port);

        let mut transport = TcpTransport::new(self.host.clone(), self.port)
            .with_connect_timeout(self.connect_timeout);
        transport.connect().await?;

        let result = run_exchange(&mut transport, start_cmd, stop_cmd, timeout).await;

        if let Err(e) = transport.disconnect().await {
            debug!("Error closing connection: {}", e);
        }

        result
    }
}

async fn run_exchange(
    transport: &mut TcpTransport,
    start_cmd: &str,
    stop_cmd: Option<&str>,
    timeout: Duration,
) -> Result<String> {
    transport.send(&encoding::encode(start_cmd)).await?;

    match transport.receive(timeout).await {
        Ok(buf) => {
            if let Some(stop) = stop_cmd {
                transport.send(&encoding::encode(stop)).await?;
            }

            debug!("Received {} byte response", buf.len());
            Ok(encoding::decode(&buf))
        }
        Err(e @ transport::Error::ReadTimeout(_)) => {
            // Best effort: tell the reader to stop before surfacing the
            // timeout, so it does not keep streaming
            if let Some(stop) = stop_cmd {
                if let Err(stop_err) = transport.send(&encoding::encode(stop)).await {
                    warn!("Stop command after timeout failed: {}", stop_err);
                }
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
