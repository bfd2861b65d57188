//! Async TCP transport

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{DEFAULT_CONNECT_TIMEOUT, RECV_BUFFER_SIZE, Transport, error::*};

/// TCP transport for Datalogic readers
///
/// One instance carries one connection; the trigger client creates a fresh
/// transport per exchange. Dropping the transport closes the socket, so
/// error paths cannot leak a connection even without an explicit
/// [`disconnect`](Transport::disconnect).
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(*addr);
        Ok(*addr)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let addr = self.resolve_addr().await?;

        debug!("Connecting to {}...", addr);

        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectTimeout(self.connect_timeout))?
            .map_err(|e| Error::Connect {
                addr: addr.to_string(),
                source: e,
            })?;

        // Trigger commands are tiny and latency-sensitive
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown
            let _ = stream.shutdown().await;
        }

        self.socket_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!(
            "Sending {} bytes: {:02X?}",
            data.len(),
            &data[..data.len().min(16)]
        );

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    /// At most one read. The read races the timer; when the timer fires
    /// first the read future is dropped and any bytes it might eventually
    /// have produced are discarded.
    async fn receive(&mut self, timeout_duration: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::with_capacity(RECV_BUFFER_SIZE);

        let n = timeout(timeout_duration, stream.read_buf(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout(timeout_duration))?
            .map_err(Error::Io)?;

        if n == 0 {
            return Err(Error::ConnectionClosed);
        }

        trace!("Received {} bytes: {:02X?}", n, &buf[..n.min(16)]);

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            // Socket closes with the stream; only the graceful shutdown is skipped
            debug!("TCP transport dropped while still connected");
        }
    }
}
