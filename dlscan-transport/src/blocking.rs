//! Blocking TCP transport
//!
//! Same exchange surface as [`crate::TcpTransport`], but everything runs
//! on the calling thread. The bounded receive is a poll loop: check data
//! availability, read once when something arrives, give up when the
//! deadline passes. A short sleep between checks keeps the loop from
//! pegging a core while staying responsive to sub-second timeouts.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::error::*;
use crate::{DEFAULT_CONNECT_TIMEOUT, RECV_BUFFER_SIZE};

/// Idle delay between availability checks.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Blocking TCP transport for Datalogic readers
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create new blocking TCP transport
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

    fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addr = addr_str
            .to_socket_addrs()
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .next()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(addr);
        Ok(addr)
    }

    /// Connect to the device
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let addr = self.resolve_addr()?;

        debug!("Connecting to {}...", addr);

        let stream = TcpStream::connect_timeout(&addr, self.connect_timeout).map_err(|e| {
            if e.kind() == io::ErrorKind::TimedOut {
                Error::ConnectTimeout(self.connect_timeout)
            } else {
                Error::Connect {
                    addr: addr.to_string(),
                    source: e,
                }
            }
        })?;

        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    /// Disconnect from the device (graceful shutdown)
    pub fn disconnect(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            let _ = stream.shutdown(Shutdown::Both);
        }

        self.socket_addr = None;
        Ok(())
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Send raw bytes
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!(
            "Sending {} bytes: {:02X?}",
            data.len(),
            &data[..data.len().min(16)]
        );

        stream.write_all(data)?;
        stream.flush()?;

        Ok(())
    }

    /// Receive raw bytes: poll until data is available, then read once.
    ///
    /// Zero bytes read by the deadline is a [`Error::ReadTimeout`]; a peek
    /// that reports end-of-stream is a [`Error::ConnectionClosed`].
    pub fn receive(&mut self, timeout: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        // Non-blocking only for the poll loop; sends stay blocking
        stream.set_nonblocking(true)?;
        let result = poll_read(stream, timeout);
        let _ = stream.set_nonblocking(false);

        result
    }

    /// Get remote address
    pub fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

/// Poll loop: check availability, read once when something arrives, give
/// up when the deadline passes with zero bytes read.
fn poll_read(stream: &mut TcpStream, timeout: Duration) -> Result<BytesMut> {
    let start = Instant::now();
    let mut probe = [0u8; 1];

    loop {
        // Availability check before the one real read
        match stream.peek(&mut probe) {
            Ok(0) => return Err(Error::ConnectionClosed),
            Ok(_) => {
                let mut buf = BytesMut::zeroed(RECV_BUFFER_SIZE);
                let n = stream.read(&mut buf)?;
                if n == 0 {
                    return Err(Error::ConnectionClosed);
                }
                buf.truncate(n);

                trace!("Received {} bytes: {:02X?}", n, &buf[..n.min(16)]);

                return Ok(buf);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(Error::Io(e)),
        }

        if start.elapsed() >= timeout {
            return Err(Error::ReadTimeout(timeout));
        }

        thread::sleep(POLL_INTERVAL);
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            debug!("Blocking TCP transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_blocking_transport_create() {
        let transport = TcpTransport::new("192.168.1.100", 51236);
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_blocking_transport_invalid_address() {
        let mut transport = TcpTransport::new("invalid..address", 51236);
        let result = transport.connect();
        assert!(matches!(result, Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_blocking_receive_within_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let device = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(50));
            stream.write_all(b"HELLO").unwrap();
        });

        let mut transport = TcpTransport::new("127.0.0.1", addr.port());
        transport.connect().unwrap();

        let buf = transport.receive(Duration::from_millis(500)).unwrap();
        assert_eq!(&buf[..], b"HELLO");

        transport.disconnect().unwrap();
        device.join().unwrap();
    }

    #[test]
    fn test_blocking_receive_timeout_elapsed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let device = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(500));
            drop(stream);
        });

        let mut transport = TcpTransport::new("127.0.0.1", addr.port());
        transport.connect().unwrap();

        let start = Instant::now();
        let result = transport.receive(Duration::from_millis(100));
        let elapsed = start.elapsed();

        assert!(matches!(result, Err(Error::ReadTimeout(_))));
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(400));

        transport.disconnect().unwrap();
        device.join().unwrap();
    }
}
