//! Blocking trigger interface
//!
//! Same contract as [`crate::Reader`], but each call runs on the calling
//! thread and occupies it for up to the full timeout while the transport
//! polls for the response.

use std::time::Duration;

use tracing::{debug, info, warn};

use dlscan_transport::{self as transport, blocking::TcpTransport};

use crate::encoding;
use crate::error::Result;

/// Blocking handle for a Datalogic reader reachable over TCP/IP.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use dlscan::blocking::Reader;
///
/// fn main() -> dlscan::Result<()> {
///     let reader = Reader::new("192.168.1.100", 51236);
///     let code = reader.read_once("T", Duration::from_secs(2))?;
///     println!("Scanned: {}", code);
///     Ok(())
/// }
/// ```
pub struct Reader {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl Reader {
    /// Create a new blocking reader handle
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: transport::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set connection timeout (default: 5s)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Trigger a phase-mode read: start command, one response, stop command.
    ///
    /// Blocks the calling thread for up to `timeout`. The stop command is
    /// written even when the response never arrives; the timeout error
    /// takes precedence over any failure of that write.
    pub fn read_phase(&self, start_cmd: &str, stop_cmd: &str, timeout: Duration) -> Result<String> {
        self.exchange(start_cmd, Some(stop_cmd), timeout)
    }

    /// Trigger a one-shot read: single start command, single response.
    pub fn read_once(&self, cmd: &str, timeout: Duration) -> Result<String> {
        self.exchange(cmd, None, timeout)
    }

    fn exchange(&self, start_cmd: &str, stop_cmd: Option<&str>, timeout: Duration) -> Result<String> {
        info!("Triggering {}:{}...", self.host, self.port);

        let mut transport = TcpTransport::new(self.host.clone(), self.port)
            .with_connect_timeout(self.connect_timeout);
        transport.connect()?;

        let result = run_exchange(&mut transport, start_cmd, stop_cmd, timeout);

        if let Err(e) = transport.disconnect() {
            debug!("Error closing connection: {}", e);
        }

        result
    }
}

fn run_exchange(
    transport: &mut TcpTransport,
    start_cmd: &str,
    stop_cmd: Option<&str>,
    timeout: Duration,
) -> Result<String> {
    transport.send(&encoding::encode(start_cmd))?;

    match transport.receive(timeout) {
        Ok(buf) => {
            if let Some(stop) = stop_cmd {
                transport.send(&encoding::encode(stop))?;
            }

            debug!("Received {} byte response", buf.len());
            Ok(encoding::decode(&buf))
        }
        Err(e @ transport::Error::ReadTimeout(_)) => {
            if let Some(stop) = stop_cmd {
                if let Err(stop_err) = transport.send(&encoding::encode(stop)) {
                    warn!("Stop command after timeout failed: {}", stop_err);
                }
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read as _, Write as _};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::time::Instant;

    fn mock_device<F, T>(behavior: F) -> (u16, thread::JoinHandle<T>)
    where
        F: FnOnce(TcpStream) -> T + Send + 'static,
        T: Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            behavior(stream)
        });
        (port, handle)
    }

    #[test]
    fn test_one_shot_round_trip() {
        let (port, device) = mock_device(|mut stream| {
            let mut cmd = vec![0u8; 64];
            let n = stream.read(&mut cmd).unwrap();
            assert_eq!(&cmd[..n], b"START");
            stream.write_all(b"OK:123456").unwrap();
        });

        let reader = Reader::new("127.0.0.1", port);
        let text = reader.read_once("START", Duration::from_secs(2)).unwrap();

        assert_eq!(text, "OK:123456");
        device.join().unwrap();
    }

    #[test]
    fn test_phase_round_trip_sends_stop() {
        let (port, device) = mock_device(|mut stream| {
            let mut buf = vec![0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"START");
            stream.write_all(b"SCAN1").unwrap();

            let n = stream.read(&mut buf).unwrap();
            buf.truncate(n);
            buf
        });

        let reader = Reader::new("127.0.0.1", port);
        let text = reader
            .read_phase("START", "STOP", Duration::from_secs(2))
            .unwrap();

        assert_eq!(text, "SCAN1");
        assert_eq!(device.join().unwrap(), b"STOP");
    }

    #[test]
    fn test_one_shot_timeout_no_further_write() {
        let (port, device) = mock_device(|mut stream| {
            let mut buf = vec![0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"START");

            stream.read(&mut buf).unwrap()
        });

        let reader = Reader::new("127.0.0.1", port);
        let start = Instant::now();
        let err = reader
            .read_once("START", Duration::from_millis(300))
            .unwrap_err();
        let elapsed = start.elapsed();

        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(900));

        assert_eq!(device.join().unwrap(), 0);
    }

    #[test]
    fn test_phase_timeout_still_sends_stop() {
        let (port, device) = mock_device(|mut stream| {
            let mut buf = vec![0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"START");

            let n = stream.read(&mut buf).unwrap();
            buf.truncate(n);
            buf
        });

        let reader = Reader::new("127.0.0.1", port);
        let err = reader
            .read_phase("START", "STOP", Duration::from_millis(300))
            .unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert_eq!(device.join().unwrap(), b"STOP");
    }

    #[test]
    fn test_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let reader = Reader::new("127.0.0.1", port);
        let err = reader
            .read_once("START", Duration::from_millis(300))
            .unwrap_err();

        assert!(err.is_connect(), "expected connect failure, got {err:?}");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_partial_read_fidelity() {
        let (port, device) = mock_device(|mut stream| {
            let mut cmd = vec![0u8; 64];
            stream.read(&mut cmd).unwrap();
            stream.write_all(b"AB+12").unwrap();
        });

        let reader = Reader::new("127.0.0.1", port);
        let text = reader.read_once("START", Duration::from_secs(2)).unwrap();

        assert_eq!(text.len(), 5);
        assert_eq!(text, "AB+12");
        device.join().unwrap();
    }

    /// Blocking and async variants agree on the same device behavior.
    #[test]
    fn test_matches_async_outcome() {
        let (port, device) = mock_device(|mut stream| {
            let mut cmd = vec![0u8; 64];
            stream.read(&mut cmd).unwrap();
            stream.write_all(b"OK:1").unwrap();
        });

        let blocking_text = Reader::new("127.0.0.1", port)
            .read_once("START", Duration::from_secs(2))
            .unwrap();
        device.join().unwrap();

        let (port, device) = mock_device(|mut stream| {
            let mut cmd = vec![0u8; 64];
            stream.read(&mut cmd).unwrap();
            stream.write_all(b"OK:1").unwrap();
        });

        let rt = tokio::runtime::Runtime::new().unwrap();
        let async_text = rt
            .block_on(
                crate::Reader::new("127.0.0.1", port).read_once("START", Duration::from_secs(2)),
            )
            .unwrap();
        device.join().unwrap();

        assert_eq!(blocking_text, async_text);
    }
}
