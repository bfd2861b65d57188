//! # dlscan
//!
//! Trigger client for Datalogic barcode readers over TCP/IP.
//!
//! A reader is a TCP server: it receives a raw command string (as
//! configured in the vendor tool) and answers with a single response,
//! typically the scanned code. This crate performs that exchange in two
//! modes, each in an async and a blocking variant:
//!
//! - **Phase mode** — an explicit start/stop command pair brackets the
//!   read; the stop command is sent even when the response times out.
//! - **One-shot mode** — a single start command, a single response.
//!
//! Every call opens its own connection and closes it before returning.
//! There is no session to manage, no pooling and no retry policy; errors
//! surface as [`Error`] and retrying is the caller's decision.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use dlscan::Reader;
//!
//! #[tokio::main]
//! async fn main() -> dlscan::Result<()> {
//!     let reader = Reader::new("192.168.1.100", 51236);
//!
//!     let code = reader
//!         .read_phase("T", "S", Duration::from_secs(2))
//!         .await?;
//!     println!("Scanned: {}", code);
//!
//!     Ok(())
//! }
//! ```
//!
//! For callers without an async runtime there is [`blocking::Reader`]
//! with the same two operations.

pub mod blocking;
pub mod encoding;
pub mod error;
pub mod reader;

// Re-exports
pub use error::{Error, Result};
pub use reader::Reader;

// Lower layer, for callers that need the raw channel
pub use dlscan_transport as transport;
