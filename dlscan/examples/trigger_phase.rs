//! Phase-mode trigger example (blocking variant)

use std::time::Duration;

use dlscan::blocking::Reader;

fn main() -> dlscan::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ip = std::env::var("READER_IP").unwrap_or_else(|_| "192.168.1.100".to_string());

    let reader = Reader::new(ip, 51236).with_connect_timeout(Duration::from_secs(3));

    // Start/stop command strings as configured on the reader
    match reader.read_phase("T", "S", Duration::from_secs(2)) {
        Ok(code) => println!("Scanned: {}", code),
        Err(e) if e.is_timeout() => println!("No code within the window"),
        Err(e) => return Err(e),
    }

    Ok(())
}
