//! One-shot trigger example

use std::time::Duration;

use dlscan::Reader;

#[tokio::main]
async fn main() -> dlscan::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ip = std::env::var("READER_IP").unwrap_or_else(|_| "192.168.1.100".to_string());

    let reader = Reader::new(ip, 51236);

    // Command string as configured on the reader
    let code = reader.read_once("T", Duration::from_secs(2)).await?;
    println!("Scanned: {}", code);

    Ok(())
}
