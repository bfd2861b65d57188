//! Single-byte text codec for command and response payloads
//!
//! Datalogic readers speak plain single-byte text on the trigger socket:
//! command strings as configured in the vendor tool, responses such as
//! scan data or a status line. Bytes map 1:1 to the first 256 Unicode
//! code points (Latin-1); multi-byte encodings are not supported.

use bytes::Bytes;

/// Encode a command string as single-byte text.
///
/// Characters outside U+0000..=U+00FF are replaced with `?`; command
/// strings configured on a reader are ASCII in practice.
pub fn encode(text: &str) -> Bytes {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect::<Vec<u8>>()
        .into()
}

/// Decode response bytes as single-byte text.
///
/// Every byte becomes exactly one character, so the decoded length equals
/// the byte count actually read.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
