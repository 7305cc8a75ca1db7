//! Marshaling between host strings and the engine's byte buffers.
//!
//! Outbound strings are UTF-8 and NUL-terminated. Inbound buffers are read
//! up to their declared length, stopping early at a NUL if the engine
//! included one.

use std::ffi::CString;

use rod_common::{BridgeError, Result};
use serde::de::DeserializeOwned;

/// Encode a host string for a native call.
///
/// Fails with [`BridgeError::InvalidString`] if `value` contains an interior
/// NUL, which would silently truncate it on the native side.
pub fn encode(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| BridgeError::InvalidString)
}

/// Decode a native buffer into a host string.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end])
        .map(str::to_owned)
        .map_err(|e| BridgeError::Decode(e.to_string()))
}

/// Decode a native buffer holding JSON text into `T`.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let text = decode(bytes)?;
    serde_json::from_str(&text).map_err(|e| BridgeError::Decode(e.to_string()))
}
