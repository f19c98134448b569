//! Binary codec for encoding and decoding television remote protocol frames.
//!
//! Wire format:
//! ```text
//! [reserved:1=0x00][ns_len:2][namespace:N][payload_len:2][payload:M]
//! ```
//! All length prefixes are little-endian `u16` counts of the *encoded byte
//! length* of the field that follows — base64 output bytes for the encoded
//! sub-fields, UTF-8 bytes for the namespace. Never a character count: the
//! two differ as soon as a display name contains a multi-byte character.
//!
//! Inner payload shapes:
//! ```text
//! auth request:  0x64 0x00 [b64(local_addr)] [b64(device_id)] [b64(name)]
//! key command:   0x00 0x00 0x00 [b64(key_payload)]
//! ```
//! where each `[b64(..)]` is itself a length-prefixed string.
//!
//! All functions here are pure byte-to-byte transforms with no retained
//! state. Truncated or malformed inbound buffers are a hard
//! [`ProtocolError`], never an out-of-bounds read.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::protocol::messages::{Frame, APP_NAMESPACE};

/// Errors that can occur while decoding an inbound frame.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The buffer ends before the bytes its length prefixes promise.
    #[error("truncated frame: need at least {needed} bytes, got {available}")]
    TruncatedFrame { needed: usize, available: usize },

    /// The namespace header bytes are not valid UTF-8.
    #[error("malformed frame header: {0}")]
    MalformedHeader(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Wraps an inner payload in the outer frame shape shared by every message.
///
/// Prepends the reserved byte and the length-prefixed [`APP_NAMESPACE`]
/// header, then appends `payload` length-prefixed.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 2 + APP_NAMESPACE.len() + 2 + payload.len());
    buf.push(0x00); // reserved
    write_length_prefixed(&mut buf, APP_NAMESPACE.as_bytes());
    write_length_prefixed(&mut buf, payload);
    buf
}

/// Encodes an authentication request frame.
///
/// `local_address` is the connection-local network address of the controller;
/// this protocol revision reuses it as the `device_id` field, so callers
/// normally pass the same string twice. `display_name` is what the television
/// shows next to its allow/deny prompt.
pub fn encode_auth_request(local_address: &str, device_id: &str, display_name: &str) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.push(0x64);
    payload.push(0x00);
    write_base64_field(&mut payload, local_address.as_bytes());
    write_base64_field(&mut payload, device_id.as_bytes());
    write_base64_field(&mut payload, display_name.as_bytes());
    encode_frame(&payload)
}

/// Encodes a key-command frame carrying one opaque key payload string
/// (e.g. `"KEY_VOLUP"`).
pub fn encode_key_command(key_payload: &str) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&[0x00, 0x00, 0x00]);
    write_base64_field(&mut payload, key_payload.as_bytes());
    encode_frame(&payload)
}

/// Decodes one [`Frame`] from an inbound buffer.
///
/// Reads exactly what the two length prefixes require; trailing bytes after
/// the payload are ignored.
///
/// # Errors
///
/// Returns [`ProtocolError::TruncatedFrame`] when the buffer is shorter than
/// its length fields promise, and [`ProtocolError::MalformedHeader`] when the
/// header bytes are not UTF-8.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, ProtocolError> {
    // Reserved byte, then two length-prefixed fields back to back.
    require_len(bytes, 1)?;
    let (header_bytes, payload_offset) = read_length_prefixed(bytes, 1)?;
    let header = std::str::from_utf8(header_bytes)
        .map_err(|e| ProtocolError::MalformedHeader(e.to_string()))?
        .to_string();
    let (payload, _) = read_length_prefixed(bytes, payload_offset)?;
    Ok(Frame {
        header,
        payload: payload.to_vec(),
    })
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_len(buf: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if buf.len() < needed {
        Err(ProtocolError::TruncatedFrame {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

/// Writes a 2-byte little-endian length prefix followed by the bytes.
fn write_length_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    let len = bytes.len().min(u16::MAX as usize) as u16;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&bytes[..len as usize]);
}

/// Base64-encodes the bytes (RFC 4648 standard alphabet, padded) and writes
/// the result as a length-prefixed field.
fn write_base64_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_length_prefixed(buf, STANDARD.encode(bytes).as_bytes());
}

/// Reads a 2-byte little-endian length prefix and then that many bytes.
/// Returns the bytes and the offset of the byte after them.
fn read_length_prefixed(buf: &[u8], offset: usize) -> Result<(&[u8], usize), ProtocolError> {
    require_len(buf, offset + 2)?;
    let len = u16::from_le_bytes([buf[offset], buf[offset + 1]]) as usize;
    let start = offset + 2;
    require_len(buf, start + len)?;
    Ok((&buf[start..start + len], start + len))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
