//! # tv-remote-core
//!
//! Shared library for TV-Remote-Over-IP containing the wire codec, protocol
//! message types, and the key-name translation table.
//!
//! This crate is used by the client application. It has zero dependencies on
//! OS APIs, the async runtime, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! TV-Remote-Over-IP is a network remote control: it sends the same key
//! presses a physical remote would (volume, channel, digits, navigation) to
//! a television over plain TCP. Before the television accepts any key press,
//! the controlling device must *pair* with it — the television shows an
//! allow/deny prompt on its own screen and only keys from an allowed device
//! are acted on.
//!
//! This crate (`tv-remote-core`) is the protocol foundation. It defines:
//!
//! - **`protocol`** – How bytes travel over the network. Outbound
//!   authentication requests and key commands are encoded into a compact
//!   length-prefixed binary format with base64 sub-fields, and inbound
//!   buffers are decoded back into a typed [`Frame`].
//!
//! - **`keymap`** – The translation table that converts a human-meaningful
//!   key name (`"VOLUP"`, `"ENTER"`) into the opaque payload string the
//!   television expects on the wire (`"KEY_VOLUP"`, `"KEY_ENTER"`).

pub mod keymap;
pub mod protocol;

// Re-export the most-used items at the crate root so callers can write
// `tv_remote_core::decode_frame` instead of the full module path.
pub use keymap::{KeyMap, KeymapError};
pub use protocol::codec::{
    decode_frame, encode_auth_request, encode_frame, encode_key_command, ProtocolError,
};
pub use protocol::messages::{AuthOutcome, Frame};
