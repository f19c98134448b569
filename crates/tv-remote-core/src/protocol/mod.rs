//! Protocol module containing message types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_auth_request, encode_frame, encode_key_command, ProtocolError};
pub use messages::*;
