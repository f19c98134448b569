//! tv-remote-client library entry point.
//!
//! Re-exports the public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does tv-remote-client do? (for beginners)
//!
//! The client plays the role of a physical remote control for one
//! television on the local network. Sending a key press is a three-step
//! dance the session module hides from the caller:
//!
//! 1. Connect to the television over TCP (port 55000) and send an
//!    authentication request. The television shows an allow/deny prompt on
//!    its own screen and the user answers it with the real remote — which
//!    can take seconds or minutes.
//! 2. While the answer is outstanding, remember the most recent key the
//!    caller submitted (one slot, latest wins).
//! 3. Once the television answers "allowed", flush the remembered key and
//!    send every later key immediately.
//!
//! A denial, an unresponsive television, or a dropped connection all leave
//! the session disconnected; the next submitted key simply starts the
//! dance again.

/// TOML configuration for the client.
pub mod config;

/// Session controller: connection state machine and command delivery.
pub mod session;
