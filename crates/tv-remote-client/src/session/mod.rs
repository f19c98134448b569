//! Session controller for one television.
//!
//! Owns the TCP connection, drives the connect-and-authenticate sequence,
//! and multiplexes a single pending command against handshake state.
//!
//! Architecture:
//! - [`RemoteSession`] is cheap to clone; all mutable state lives behind one
//!   async mutex so no two transitions race.
//! - A spawned task per socket performs the connect, writes the
//!   authentication request, and runs the read loop.
//! - The read loop decodes inbound buffers into frames and funnels every
//!   teardown path (idle timeout, peer close, transport error) into one
//!   reset point.
//!
//! The handshake outcome arrives out-of-band: the user may approve the
//! television's pairing prompt within seconds, deliberate for minutes, deny
//! it, or never see it. Key submissions made in the meantime are not
//! dropped and not queued beyond depth one — the stored command slot holds
//! the latest submission and is flushed exactly once on success.

pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time;
use tracing::{debug, info, warn};

use tv_remote_core::protocol::messages::PROTOCOL_PORT;
use tv_remote_core::{
    decode_frame, encode_auth_request, encode_key_command, AuthOutcome, Frame, KeyMap,
    KeymapError,
};

use state::{auth_event, transition, ConnectionState, SessionEvent};

/// Configuration for one [`RemoteSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host name or IP address of the television.
    pub address: String,
    /// TCP port; [`PROTOCOL_PORT`] unless the protocol revision differs.
    pub port: u16,
    /// Name shown next to the television's allow/deny prompt.
    pub display_name: String,
    /// Read-idle threshold after which the socket is presumed stalled.
    pub idle_timeout: Duration,
    /// Read window while waiting for the user to answer the pairing prompt.
    pub auth_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: PROTOCOL_PORT,
            display_name: "tv-remote".to_string(),
            idle_timeout: Duration::from_millis(3000),
            auth_timeout: Duration::from_millis(300_000),
        }
    }
}

/// Mutable session state; exactly one of these per session, behind a mutex.
struct Shared {
    state: ConnectionState,
    /// At most one serialized outbound message awaiting authentication.
    /// Latest submission wins; cleared immediately after being flushed.
    pending_command: Option<Vec<u8>>,
    writer: Option<OwnedWriteHalf>,
    /// Increments per connect attempt. Late events from a replaced socket
    /// compare their generation and are ignored.
    generation: u64,
}

/// A remote-control session with one television.
///
/// Created once per target device; survives any number of socket
/// close/reopen cycles. Reconnection is caller-driven: a denied or
/// timed-out pairing leaves the session silently disconnected and the next
/// [`submit_key`](RemoteSession::submit_key) starts the handshake again.
#[derive(Clone)]
pub struct RemoteSession {
    config: Arc<SessionConfig>,
    keymap: Arc<KeyMap>,
    shared: Arc<Mutex<Shared>>,
}

impl RemoteSession {
    /// Creates a disconnected session. No socket is opened until
    /// [`connect`](RemoteSession::connect) or the first key submission.
    pub fn new(config: SessionConfig, keymap: KeyMap) -> Self {
        Self {
            config: Arc::new(config),
            keymap: Arc::new(keymap),
            shared: Arc::new(Mutex::new(Shared {
                state: ConnectionState::Disconnected,
                pending_command: None,
                writer: None,
                generation: 0,
            })),
        }
    }

    /// Submits one key press identified by its key-map name.
    ///
    /// If the session is authenticated the key command is written
    /// immediately; otherwise it is stored (replacing any previously stored
    /// command) and the handshake is started if one is not already in
    /// progress. Transport and protocol failures are absorbed into the
    /// connection state and reported via tracing only.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError::UnknownKeyCode`] when `key` has no entry in
    /// the key map — the only error surfaced synchronously.
    pub async fn submit_key(&self, key: &str) -> Result<(), KeymapError> {
        let payload = self.keymap.resolve(key)?;
        let command = encode_key_command(payload);

        let mut shared = self.shared.lock().await;
        match shared.state {
            ConnectionState::Authenticated => {
                debug!(key, "sending key command");
                write_frame(&mut shared, &command).await;
            }
            ConnectionState::Disconnected => {
                debug!(key, "not authenticated; storing command and starting handshake");
                shared.pending_command = Some(command);
                self.start_handshake(&mut shared);
            }
            ConnectionState::Connecting | ConnectionState::Authenticating => {
                debug!(key, "handshake in progress; replacing stored command");
                shared.pending_command = Some(command);
            }
        }
        Ok(())
    }

    /// Starts the handshake eagerly, so the television shows its pairing
    /// prompt before the first key press. No-op unless disconnected.
    pub async fn connect(&self) {
        let mut shared = self.shared.lock().await;
        if shared.state == ConnectionState::Disconnected {
            self.start_handshake(&mut shared);
        }
    }

    /// Current connection/authentication state.
    pub async fn connection_state(&self) -> ConnectionState {
        self.shared.lock().await.state
    }

    /// The stored command awaiting authentication, if any.
    pub async fn pending_command(&self) -> Option<Vec<u8>> {
        self.shared.lock().await.pending_command.clone()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Marks the state machine as connecting and spawns the socket task.
    ///
    /// Callers hold the lock, so the new generation is visible before the
    /// spawned task can observe anything.
    fn start_handshake(&self, shared: &mut Shared) {
        shared.state = transition(shared.state, SessionEvent::ConnectStarted);
        shared.generation += 1;
        let generation = shared.generation;
        let session = self.clone();
        tokio::spawn(async move { session.connect_and_authenticate(generation).await });
    }

    /// Opens a fresh socket, sends the authentication request, and drives
    /// the read loop until the socket is torn down.
    async fn connect_and_authenticate(self, generation: u64) {
        info!(address = %self.config.address, port = self.config.port, "connecting");

        let connect = time::timeout(
            self.config.idle_timeout,
            TcpStream::connect((self.config.address.as_str(), self.config.port)),
        )
        .await;
        let stream = match connect {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!(error = %e, "connect failed");
                self.reset(generation).await;
                return;
            }
            Err(_) => {
                warn!("connect timed out");
                self.reset(generation).await;
                return;
            }
        };

        // The protocol authenticates with the connection-local address,
        // reused as the device-id field.
        let local_address = match stream.local_addr() {
            Ok(addr) => addr.ip().to_string(),
            Err(e) => {
                warn!(error = %e, "could not read connection-local address");
                self.reset(generation).await;
                return;
            }
        };

        let (reader, writer) = stream.into_split();
        let request =
            encode_auth_request(&local_address, &local_address, &self.config.display_name);
        {
            let mut shared = self.shared.lock().await;
            if shared.generation != generation {
                return; // a newer attempt owns the session now
            }
            shared.writer = Some(writer);
            shared.state = transition(shared.state, SessionEvent::ConnectCompleted);
            info!(ip = %local_address, name = %self.config.display_name, "authenticating");
            write_frame(&mut shared, &request).await;
        }

        self.read_loop(reader, generation).await;
        self.reset(generation).await;
    }

    /// Reads inbound buffers until the socket is torn down.
    ///
    /// The read window is the idle timeout, except while authenticating,
    /// where the user may take minutes to answer the prompt and the longer
    /// auth window applies.
    async fn read_loop(&self, mut reader: OwnedReadHalf, generation: u64) {
        let mut buf = vec![0u8; 2048];
        loop {
            let window = {
                let shared = self.shared.lock().await;
                if shared.generation != generation {
                    return;
                }
                if shared.state == ConnectionState::Authenticating {
                    self.config.auth_timeout
                } else {
                    self.config.idle_timeout
                }
            };

            match time::timeout(window, reader.read(&mut buf)).await {
                Err(_) => {
                    debug!("read-idle timeout; closing socket");
                    return;
                }
                Ok(Ok(0)) => {
                    debug!("connection closed by television");
                    return;
                }
                Ok(Ok(n)) => {
                    debug!(bytes = n, "data received");
                    match decode_frame(&buf[..n]) {
                        Ok(frame) => self.on_frame(frame, generation).await,
                        Err(e) => warn!(error = %e, "discarding malformed frame"),
                    }
                }
                Ok(Err(e)) => {
                    // Read errors on a TCP stream are terminal; exiting the
                    // loop funnels into the same reset as close and timeout.
                    warn!(error = %e, "socket error");
                    return;
                }
            }
        }
    }

    /// Handles one decoded inbound frame.
    async fn on_frame(&self, frame: Frame, generation: u64) {
        let mut shared = self.shared.lock().await;
        if shared.generation != generation {
            return;
        }
        debug!(header = %frame.header, payload_len = frame.payload.len(), "frame received");
        if shared.state != ConnectionState::Authenticating {
            return;
        }

        let outcome = AuthOutcome::from_payload(&frame.payload);
        match outcome {
            AuthOutcome::Allowed => info!("pairing allowed"),
            AuthOutcome::Denied => warn!("pairing denied by the user"),
            AuthOutcome::TimedOut => warn!("pairing prompt timed out on the television"),
            AuthOutcome::Indeterminate => debug!("not an authentication result; ignored"),
        }
        if let Some(event) = auth_event(outcome) {
            shared.state = transition(shared.state, event);
        }

        if shared.state == ConnectionState::Authenticated {
            if let Some(command) = shared.pending_command.take() {
                debug!("flushing stored command");
                write_frame(&mut shared, &command).await;
            }
        }
    }

    /// The single reset point every socket teardown converges on.
    async fn reset(&self, generation: u64) {
        let mut shared = self.shared.lock().await;
        if shared.generation != generation {
            return;
        }
        shared.state = transition(shared.state, SessionEvent::SocketClosed);
        // Dropping the write half closes the socket.
        shared.writer = None;
        debug!("session reset to disconnected");
    }
}

/// Writes one serialized frame, absorbing transport errors into tracing.
/// The read loop observes a broken socket and performs the actual reset.
async fn write_frame(shared: &mut Shared, bytes: &[u8]) {
    match shared.writer.as_mut() {
        Some(writer) => {
            if let Err(e) = writer.write_all(bytes).await {
                warn!(error = %e, "write failed");
            }
        }
        None => warn!("no open socket to write to"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
