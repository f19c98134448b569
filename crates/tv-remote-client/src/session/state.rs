//! The connection/authentication state machine.
//!
//! Exactly one [`ConnectionState`] holds at any instant, and every state
//! change in the session goes through the single [`transition`] function —
//! the socket event handlers and the submit path never assign the state
//! field directly. This keeps the "authenticated" application-level
//! handshake result cleanly separated from "connected" transport-level
//! state: a denied pairing and a dropped TCP connection both land in
//! [`ConnectionState::Disconnected`], which at the command-delivery layer
//! simply means "must re-authenticate before sending".

use tv_remote_core::AuthOutcome;

/// Connection/authentication state of one [`super::RemoteSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No usable socket; the next submitted key starts a handshake.
    Disconnected,
    /// A TCP connect attempt is in flight.
    Connecting,
    /// The socket is open and an authentication request has been sent;
    /// waiting for the user to answer the prompt on the television.
    Authenticating,
    /// The television accepted the pairing; keys are written immediately.
    Authenticated,
}

/// Events that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A handshake was started for a disconnected session.
    ConnectStarted,
    /// The TCP connect completed and the authentication request went out.
    ConnectCompleted,
    /// The television answered the pairing prompt with "allow".
    AuthAllowed,
    /// The television answered the pairing prompt with "deny".
    AuthDenied,
    /// The television's own pairing prompt timed out.
    AuthTimedOut,
    /// The socket was torn down (idle timeout, peer close, or transport
    /// error) — the single event every teardown path converges on.
    SocketClosed,
}

/// Computes the next state. Pure; the caller stores the result.
///
/// Events that do not apply to the current state leave it unchanged: the
/// protocol allows unrelated frames during the handshake, and a late event
/// from an already-replaced socket must not disturb its successor.
pub fn transition(state: ConnectionState, event: SessionEvent) -> ConnectionState {
    use ConnectionState::*;
    use SessionEvent::*;

    match (state, event) {
        (_, SocketClosed) => Disconnected,
        (Disconnected, ConnectStarted) => Connecting,
        (Connecting, ConnectCompleted) => Authenticating,
        (Authenticating, AuthAllowed) => Authenticated,
        (Authenticating, AuthDenied) => Disconnected,
        (Authenticating, AuthTimedOut) => Disconnected,
        (unchanged, _) => unchanged,
    }
}

/// Maps a decoded authentication outcome to its state-machine event.
///
/// [`AuthOutcome::Indeterminate`] maps to `None`: an unrelated frame is not
/// an event at all.
pub fn auth_event(outcome: AuthOutcome) -> Option<SessionEvent> {
    match outcome {
        AuthOutcome::Allowed => Some(SessionEvent::AuthAllowed),
        AuthOutcome::Denied => Some(SessionEvent::AuthDenied),
        AuthOutcome::TimedOut => Some(SessionEvent::AuthTimedOut),
        AuthOutcome::Indeterminate => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
