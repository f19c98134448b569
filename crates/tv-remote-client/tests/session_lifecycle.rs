//! Integration tests for the session controller against a fake television.
//!
//! # Purpose
//!
//! These tests exercise `RemoteSession` through its *public* API in the
//! same way the application uses it. The television is played by a
//! `tokio::net::TcpListener` on a loopback port: the test accepts the
//! session's connection, reads the frames it writes, and answers with the
//! framed sentinel payloads a real television would send.
//!
//! # What is the pairing flow?
//!
//! ```text
//! Session                              Television
//! ───────                              ──────────
//! submit_key("VOLUP")
//!   → store command, connect
//!   → send auth request               show allow/deny prompt
//!                                     user answers on the TV screen
//!                                     send 64 00 01 00 (allowed)
//! flush stored command
//!   → send KEY_VOLUP frame            act on the key press
//! submit_key("MUTE")
//!   → send KEY_MUTE immediately       act on the key press
//! ```
//!
//! A denial (`64 00 00 00`) or prompt timeout (`65 00`) instead leaves the
//! session disconnected with the stored command intact; the next submission
//! starts the whole flow again.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

use tv_remote_client::session::state::ConnectionState;
use tv_remote_client::session::{RemoteSession, SessionConfig};
use tv_remote_core::protocol::messages::{
    APP_NAMESPACE, AUTH_ALLOWED, AUTH_DENIED, AUTH_TIMED_OUT,
};
use tv_remote_core::{decode_frame, encode_frame, encode_key_command, KeyMap};

/// Upper bound on any single wait in these tests; generous so slow CI
/// machines do not flake.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Binds the fake television on an ephemeral loopback port.
async fn bind_fake_television() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local_addr").port();
    (listener, port)
}

/// A session pointed at the fake television, with a short idle window so
/// idle-timeout behaviour is observable within a test run.
fn test_session(port: u16) -> RemoteSession {
    let config = SessionConfig {
        address: "127.0.0.1".to_string(),
        port,
        display_name: "test-remote".to_string(),
        idle_timeout: Duration::from_millis(400),
        auth_timeout: Duration::from_secs(10),
    };
    RemoteSession::new(config, KeyMap::samsung_default())
}

/// Accepts the session's connection and consumes its authentication
/// request, asserting the request is well-formed.
async fn accept_and_read_auth(listener: &TcpListener) -> TcpStream {
    let (mut tv, _) = timeout(TEST_TIMEOUT, listener.accept())
        .await
        .expect("session never connected")
        .expect("accept");

    let mut buf = vec![0u8; 1024];
    let n = timeout(TEST_TIMEOUT, tv.read(&mut buf))
        .await
        .expect("no authentication request arrived")
        .expect("read");
    let frame = decode_frame(&buf[..n]).expect("auth request must decode");
    assert_eq!(frame.header, APP_NAMESPACE);
    assert_eq!(&frame.payload[..2], &[0x64, 0x00], "auth payload marker");

    tv
}

/// Reads exactly `expected.len()` bytes and asserts they match.
async fn expect_bytes(tv: &mut TcpStream, expected: &[u8]) {
    let mut buf = vec![0u8; expected.len()];
    timeout(TEST_TIMEOUT, tv.read_exact(&mut buf))
        .await
        .expect("expected frame never arrived")
        .expect("read_exact");
    assert_eq!(buf, expected);
}

/// Asserts that nothing further is written on the socket. The session may
/// close the socket (idle timeout) while we wait; that also counts as "no
/// more frames".
async fn expect_no_more_frames(tv: &mut TcpStream) {
    let mut byte = [0u8; 1];
    match timeout(Duration::from_millis(300), tv.read(&mut byte)).await {
        Err(_) => {}      // nothing arrived within the window
        Ok(Ok(0)) => {}   // session closed the socket without sending more
        Ok(Ok(_)) => panic!("unexpected extra bytes on the wire"),
        Ok(Err(e)) => panic!("read error: {e}"),
    }
}

/// Polls until the session reaches `expected` or the test deadline passes.
async fn wait_for_state(session: &RemoteSession, expected: ConnectionState) {
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    loop {
        if session.connection_state().await == expected {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "session never reached {expected:?}"
        );
        sleep(Duration::from_millis(10)).await;
    }
}

// ── Happy path ────────────────────────────────────────────────────────────────

/// The end-to-end scenario: a key submitted while disconnected triggers one
/// connect attempt and one authentication write, is stored meanwhile, and is
/// sent exactly once immediately after the television allows the pairing.
#[tokio::test]
async fn test_submit_while_disconnected_pairs_then_flushes_the_command() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");

    let mut tv = accept_and_read_auth(&listener).await;

    // The handshake is outstanding: command stored, not yet sent.
    assert_eq!(
        session.connection_state().await,
        ConnectionState::Authenticating
    );
    assert_eq!(
        session.pending_command().await,
        Some(encode_key_command("KEY_VOLUP"))
    );

    // User approves the prompt.
    tv.write_all(&encode_frame(AUTH_ALLOWED)).await.expect("write");

    // Exactly one key frame follows, and the slot is cleared.
    expect_bytes(&mut tv, &encode_key_command("KEY_VOLUP")).await;
    wait_for_state(&session, ConnectionState::Authenticated).await;
    assert_eq!(session.pending_command().await, None);
    expect_no_more_frames(&mut tv).await;
}

/// Once authenticated, a submission writes straight to the socket with no
/// buffering.
#[tokio::test]
async fn test_submit_while_authenticated_writes_immediately() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.connect().await;
    let mut tv = accept_and_read_auth(&listener).await;
    tv.write_all(&encode_frame(AUTH_ALLOWED)).await.expect("write");
    wait_for_state(&session, ConnectionState::Authenticated).await;

    session.submit_key("MUTE").await.expect("submit");

    expect_bytes(&mut tv, &encode_key_command("KEY_MUTE")).await;
    assert_eq!(session.pending_command().await, None);
}

// ── Pending-slot semantics ────────────────────────────────────────────────────

/// The stored-command slot has depth one with latest-wins overwrite: only
/// the most recent submission made during the handshake is ever delivered.
#[tokio::test]
async fn test_latest_submission_wins_while_handshake_in_progress() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");
    let mut tv = accept_and_read_auth(&listener).await;

    // Second submission during the handshake replaces the first.
    session.submit_key("CHUP").await.expect("submit");
    assert_eq!(
        session.pending_command().await,
        Some(encode_key_command("KEY_CHUP"))
    );

    tv.write_all(&encode_frame(AUTH_ALLOWED)).await.expect("write");

    expect_bytes(&mut tv, &encode_key_command("KEY_CHUP")).await;
    expect_no_more_frames(&mut tv).await;
}

// ── Pairing refusals ──────────────────────────────────────────────────────────

/// A denial resets the authentication state and delivers nothing. The
/// stored command stays in the slot for the next attempt.
#[tokio::test]
async fn test_denied_pairing_leaves_session_disconnected_and_keeps_command() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");
    let mut tv = accept_and_read_auth(&listener).await;

    tv.write_all(&encode_frame(AUTH_DENIED)).await.expect("write");

    wait_for_state(&session, ConnectionState::Disconnected).await;
    assert_eq!(
        session.pending_command().await,
        Some(encode_key_command("KEY_VOLUP"))
    );
    expect_no_more_frames(&mut tv).await;
}

/// The television reporting its own prompt timeout behaves like a denial.
#[tokio::test]
async fn test_timed_out_pairing_leaves_session_disconnected() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");
    let mut tv = accept_and_read_auth(&listener).await;

    tv.write_all(&encode_frame(AUTH_TIMED_OUT)).await.expect("write");

    wait_for_state(&session, ConnectionState::Disconnected).await;
    expect_no_more_frames(&mut tv).await;
}

/// Frames that are not authentication results are ignored while the prompt
/// is outstanding; the handshake continues as if they never arrived.
#[tokio::test]
async fn test_indeterminate_frame_is_ignored_during_handshake() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");
    let mut tv = accept_and_read_auth(&listener).await;

    // Some unrelated status frame.
    tv.write_all(&encode_frame(&[0x0A, 0x00, 0x02, 0x00]))
        .await
        .expect("write");
    sleep(Duration::from_millis(100)).await;

    assert_eq!(
        session.connection_state().await,
        ConnectionState::Authenticating
    );
    assert!(session.pending_command().await.is_some());

    // The real answer still works afterwards.
    tv.write_all(&encode_frame(AUTH_ALLOWED)).await.expect("write");
    expect_bytes(&mut tv, &encode_key_command("KEY_VOLUP")).await;
}

// ── Socket lifecycle ──────────────────────────────────────────────────────────

/// A close from the television always lands the session in Disconnected,
/// whatever was in flight.
#[tokio::test]
async fn test_television_close_resets_to_disconnected() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");
    let tv = accept_and_read_auth(&listener).await;

    drop(tv);

    wait_for_state(&session, ConnectionState::Disconnected).await;
    // The stored command survives the close for the next attempt.
    assert!(session.pending_command().await.is_some());
}

/// After authentication the short idle window applies: a silent television
/// gets its socket closed, which funnels into the same disconnect reset.
#[tokio::test]
async fn test_idle_timeout_closes_socket_and_resets() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.connect().await;
    let mut tv = accept_and_read_auth(&listener).await;
    tv.write_all(&encode_frame(AUTH_ALLOWED)).await.expect("write");
    wait_for_state(&session, ConnectionState::Authenticated).await;

    // Stay silent past the 400 ms idle window: the session must close.
    let mut byte = [0u8; 1];
    let n = timeout(TEST_TIMEOUT, tv.read(&mut byte))
        .await
        .expect("session never closed the idle socket")
        .expect("read");
    assert_eq!(n, 0, "expected EOF from the session side");

    wait_for_state(&session, ConnectionState::Disconnected).await;
}

/// A failed pairing self-heals: the next submission after a denial starts a
/// fresh handshake on a fresh socket and delivers the new key.
#[tokio::test]
async fn test_resubmit_after_denial_restarts_handshake() {
    let (listener, port) = bind_fake_television().await;
    let session = test_session(port);

    session.submit_key("VOLUP").await.expect("submit");
    let mut tv = accept_and_read_auth(&listener).await;
    tv.write_all(&encode_frame(AUTH_DENIED)).await.expect("write");
    wait_for_state(&session, ConnectionState::Disconnected).await;
    drop(tv);

    // Second attempt, this time approved.
    session.submit_key("CHUP").await.expect("submit");
    let mut tv = accept_and_read_auth(&listener).await;
    tv.write_all(&encode_frame(AUTH_ALLOWED)).await.expect("write");

    expect_bytes(&mut tv, &encode_key_command("KEY_CHUP")).await;
    wait_for_state(&session, ConnectionState::Authenticated).await;
    assert_eq!(session.pending_command().await, None);
}
