//! TV-Remote-Over-IP client entry point.
//!
//! Wires together configuration, the session controller, and a
//! line-oriented stdin loop, then runs on the Tokio async event loop.
//!
//! ```text
//! main()
//!  └─ load_config()          -- TOML file (arg 1, default tv-remote.toml)
//!  └─ RemoteSession::new()   -- one session for the configured television
//!  └─ session.connect()      -- trigger the pairing prompt up front
//!  └─ stdin dispatch loop
//!       ├─ "VOLUP" ⏎  -> session.submit_key("VOLUP")
//!       └─ Ctrl-C / EOF -> shutdown
//! ```
//!
//! The first submitted key (or the eager connect) makes the television show
//! its allow/deny prompt; once the user approves, keys flow immediately.

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tv_remote_client::config::load_config;
use tv_remote_client::session::RemoteSession;
use tv_remote_core::KeyMap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tv-remote.toml"));
    let config = load_config(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // Initialise structured logging; RUST_LOG overrides the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.device.log_level.clone())),
        )
        .init();

    info!("TV-Remote-Over-IP client starting");

    if config.device.address.is_empty() {
        anyhow::bail!(
            "no television address configured; set [device] address in {}",
            config_path.display()
        );
    }

    let session = RemoteSession::new(config.session_config(), KeyMap::samsung_default());

    // Start pairing up front so the television shows its prompt before the
    // first key press.
    session.connect().await;

    info!(
        address = %session.config().address,
        "enter key names (VOLUP, CHUP, ENTER, …); Ctrl-C or EOF quits"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let key = line.trim().to_uppercase();
                        if key.is_empty() {
                            continue;
                        }
                        if let Err(e) = session.submit_key(&key).await {
                            warn!(error = %e, "key not submitted");
                        }
                    }
                    Ok(None) => break, // stdin closed
                    Err(e) => {
                        error!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
        }
    }

    info!("TV-Remote-Over-IP client stopped");
    Ok(())
}
