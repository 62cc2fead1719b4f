//! # devsrv Static File Server
//!
//! File: cli/src/srv/mod.rs
//!
//! ## Overview
//!
//! This module provides the static file server itself. It serves one
//! directory over plain HTTP with:
//! - Port binding with automatic fallback to the next port when one is taken
//! - Loopback-only or all-interface binding (`--public`)
//! - An optional fixed `Access-Control-Allow-Origin` header (`--cors-allow`)
//! - Optionally opening the default browser once the server is up (`--open`)
//!
//! ## Architecture
//!
//! - `config.rs`: Flags and the validated, immutable `ServerConfig`
//! - `handler.rs`: The axum router that logs and serves every request
//! - `listing.rs`: HTML index for directories without an `index.html`
//! - `server_logic.rs`: The port-retry loop and the accept loop
//!
//! `handle_srv` ties them together. The server runs as a background task
//! whose `JoinHandle` doubles as the completion signal; the browser, when
//! requested, is opened from a second task that waits for the server to
//! report the port it actually bound.
//!
use crate::common::browser;
use crate::core::error::Result;
use anyhow::Context;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

pub use config::{normalize_flag_args, SrvArgs};

/// Flag parsing and configuration.
pub mod config;

/// The axum router serving files from the root directory.
pub mod handler;

/// Directory listings for the file server.
pub mod listing;

/// Listener binding with port fallback, and the HTTP accept loop.
pub mod server_logic;

/// Grace period between the listener being bound and the browser being launched.
const BROWSER_OPEN_DELAY: Duration = Duration::from_millis(100);

/// # Handle Server (`handle_srv`)
///
/// Entry point for a server run.
///
/// 1. Loads the configuration (fatal on a bad directory or CORS origin).
/// 2. Spawns `server_logic::run_server` on a background task.
/// 3. With `--open`, spawns a task that waits for the bound address, pauses
///    for `BROWSER_OPEN_DELAY` and opens the browser on that port.
/// 4. Waits for the server task. It only finishes on a fatal error, which is
///    returned to `main`.
pub async fn handle_srv(args: SrvArgs) -> Result<()> {
    debug!("Handling server with args: {:?}", args);

    let config = config::load_config(&args).await?;
    info!("Serving files from {}", config.directory.display());

    let (bound_tx, bound_rx) = oneshot::channel();
    let open = config.open;
    let server = tokio::spawn(server_logic::run_server(config, Some(bound_tx)));

    if open {
        tokio::spawn(async move {
            // A dropped sender means the server failed before binding.
            if let Ok(addr) = bound_rx.await {
                tokio::time::sleep(BROWSER_OPEN_DELAY).await;
                browser::open_browser(addr.port());
            }
        });
    }

    server.await.context("Server task terminated unexpectedly")?
}
