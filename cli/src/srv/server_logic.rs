//! # devsrv HTTP Server Implementation
//!
//! File: cli/src/srv/server_logic.rs
//!
//! ## Overview
//!
//! Owns the listening socket. Startup is a simple linear search for a free
//! port followed by serving requests on whatever listener that search
//! produced:
//!
//! 1. Bind `host:port`
//! 2. If the port is taken, log it and try `port + 1`
//! 3. If the bind fails for any other reason, give up immediately
//! 4. Publish the bound address and serve the router from `handler` forever
//!
//! The listener found by the search is the one that gets served. It is never
//! dropped and re-bound, so no other process can grab the port in between.
//!
//! ## Examples
//!
//! ```rust
//! let config = config::load_config(&args).await?;
//! let (bound_tx, bound_rx) = oneshot::channel();
//! server_logic::run_server(config, Some(bound_tx)).await?;
//! ```
//!
use super::config::ServerConfig;
use super::handler;
use crate::common::network;
use crate::core::error::{Result, SrvError};
use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::info;

/// # Run HTTP Server (`run_server`)
///
/// Binds a listener with `bind_with_retry`, sends its address on `bound_tx`
/// (if given) and serves the static file router on it.
///
/// ## Returns
///
/// Under normal operation this future never completes. It resolves only
/// with an error:
/// - A non-conflict bind failure, or no free port left.
/// - The HTTP server failing after startup.
pub async fn run_server(
    config: ServerConfig,
    bound_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let listener = bind_with_retry(config.host, config.port).await?;
    let addr = listener
        .local_addr()
        .context("Failed to read bound listener address")?;

    info!("🚀  Listening on http://{}/", addr);

    if let Some(tx) = bound_tx {
        // Receiver is gone when nobody waits for the port; nothing to do then.
        let _ = tx.send(addr);
    }

    let app = handler::create_app(&config.context());

    axum::serve(listener, app.into_make_service())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// # Bind With Retry (`bind_with_retry`)
///
/// Tries `host:start_port`, `host:start_port + 1`, ... until a bind succeeds.
/// Exactly one log line is written for every port skipped because it was in
/// use. There is no attempt limit; the search ends at port 65535.
///
/// ## Errors
///
/// - `SrvError::Bind` as soon as a bind fails with anything other than
///   "address in use". No further ports are tried.
/// - `SrvError::PortsExhausted` if port 65535 is reached and taken.
pub async fn bind_with_retry(host: IpAddr, start_port: u16) -> Result<TcpListener> {
    let mut port = start_port;

    loop {
        let addr = SocketAddr::new(host, port);

        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) if network::is_addr_in_use(&e) => {
                info!("Could not bind to {}, trying next port", addr);
                port = port
                    .checked_add(1)
                    .ok_or(SrvError::PortsExhausted { start: start_port })?;
            }
            Err(e) => return Err(SrvError::Bind { addr, source: e }.into()),
        }
    }
}

// --- Unit Tests ---
