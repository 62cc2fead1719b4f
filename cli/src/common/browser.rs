//! # devsrv Browser Launcher (`common::browser`)
//!
//! File: cli/src/common/browser.rs
//!
//! ## Overview
//!
//! Opens the served address in the user's default browser when `--open` is
//! given. Launching is strictly best effort: `open::that_detached` starts the
//! platform's URL handler (`xdg-open`, `open`, the Windows shell) without
//! waiting for it, and any failure, including a platform with no known
//! handler, is reported as a warning without touching the running server.
//!
use std::io;
use tracing::{debug, warn};

/// The loopback URL opened for a given port.
pub fn browser_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}

/// # Open Browser (`open_browser`)
///
/// Opens `http://127.0.0.1:<port>` in the default browser. Errors are logged
/// and swallowed.
pub fn open_browser(port: u16) {
    launch(&browser_url(port), |url| open::that_detached(url));
}

/// Runs `opener` on `url`, logging a warning if it fails.
/// Returns whether the launcher reported success.
fn launch<F>(url: &str, opener: F) -> bool
where
    F: FnOnce(&str) -> io::Result<()>,
{
    debug!("Opening {} in the default browser", url);
    match opener(url) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to open browser: {}", e);
            false
        }
    }
}
