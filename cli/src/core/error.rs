//! # devsrv Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout devsrv. Only a handful
//! of conditions are fatal for a static file server, and they all boil down to
//! "the server can never become reachable":
//! - The root directory cannot be resolved
//! - The CORS origin cannot be used as a header value
//! - A bind fails for a reason other than the port being taken
//! - Every port from the requested one up to 65535 is taken
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `SrvError`: A custom error enum using `thiserror` for the specific failures above
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible propagation
//!
//! Bind conflicts are *not* represented here. They are recovered locally by the
//! port-retry loop in `srv::server_logic` and only ever surface as a log line.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !metadata.is_dir() {
//!     return Err(SrvError::Directory(format!("Path is not a directory: {}", path.display())))?;
//! }
//!
//! // Add context to errors using anyhow
//! let listener = TcpListener::bind(addr)
//!     .await
//!     .with_context(|| format!("Failed to bind {}", addr))?;
//! ```
//!
use std::net::SocketAddr;
use thiserror::Error;

/// Custom error type for devsrv.
#[derive(Error, Debug)]
pub enum SrvError {
    #[error("Failed to get working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Invalid CORS origin '{0}': not a valid header value")]
    InvalidCorsOrigin(String),

    #[error("Could not bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("No free port available starting from {start}")]
    PortsExhausted { start: u16 },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
