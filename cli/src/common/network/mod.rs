//! # devsrv Network Utilities Module (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! Helpers for reasoning about socket errors. The port-retry loop in
//! `srv::server_logic` needs to tell a port that is merely *taken* apart from
//! every other way a bind can fail (permission denied on a privileged port,
//! an address that does not belong to this host, ...). Only the former is
//! worth retrying on the next port; retrying on anything else would spin
//! through the port range and hide the real error.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::network;
//!
//! match TcpListener::bind(addr).await {
//!     Err(e) if network::is_addr_in_use(&e) => { /* try the next port */ }
//!     Err(e) => return Err(e.into()),
//!     Ok(listener) => { /* serve */ }
//! }
//! ```
//!
use std::error::Error;
use std::io;

/// # Is Address In Use (`is_addr_in_use`)
///
/// Walks the `source()` chain of `err` and reports whether any link is an
/// `std::io::Error` of kind `AddrInUse`. Takes the raw `io::Error` from
/// `TcpListener::bind` as well as an `anyhow::Error` (via `as_ref()`), so
/// context added with `anyhow` or a wrapping `SrvError::Bind` does not hide
/// the underlying I/O error.
///
/// ## Returns
///
/// * `true` only for "address already in use". Any other error, including other
///   I/O error kinds, yields `false`.
pub fn is_addr_in_use(err: &(dyn Error + 'static)) -> bool {
    std::iter::successors(Some(err), |e: &&(dyn Error + 'static)| (*e).source())
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::AddrInUse)
}
