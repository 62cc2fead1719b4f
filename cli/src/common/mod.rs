//! # devsrv Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to serving HTTP:
//!
//! - **`browser`**: Best-effort launching of the default browser for `--open`.
//! - **`network`**: Classification of socket errors (is this bind failure a port conflict?).
//!

/// Launches the platform's default browser on the served URL.
pub mod browser;
/// Socket error classification used by the port-retry loop.
pub mod network;
