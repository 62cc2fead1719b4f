//! # devsrv Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Core infrastructure shared by the rest of the crate. For now this is only
//! the error system: the `SrvError` enum and the `Result<T>` alias that every
//! fallible function in the crate returns.
//!
//! ```rust
//! use crate::core::error::{Result, SrvError};
//! ```
//!
pub mod error;
