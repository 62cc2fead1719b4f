//! # devsrv Server Configuration
//!
//! File: cli/src/srv/config.rs
//!
//! ## Overview
//!
//! This module turns the command-line flags into the immutable `ServerConfig`
//! that the rest of the server reads. There is no configuration file and no
//! environment lookup for these settings; the flags and their defaults are
//! the whole story.
//!
//! ## Architecture
//!
//! 1. `normalize_flag_args` rewrites single-dash long flags (`-port=9000`)
//!    and `SrvArgs` is parsed by `clap` in `main.rs`
//! 2. `load_config` derives the bind host from `--public`
//! 3. The CORS origin is validated as an HTTP header value
//! 4. The served directory is resolved to an absolute, canonical path
//! 5. The resulting `ServerConfig` is never mutated again
//!
//! ## Examples
//!
//! ```bash
//! # Loopback only, port 8000, current directory
//! devsrv
//!
//! # All interfaces, custom port, allow one origin, open the browser
//! devsrv -public -port=9000 -cors-allow=http://localhost:3000 -open ./dist
//!
//! # The double-dash spelling is accepted too
//! devsrv --public --port 9000 --open
//! ```
//!
use super::handler::ServerContext;
use crate::core::error::{Result, SrvError};
use axum::http::HeaderValue;
use clap::Args;
use std::env;
use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Port tried first when `--port` is not given.
pub const DEFAULT_PORT: u16 = 8000;

/// # Server Arguments (`SrvArgs`)
///
/// Flags accepted by `devsrv`. Every field has a default, so running the
/// binary with no arguments serves the current directory on
/// `127.0.0.1:8000`.
#[derive(Args, Debug, Clone)]
pub struct SrvArgs {
    /// Directory to serve. Defaults to the current working directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// The port of the HTTP file server. If it is taken, the next free port is used.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Listen on all interfaces (0.0.0.0) instead of loopback only.
    #[arg(long)]
    pub public: bool,

    /// Origin to permit via CORS. Sent as `Access-Control-Allow-Origin` on
    /// every response. Empty disables the header.
    #[arg(long = "cors-allow", value_name = "ORIGIN", default_value = "")]
    pub cors_allow: String,

    /// Open the served address in the default web browser.
    #[arg(long)]
    pub open: bool,
}

/// Long flags that may also be spelled with a single dash.
const VALUE_FLAGS: &[&str] = &["port", "cors-allow"];
const BOOL_FLAGS: &[&str] = &["public", "open"];

/// # Normalize Flag Arguments (`normalize_flag_args`)
///
/// Rewrites the single-dash long flags (`-port 9000`, `-port=9000`,
/// `-public`, `-open=false`) into the `--name` form clap parses. Boolean
/// flags take an optional `=value`: `true`/`1`/`t` keep the flag, `false`/`0`/`f`
/// drop it, anything else is passed through for clap to reject.
///
/// Arguments after a literal `--`, unknown names and non-UTF-8 arguments are
/// left untouched.
pub fn normalize_flag_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for arg in args.into_iter().map(Into::into) {
        if passthrough {
            out.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let Some(flag) = text.strip_prefix('-').filter(|f| !f.starts_with('-')) else {
            out.push(arg);
            continue;
        };

        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        if VALUE_FLAGS.contains(&name) {
            out.push(OsString::from(format!("-{}", text)));
        } else if BOOL_FLAGS.contains(&name) {
            match value.map(parse_bool_flag) {
                None | Some(Some(true)) => out.push(OsString::from(format!("--{}", name))),
                Some(Some(false)) => debug!("Flag -{} disabled explicitly", name),
                Some(None) => out.push(OsString::from(format!("-{}", text))),
            }
        } else {
            out.push(arg);
        }
    }

    out
}

/// Boolean spellings accepted for `-flag=value`.
fn parse_bool_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// Validated settings for one run of the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind: `0.0.0.0` with `--public`, `127.0.0.1` otherwise.
    pub host: IpAddr,

    /// First port to try.
    pub port: u16,

    /// Absolute, canonical path of the served directory.
    pub directory: PathBuf,

    /// Value of `Access-Control-Allow-Origin`, if any.
    pub cors_allow_origin: Option<HeaderValue>,

    /// Whether to open the browser once the listener is bound.
    pub open: bool,
}

impl ServerConfig {
    /// The handler state derived from this configuration.
    pub fn context(&self) -> ServerContext {
        ServerContext {
            root: self.directory.clone(),
            cors_allow_origin: self.cors_allow_origin.clone(),
        }
    }
}

/// # Load Server Configuration (`load_config`)
///
/// Builds the `ServerConfig` from parsed arguments.
///
/// ## Errors
///
/// Returns an error if:
/// - The current working directory cannot be determined.
/// - The directory to serve does not exist or is not a directory.
/// - `--cors-allow` contains characters not allowed in a header value.
pub async fn load_config(args: &SrvArgs) -> Result<ServerConfig> {
    let host = bind_host(args.public);
    let cors_allow_origin = parse_cors_origin(&args.cors_allow)?;
    let directory = resolve_directory(&args.directory).await?;

    debug!(
        "Resolved config: host={}, port={}, directory={}, cors={:?}",
        host,
        args.port,
        directory.display(),
        cors_allow_origin
    );

    Ok(ServerConfig {
        host,
        port: args.port,
        directory,
        cors_allow_origin,
        open: args.open,
    })
}

/// Bind host for the `--public` flag.
pub fn bind_host(public: bool) -> IpAddr {
    if public {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }
}

/// Empty means "no CORS header". Anything else must be a valid header value.
fn parse_cors_origin(raw: &str) -> Result<Option<HeaderValue>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value =
        HeaderValue::from_str(raw).map_err(|_| SrvError::InvalidCorsOrigin(raw.to_string()))?;
    Ok(Some(value))
}

/// # Resolve Directory (`resolve_directory`)
///
/// Joins a relative `dir` onto the current working directory, canonicalizes
/// it and checks that it is a directory.
async fn resolve_directory(dir: &Path) -> Result<PathBuf> {
    let absolute_path = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        env::current_dir()
            .map_err(SrvError::WorkingDirectory)?
            .join(dir)
    };

    let canonical_path = tokio::fs::canonicalize(&absolute_path).await.map_err(|e| {
        SrvError::Directory(format!(
            "'{}' could not be found or accessed: {}",
            absolute_path.display(),
            e
        ))
    })?;

    let metadata = tokio::fs::metadata(&canonical_path).await.map_err(|e| {
        SrvError::Directory(format!(
            "Failed to get metadata for '{}': {}",
            canonical_path.display(),
            e
        ))
    })?;
    if !metadata.is_dir() {
        return Err(SrvError::Directory(format!(
            "Path is not a directory: {}",
            canonical_path.display()
        ))
        .into());
    }

    Ok(canonical_path)
}

// --- Unit Tests ---
