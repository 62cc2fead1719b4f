//! # devsrv Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! `devsrv` serves a directory over plain HTTP for quick local previews.
//! This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the server and reporting fatal errors
//!
//! ## Examples
//!
//! ```bash
//! # Serve the current directory on http://127.0.0.1:8000/
//! devsrv
//!
//! # Serve ./dist on all interfaces, starting at port 9000, and open a browser
//! devsrv -public -port=9000 -open ./dist
//!
//! # More log output
//! devsrv -vv
//! ```
//!
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

mod common; // Browser launching, socket error classification
mod core; // Error types
mod srv; // Configuration, request handler, server bootstrap

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "devsrv",
    about = "Serve a directory over HTTP for local development",
    long_about = "Serves files from DIRECTORY (default: the current directory) over plain HTTP.\n\
                  If the requested port is taken, the next free port is used.",
    version
)]
struct Cli {
    #[command(flatten)]
    args: srv::SrvArgs,
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(srv::normalize_flag_args(std::env::args_os()));

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = srv::handle_srv(cli.args).await {
        tracing::error!("Server failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
