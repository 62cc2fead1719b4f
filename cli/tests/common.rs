//! # devsrv Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests. Besides the usual
//! `assert_cmd::Command` for short-lived invocations, this module can start
//! the server as a long-running child process, follow its log output on
//! stderr and issue raw HTTP/1.1 requests against it.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::path::Path;
use std::process::{Child, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// How long to wait for the server to report that it is listening.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// # Get devsrv Command (`devsrv_cmd`)
///
/// An `assert_cmd::Command` for the compiled `devsrv` binary, with `RUST_LOG`
/// removed so the default log level applies.
pub fn devsrv_cmd() -> Command {
    let mut cmd = Command::cargo_bin("devsrv").expect("Failed to find devsrv binary for testing");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A port that was free a moment ago.
pub fn free_port() -> u16 {
    TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to get a free port")
}

/// # Non-Loopback Address (`non_loopback_ipv4`)
///
/// The IPv4 address this host would use to reach the outside world, found by
/// "connecting" a UDP socket (no packet is sent). `None` on hosts with no
/// such interface, e.g. an isolated sandbox.
pub fn non_loopback_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// Whether a TCP connection to `ip:port` can be opened.
pub fn can_connect(ip: Ipv4Addr, port: u16) -> bool {
    let addr = SocketAddr::from((ip, port));
    TcpStream::connect_timeout(&addr, Duration::from_secs(2)).is_ok()
}

/// # Running Server (`RunningServer`)
///
/// A `devsrv` child process serving `cwd`. The process is killed on drop.
pub struct RunningServer {
    child: Child,
    lines: Receiver<String>,
    /// Every stderr line seen so far.
    pub log: Vec<String>,
}

impl RunningServer {
    /// Starts `devsrv <args>` with `cwd` as its working directory.
    pub fn start(cwd: &Path, args: &[&str]) -> Self {
        let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("devsrv"))
            .args(args)
            .current_dir(cwd)
            .env_remove("RUST_LOG")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn devsrv");

        let stderr = child.stderr.take().expect("stderr is piped");
        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self {
            child,
            lines,
            log: Vec::new(),
        }
    }

    /// Reads log lines until one contains `needle`, and returns it.
    pub fn wait_for_line(&mut self, needle: &str) -> String {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    self.log.push(line.clone());
                    if line.contains(needle) {
                        return line;
                    }
                }
                Err(_) => panic!(
                    "devsrv never logged '{}'; output so far:\n{}",
                    needle,
                    self.log.join("\n")
                ),
            }
        }
    }

    /// Waits for the "Listening on" line and returns the bound port.
    pub fn wait_until_listening(&mut self) -> u16 {
        let line = self.wait_for_line("Listening on http://");
        listening_port(&line).unwrap_or_else(|| panic!("no port in line: {}", line))
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Extracts the port from `... Listening on http://host:port/`.
pub fn listening_port(line: &str) -> Option<u16> {
    let rest = &line[line.find("http://")? + "http://".len()..];
    let authority = rest.split('/').next()?;
    authority.rsplit(':').next()?.parse().ok()
}

/// A parsed HTTP/1.1 response.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends `GET <path>` to `127.0.0.1:<port>` with `Connection: close` and
/// reads the whole response.
pub fn http_get(port: u16, path: &str) -> HttpResponse {
    let mut stream =
        TcpStream::connect((Ipv4Addr::LOCALHOST, port)).expect("Failed to connect to devsrv");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .expect("Failed to set read timeout");
    write!(
        stream,
        "GET {} HTTP/1.1\r\nHost: 127.0.0.1:{}\r\nConnection: close\r\n\r\n",
        path, port
    )
    .expect("Failed to send request");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).expect("Failed to read response");

    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8_lossy(&raw[..split]).to_string();
    let body = raw[split + 4..].to_vec();

    let mut head_lines = head.lines();
    let status = head_lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .expect("malformed status line");
    let headers = head_lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    HttpResponse {
        status,
        headers,
        body,
    }
}
