// crates/compliance-cli/tests/helpers/mod.rs
// ============================================================================
// Module: Harness Test Helpers
// Description: Shared helpers for compliance-cli integration tests.
// Purpose: Provide a stub disclosure target and scratch config files.
// Dependencies: axum, tempfile, tokio
// ============================================================================

//! ## Overview
//! Shared helpers for compliance-cli integration tests.
//! Invariants:
//! - Stub targets bind loopback on an ephemeral port.
//! - Scratch files live in temp dirs dropped with the test.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod target_stub;

use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

/// Writes a harness config into a fresh temp dir and returns both.
pub fn write_config(contents: &str) -> Result<(TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("compliance-harness.toml");
    std::fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Returns a loopback base URL on which nothing is listening.
pub fn closed_port_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// Serves one raw HTTP response from a loopback socket and returns its URL.
///
/// The connection stays open for `hold_open` after `body` is written, so a
/// declared length larger than the body leaves the client waiting.
pub fn spawn_raw_response(
    head: String,
    body: Vec<u8>,
    hold_open: Duration,
) -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(read) => request.extend_from_slice(&buf[..read]),
            }
        }
        if stream.write_all(head.as_bytes()).is_err() || stream.write_all(&body).is_err() {
            return;
        }
        let _ = stream.flush();
        thread::sleep(hold_open);
    });
    Ok(format!("http://{addr}"))
}
