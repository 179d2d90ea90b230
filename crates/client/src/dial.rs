// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opening the daemon transport.

use std::io;
use std::time::Duration;

use tracing::debug;

use crate::Error;

/// Unix domain socket on unix.
#[cfg(unix)]
pub type Transport = tokio::net::UnixStream;

/// Named pipe client on Windows.
#[cfg(windows)]
pub type Transport = tokio::net::windows::named_pipe::NamedPipeClient;

/// Connect to the daemon at `sock_name`, giving up after `timeout`.
pub async fn dial(sock_name: &str, timeout: Duration) -> Result<Transport, Error> {
    debug!(sock = sock_name, ?timeout, "dialing daemon");
    tokio::time::timeout(timeout, open(sock_name)).await.map_err(|_| {
        Error::Transport(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("timed out after {:?} connecting to {}", timeout, sock_name),
        ))
    })?
}

#[cfg(unix)]
async fn open(sock_name: &str) -> Result<Transport, Error> {
    Ok(tokio::net::UnixStream::connect(sock_name).await?)
}

#[cfg(windows)]
async fn open(sock_name: &str) -> Result<Transport, Error> {
    use tokio::net::windows::named_pipe::ClientOptions;

    // ERROR_PIPE_BUSY: every server instance is taken; retry until the
    // outer timeout fires.
    const ERROR_PIPE_BUSY: i32 = 231;
    loop {
        match ClientOptions::new().open(sock_name) {
            Ok(client) => return Ok(client),
            Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Err(e) => return Err(Error::Transport(e)),
        }
    }
}

#[cfg(all(test, unix))]
#[path = "dial_tests.rs"]
mod tests;
