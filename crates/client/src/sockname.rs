// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating the daemon's socket.
//!
//! `WATCHMAN_SOCK` is honoured by [`ConnectOptions::from_env`](crate::ConnectOptions::from_env);
//! this module only asks the daemon binary.

use serde_json::Value;
use tracing::debug;

use crate::Error;

/// Run `<bin> get-sockname` and read the socket path from its JSON output.
pub async fn query_daemon(bin: &str) -> Result<String, Error> {
    let output = tokio::process::Command::new(bin)
        .args(["--no-pretty", "get-sockname"])
        .output()
        .await
        .map_err(|e| Error::Discovery(format!("failed to run {}: {}", bin, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Discovery(format!(
            "{} get-sockname exited with {}: {}",
            bin,
            output.status,
            stderr.trim()
        )));
    }

    let sock = parse_sockname(&output.stdout)?;
    debug!(bin, sock = %sock, "discovered socket");
    Ok(sock)
}

/// Extract the socket path from `get-sockname` output.
///
/// Newer daemons report `unix_domain` (and `named_pipe` on Windows) next to
/// the legacy `sockname` key.
pub(crate) fn parse_sockname(stdout: &[u8]) -> Result<String, Error> {
    let value: Value = serde_json::from_slice(stdout)
        .map_err(|e| Error::Discovery(format!("unparseable get-sockname output: {}", e)))?;

    let keys: &[&str] = if cfg!(windows) {
        &["named_pipe", "sockname"]
    } else {
        &["unix_domain", "sockname"]
    };
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|sock| !sock.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unable to find the daemon socket");
            Error::Discovery(message.to_string())
        })
}

#[cfg(test)]
#[path = "sockname_tests.rs"]
mod tests;
