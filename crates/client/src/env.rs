// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the client crate.

use std::time::Duration;

/// Socket path override: WATCHMAN_SOCK skips discovery entirely.
pub fn sock_override() -> Option<String> {
    std::env::var("WATCHMAN_SOCK").ok().filter(|s| !s.is_empty())
}

/// Daemon binary used for `get-sockname` discovery (default `watchman`).
pub fn daemon_bin() -> String {
    std::env::var("WM_WATCHMAN_BIN")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "watchman".to_string())
}

/// Dial timeout (default 30s, configurable via `WM_DIAL_TIMEOUT_MS`).
pub fn dial_timeout() -> Duration {
    std::env::var("WM_DIAL_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}

/// Per-command reply timeout. Unset means wait indefinitely.
pub fn command_timeout() -> Option<Duration> {
    std::env::var("WM_COMMAND_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
