// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream, Lines,
    ReadHalf, WriteHalf,
};

pub use crate::session::CloseGate;

/// How long helpers wait before declaring the client stuck.
pub const STALL: Duration = Duration::from_secs(5);

/// The daemon end of a transport, driven line by line from a test.
pub struct FakeDaemon<T = DuplexStream> {
    lines: Lines<BufReader<ReadHalf<T>>>,
    write: WriteHalf<T>,
}

/// An in-memory transport: hand the first half to the client.
pub fn duplex() -> (DuplexStream, FakeDaemon) {
    let (client, remote) = tokio::io::duplex(64 * 1024);
    (client, FakeDaemon::new(remote))
}

impl<T> FakeDaemon<T>
where
    T: AsyncRead + AsyncWrite,
{
    pub fn new(transport: T) -> Self {
        let (read, write) = tokio::io::split(transport);
        Self { lines: BufReader::new(read).lines(), write }
    }

    /// Next command line the client wrote.
    pub async fn expect(&mut self) -> String {
        tokio::time::timeout(STALL, self.lines.next_line())
            .await
            .expect("timed out waiting for a command")
            .unwrap()
            .expect("client closed the transport")
    }

    /// Next command line, asserting its exact text.
    pub async fn expect_command(&mut self, expected: &str) {
        let line = self.expect().await;
        assert_eq!(line, expected);
    }

    /// Next command line if one arrives within `within`.
    pub async fn poll_command(&mut self, within: Duration) -> Option<String> {
        match tokio::time::timeout(within, self.lines.next_line()).await {
            Ok(line) => line.unwrap(),
            Err(_) => None,
        }
    }

    /// Write one frame followed by a newline.
    pub async fn push(&mut self, json: &str) {
        self.write.write_all(json.as_bytes()).await.unwrap();
        self.write.write_all(b"\n").await.unwrap();
    }

    /// Write bytes verbatim, newline not included.
    pub async fn push_raw(&mut self, bytes: &[u8]) {
        self.write.write_all(bytes).await.unwrap();
    }

    /// Answer the connect-time capability handshake.
    pub async fn handshake(&mut self, version: &str, capabilities: &[&str]) {
        self.expect_command(r#"["list-capabilities"]"#).await;
        let reply = serde_json::json!({ "version": version, "capabilities": capabilities });
        self.push(&reply.to_string()).await;
    }

    /// Wait until the client releases its end of the transport.
    pub async fn expect_eof(&mut self) {
        let line = tokio::time::timeout(STALL, self.lines.next_line())
            .await
            .expect("transport was not released");
        assert!(matches!(line, Ok(None)), "expected EOF, got {:?}", line);
    }
}
