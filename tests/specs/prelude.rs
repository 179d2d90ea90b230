// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: a socket in a temp dir with a scripted daemon behind it.

use std::path::PathBuf;
use std::time::Duration;

pub use tokio::net::UnixStream;
pub use wm_client::test_support::{FakeDaemon, STALL};
pub use wm_client::{Client, ConnectOptions, Connection, Error, Session};
pub use wm_protocol::{Notification, StateChange};

use tempfile::TempDir;
use tokio::net::UnixListener;

/// Route `RUST_LOG` output to the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A listening socket the client can dial.
pub struct Socket {
    _dir: TempDir,
    path: PathBuf,
    listener: UnixListener,
}

impl Socket {
    pub fn bind() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wm.sock");
        let listener = UnixListener::bind(&path).unwrap();
        Self { _dir: dir, path, listener }
    }

    pub fn path(&self) -> &str {
        self.path.to_str().unwrap()
    }

    pub fn options(&self) -> ConnectOptions {
        ConnectOptions::default().sock_name(self.path()).dial_timeout(Duration::from_secs(2))
    }

    /// Accept the next client connection.
    pub async fn accept(&self) -> FakeDaemon<UnixStream> {
        let (stream, _) =
            tokio::time::timeout(STALL, self.listener.accept()).await.unwrap().unwrap();
        FakeDaemon::new(stream)
    }

    /// Connect a client and answer its handshake.
    pub async fn client(&self) -> (Client, FakeDaemon<UnixStream>) {
        let options = self.options();
        let daemon = async {
            let mut daemon = self.accept().await;
            daemon.handshake("4.9.0", &["cmd-clock", "relative_root"]).await;
            daemon
        };
        let (client, daemon) = tokio::join!(Client::connect_with(&options), daemon);
        (client.unwrap(), daemon)
    }
}
