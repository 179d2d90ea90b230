// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection: a session plus the metadata negotiated at connect time.

use std::collections::HashSet;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};
use wm_protocol::{Decode, ListCapabilities, Request, ResponseMeta};
use wm_wire::{Command, Pdu};

use crate::session::{Session, Unilaterals};
use crate::{dial, env, sockname, Error};

/// How to reach the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Socket path; asked of `daemon_bin` when unset.
    pub sock_name: Option<String>,
    /// Binary queried for the socket path during discovery.
    pub daemon_bin: String,
    pub dial_timeout: Duration,
    /// Applied to every command, including the handshake.
    pub command_timeout: Option<Duration>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            sock_name: None,
            daemon_bin: "watchman".to_string(),
            dial_timeout: Duration::from_secs(30),
            command_timeout: None,
        }
    }
}

impl ConnectOptions {
    /// Options from `WATCHMAN_SOCK`, `WM_WATCHMAN_BIN`, `WM_DIAL_TIMEOUT_MS`
    /// and `WM_COMMAND_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self {
            sock_name: env::sock_override(),
            daemon_bin: env::daemon_bin(),
            dial_timeout: env::dial_timeout(),
            command_timeout: env::command_timeout(),
        }
    }

    pub fn sock_name(mut self, sock_name: impl Into<String>) -> Self {
        self.sock_name = Some(sock_name.into());
        self
    }

    pub fn daemon_bin(mut self, bin: impl Into<String>) -> Self {
        self.daemon_bin = bin.into();
        self
    }

    pub fn dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}

/// Negotiated once during the handshake, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub version: String,
    pub capabilities: HashSet<String>,
    pub sock_name: String,
}

pub struct Connection {
    session: Session,
    metadata: Metadata,
    command_timeout: Option<Duration>,
}

impl Connection {
    /// Locate the daemon, dial it and run the capability handshake.
    pub async fn connect(options: &ConnectOptions) -> Result<(Connection, Unilaterals), Error> {
        let sock_name = match &options.sock_name {
            Some(sock_name) => sock_name.clone(),
            None => sockname::query_daemon(&options.daemon_bin).await?,
        };
        let transport = dial::dial(&sock_name, options.dial_timeout).await?;
        Self::establish(Session::spawn(transport), sock_name, options.command_timeout).await
    }

    /// Run the handshake over an already-open transport.
    pub async fn from_stream<T>(
        transport: T,
        sock_name: impl Into<String>,
        command_timeout: Option<Duration>,
    ) -> Result<(Connection, Unilaterals), Error>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::establish(Session::spawn(transport), sock_name.into(), command_timeout).await
    }

    /// Run the handshake over a session that is already running.
    pub async fn establish(
        (session, unilaterals): (Session, Unilaterals),
        sock_name: String,
        command_timeout: Option<Duration>,
    ) -> Result<(Connection, Unilaterals), Error> {
        let mut conn = Connection {
            session,
            metadata: Metadata { sock_name, ..Metadata::default() },
            command_timeout,
        };

        let capabilities = match conn.request(&ListCapabilities).await {
            Ok(capabilities) => capabilities,
            Err(e) => {
                warn!(sock = %conn.metadata.sock_name, error = %e, "handshake failed");
                conn.session.cancel();
                conn.session.close().await;
                return Err(Error::Handshake(Box::new(e)));
            }
        };

        conn.metadata.version = capabilities.meta.version;
        conn.metadata.capabilities = capabilities.capabilities.into_iter().collect();
        info!(
            sock = %conn.metadata.sock_name,
            version = %conn.metadata.version,
            capabilities = conn.metadata.capabilities.len(),
            "connected to daemon"
        );
        Ok((conn, unilaterals))
    }

    /// Send a raw command and wait for its reply.
    pub async fn send(&self, command: Command) -> Result<Pdu, Error> {
        match self.command_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.session.send(command))
                .await
                .map_err(|_| Error::Timeout(timeout))?,
            None => self.session.send(command).await,
        }
    }

    /// Send a typed request and decode its reply.
    pub async fn request<R: Request>(&self, request: &R) -> Result<R::Response, Error> {
        let command = request.to_command();
        let verb = command.verb().to_string();
        let pdu = self.send(command).await?;

        let meta = ResponseMeta::decode(&pdu)?;
        if let Some(warning) = &meta.warning {
            warn!(verb = %verb, warning = %warning, "daemon warning");
        }
        Ok(R::Response::decode(&pdu)?)
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.metadata.capabilities.contains(name)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn sock_name(&self) -> &str {
        &self.metadata.sock_name
    }

    /// Gracefully shut the session down. Idempotent.
    pub async fn close(&self) {
        self.session.close().await;
        info!(sock = %self.metadata.sock_name, "connection closed");
    }

    /// Abort the session immediately.
    pub fn cancel(&self) {
        self.session.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
