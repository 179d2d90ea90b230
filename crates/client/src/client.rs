// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! High-level client: watches, subscriptions and typed notifications.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};
use wm_protocol::{
    Clock, LogLevel, Notification, SetLogLevel, Subscribe, Unsubscribe, WatchDel, WatchList,
    WatchProject,
};

use crate::connection::{ConnectOptions, Connection};
use crate::session::Unilaterals;
use crate::Error;

/// Subscriptions the caller still holds, keyed by `(root, name)`.
#[derive(Debug, Default)]
struct Registry {
    active: Mutex<HashSet<(String, String)>>,
}

impl Registry {
    fn insert(&self, root: &str, name: &str) -> bool {
        self.active.lock().insert((root.to_string(), name.to_string()))
    }

    /// Pushes from older daemons may omit the root; match on name alone then.
    fn remove(&self, root: &str, name: &str) {
        self.active.lock().retain(|(r, n)| n != name || !(root.is_empty() || r == root));
    }

    fn is_active(&self, root: &str, name: &str) -> bool {
        let active = self.active.lock();
        if root.is_empty() {
            active.iter().any(|(_, n)| n == name)
        } else {
            active.contains(&(root.to_string(), name.to_string()))
        }
    }
}

struct Inner {
    conn: Connection,
    registry: Registry,
    unilaterals: Mutex<Option<Unilaterals>>,
}

/// A connected client. Cheap to clone; all clones share one connection.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Connect using options from the environment.
    pub async fn connect() -> Result<Client, Error> {
        Self::connect_with(&ConnectOptions::from_env()).await
    }

    pub async fn connect_with(options: &ConnectOptions) -> Result<Client, Error> {
        let (conn, unilaterals) = Connection::connect(options).await?;
        Ok(Self::new(conn, unilaterals))
    }

    /// Handshake over an already-open transport.
    pub async fn from_stream<T>(transport: T, sock_name: impl Into<String>) -> Result<Client, Error>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (conn, unilaterals) = Connection::from_stream(transport, sock_name, None).await?;
        Ok(Self::new(conn, unilaterals))
    }

    pub fn new(conn: Connection, unilaterals: Unilaterals) -> Client {
        let inner = Inner {
            conn,
            registry: Registry::default(),
            unilaterals: Mutex::new(Some(unilaterals)),
        };
        Client { inner: Arc::new(inner) }
    }

    pub fn connection(&self) -> &Connection {
        &self.inner.conn
    }

    pub fn version(&self) -> &str {
        self.inner.conn.version()
    }

    pub fn sock_name(&self) -> &str {
        self.inner.conn.sock_name()
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.inner.conn.has_capability(name)
    }

    /// Advertised capabilities, sorted.
    pub fn capabilities(&self) -> Vec<String> {
        let mut capabilities: Vec<_> =
            self.inner.conn.metadata().capabilities.iter().cloned().collect();
        capabilities.sort();
        capabilities
    }

    /// Roots the daemon is currently watching.
    pub async fn watch_list(&self) -> Result<Vec<String>, Error> {
        Ok(self.inner.conn.request(&WatchList).await?.roots)
    }

    /// Watch `path`, or the project root that contains it.
    pub async fn add_watch(&self, path: &str) -> Result<Watch, Error> {
        let response = self.inner.conn.request(&WatchProject::new(path)).await?;
        debug!(path, root = %response.watch, relative = %response.relative_path, "watching");
        Ok(Watch {
            client: self.clone(),
            root: response.watch,
            relative_path: response.relative_path,
            watcher: response.watcher,
        })
    }

    /// Stop watching `root`. Returns whether the daemon had a watch to remove.
    pub async fn remove_watch(&self, root: &str) -> Result<bool, Error> {
        let response = self.inner.conn.request(&WatchDel::new(root)).await?;
        Ok(response.deleted)
    }

    /// Ask the daemon to push its log lines at `level` or above.
    pub async fn set_log_level(&self, level: LogLevel) -> Result<String, Error> {
        Ok(self.inner.conn.request(&SetLogLevel { level }).await?.log_level)
    }

    /// The typed notification stream. Handed out once; later calls get `None`.
    ///
    /// Pushes are buffered until the stream is taken and read. A client that
    /// will never read them should call
    /// [`discard_notifications`](Client::discard_notifications).
    pub fn notifications(&self) -> Option<Notifications> {
        let unilaterals = self.inner.unilaterals.lock().take()?;
        Some(Notifications { unilaterals, inner: Arc::clone(&self.inner) })
    }

    /// Drop the notification stream if it has not been handed out. Later
    /// pushes are discarded as they arrive.
    pub fn discard_notifications(&self) {
        if self.inner.unilaterals.lock().take().is_some() {
            debug!("notifications discarded");
        }
    }

    /// Close the connection. Idempotent; outstanding subscriptions end with it.
    pub async fn close(&self) {
        self.inner.conn.close().await;
    }
}

/// A watched root.
#[derive(Clone)]
pub struct Watch {
    client: Client,
    root: String,
    relative_path: String,
    watcher: Option<String>,
}

impl Watch {
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Requested path relative to [`root`](Watch::root); empty when equal.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn watcher(&self) -> Option<&str> {
        self.watcher.as_deref()
    }

    /// Current clock for this root. A `sync_timeout` makes the daemon catch
    /// up with pending filesystem events first.
    pub async fn clock(&self, sync_timeout: Option<Duration>) -> Result<String, Error> {
        let mut request = Clock::new(self.root.as_str());
        request.sync_timeout = sync_timeout;
        Ok(self.client.inner.conn.request(&request).await?.clock)
    }

    /// A subscribe request scoped to this watch, for further tailoring.
    pub fn subscribe_request(&self, name: &str) -> Subscribe {
        let request = Subscribe::new(self.root.as_str(), name);
        if self.relative_path.is_empty() {
            request
        } else {
            request.relative_root(self.relative_path.as_str())
        }
    }

    /// Subscribe with the default fields.
    pub async fn subscribe(&self, name: &str) -> Result<Subscription, Error> {
        self.subscribe_with(self.subscribe_request(name)).await
    }

    pub async fn subscribe_with(&self, request: Subscribe) -> Result<Subscription, Error> {
        let registry = &self.client.inner.registry;
        // Registered before sending so pushes racing the reply are kept.
        let fresh = registry.insert(&request.root, &request.name);

        match self.client.inner.conn.request(&request).await {
            Ok(response) => {
                info!(root = %request.root, name = %response.subscription, "subscribed");
                Ok(Subscription {
                    client: self.client.clone(),
                    root: request.root,
                    name: request.name,
                    clock: response.clock,
                })
            }
            Err(e) => {
                if fresh {
                    registry.remove(&request.root, &request.name);
                }
                Err(e)
            }
        }
    }
}

/// An active subscription.
pub struct Subscription {
    client: Client,
    root: String,
    name: String,
    clock: String,
}

impl Subscription {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Clock at which the subscription started.
    pub fn clock(&self) -> &str {
        &self.clock
    }

    /// Cancel the subscription. Pushes still in flight for it are dropped by
    /// [`Notifications`]. Returns whether the daemon knew the subscription.
    pub async fn unsubscribe(&self) -> Result<bool, Error> {
        let request = Unsubscribe::new(self.root.as_str(), self.name.as_str());
        let response = self.client.inner.conn.request(&request).await?;
        self.client.inner.registry.remove(&self.root, &self.name);
        info!(root = %self.root, name = %self.name, deleted = response.deleted, "unsubscribed");
        Ok(response.deleted)
    }
}

/// Typed unilateral pushes, with stale subscription pushes filtered out.
pub struct Notifications {
    unilaterals: Unilaterals,
    inner: Arc<Inner>,
}

impl Notifications {
    /// Next notification; `None` once the connection has closed.
    pub async fn recv(&mut self) -> Option<Result<Notification, Error>> {
        loop {
            let pdu = match self.unilaterals.recv().await? {
                Ok(pdu) => pdu,
                Err(e) => return Some(Err(e)),
            };
            let notification = match Notification::decode(pdu) {
                Ok(notification) => notification,
                Err(e) => return Some(Err(e.into())),
            };

            if let Some(name) = notification.subscription() {
                let root = notification.root().unwrap_or_default();
                if !self.inner.registry.is_active(root, name) {
                    debug!(root, name, "dropping push for inactive subscription");
                    continue;
                }
                if let Notification::Canceled { subscription, root } = &notification {
                    info!(root = %root, name = %subscription, "subscription canceled by daemon");
                    self.inner.registry.remove(root, subscription);
                }
            }
            return Some(Ok(notification));
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
