// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `watch-project`
//!
//! The daemon may watch an ancestor of the requested directory; the reply
//! names the watched root and the requested directory relative to it.
//!
//! ```text
//! ["watch-project","/home/user/src/app/lib"]
//! {"version":"4.9.0","watch":"/home/user/src/app","relative_path":"lib","watcher":"inotify"}
//! ```

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchProject {
    pub path: String,
}

impl WatchProject {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchProjectResponse {
    pub meta: ResponseMeta,
    /// Root actually being watched.
    pub watch: String,
    /// Requested path relative to `watch`; empty when they are the same.
    pub relative_path: String,
    /// Name of the daemon's watcher backend, if reported.
    pub watcher: Option<String>,
}

impl Request for WatchProject {
    type Response = WatchProjectResponse;

    fn to_command(&self) -> Command {
        Command::new("watch-project").arg(self.path.as_str())
    }
}

impl Decode for WatchProjectResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self {
            meta: ResponseMeta::decode(pdu)?,
            watch: pdu.str_or_default("watch")?,
            relative_path: pdu.str_or_default("relative_path")?,
            watcher: pdu.opt_str("watcher")?.map(str::to_string),
        })
    }
}
