// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `watch-del`: stop watching a root.
//!
//! ```text
//! ["watch-del","/home/user/src/app"]
//! {"version":"4.9.0","watch-del":true,"root":"/home/user/src/app"}
//! ```

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchDel {
    pub path: String,
}

impl WatchDel {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchDelResponse {
    pub meta: ResponseMeta,
    pub root: String,
    pub deleted: bool,
}

impl Request for WatchDel {
    type Response = WatchDelResponse;

    fn to_command(&self) -> Command {
        Command::new("watch-del").arg(self.path.as_str())
    }
}

impl Decode for WatchDelResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self {
            meta: ResponseMeta::decode(pdu)?,
            root: pdu.str_or_default("root")?,
            deleted: pdu.bool_or("watch-del", false)?,
        })
    }
}
