// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clock`
//!
//! ```text
//! ["clock","/tmp"]
//! {"clock":"c:1531594843:978:9:172","version":"4.9.0"}
//!
//! ["clock","/tmp",{"sync_timeout":100}]
//! {"error":"sync_timeout expired","version":"4.9.0"}
//! ```

use std::time::Duration;

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub path: String,
    /// How long the daemon may wait to sync with the filesystem before
    /// answering. Zero or unset omits the option entirely.
    pub sync_timeout: Option<Duration>,
}

impl Clock {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), sync_timeout: None }
    }

    pub fn sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockResponse {
    pub meta: ResponseMeta,
    pub clock: String,
}

impl Request for Clock {
    type Response = ClockResponse;

    fn to_command(&self) -> Command {
        let command = Command::new("clock").arg(self.path.as_str());
        match self.sync_timeout.filter(|t| !t.is_zero()) {
            Some(timeout) => {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                command.option("sync_timeout", millis)
            }
            None => command,
        }
    }
}

impl Decode for ClockResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self { meta: ResponseMeta::decode(pdu)?, clock: pdu.str_or_default("clock")? })
    }
}
