// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-command encoders and reply decoders.
//!
//! Encoding produces the positional argument list (verb first, options
//! mapping last and only when something non-default is set). Decoding reads
//! named fields with defaults for anything absent and fails only on fields of
//! the wrong JSON type.

mod clock;
mod list_capabilities;
mod log_level;
mod subscribe;
mod unsubscribe;
mod watch_del;
mod watch_list;
mod watch_project;

pub use clock::{Clock, ClockResponse};
pub use list_capabilities::{ListCapabilities, ListCapabilitiesResponse};
pub use log_level::{LogLevel, LogLevelResponse, SetLogLevel};
pub use subscribe::{Subscribe, SubscribeResponse, DEFAULT_SUBSCRIBE_FIELDS};
pub use unsubscribe::{Unsubscribe, UnsubscribeResponse};
pub use watch_del::{WatchDel, WatchDelResponse};
pub use watch_list::{WatchList, WatchListResponse};
pub use watch_project::{WatchProject, WatchProjectResponse};

use wm_wire::{Command, DecodeError, Fields, Pdu};

/// A typed request with a typed reply.
pub trait Request {
    type Response: Decode;

    fn to_command(&self) -> Command;
}

/// Decode a typed value out of a reply PDU.
pub trait Decode: Sized {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError>;
}

/// Fields the daemon attaches to every response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Daemon version string.
    pub version: String,
    /// Advisory the daemon wants shown to the user.
    pub warning: Option<String>,
}

impl Decode for ResponseMeta {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self {
            version: pdu.str_or_default("version")?,
            warning: pdu.opt_str("warning")?.map(str::to_string),
        })
    }
}

#[cfg(test)]
#[path = "../commands_tests.rs"]
mod tests;
