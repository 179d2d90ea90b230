// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `log-level`: ask the daemon to push its log lines as unilateral frames.
//!
//! ```text
//! ["log-level","error"]
//! {"log_level":"error","version":"4.9.0"}
//! {"level":"error","unilateral":true,"log":"2018-03-22T01:18:52,901: test message\n"}
//! ```

use std::fmt;

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetLogLevel {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogLevelResponse {
    pub meta: ResponseMeta,
    pub log_level: String,
}

impl Request for SetLogLevel {
    type Response = LogLevelResponse;

    fn to_command(&self) -> Command {
        Command::new("log-level").arg(self.level.as_str())
    }
}

impl Decode for LogLevelResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self { meta: ResponseMeta::decode(pdu)?, log_level: pdu.str_or_default("log_level")? })
    }
}
