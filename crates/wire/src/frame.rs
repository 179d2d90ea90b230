// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound frames and their classification into replies, errors and
//! unilateral pushes.

use indexmap::IndexMap;
use serde_json::Value;

use crate::WireError;

/// One line received from the daemon, decoded as an ordered JSON object.
pub type Frame = IndexMap<String, Value>;

/// Parse one raw line (without its trailing newline) into a [`Frame`].
///
/// Anything other than a JSON object is a [`WireError::MalformedFrame`].
pub fn parse_frame(line: &[u8]) -> Result<Frame, WireError> {
    serde_json::from_slice::<Frame>(line).map_err(|source| WireError::MalformedFrame {
        line: String::from_utf8_lossy(line).into_owned(),
        source,
    })
}

/// A decoded response object, tagged with whether it was pushed by the
/// daemon (unilateral) or sent as the reply to the outstanding command.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    fields: Frame,
    unilateral: bool,
}

impl Pdu {
    pub fn reply(fields: Frame) -> Self {
        Self { fields, unilateral: false }
    }

    pub fn unilateral(fields: Frame) -> Self {
        Self { fields, unilateral: true }
    }

    pub fn is_unilateral(&self) -> bool {
        self.unilateral
    }

    pub fn fields(&self) -> &Frame {
        &self.fields
    }

    pub fn into_fields(self) -> Frame {
        self.fields
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// The daemon rejected a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandFailure {
    /// Daemon-provided error text.
    pub message: String,
    /// The full error frame (it usually carries `version` too).
    pub fields: Frame,
}

/// Classification of one inbound frame. Every frame is exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Carries an `error` key: the outstanding command failed.
    Error(CommandFailure),
    /// Pushed by the daemon independent of the outstanding command.
    Unilateral(Pdu),
    /// The reply to the outstanding command.
    Reply(Pdu),
}

impl Inbound {
    pub fn kind(&self) -> &'static str {
        match self {
            Inbound::Error(_) => "error",
            Inbound::Unilateral(_) => "unilateral",
            Inbound::Reply(_) => "reply",
        }
    }
}

/// Classify a frame.
///
/// Precedence: an `error` key always wins, even on frames that also look
/// unilateral. A frame is unilateral when its `unilateral` flag is truthy, or
/// when it carries a `subscription` or `log` key (older daemons push these
/// without the flag). Everything else is a reply.
pub fn classify(frame: Frame) -> Inbound {
    if let Some(error) = frame.get("error") {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Inbound::Error(CommandFailure { message, fields: frame });
    }

    let flagged = frame.get("unilateral").is_some_and(truthy);
    if flagged || frame.contains_key("subscription") || frame.contains_key("log") {
        Inbound::Unilateral(Pdu::unilateral(frame))
    } else {
        Inbound::Reply(Pdu::reply(frame))
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
