// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `subscribe`
//!
//! ```text
//! ["subscribe","/tmp","sub1",{"fields":["name"]}]
//! {"clock":"c:1531594843:978:9:826","subscribe":"sub1","version":"4.9.0"}
//! ```
//!
//! After the reply the daemon pushes unilateral frames tagged with the
//! subscription name; see [`Notification`](crate::Notification).

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

/// Fields requested when none are given: enough to classify each file change.
pub const DEFAULT_SUBSCRIBE_FIELDS: [&str; 6] =
    ["cclock", "exists", "name", "size", "symlink_target", "type"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    pub root: String,
    pub name: String,
    pub fields: Vec<String>,
    /// Only report changes after this clock.
    pub since: Option<String>,
    /// Scope the subscription to a directory below the root.
    pub relative_root: Option<String>,
}

impl Subscribe {
    pub fn new(root: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            fields: DEFAULT_SUBSCRIBE_FIELDS.iter().map(|f| f.to_string()).collect(),
            since: None,
            relative_root: None,
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn since(mut self, clock: impl Into<String>) -> Self {
        self.since = Some(clock.into());
        self
    }

    pub fn relative_root(mut self, path: impl Into<String>) -> Self {
        self.relative_root = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeResponse {
    pub meta: ResponseMeta,
    /// Clock at which the subscription started.
    pub clock: String,
    /// Name the daemon registered the subscription under.
    pub subscription: String,
}

impl Request for Subscribe {
    type Response = SubscribeResponse;

    fn to_command(&self) -> Command {
        let mut command = Command::new("subscribe").arg(self.root.as_str()).arg(self.name.as_str());
        if let Some(since) = &self.since {
            command = command.option("since", since.as_str());
        }
        if let Some(relative_root) = &self.relative_root {
            command = command.option("relative_root", relative_root.as_str());
        }
        command.option("fields", self.fields.clone())
    }
}

impl Decode for SubscribeResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self {
            meta: ResponseMeta::decode(pdu)?,
            clock: pdu.str_or_default("clock")?,
            subscription: pdu.str_or_default("subscribe")?,
        })
    }
}
