// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `unsubscribe`
//!
//! ```text
//! ["unsubscribe","/tmp","sub1"]
//! {"unsubscribe":"sub1","deleted":true,"version":"4.9.0"}
//! ```

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    pub root: String,
    pub name: String,
}

impl Unsubscribe {
    pub fn new(root: impl Into<String>, name: impl Into<String>) -> Self {
        Self { root: root.into(), name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsubscribeResponse {
    pub meta: ResponseMeta,
    pub subscription: String,
    /// False when the daemon had no such subscription.
    pub deleted: bool,
}

impl Request for Unsubscribe {
    type Response = UnsubscribeResponse;

    fn to_command(&self) -> Command {
        Command::new("unsubscribe").arg(self.root.as_str()).arg(self.name.as_str())
    }
}

impl Decode for UnsubscribeResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self {
            meta: ResponseMeta::decode(pdu)?,
            subscription: pdu.str_or_default("unsubscribe")?,
            deleted: pdu.bool_or("deleted", false)?,
        })
    }
}
