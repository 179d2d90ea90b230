// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `list-capabilities`
//!
//! ```text
//! ["list-capabilities"]
//! {"version":"4.9.0","capabilities":["cmd-clock","cmd-subscribe","relative_root"]}
//! ```

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCapabilities;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCapabilitiesResponse {
    pub meta: ResponseMeta,
    pub capabilities: Vec<String>,
}

impl Request for ListCapabilities {
    type Response = ListCapabilitiesResponse;

    fn to_command(&self) -> Command {
        Command::new("list-capabilities")
    }
}

impl Decode for ListCapabilitiesResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self { meta: ResponseMeta::decode(pdu)?, capabilities: pdu.strings("capabilities")? })
    }
}
