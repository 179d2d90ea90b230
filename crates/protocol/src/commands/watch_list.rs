// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `watch-list`
//!
//! ```text
//! ["watch-list"]
//! {"version":"4.9.0","roots":["/home/user/src"]}
//! ```

use wm_wire::{Command, DecodeError, Fields, Pdu};

use super::{Decode, Request, ResponseMeta};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchList;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchListResponse {
    pub meta: ResponseMeta,
    pub roots: Vec<String>,
}

impl Request for WatchList {
    type Response = WatchListResponse;

    fn to_command(&self) -> Command {
        Command::new("watch-list")
    }
}

impl Decode for WatchListResponse {
    fn decode(pdu: &Pdu) -> Result<Self, DecodeError> {
        Ok(Self { meta: ResponseMeta::decode(pdu)?, roots: pdu.strings("roots")? })
    }
}
