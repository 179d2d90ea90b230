// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire layer for the file-watching daemon protocol.
//!
//! Wire format: one JSON value per line, terminated by `\n`. Requests are
//! JSON arrays (`[verb, arg1, ..., {options}]`); responses are JSON objects.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod command;
mod decode;
mod error;
mod frame;

pub use codec::LineCodec;
pub use command::{Command, Options};
pub use decode::{DecodeError, Fields, JsonKind};
pub use error::WireError;
pub use frame::{classify, parse_frame, CommandFailure, Frame, Inbound, Pdu};

#[cfg(test)]
mod property_tests;
