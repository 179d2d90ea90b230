// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wm-protocol: typed commands and notifications for the file-watching daemon.
//!
//! Each command knows how to build its [`Command`](wm_wire::Command) and how to
//! decode the reply [`Pdu`](wm_wire::Pdu) into a typed response. Unilateral
//! pushes decode into [`Notification`].

pub mod change;
pub mod commands;
pub mod notification;

pub use change::{ChangeNotification, FileChange, FileType, StateChange};
pub use commands::{
    Clock, ClockResponse, Decode, ListCapabilities, ListCapabilitiesResponse, LogLevel,
    LogLevelResponse, Request, ResponseMeta, SetLogLevel, Subscribe, SubscribeResponse,
    Unsubscribe, UnsubscribeResponse, WatchDel, WatchDelResponse, WatchList, WatchListResponse,
    WatchProject, WatchProjectResponse, DEFAULT_SUBSCRIBE_FIELDS,
};
pub use notification::Notification;
