// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wm-client: async client for the file-watching daemon.
//!
//! One [`Session`] task owns the socket and pairs each command with its
//! reply while routing unilateral pushes to a separate stream.
//! [`Connection`] adds the capability handshake and typed requests;
//! [`Client`] adds watches, subscriptions and filtered notifications.

mod client;
mod connection;
pub mod dial;
pub mod env;
mod error;
mod session;
pub mod sockname;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{Client, Notifications, Subscription, Watch};
pub use connection::{ConnectOptions, Connection, Metadata};
pub use error::Error;
pub use session::{Session, Unilaterals};
