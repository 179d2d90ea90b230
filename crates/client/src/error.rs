// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io;
use std::time::Duration;

use thiserror::Error;
use wm_wire::{DecodeError, WireError};

/// Errors surfaced by the session, connection and client.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket read, write or dial failure.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The daemon sent a line that is not a JSON object.
    #[error("malformed frame {line:?}: {source}")]
    MalformedFrame {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// The command could not be serialized; nothing was written.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),

    /// The daemon rejected the command.
    #[error("daemon error: {message}")]
    Command { message: String },

    /// Capability negotiation failed while connecting.
    #[error("handshake failed: {0}")]
    Handshake(#[source] Box<Error>),

    /// A reply field had the wrong JSON type.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The session has shut down.
    #[error("connection closed")]
    Closed,

    /// No reply within the configured command timeout.
    #[error("no reply after {0:?}")]
    Timeout(Duration),

    /// The daemon socket could not be located.
    #[error("socket discovery failed: {0}")]
    Discovery(String),
}

impl Error {
    /// Whether the connection is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Transport(_)
            | Error::MalformedFrame { .. }
            | Error::Handshake(_)
            | Error::Closed
            | Error::Discovery(_) => true,
            Error::Encode(_) | Error::Command { .. } | Error::Decode(_) | Error::Timeout(_) => false,
        }
    }
}

impl From<WireError> for Error {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Transport(err) => Error::Transport(err),
            WireError::MalformedFrame { line, source } => Error::MalformedFrame { line, source },
            WireError::Encode(err) => Error::Encode(err),
        }
    }
}
