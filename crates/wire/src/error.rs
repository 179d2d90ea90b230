// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io;

use thiserror::Error;

/// Errors raised while moving frames on or off the wire.
#[derive(Debug, Error)]
pub enum WireError {
    /// The underlying stream failed to read or write.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// A line was not a JSON object.
    #[error("malformed frame {line:?}: {source}")]
    MalformedFrame {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// A command could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),
}
