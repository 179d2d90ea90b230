// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline framing over a byte stream.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{Command, WireError};

/// Splits a byte stream into `\n`-terminated frames and writes commands as
/// single JSON lines.
///
/// Decoded frames are the raw bytes between newlines with the newline
/// stripped; parsing them is left to [`parse_frame`](crate::parse_frame) so a
/// malformed line can be reported to whoever is waiting for it.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Bytes already scanned for a newline in the pending buffer.
    scanned: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = WireError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, WireError> {
        match buf[self.scanned..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = self.scanned + offset;
                self.scanned = 0;
                let mut line = buf.split_to(end + 1);
                line.truncate(end);
                Ok(Some(line.freeze()))
            }
            None => {
                self.scanned = buf.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, WireError> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        Err(WireError::Transport(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stream closed with {} bytes of an unterminated frame", buf.len()),
        )))
    }
}

impl Encoder<Command> for LineCodec {
    type Error = WireError;

    fn encode(&mut self, command: Command, buf: &mut BytesMut) -> Result<(), WireError> {
        let line = serde_json::to_vec(&command).map_err(WireError::Encode)?;
        buf.reserve(line.len() + 1);
        buf.extend_from_slice(&line);
        buf.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
