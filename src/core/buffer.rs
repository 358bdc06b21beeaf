//! # Interception Buffer
//!
//! A peekable, restartable cursor over one in-flight message payload.
//!
//! A handler that wants to look at a message before deciding its fate saves
//! a mark, reads ahead, and then either restores to the mark and forwards
//! the original bytes untouched, or keeps the consumed position and
//! re-encodes replacement bytes. The mark is a single slot: the most recent
//! [`PacketBuffer::save`] wins.
//!
//! The buffer never owns or re-parses header framing; it operates strictly
//! on the payload body already demarcated by the transport layer.

use bytes::Bytes;

use crate::core::wire;
use crate::error::{constants, BridgeError, Result};

/// Cursor with an optional saved mark over one payload.
#[derive(Debug, Clone)]
pub struct PacketBuffer {
    data: Bytes,
    pos: usize,
    mark: Option<usize>,
}

impl PacketBuffer {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pos: 0,
            mark: None,
        }
    }

    /// Record the current cursor position as the mark, discarding any
    /// previous mark.
    pub fn save(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Move the cursor back to the saved mark.
    pub fn restore(&mut self) -> Result<()> {
        match self.mark {
            Some(mark) => {
                self.pos = mark;
                Ok(())
            }
            None => Err(BridgeError::IllegalState(constants::ERR_NO_MARK)),
        }
    }

    /// Apply a decode operation at the cursor, advancing past the bytes it
    /// consumed. On error the cursor is left wherever the decoder stopped;
    /// callers that want the pre-read position back use [`save`]/[`restore`].
    ///
    /// [`save`]: PacketBuffer::save
    /// [`restore`]: PacketBuffer::restore
    pub fn read_with<T, F>(&mut self, decode: F) -> Result<T>
    where
        F: FnOnce(&mut &[u8]) -> Result<T>,
    {
        let mut slice = &self.data[self.pos..];
        let before = slice.len();
        let result = decode(&mut slice);
        self.pos += before - slice.len();
        result
    }

    /// Decode a varint at the cursor.
    pub fn read_varint(&mut self) -> Result<i32> {
        self.read_with(|buf| wire::read_varint(buf))
    }

    /// Decode a length-prefixed string at the cursor.
    pub fn read_string(&mut self) -> Result<String> {
        self.read_with(|buf| wire::read_string(buf))
    }

    /// Decode a single byte at the cursor.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_with(|buf| wire::read_u8(buf))
    }

    /// All bytes from the cursor to the end of the payload, without moving
    /// the cursor. Used to forward the untouched remainder.
    pub fn remaining_raw(&self) -> Bytes {
        self.data.slice(self.pos..)
    }

    /// Bytes left between the cursor and the end of the payload.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
