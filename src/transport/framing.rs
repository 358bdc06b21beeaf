//! # Frame Codec
//!
//! Splits the TCP byte stream into protocol frames and writes frames back
//! out.
//!
//! ## Wire Format
//! ```text
//! [Length(varint)] [PacketId(varint)] [Payload(N)]
//! ```
//! `Length` counts the id and payload bytes together. The decoder validates
//! the claimed length against a maximum before allocating, and leaves
//! partial frames in the read buffer until enough bytes arrive.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::MAX_FRAME_SIZE;
use crate::core::wire;
use crate::error::{BridgeError, Result};
use crate::protocol::PacketId;

/// One framed protocol message: numeric id plus payload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: PacketId,
    pub body: Bytes,
}

/// Length-prefixed frame codec for [`tokio_util::codec::Framed`].
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = BridgeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        let mut peek = &src[..];
        let length = match wire::read_varint(&mut peek) {
            Ok(length) => length,
            // Length prefix itself not complete yet.
            Err(BridgeError::Truncated { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        if length < 0 {
            return Err(BridgeError::DataFormat(format!(
                "negative frame length {length}"
            )));
        }
        let length = length as usize;
        if length > self.max_frame_size {
            return Err(BridgeError::OversizedFrame(length));
        }
        if peek.len() < length {
            src.reserve(length - peek.len());
            return Ok(None);
        }

        let prefix_len = src.len() - peek.len();
        src.advance(prefix_len);
        let frame = src.split_to(length).freeze();

        let mut rest = &frame[..];
        let id = wire::read_varint(&mut rest)
            .map_err(|_| BridgeError::DataFormat("frame missing packet id".into()))?;
        let body = frame.slice(frame.len() - rest.len()..);

        Ok(Some(Frame { id, body }))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = BridgeError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        let length = wire::varint_len(frame.id) + frame.body.len();
        if length > self.max_frame_size {
            return Err(BridgeError::OversizedFrame(length));
        }

        dst.reserve(wire::varint_len(length as i32) + length);
        wire::write_varint(dst, length as i32);
        wire::write_varint(dst, frame.id);
        dst.extend_from_slice(&frame.body);
        Ok(())
    }
}
