//! # Versioned Chat Codec
//!
//! The chat field is framed differently per direction and protocol version:
//!
//! - Upstream, any version: a single length-prefixed string.
//! - Downstream, up to [`LAST_UNPOSITIONED_VERSION`]: a length-prefixed
//!   string with no trailing byte; placement is implicitly the chat box.
//!   The string may itself be a structured-text encoding, which is opaque
//!   to this layer.
//! - Downstream, later versions: the string followed by one placement byte
//!   (0 = chat box, 1 = system message, 2 = action bar). Only placements
//!   0 and 1 are chat-like; any other placement decodes to `None`, telling
//!   the caller to pass the message through unexamined.
//!
//! There is no intermediate format: the version comparison against the
//! fixed threshold is the entire gate.

use bytes::{Bytes, BytesMut};

use crate::core::buffer::PacketBuffer;
use crate::core::wire;
use crate::error::Result;
use crate::protocol::{Direction, ProtocolVersion};

/// Last protocol revision whose downstream chat frame carries no placement
/// byte.
pub const LAST_UNPOSITIONED_VERSION: ProtocolVersion = ProtocolVersion(5);

/// Placement byte for the regular chat box. Synthesized messages always use
/// this placement.
pub const PLACEMENT_CHAT_BOX: u8 = 0;

/// Placement byte for a system message, still rendered in the chat area.
pub const PLACEMENT_SYSTEM: u8 = 1;

/// Decode the chat text at the buffer's cursor.
///
/// Returns `Ok(None)` when the message is valid but not chat-like (a
/// downstream placement other than chat box or system message); the caller
/// should forward it untouched.
pub fn read_chat(
    buf: &mut PacketBuffer,
    direction: Direction,
    version: ProtocolVersion,
) -> Result<Option<String>> {
    let text = buf.read_string()?;

    if direction == Direction::Downstream && version > LAST_UNPOSITIONED_VERSION {
        let placement = buf.read_u8()?;
        if placement != PLACEMENT_CHAT_BOX && placement != PLACEMENT_SYSTEM {
            return Ok(None);
        }
    }

    Ok(Some(text))
}

/// Encode chat text for the given direction and version.
///
/// Downstream encodes above the threshold always append placement byte 0;
/// messages synthesized by the interception layer belong in the chat box.
pub fn write_chat(text: &str, direction: Direction, version: ProtocolVersion) -> Bytes {
    let mut buf = BytesMut::with_capacity(wire::varint_len(text.len() as i32) + text.len() + 1);
    wire::write_string(&mut buf, text);

    if direction == Direction::Downstream && version > LAST_UNPOSITIONED_VERSION {
        buf.extend_from_slice(&[PLACEMENT_CHAT_BOX]);
    }

    buf.freeze()
}
