//! # Quiet-Mode Chat Filter
//!
//! Stateful chat interception: a client can toggle "quiet mode" with a
//! chat command, after which its outgoing chat is rejected locally and
//! incoming rendered chat lines are dropped.
//!
//! Decoding is speculative: the buffer is marked before reading, and the
//! common pass-through case restores to the mark and forwards the original
//! raw bytes. Only synthesized or dropped messages ever leave the raw
//! path. A payload that cannot be decoded is forwarded raw as well; the
//! filter never guesses at a message it cannot read.

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::bridge::{Delivery, CHAT_PACKET};
use crate::core::buffer::PacketBuffer;
use crate::core::chat;
use crate::error::{BridgeError, Result};
use crate::protocol::{Direction, ProtocolVersion};

/// Chat command that toggles quiet mode. The triggering message is consumed
/// and never reaches the server.
pub const QUIET_COMMAND: &str = "/quiet";

/// Per-session toggle state plus the decision logic driven by it.
///
/// Owned exclusively by one session's pipeline; the flag starts off and
/// flips only when the trigger command is seen.
#[derive(Debug, Default)]
pub struct ChatFilter {
    quiet_mode: bool,
}

/// Outcome of a speculative decode: either the text, or the original bytes
/// to replay because the payload was not examinable.
enum Decoded {
    Text(String),
    PassThrough(Bytes),
}

impl ChatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether quiet mode is currently on.
    pub fn quiet_mode(&self) -> bool {
        self.quiet_mode
    }

    /// Handle one upstream (client → server) chat payload.
    pub fn on_upstream_chat(
        &mut self,
        buf: &mut PacketBuffer,
        version: ProtocolVersion,
    ) -> Result<Vec<Delivery>> {
        let text = match self.decode(buf, Direction::Upstream, version)? {
            Decoded::Text(text) => text,
            Decoded::PassThrough(raw) => {
                return Ok(vec![Delivery::raw(Direction::Upstream, CHAT_PACKET, raw)])
            }
        };
        info!(text = %text, "client chat");

        if text.starts_with(QUIET_COMMAND) {
            self.quiet_mode = !self.quiet_mode;
            let state = if self.quiet_mode { "enabled" } else { "disabled" };
            return Ok(vec![self.synthesize(format!("Quiet mode {state}"), version)]);
        }

        if self.quiet_mode && !text.starts_with('/') {
            return Ok(vec![self.synthesize(
                "Can't send messages while in quiet mode".into(),
                version,
            )]);
        }

        buf.restore()?;
        Ok(vec![Delivery::raw(
            Direction::Upstream,
            CHAT_PACKET,
            buf.remaining_raw(),
        )])
    }

    /// Handle one downstream (server → client) chat payload.
    pub fn on_downstream_chat(
        &mut self,
        buf: &mut PacketBuffer,
        version: ProtocolVersion,
    ) -> Result<Vec<Delivery>> {
        let text = match self.decode(buf, Direction::Downstream, version)? {
            Decoded::Text(text) => text,
            Decoded::PassThrough(raw) => {
                return Ok(vec![Delivery::raw(Direction::Downstream, CHAT_PACKET, raw)])
            }
        };
        debug!(text = %text, "server chat");

        // Heuristic: a leading angle bracket marks a rendered player chat
        // line. Nothing at this layer distinguishes chat-origin messages
        // authoritatively, so this stays a presentation-layer guess.
        if self.quiet_mode && text.starts_with('<') {
            debug!("dropping chat line while quiet");
            return Ok(Vec::new());
        }

        buf.restore()?;
        Ok(vec![Delivery::raw(
            Direction::Downstream,
            CHAT_PACKET,
            buf.remaining_raw(),
        )])
    }

    /// Mark the buffer and decode the chat field. Truncated or not-chat-like
    /// payloads restore the mark and yield the original bytes instead.
    fn decode(
        &self,
        buf: &mut PacketBuffer,
        direction: Direction,
        version: ProtocolVersion,
    ) -> Result<Decoded> {
        buf.save();
        match chat::read_chat(buf, direction, version) {
            Ok(Some(text)) => Ok(Decoded::Text(text)),
            Ok(None) => {
                buf.restore()?;
                Ok(Decoded::PassThrough(buf.remaining_raw()))
            }
            Err(BridgeError::Truncated { needed, available }) => {
                warn!(needed, available, %direction, "unparseable chat payload, forwarding raw");
                buf.restore()?;
                Ok(Decoded::PassThrough(buf.remaining_raw()))
            }
            Err(e) => Err(e),
        }
    }

    fn synthesize(&self, text: String, version: ProtocolVersion) -> Delivery {
        Delivery {
            direction: Direction::Downstream,
            name: CHAT_PACKET.into(),
            payload: chat::write_chat(&text, Direction::Downstream, version),
        }
    }
}
