//! # Bridge Session
//!
//! The per-session dispatch point the transport hands packets to.
//!
//! A session owns its handler state exclusively. Both direction pumps of a
//! session feed the same [`BridgeSession`], so a toggle flipped by one
//! direction is visible to decisions on the other direction's subsequent
//! messages. The registry reference is shared read-only across sessions.

use std::sync::Arc;

use bytes::Bytes;

use crate::bridge::chat_filter::ChatFilter;
use crate::bridge::Delivery;
use crate::core::buffer::PacketBuffer;
use crate::error::Result;
use crate::protocol::dispatcher::{Dispatcher, HandlerKind};
use crate::protocol::registry::PacketRegistry;
use crate::protocol::{ConnectionMode, Direction, ProtocolVersion};

/// One fully-buffered message as delivered by the transport boundary, with
/// its identity already resolved.
#[derive(Debug, Clone)]
pub struct InboundPacket {
    pub mode: ConnectionMode,
    pub direction: Direction,
    /// Logical packet name resolved through the registry.
    pub name: String,
    /// Payload body, without header framing.
    pub payload: Bytes,
}

/// Per-session interception pipeline.
pub struct BridgeSession {
    registry: Arc<PacketRegistry>,
    dispatcher: Dispatcher,
    version: ProtocolVersion,
    chat: ChatFilter,
}

impl BridgeSession {
    /// A new session starting at `version` (typically the registry default
    /// until the handshake announces the real one).
    pub fn new(registry: Arc<PacketRegistry>, version: ProtocolVersion) -> Self {
        Self {
            registry,
            dispatcher: Dispatcher::with_defaults(),
            version,
            chat: ChatFilter::new(),
        }
    }

    /// The session's negotiated protocol version.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Adopt the protocol version announced during the handshake.
    pub fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }

    pub fn registry(&self) -> &Arc<PacketRegistry> {
        &self.registry
    }

    /// Run one packet through the pipeline and return what the transport
    /// should send. Packets with no registered handler forward raw along
    /// their original direction.
    pub fn handle(&mut self, packet: InboundPacket) -> Result<Vec<Delivery>> {
        match self.dispatcher.resolve(&packet.name) {
            None => Ok(vec![Delivery {
                direction: packet.direction,
                name: packet.name.into(),
                payload: packet.payload,
            }]),
            Some(HandlerKind::Chat) => {
                let mut buf = PacketBuffer::new(packet.payload);
                match packet.direction {
                    Direction::Upstream => self.chat.on_upstream_chat(&mut buf, self.version),
                    Direction::Downstream => self.chat.on_downstream_chat(&mut buf, self.version),
                }
            }
        }
    }
}
