//! # Interception Pipeline
//!
//! Per-session packet interception: dispatch by logical packet name, run
//! the matching handler over the payload, and hand the resulting
//! deliveries back to the transport boundary.
//!
//! A handler decides one of three fates for a message: forward the original
//! raw bytes, emit freshly encoded bytes (possibly to the opposite side),
//! or suppress it entirely. The common pass-through case restores the
//! interception buffer to its pre-decode mark and replays the original
//! bytes, guaranteeing byte fidelity for anything not explicitly altered.
//!
//! One [`session::BridgeSession`] exists per active session; sessions are
//! independent and own their handler state exclusively.

pub mod chat_filter;
pub mod session;

use std::borrow::Cow;

use bytes::Bytes;

use crate::protocol::Direction;

/// Logical name of the chat packet in the catalog.
pub const CHAT_PACKET: &str = "chat_message";

/// One outbound unit handed back to the transport boundary.
///
/// The transport does not distinguish replayed raw bytes from fresh
/// encodes: both arrive as a payload to frame and send to one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Which way the bytes travel: [`Direction::Upstream`] sends to the
    /// server, [`Direction::Downstream`] to the client.
    pub direction: Direction,
    /// Logical packet name; the transport resolves it to a numeric id for
    /// the receiving side's version and mode.
    pub name: Cow<'static, str>,
    /// Payload body, without header framing.
    pub payload: Bytes,
}

impl Delivery {
    /// A delivery that replays `payload` unchanged along `direction`.
    pub fn raw(direction: Direction, name: impl Into<Cow<'static, str>>, payload: Bytes) -> Self {
        Self {
            direction,
            name: name.into(),
            payload,
        }
    }
}
