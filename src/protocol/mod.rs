//! # Protocol Identification
//!
//! Version-scoped mapping between logical packet names and numeric wire ids.
//!
//! The same numeric id can mean different packets depending on protocol
//! version, connection mode, and traffic direction, so every lookup is keyed
//! by the full [`RegistryKey`]. The mapping data comes from a CSV catalog
//! loaded once at startup ([`catalog`]); afterwards the registry is
//! read-only and safely shared across sessions.
//!
//! ## Components
//! - **Catalog**: CSV parsing into the registry tables
//! - **Registry**: version-aware id↔name lookup
//! - **Dispatcher**: logical packet name → interception handler

pub mod catalog;
pub mod dispatcher;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Numeric wire identifier of a packet. Version-dependent; resolved through
/// the registry.
pub type PacketId = i32;

/// An ordered integer identifying a protocol revision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ProtocolVersion(pub i32);

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection phase of a session. Scopes id/name uniqueness: the same id may
/// denote different packets in different modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    Handshake,
    Status,
    Login,
    Play,
}

impl ConnectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionMode::Handshake => "handshake",
            ConnectionMode::Status => "status",
            ConnectionMode::Login => "login",
            ConnectionMode::Play => "play",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "init" is the legacy spelling of the handshake phase still found
        // in older catalog exports.
        match s {
            "handshake" | "init" => Ok(ConnectionMode::Handshake),
            "status" => Ok(ConnectionMode::Status),
            "login" => Ok(ConnectionMode::Login),
            "play" => Ok(ConnectionMode::Play),
            other => Err(BridgeError::DataFormat(format!(
                "unknown connection mode: {other:?}"
            ))),
        }
    }
}

/// Which endpoint originates a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client → server.
    Upstream,
    /// Server → client.
    Downstream,
}

impl Direction {
    /// The opposite side.
    pub fn flip(self) -> Self {
        match self {
            Direction::Upstream => Direction::Downstream,
            Direction::Downstream => Direction::Upstream,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upstream" | "serverbound" => Ok(Direction::Upstream),
            "downstream" | "clientbound" => Ok(Direction::Downstream),
            other => Err(BridgeError::DataFormat(format!(
                "unknown direction: {other:?}"
            ))),
        }
    }
}

/// Full scope of an id/name mapping: the id↔name tables are inverse
/// functions only within one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    pub version: ProtocolVersion,
    pub mode: ConnectionMode,
    pub direction: Direction,
}

impl RegistryKey {
    pub fn new(version: ProtocolVersion, mode: ConnectionMode, direction: Direction) -> Self {
        Self {
            version,
            mode,
            direction,
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}/{}/{}", self.version, self.mode, self.direction)
    }
}
