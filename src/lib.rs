//! # packet-bridge
//!
//! Version-aware packet interception bridge for binary game protocols.
//!
//! The bridge sits between a game client and a game server, inspecting
//! individual protocol messages and deciding per message whether to pass it
//! through untouched, rewrite it, or suppress it, without disturbing the
//! rest of the session.
//!
//! ## Architecture
//! - [`protocol`]: the packet registry, an id↔name mapping keyed by
//!   protocol version, connection mode, and traffic direction, loaded from
//!   a CSV catalog at startup.
//! - [`core`]: payload-level machinery: wire primitives, the mark/restore
//!   interception buffer, and the version-gated chat codec.
//! - [`bridge`]: per-session interception pipeline and the quiet-mode chat
//!   filter.
//! - [`transport`]: frame codec and the TCP relay that pumps both directions
//!   of a session.
//!
//! ## Guarantees
//! - Pass-through is byte-exact: anything not explicitly rewritten or
//!   dropped is forwarded as the original raw bytes.
//! - Registry lookups are exact: a version with no record for an id fails
//!   with [`BridgeError::NotFound`] instead of guessing from a neighboring
//!   version.
//! - Unparseable payloads fall back to raw forwarding, preserving session
//!   continuity.

pub mod bridge;
pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use error::{BridgeError, Result};
