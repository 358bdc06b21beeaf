//! # Transport Layer
//!
//! Frame-level plumbing between the sockets and the interception pipeline.
//!
//! The transport owns everything the core explicitly does not: header
//! framing (length/id prefix), socket lifecycle, and the pump that feeds
//! fully-buffered payloads to the per-session pipeline and writes its
//! deliveries back out.
//!
//! ## Components
//! - **Framing**: `tokio_util` codec splitting the byte stream into
//!   `[length][id][payload]` frames
//! - **Relay**: TCP listener plus the per-session bidirectional pump

pub mod framing;
pub mod relay;
