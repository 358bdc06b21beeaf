//! # Error Types
//!
//! Error handling for the packet bridge.
//!
//! This module defines all error variants that can occur while running the
//! bridge, from catalog loading failures to per-message decode problems.
//!
//! ## Error Categories
//! - **Load-time errors**: malformed catalog data, bad configuration;
//!   these abort startup.
//! - **Lookup errors**: an id/name/version absent from the registry; local
//!   to the call, the caller decides whether to skip or pass through.
//! - **Decode errors**: a payload read past its declared bounds; the
//!   handler must fall back to raw forwarding instead of guessing.
//! - **Programming errors**: buffer misuse such as restoring without a mark.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Error message constants shared between the buffer and its callers.
pub mod constants {
    /// Restore was called on a buffer that has no saved mark.
    pub const ERR_NO_MARK: &str = "restore called without a saved mark";
}

/// BridgeError is the primary error type for all bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A catalog row or wire value did not match the expected shape.
    /// Fatal when raised at load time.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Registry lookup miss. Never silently substituted with a value from
    /// a neighboring protocol version.
    #[error("not found: {0}")]
    NotFound(String),

    /// Buffer misuse. Treated as a programming error, not a wire problem.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    /// A decode operation would read past the declared payload length.
    #[error("truncated payload: needed {needed} more bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A frame claimed a length beyond the configured maximum.
    #[error("frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Type alias for Results using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
