//! # Wire Primitives
//!
//! Varint and length-prefixed string encoding over [`bytes::Buf`] /
//! [`bytes::BufMut`].
//!
//! Integers use the protocol's 7-bit little-endian varint form: seven value
//! bits per byte, high bit set on every byte except the last, at most five
//! bytes for 32 bits. Strings are UTF-8 preceded by their byte length as a
//! varint.
//!
//! Every read checks the remaining payload first and fails with
//! [`BridgeError::Truncated`] instead of reading past the declared bounds.

use bytes::{Buf, BufMut};

use crate::error::{BridgeError, Result};

/// Maximum encoded size of a 32-bit varint.
pub const VARINT_MAX_BYTES: usize = 5;

/// Upper bound on a length-prefixed string's byte length. Anything larger
/// is treated as a malformed payload rather than allocated.
pub const MAX_STRING_LEN: usize = 64 * 1024;

/// Decode a 32-bit varint from the front of `buf`.
pub fn read_varint(buf: &mut impl Buf) -> Result<i32> {
    let mut value: u32 = 0;
    for i in 0..VARINT_MAX_BYTES {
        if !buf.has_remaining() {
            return Err(BridgeError::Truncated {
                needed: 1,
                available: 0,
            });
        }
        let byte = buf.get_u8();
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(BridgeError::DataFormat(format!(
        "varint longer than {VARINT_MAX_BYTES} bytes"
    )))
}

/// Encode `value` as a varint onto `buf`.
pub fn write_varint(buf: &mut impl BufMut, value: i32) {
    let mut value = value as u32;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

/// Encoded size of `value` as a varint, without encoding it.
pub fn varint_len(value: i32) -> usize {
    let mut value = value as u32;
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Decode a varint-length-prefixed UTF-8 string.
pub fn read_string(buf: &mut impl Buf) -> Result<String> {
    let len = read_varint(buf)?;
    if len < 0 {
        return Err(BridgeError::DataFormat(format!(
            "negative string length {len}"
        )));
    }
    let len = len as usize;
    if len > MAX_STRING_LEN {
        return Err(BridgeError::DataFormat(format!(
            "string length {len} exceeds limit {MAX_STRING_LEN}"
        )));
    }
    if buf.remaining() < len {
        return Err(BridgeError::Truncated {
            needed: len - buf.remaining(),
            available: buf.remaining(),
        });
    }
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec())
        .map_err(|e| BridgeError::DataFormat(format!("invalid UTF-8 in string: {e}")))
}

/// Encode `text` as a varint-length-prefixed UTF-8 string onto `buf`.
pub fn write_string(buf: &mut impl BufMut, text: &str) {
    write_varint(buf, text.len() as i32);
    buf.put_slice(text.as_bytes());
}

/// Read a single unsigned byte.
pub fn read_u8(buf: &mut impl Buf) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(BridgeError::Truncated {
            needed: 1,
            available: 0,
        });
    }
    Ok(buf.get_u8())
}

/// Read a big-endian unsigned 16-bit integer.
pub fn read_u16(buf: &mut impl Buf) -> Result<u16> {
    if buf.remaining() < 2 {
        return Err(BridgeError::Truncated {
            needed: 2 - buf.remaining(),
            available: buf.remaining(),
        });
    }
    Ok(buf.get_u16())
}
