// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable-width integer codec
//!
//! Journals use LEB128 varints: seven payload bits per byte, least
//! significant group first, with the high bit marking continuation. Signed
//! values are zig-zag mapped before encoding so small magnitudes of either
//! sign stay short.
//!
//! The decoders work over an in-memory slice (usually a peeked window of the
//! lookahead buffer) and report how many bytes they consumed, so callers can
//! decode several fields from one peek and discard them in one step.

use thiserror::Error;

/// Longest valid encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Errors from decoding a varint out of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarintError {
    /// The slice ended before a terminating byte was seen
    #[error("varint truncated")]
    Truncated,
    /// Ten bytes were consumed without a terminating byte
    #[error("varint exceeds {MAX_VARINT_LEN} bytes")]
    Overlong,
}

/// Decode an unsigned varint from the start of `buf`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode_unsigned(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    // Single-byte values dominate real journals
    if let Some(&first) = buf.first() {
        if first < 0x80 {
            return Ok((u64::from(first), 1));
        }
    }

    let mut value = 0u64;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte < 0x80 {
            return Ok((value, i + 1));
        }
    }

    if buf.len() >= MAX_VARINT_LEN {
        Err(VarintError::Overlong)
    } else {
        Err(VarintError::Truncated)
    }
}

/// Decode a zig-zag signed varint from the start of `buf`.
pub fn decode_signed(buf: &[u8]) -> Result<(i64, usize), VarintError> {
    let (raw, len) = decode_unsigned(buf)?;
    Ok((unzigzag(raw), len))
}

/// Append the varint encoding of `value` to `out`, returning its length.
pub fn encode_unsigned(mut value: u64, out: &mut Vec<u8>) -> usize {
    let start = out.len();
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    out.len() - start
}

/// Append the zig-zag varint encoding of `value` to `out`, returning its length.
pub fn encode_signed(value: i64, out: &mut Vec<u8>) -> usize {
    encode_unsigned(zigzag(value), out)
}

/// Number of bytes `value` occupies when encoded.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

fn unzigzag(raw: u64) -> i64 {
    let value = (raw >> 1) as i64;
    if raw & 1 != 0 {
        !value
    } else {
        value
    }
}

#[cfg(test)]
#[path = "varint_tests.rs"]
mod tests;
