// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decode errors
//!
//! Every error is fatal for the journal being decoded. The decoder keeps no
//! resynchronization state, so callers that want to continue should move on
//! to the next independent journal.

use crate::varint::VarintError;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while decoding a journal stream
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: u64,
        needed: usize,
        available: usize,
    },
    #[error("malformed varint at offset {offset}")]
    MalformedVarint { offset: u64 },
    #[error("unknown opcode 0x{opcode:02x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: u64 },
    #[error("opcode 0x{opcode:02x} at offset {offset} has no known record layout")]
    UnsupportedOpcode { opcode: u8, offset: u64 },
    #[error("metadata key 0x{key:x} at offset {offset} uses unused type slot {slot}")]
    UnusedMetadataType { key: u64, slot: u8, offset: u64 },
    #[error("record ends at offset {end} but reader is already at {position}")]
    RecordOverrun { end: u64, position: u64 },
    #[error("invalid {table} reference: index {index} with {len} entries")]
    InvalidStateReference {
        table: &'static str,
        index: u64,
        len: usize,
    },
    /// Shared so the decoder can keep the error it returned
    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(Arc::new(err))
    }
}

impl DecodeError {
    /// Map a varint failure inside a peeked window to a stream error.
    ///
    /// `offset` is the absolute position of the varint's first byte and
    /// `available` the number of bytes the window still held from there.
    pub fn from_varint(err: VarintError, offset: u64, available: usize) -> Self {
        match err {
            VarintError::Truncated => DecodeError::TruncatedInput {
                offset,
                needed: available + 1,
                available,
            },
            VarintError::Overlong => DecodeError::MalformedVarint { offset },
        }
    }

    /// True for errors caused by the stream ending early
    pub fn is_truncation(&self) -> bool {
        match self {
            DecodeError::TruncatedInput { .. } => true,
            DecodeError::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
