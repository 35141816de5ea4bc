// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-event metadata entries
//!
//! Each entry starts with a varint key. The low nibble of the key (after an
//! opcode-dependent shift) selects a slot in a fixed type table, which says
//! how many signed varints follow. The remaining key bits are the field code.

use crate::error::DecodeError;
use crate::varint;

/// Worst-case encoded size of one entry: a key and three values.
pub const MAX_ENTRY_LEN: usize = 4 * varint::MAX_VARINT_LEN;

/// Value representation of a metadata entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    String,
    Float32,
    Float32Sigfigs,
    OffsetLength,
    Float32Precision,
    Float32SigfigsPrecision,
    Unsigned,
    Signed,
    Float64,
    Float64Sigfigs,
    OffsetLengthEncoding,
    Float64Precision,
    Float64SigfigsPrecision,
}

/// Type table indexed by the low nibble of a shifted key.
///
/// Slots 1, 5 and 13 are never written by the storage engine.
pub const METADATA_TYPES: [Option<MetadataKind>; 16] = [
    Some(MetadataKind::String),
    None,
    Some(MetadataKind::Float32),
    Some(MetadataKind::Float32Sigfigs),
    Some(MetadataKind::OffsetLength),
    None,
    Some(MetadataKind::Float32Precision),
    Some(MetadataKind::Float32SigfigsPrecision),
    Some(MetadataKind::Unsigned),
    Some(MetadataKind::Signed),
    Some(MetadataKind::Float64),
    Some(MetadataKind::Float64Sigfigs),
    Some(MetadataKind::OffsetLengthEncoding),
    None,
    Some(MetadataKind::Float64Precision),
    Some(MetadataKind::Float64SigfigsPrecision),
];

impl MetadataKind {
    /// Look up the kind for a combined (already shifted) key
    pub fn from_key(key: u64) -> Option<Self> {
        METADATA_TYPES[(key & 0xf) as usize]
    }

    /// Representation code as stored in the type table
    pub const fn representation(self) -> u8 {
        match self {
            MetadataKind::String => 0,
            MetadataKind::Float32 => 2,
            MetadataKind::Float32Sigfigs => 3,
            MetadataKind::OffsetLength => 4,
            MetadataKind::Float32Precision => 6,
            MetadataKind::Float32SigfigsPrecision => 7,
            MetadataKind::Unsigned => 8,
            MetadataKind::Signed => 9,
            MetadataKind::Float64 => 10,
            MetadataKind::Float64Sigfigs => 11,
            MetadataKind::OffsetLengthEncoding => 12,
            MetadataKind::Float64Precision => 14,
            MetadataKind::Float64SigfigsPrecision => 15,
        }
    }

    /// Number of signed varints that follow a key of this kind
    pub const fn extra_values(self) -> usize {
        match self {
            MetadataKind::Float64SigfigsPrecision => 0,
            MetadataKind::String
            | MetadataKind::Float32
            | MetadataKind::Unsigned
            | MetadataKind::Signed
            | MetadataKind::Float64 => 1,
            MetadataKind::Float32Sigfigs
            | MetadataKind::OffsetLength
            | MetadataKind::Float32Precision
            | MetadataKind::Float64Sigfigs
            | MetadataKind::Float64Precision => 2,
            MetadataKind::Float32SigfigsPrecision | MetadataKind::OffsetLengthEncoding => 3,
        }
    }

    pub const fn is_float(self) -> bool {
        self.representation() & 0x2 != 0
    }
}

/// One decoded metadata entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataEntry {
    key: u64,
    /// `None` for legacy entries, whose key is never looked up in the table
    kind: Option<MetadataKind>,
    values: [i64; 3],
    len: u8,
}

impl MetadataEntry {
    /// Combined key after the opcode-dependent shift
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Field code carried above the type nibble
    pub fn code(&self) -> u64 {
        self.key >> 4
    }

    /// Value kind from the type table.
    ///
    /// Legacy records (opcodes 1 and 2) carry exactly one value per entry and
    /// no type information, so their entries have no kind.
    pub fn kind(&self) -> Option<MetadataKind> {
        self.kind
    }

    pub fn values(&self) -> &[i64] {
        &self.values[..usize::from(self.len)]
    }
}

/// Decode one entry from the start of `buf`.
///
/// `offset` is the absolute stream position of `buf[0]`, used for error
/// reporting. Returns the entry and the number of bytes it occupied.
pub fn decode_entry(
    buf: &[u8],
    opcode: u8,
    offset: u64,
) -> Result<(MetadataEntry, usize), DecodeError> {
    let (raw, mut used) = varint::decode_unsigned(buf)
        .map_err(|e| DecodeError::from_varint(e, offset, buf.len()))?;

    let (key, kind, count) = if opcode <= 2 {
        // Legacy records always carry exactly one value
        (raw << 3, None, 1)
    } else {
        let key = if opcode < 36 { raw << 2 } else { raw };
        let kind = MetadataKind::from_key(key).ok_or(DecodeError::UnusedMetadataType {
            key,
            slot: (key & 0xf) as u8,
            offset,
        })?;
        (key, Some(kind), kind.extra_values())
    };

    let mut values = [0i64; 3];
    for value in values.iter_mut().take(count) {
        let rest = &buf[used..];
        let (v, n) = varint::decode_signed(rest)
            .map_err(|e| DecodeError::from_varint(e, offset + used as u64, rest.len()))?;
        *value = v;
        used += n;
    }

    let entry = MetadataEntry {
        key,
        kind,
        values,
        len: count as u8,
    };
    Ok((entry, used))
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
