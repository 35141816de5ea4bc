// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record decoders
//!
//! One routine per record kind. Multi-field records peek a window large
//! enough for their worst case, decode every field out of that slice, and
//! then discard exactly the bytes they used.

use crate::event::{Event, HASH_LEN};
use crate::opcode::{
    classify, has_extended_storage, has_hash, includes_punctuation, RecordKind, StringTable,
    ACTIVE_BASE_TIME, ACTIVE_HOST, ACTIVE_SOURCE, ACTIVE_SOURCE_TYPE,
};
use crate::state::{ActiveStateUpdate, DecoderState, Header};
use jrnl_core::metadata::{self, MAX_ENTRY_LEN};
use jrnl_core::varint::{self, MAX_VARINT_LEN};
use jrnl_core::{DecodeError, Lookahead, MetadataEntry, MetadataMode};
use std::io::Read;

/// Worst case for the fixed part of an event: seven varints, the hash and
/// the stream id.
pub const EVENT_PREFIX_MAX: usize = 7 * MAX_VARINT_LEN + HASH_LEN + 8;

/// Worst case for a set-active-state record: three indices and a base time.
pub const ACTIVE_STATE_MAX: usize = 3 * MAX_VARINT_LEN + 4;

/// Sequential field reader over a peeked window
struct Fields<'a> {
    window: &'a [u8],
    used: usize,
    /// Stream position of `window[0]`
    base: u64,
}

impl<'a> Fields<'a> {
    fn new(window: &'a [u8], base: u64) -> Self {
        Self {
            window,
            used: 0,
            base,
        }
    }

    fn offset(&self) -> u64 {
        self.base + self.used as u64
    }

    fn rest(&self) -> &'a [u8] {
        &self.window[self.used..]
    }

    fn unsigned(&mut self) -> Result<u64, DecodeError> {
        let rest = self.rest();
        let (value, n) = varint::decode_unsigned(rest)
            .map_err(|e| DecodeError::from_varint(e, self.offset(), rest.len()))?;
        self.used += n;
        Ok(value)
    }

    fn signed(&mut self) -> Result<i64, DecodeError> {
        let rest = self.rest();
        let (value, n) = varint::decode_signed(rest)
            .map_err(|e| DecodeError::from_varint(e, self.offset(), rest.len()))?;
        self.used += n;
        Ok(value)
    }

    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let rest = self.rest();
        let bytes = rest
            .get(..N)
            .and_then(|b| <[u8; N]>::try_from(b).ok())
            .ok_or(DecodeError::TruncatedInput {
                offset: self.offset(),
                needed: N,
                available: rest.len(),
            })?;
        self.used += N;
        Ok(bytes)
    }

    fn used(&self) -> usize {
        self.used
    }
}

fn to_len(value: u64, offset: u64) -> Result<usize, DecodeError> {
    usize::try_from(value).map_err(|_| DecodeError::TruncatedInput {
        offset,
        needed: usize::MAX,
        available: 0,
    })
}

/// Decode the record whose opcode byte was read at `start`.
///
/// Returns the kind of record decoded. For events, `event` holds the result.
pub(crate) fn decode_record<R: Read>(
    reader: &mut Lookahead<R>,
    state: &mut DecoderState,
    event: &mut Event,
    mode: MetadataMode,
    opcode: u8,
    start: u64,
) -> Result<RecordKind, DecodeError> {
    let kind = classify(opcode).ok_or(DecodeError::UnknownOpcode {
        opcode,
        offset: start,
    })?;

    match kind {
        RecordKind::Nop => {}
        RecordKind::Event => {
            decode_event(reader, opcode, start, state.base_time(), mode, event)?;
        }
        RecordKind::NewString(table) => decode_string(reader, table, state)?,
        RecordKind::Delete => {
            tracing::debug!(offset = start, "skipping delete record");
        }
        RecordKind::Private => {
            let len = read_length(reader)?;
            reader.discard(len)?;
        }
        RecordKind::Header => {
            let header = decode_header(reader)?;
            tracing::debug!(
                version = header.version,
                align_bits = header.align_bits,
                base_index_time = header.base_index_time,
                "parsed journal header"
            );
            state.set_header(header);
        }
        RecordKind::HashSlice => {
            return Err(DecodeError::UnsupportedOpcode {
                opcode,
                offset: start,
            });
        }
        RecordKind::ActiveState => {
            let update = decode_active_state(reader, opcode)?;
            tracing::debug!(?update, "active state changed");
            state.apply(&update);
        }
    }

    Ok(kind)
}

/// Read a varint length prefix
fn read_length<R: Read>(reader: &mut Lookahead<R>) -> Result<usize, DecodeError> {
    let offset = reader.position();
    let window = reader.peek_up_to(MAX_VARINT_LEN)?;
    let available = window.len();
    let (len, n) =
        varint::decode_unsigned(window).map_err(|e| DecodeError::from_varint(e, offset, available))?;
    reader.discard(n)?;
    to_len(len, offset)
}

fn decode_string<R: Read>(
    reader: &mut Lookahead<R>,
    table: StringTable,
    state: &mut DecoderState,
) -> Result<(), DecodeError> {
    let len = read_length(reader)?;
    let mut bytes = Vec::new();
    reader.read_into(len, &mut bytes)?;
    let value = String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

    let index = state.intern(table, value);
    tracing::debug!(%table, index, "interned string");
    Ok(())
}

fn decode_header<R: Read>(reader: &mut Lookahead<R>) -> Result<Header, DecodeError> {
    let base = reader.position();
    let window = reader.peek(Header::LEN)?;
    let mut fields = Fields::new(window, base);
    let [version] = fields.bytes::<1>()?;
    let [align_bits] = fields.bytes::<1>()?;
    let base_index_time = i32::from_le_bytes(fields.bytes::<4>()?);
    reader.discard(Header::LEN)?;

    Ok(Header {
        version,
        align_bits,
        base_index_time,
    })
}

/// Decode a set-active-state record. Fields appear in bit order 0x8, 0x4,
/// 0x2, 0x1 and only when their bit is set in the opcode.
pub(crate) fn decode_active_state<R: Read>(
    reader: &mut Lookahead<R>,
    opcode: u8,
) -> Result<ActiveStateUpdate, DecodeError> {
    let base = reader.position();
    let window = reader.peek_up_to(ACTIVE_STATE_MAX)?;
    let mut fields = Fields::new(window, base);
    let mut update = ActiveStateUpdate::default();

    if opcode & ACTIVE_HOST != 0 {
        update.host = Some(fields.unsigned()?);
    }
    if opcode & ACTIVE_SOURCE != 0 {
        update.source = Some(fields.unsigned()?);
    }
    if opcode & ACTIVE_SOURCE_TYPE != 0 {
        update.source_type = Some(fields.unsigned()?);
    }
    if opcode & ACTIVE_BASE_TIME != 0 {
        update.base_time = Some(i32::from_le_bytes(fields.bytes::<4>()?));
    }

    let used = fields.used();
    reader.discard(used)?;
    Ok(update)
}

/// Decode an event record into `event`, reusing its buffers.
pub(crate) fn decode_event<R: Read>(
    reader: &mut Lookahead<R>,
    opcode: u8,
    start: u64,
    base_time: i32,
    mode: MetadataMode,
    event: &mut Event,
) -> Result<(), DecodeError> {
    let base = reader.position();
    let window = reader.peek_up_to(EVENT_PREFIX_MAX)?;
    let mut fields = Fields::new(window, base);

    // The end offset counts from the byte after its own varint
    let end_len = fields.unsigned()?;
    let end = fields.offset().saturating_add(end_len);

    let extended_len = if has_extended_storage(opcode) {
        Some(fields.unsigned()?)
    } else {
        None
    };
    event.hash = if has_hash(opcode) {
        Some(fields.bytes::<HASH_LEN>()?)
    } else {
        None
    };
    event.stream_id = u64::from_le_bytes(fields.bytes::<8>()?);
    event.stream_offset = fields.unsigned()?;
    event.stream_sub_offset = fields.unsigned()?;
    let relative_time = fields.signed()?;
    event.index_time = relative_time.wrapping_add(i64::from(base_time));
    event.sub_seconds = fields.unsigned()?;
    event.metadata_count = fields.unsigned()?;

    let used = fields.used();
    reader.discard(used)?;

    decode_metadata(reader, opcode, event.metadata_count, mode, &mut event.metadata)?;

    event.has_extended_storage = extended_len.is_some();
    event.extended_storage.clear();
    if let Some(len) = extended_len {
        let len = to_len(len, reader.position())?;
        reader.read_into(len, &mut event.extended_storage)?;
    }

    let position = reader.position();
    let message_len = end
        .checked_sub(position)
        .ok_or(DecodeError::RecordOverrun { end, position })?;
    reader.read_into(to_len(message_len, position)?, &mut event.message)?;

    event.opcode = opcode;
    event.start_offset = start;
    event.include_punctuation = includes_punctuation(opcode);
    Ok(())
}

/// Decode `count` metadata entries.
///
/// Entries are decoded from peeked windows; a window is only decoded from
/// while it still holds a worst-case entry, unless the stream ends inside it.
fn decode_metadata<R: Read>(
    reader: &mut Lookahead<R>,
    opcode: u8,
    count: u64,
    mode: MetadataMode,
    out: &mut Vec<MetadataEntry>,
) -> Result<(), DecodeError> {
    out.clear();
    let mut remaining = count;

    while remaining > 0 {
        let want = usize::try_from(remaining)
            .unwrap_or(usize::MAX)
            .saturating_mul(MAX_ENTRY_LEN)
            .min(reader.capacity().max(MAX_ENTRY_LEN));
        let base = reader.position();
        let window = reader.peek_up_to(want)?;
        let at_end = window.len() < want;

        let mut used = 0;
        while remaining > 0 && (at_end || window.len() - used >= MAX_ENTRY_LEN) {
            let (entry, n) = metadata::decode_entry(&window[used..], opcode, base + used as u64)?;
            if mode == MetadataMode::Materialize {
                out.push(entry);
            }
            used += n;
            remaining -= 1;
        }
        reader.discard(used)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
