// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal synthesis for tests
//!
//! Builds byte streams record by record using the same layout the decoder
//! reads. Fields are written exactly as given, so tests can also produce
//! streams the storage engine never would.

use crate::event::HASH_LEN;
use crate::opcode::{
    has_extended_storage, has_hash, StringTable, ACTIVE_BASE_TIME, ACTIVE_HOST, ACTIVE_SOURCE,
    ACTIVE_SOURCE_TYPE, OPCODE_DELETE, OPCODE_HEADER, OPCODE_NEW_HOST, OPCODE_NEW_SOURCE,
    OPCODE_NEW_SOURCE_TYPE, OPCODE_NEW_STRING, OPCODE_NOP, OPCODE_PRIVATE,
};
use crate::state::ActiveStateUpdate;
use jrnl_core::varint::{encode_signed, encode_unsigned};

/// Fields of one event record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub opcode: u8,
    /// Written only when the opcode has the extended storage bit
    pub extended_storage: Vec<u8>,
    /// Written only when the opcode has the hash bit clear
    pub hash: [u8; HASH_LEN],
    pub stream_id: u64,
    pub stream_offset: u64,
    pub stream_sub_offset: u64,
    pub relative_index_time: i64,
    pub sub_seconds: u64,
    /// Raw keys (before any shift) and their values
    pub metadata: Vec<(u64, Vec<i64>)>,
    pub message: Vec<u8>,
}

impl EventRecord {
    pub fn new(opcode: u8, message: impl Into<Vec<u8>>) -> Self {
        Self {
            opcode,
            extended_storage: Vec::new(),
            hash: [0; HASH_LEN],
            stream_id: 0,
            stream_offset: 0,
            stream_sub_offset: 0,
            relative_index_time: 0,
            sub_seconds: 0,
            metadata: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_stream(mut self, id: u64, offset: u64, sub_offset: u64) -> Self {
        self.stream_id = id;
        self.stream_offset = offset;
        self.stream_sub_offset = sub_offset;
        self
    }

    pub fn with_time(mut self, relative_index_time: i64, sub_seconds: u64) -> Self {
        self.relative_index_time = relative_index_time;
        self.sub_seconds = sub_seconds;
        self
    }

    pub fn with_hash(mut self, hash: [u8; HASH_LEN]) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_extended_storage(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.extended_storage = payload.into();
        self
    }

    pub fn with_metadata(mut self, key: u64, values: &[i64]) -> Self {
        self.metadata.push((key, values.to_vec()));
        self
    }

    /// Encode the record, opcode included
    pub fn encode(&self, out: &mut Vec<u8>) {
        let mut body = Vec::new();
        if has_extended_storage(self.opcode) {
            encode_unsigned(self.extended_storage.len() as u64, &mut body);
        }
        if has_hash(self.opcode) {
            body.extend_from_slice(&self.hash);
        }
        body.extend_from_slice(&self.stream_id.to_le_bytes());
        encode_unsigned(self.stream_offset, &mut body);
        encode_unsigned(self.stream_sub_offset, &mut body);
        encode_signed(self.relative_index_time, &mut body);
        encode_unsigned(self.sub_seconds, &mut body);
        encode_unsigned(self.metadata.len() as u64, &mut body);
        for (key, values) in &self.metadata {
            encode_unsigned(*key, &mut body);
            for value in values {
                encode_signed(*value, &mut body);
            }
        }
        if has_extended_storage(self.opcode) {
            body.extend_from_slice(&self.extended_storage);
        }
        body.extend_from_slice(&self.message);

        out.push(self.opcode);
        encode_unsigned(body.len() as u64, out);
        out.extend_from_slice(&body);
    }
}

/// Builder for a journal byte stream
#[derive(Debug, Clone, Default)]
pub struct JournalBuilder {
    bytes: Vec<u8>,
}

impl JournalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, version: u8, align_bits: u8, base_index_time: i32) -> Self {
        self.bytes.push(OPCODE_HEADER);
        self.bytes.push(version);
        self.bytes.push(align_bits);
        self.bytes.extend_from_slice(&base_index_time.to_le_bytes());
        self
    }

    pub fn nop(mut self) -> Self {
        self.bytes.push(OPCODE_NOP);
        self
    }

    pub fn delete(mut self) -> Self {
        self.bytes.push(OPCODE_DELETE);
        self
    }

    pub fn string(mut self, table: StringTable, value: impl AsRef<[u8]>) -> Self {
        let opcode = match table {
            StringTable::Host => OPCODE_NEW_HOST,
            StringTable::Source => OPCODE_NEW_SOURCE,
            StringTable::SourceType => OPCODE_NEW_SOURCE_TYPE,
            StringTable::Generic => OPCODE_NEW_STRING,
        };
        let value = value.as_ref();
        self.bytes.push(opcode);
        encode_unsigned(value.len() as u64, &mut self.bytes);
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn host(self, value: &str) -> Self {
        self.string(StringTable::Host, value)
    }

    pub fn source(self, value: &str) -> Self {
        self.string(StringTable::Source, value)
    }

    pub fn source_type(self, value: &str) -> Self {
        self.string(StringTable::SourceType, value)
    }

    pub fn private(mut self, payload: &[u8]) -> Self {
        self.bytes.push(OPCODE_PRIVATE);
        encode_unsigned(payload.len() as u64, &mut self.bytes);
        self.bytes.extend_from_slice(payload);
        self
    }

    /// Set-active-state record; the opcode is derived from which fields are
    /// present. An update with no fields encodes opcode 16, which is invalid.
    pub fn active_state(mut self, update: ActiveStateUpdate) -> Self {
        let mut opcode = 0x10;
        let mut body = Vec::new();
        if let Some(host) = update.host {
            opcode |= ACTIVE_HOST;
            encode_unsigned(host, &mut body);
        }
        if let Some(source) = update.source {
            opcode |= ACTIVE_SOURCE;
            encode_unsigned(source, &mut body);
        }
        if let Some(source_type) = update.source_type {
            opcode |= ACTIVE_SOURCE_TYPE;
            encode_unsigned(source_type, &mut body);
        }
        if let Some(base_time) = update.base_time {
            opcode |= ACTIVE_BASE_TIME;
            body.extend_from_slice(&base_time.to_le_bytes());
        }
        self.bytes.push(opcode);
        self.bytes.extend_from_slice(&body);
        self
    }

    pub fn active_host(self, index: u64) -> Self {
        self.active_state(ActiveStateUpdate {
            host: Some(index),
            ..Default::default()
        })
    }

    pub fn event(mut self, record: &EventRecord) -> Self {
        record.encode(&mut self.bytes);
        self
    }

    /// Append bytes verbatim
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
