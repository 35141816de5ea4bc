// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoded event
//!
//! The decoder owns a single `Event` and overwrites it in place for every
//! event record. Its byte buffers keep their allocations between events,
//! so steady-state decoding does not allocate.

use jrnl_core::MetadataEntry;
use std::borrow::Cow;
use std::fmt;

/// Width of the raw-event content hash
pub const HASH_LEN: usize = 20;

/// One log event as stored in the journal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub(crate) opcode: u8,
    pub(crate) start_offset: u64,
    pub(crate) has_extended_storage: bool,
    pub(crate) extended_storage: Vec<u8>,
    pub(crate) hash: Option<[u8; HASH_LEN]>,
    pub(crate) stream_id: u64,
    pub(crate) stream_offset: u64,
    pub(crate) stream_sub_offset: u64,
    pub(crate) index_time: i64,
    pub(crate) sub_seconds: u64,
    pub(crate) metadata_count: u64,
    pub(crate) metadata: Vec<MetadataEntry>,
    pub(crate) message: Vec<u8>,
    pub(crate) include_punctuation: bool,
}

impl Event {
    /// Opcode byte the event was stored with
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Stream offset of the event's opcode byte
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Out-of-line storage payload, if the record declared one
    pub fn extended_storage(&self) -> Option<&[u8]> {
        self.has_extended_storage
            .then_some(self.extended_storage.as_slice())
    }

    pub fn hash(&self) -> Option<&[u8; HASH_LEN]> {
        self.hash.as_ref()
    }

    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }

    pub fn stream_offset(&self) -> u64 {
        self.stream_offset
    }

    pub fn stream_sub_offset(&self) -> u64 {
        self.stream_sub_offset
    }

    /// Index time with the journal's base time applied
    pub fn index_time(&self) -> i64 {
        self.index_time
    }

    pub fn sub_seconds(&self) -> u64 {
        self.sub_seconds
    }

    /// Number of metadata entries the record carried
    pub fn metadata_count(&self) -> u64 {
        self.metadata_count
    }

    /// Decoded metadata entries.
    ///
    /// Empty when the decoder runs with `MetadataMode::Skip`.
    pub fn metadata(&self) -> &[MetadataEntry] {
        &self.metadata
    }

    /// Raw event bytes
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    pub fn message_len(&self) -> usize {
        self.message.len()
    }

    /// Message as text, replacing invalid UTF-8
    pub fn message_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }

    pub fn include_punctuation(&self) -> bool {
        self.include_punctuation
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "messageLength: {} - ", self.message_len())?;
        match self.extended_storage() {
            Some(storage) => write!(f, "extendedStorageLen: {} - ", storage.len())?,
            None => f.write_str("extendedStorageLen: 0 - ")?,
        }
        f.write_str("hash: ")?;
        match &self.hash {
            Some(hash) => {
                for byte in hash {
                    write!(f, "{:02x}", byte)?;
                }
            }
            None => f.write_str("none")?,
        }
        write!(
            f,
            " - streamID: {} - streamOffset: {} - streamSubOffset: {} - indexTime: {} - \
             subSeconds: {} - metadataCount: {} - message: {} - includePunctuation: {}",
            self.stream_id,
            self.stream_offset,
            self.stream_sub_offset,
            self.index_time,
            self.sub_seconds,
            self.metadata_count,
            self.message_str(),
            self.include_punctuation,
        )
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
