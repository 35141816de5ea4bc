// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoder state carried between records
//!
//! Events do not name their host, source or source type. Instead the journal
//! interns those strings once and later records select the active entry by
//! 1-based index. The state here is built up by applying records in order.

use crate::opcode::StringTable;
use jrnl_core::DecodeError;

/// Append-only list of interned strings, addressed from 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternTable {
    entries: Vec<String>,
}

impl InternTable {
    /// Append a string and return its 1-based index
    pub fn push(&mut self, value: String) -> u64 {
        self.entries.push(value);
        self.entries.len() as u64
    }

    /// Get the string at a 1-based index
    pub fn get(&self, index: u64) -> Option<&str> {
        let slot = usize::try_from(index.checked_sub(1)?).ok()?;
        self.entries.get(slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Journal header record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub align_bits: u8,
    pub base_index_time: i32,
}

impl Header {
    /// Encoded size after the opcode byte
    pub const LEN: usize = 6;

    /// Mask of the low `align_bits` bits
    pub fn align_mask(&self) -> u64 {
        1u64.checked_shl(u32::from(self.align_bits))
            .map_or(u64::MAX, |bit| bit - 1)
    }
}

/// Fields carried by one set-active-state record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveStateUpdate {
    pub host: Option<u64>,
    pub source: Option<u64>,
    pub source_type: Option<u64>,
    pub base_time: Option<i32>,
}

/// State built from the non-event records of one journal
#[derive(Debug, Clone, Default)]
pub struct DecoderState {
    tables: [InternTable; 4],
    active_host: u64,
    active_source: u64,
    active_source_type: u64,
    base_time: i32,
    header: Option<Header>,
}

impl DecoderState {
    pub fn table(&self, table: StringTable) -> &InternTable {
        &self.tables[table.index()]
    }

    /// Intern a string, returning its 1-based index in `table`
    pub fn intern(&mut self, table: StringTable, value: String) -> u64 {
        self.tables[table.index()].push(value)
    }

    /// Apply a set-active-state record. Absent fields keep their value.
    pub fn apply(&mut self, update: &ActiveStateUpdate) {
        if let Some(host) = update.host {
            self.active_host = host;
        }
        if let Some(source) = update.source {
            self.active_source = source;
        }
        if let Some(source_type) = update.source_type {
            self.active_source_type = source_type;
        }
        if let Some(base_time) = update.base_time {
            self.base_time = base_time;
        }
    }

    pub fn set_header(&mut self, header: Header) {
        self.header = Some(header);
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn active_host(&self) -> u64 {
        self.active_host
    }

    pub fn active_source(&self) -> u64 {
        self.active_source
    }

    pub fn active_source_type(&self) -> u64 {
        self.active_source_type
    }

    pub fn base_time(&self) -> i32 {
        self.base_time
    }

    /// Resolve a 1-based index in `table`.
    ///
    /// Index 0 means "never set" and is rejected like any out-of-range index.
    pub fn lookup(&self, table: StringTable, index: u64) -> Result<&str, DecodeError> {
        let entries = self.table(table);
        entries
            .get(index)
            .ok_or(DecodeError::InvalidStateReference {
                table: table.name(),
                index,
                len: entries.len(),
            })
    }

    pub fn host(&self) -> Result<&str, DecodeError> {
        self.lookup(StringTable::Host, self.active_host)
    }

    pub fn source(&self) -> Result<&str, DecodeError> {
        self.lookup(StringTable::Source, self.active_source)
    }

    pub fn source_type(&self) -> Result<&str, DecodeError> {
        self.lookup(StringTable::SourceType, self.active_source_type)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
