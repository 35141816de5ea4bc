// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opcode classification
//!
//! Every record starts with one opcode byte. Some ranges carry flag bits in
//! the opcode itself, so classification goes through a 256-entry table
//! built at compile time rather than a plain enum conversion.

use std::fmt;

pub const OPCODE_NOP: u8 = 0;
pub const OPCODE_LEGACY_EVENT: u8 = 1;
pub const OPCODE_LEGACY_EVENT_WITH_HASH: u8 = 2;
pub const OPCODE_NEW_HOST: u8 = 3;
pub const OPCODE_NEW_SOURCE: u8 = 4;
pub const OPCODE_NEW_SOURCE_TYPE: u8 = 5;
pub const OPCODE_NEW_STRING: u8 = 6;
pub const OPCODE_DELETE: u8 = 8;
pub const OPCODE_PRIVATE: u8 = 9;
pub const OPCODE_HEADER: u8 = 10;
pub const OPCODE_HASH_SLICE: u8 = 11;

/// First and last set-active-state opcodes
pub const ACTIVE_STATE_OPCODES: (u8, u8) = (17, 31);
/// First and last new-style event opcodes
pub const EVENT_OPCODES: (u8, u8) = (32, 43);

/// Set-active-state bits, in the order their fields appear
pub const ACTIVE_HOST: u8 = 0x8;
pub const ACTIVE_SOURCE: u8 = 0x4;
pub const ACTIVE_SOURCE_TYPE: u8 = 0x2;
pub const ACTIVE_BASE_TIME: u8 = 0x1;

/// Event flag bits
pub const EVENT_NO_HASH: u8 = 0x1;
pub const EVENT_EXTENDED_STORAGE: u8 = 0x4;
pub const EVENT_PUNCTUATION: u8 = 0x22;

/// Interned string tables addressed by set-active-state records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringTable {
    Host,
    Source,
    SourceType,
    Generic,
}

impl StringTable {
    pub const ALL: [StringTable; 4] = [
        StringTable::Host,
        StringTable::Source,
        StringTable::SourceType,
        StringTable::Generic,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StringTable::Host => "host",
            StringTable::Source => "source",
            StringTable::SourceType => "sourcetype",
            StringTable::Generic => "string",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            StringTable::Host => 0,
            StringTable::Source => 1,
            StringTable::SourceType => 2,
            StringTable::Generic => 3,
        }
    }
}

impl fmt::Display for StringTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode routine selected by an opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Nop,
    Event,
    NewString(StringTable),
    Delete,
    Private,
    Header,
    HashSlice,
    ActiveState,
}

impl RecordKind {
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::Nop => "nop",
            RecordKind::Event => "event",
            RecordKind::NewString(_) => "new_string",
            RecordKind::Delete => "delete",
            RecordKind::Private => "private",
            RecordKind::Header => "header",
            RecordKind::HashSlice => "hash_slice",
            RecordKind::ActiveState => "active_state",
        }
    }
}

static RECORD_KINDS: [Option<RecordKind>; 256] = build_table();

const fn build_table() -> [Option<RecordKind>; 256] {
    let mut table = [None; 256];
    table[OPCODE_NOP as usize] = Some(RecordKind::Nop);
    table[OPCODE_LEGACY_EVENT as usize] = Some(RecordKind::Event);
    table[OPCODE_LEGACY_EVENT_WITH_HASH as usize] = Some(RecordKind::Event);
    table[OPCODE_NEW_HOST as usize] = Some(RecordKind::NewString(StringTable::Host));
    table[OPCODE_NEW_SOURCE as usize] = Some(RecordKind::NewString(StringTable::Source));
    table[OPCODE_NEW_SOURCE_TYPE as usize] =
        Some(RecordKind::NewString(StringTable::SourceType));
    table[OPCODE_NEW_STRING as usize] = Some(RecordKind::NewString(StringTable::Generic));
    table[OPCODE_DELETE as usize] = Some(RecordKind::Delete);
    table[OPCODE_PRIVATE as usize] = Some(RecordKind::Private);
    table[OPCODE_HEADER as usize] = Some(RecordKind::Header);
    table[OPCODE_HASH_SLICE as usize] = Some(RecordKind::HashSlice);

    let mut op = ACTIVE_STATE_OPCODES.0 as usize;
    while op <= ACTIVE_STATE_OPCODES.1 as usize {
        table[op] = Some(RecordKind::ActiveState);
        op += 1;
    }

    let mut op = EVENT_OPCODES.0 as usize;
    while op <= EVENT_OPCODES.1 as usize {
        table[op] = Some(RecordKind::Event);
        op += 1;
    }

    table
}

/// Look up the record kind for an opcode byte
pub fn classify(opcode: u8) -> Option<RecordKind> {
    RECORD_KINDS[usize::from(opcode)]
}

pub fn is_event(opcode: u8) -> bool {
    matches!(classify(opcode), Some(RecordKind::Event))
}

pub const fn has_hash(opcode: u8) -> bool {
    opcode & EVENT_NO_HASH == 0
}

pub const fn has_extended_storage(opcode: u8) -> bool {
    opcode & EVENT_EXTENDED_STORAGE != 0
}

pub const fn includes_punctuation(opcode: u8) -> bool {
    opcode & EVENT_PUNCTUATION == EVENT_PUNCTUATION
}

#[cfg(test)]
#[path = "opcode_tests.rs"]
mod tests;
