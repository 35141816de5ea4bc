// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jrnl-journal: streaming decoder for opcode-tagged journal files
//!
//! A journal is a sequence of records, each led by an opcode byte. Most
//! records update decoder state (interned strings, the active host, source
//! and source type, the base time); event records produce an [`Event`]
//! that is interpreted against that state.
//!
//! ```no_run
//! use jrnl_journal::JournalDecoder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("journal")?;
//! let mut decoder = JournalDecoder::open(file);
//! while let Some(event) = decoder.next_event()? {
//!     println!("{}", event.message_str());
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(any(test, feature = "test-support"))]
pub mod builder;
mod decoder;
mod event;
pub mod opcode;
mod record;
mod state;

pub use decoder::{DecoderStats, JournalDecoder};
pub use event::{Event, HASH_LEN};
pub use opcode::{RecordKind, StringTable};
pub use state::{ActiveStateUpdate, DecoderState, Header, InternTable};

// Core types callers need alongside the decoder
pub use jrnl_core::{
    ConfigError, DecodeError, DecoderConfig, MetadataEntry, MetadataKind, MetadataMode,
};

#[cfg(any(test, feature = "test-support"))]
pub use builder::{EventRecord, JournalBuilder};
