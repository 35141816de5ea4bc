// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal decoder
//!
//! Pulls records off a byte source one at a time, applies the non-event
//! records to the decoder state, and stops at each event. The event is
//! borrowed from the decoder, so it stays valid until the next call.

use crate::event::Event;
use crate::opcode::RecordKind;
use crate::record::decode_record;
use crate::state::{DecoderState, Header};
use jrnl_core::{ConfigError, DecodeError, DecoderConfig, Lookahead};
use std::io::Read;

/// Counts of records seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Records of any kind, events included
    pub records: u64,
    pub events: u64,
    /// New-string records across all tables
    pub strings: u64,
    /// Nop, delete and private records
    pub skipped: u64,
}

/// Streaming decoder over one journal
pub struct JournalDecoder<R> {
    reader: Lookahead<R>,
    state: DecoderState,
    event: Event,
    config: DecoderConfig,
    stats: DecoderStats,
    error: Option<DecodeError>,
    /// Set at clean end of stream or after an error
    done: bool,
}

impl<R: Read> JournalDecoder<R> {
    /// Decode `source` with the default configuration.
    ///
    /// Nothing is read until the first call to `next_event` or `advance`.
    pub fn open(source: R) -> Self {
        Self::build(source, DecoderConfig::default())
    }

    /// Decode `source` with an explicit configuration
    pub fn with_config(source: R, config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(source, config))
    }

    fn build(source: R, config: DecoderConfig) -> Self {
        Self {
            reader: Lookahead::with_capacity(config.buffer_capacity, source),
            state: DecoderState::default(),
            event: Event::default(),
            config,
            stats: DecoderStats::default(),
            error: None,
            done: false,
        }
    }

    /// Decode records until the next event.
    ///
    /// Returns `Ok(None)` when the stream ends on a record boundary. Once
    /// this returns `Ok(None)` or an error, later calls return `Ok(None)`;
    /// the error stays available from `error()`.
    pub fn next_event(&mut self) -> Result<Option<&Event>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        match self.decode_until_event() {
            Ok(true) => Ok(Some(&self.event)),
            Ok(false) => {
                self.done = true;
                tracing::debug!(
                    records = self.stats.records,
                    events = self.stats.events,
                    strings = self.stats.strings,
                    skipped = self.stats.skipped,
                    position = self.reader.position(),
                    "reached end of journal"
                );
                Ok(None)
            }
            Err(e) => {
                self.done = true;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Move to the next event.
    ///
    /// Returns false at end of stream or on error; `error()` tells the two
    /// apart. After returning false it keeps returning false.
    pub fn advance(&mut self) -> bool {
        matches!(self.next_event(), Ok(Some(_)))
    }

    fn decode_until_event(&mut self) -> Result<bool, DecodeError> {
        loop {
            let start = self.reader.position();
            let Some(opcode) = self.reader.try_read_byte()? else {
                return Ok(false);
            };
            tracing::trace!(opcode, offset = start, "decoding record");

            let kind = decode_record(
                &mut self.reader,
                &mut self.state,
                &mut self.event,
                self.config.metadata,
                opcode,
                start,
            )?;

            self.stats.records += 1;
            match kind {
                RecordKind::Event => {
                    self.stats.events += 1;
                    tracing::trace!(
                        stream_id = self.event.stream_id(),
                        stream_offset = self.event.stream_offset(),
                        message_len = self.event.message_len(),
                        "decoded event"
                    );
                    return Ok(true);
                }
                RecordKind::NewString(_) => self.stats.strings += 1,
                RecordKind::Nop | RecordKind::Delete | RecordKind::Private => {
                    self.stats.skipped += 1
                }
                RecordKind::Header | RecordKind::ActiveState | RecordKind::HashSlice => {}
            }
        }
    }

    /// Error that stopped `advance`, if any
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    /// Most recently decoded event.
    ///
    /// Before the first event this is an empty default event.
    pub fn current_event(&self) -> &Event {
        &self.event
    }

    /// Active host of the current event
    pub fn host(&self) -> Result<&str, DecodeError> {
        self.state.host()
    }

    pub fn source(&self) -> Result<&str, DecodeError> {
        self.state.source()
    }

    pub fn source_type(&self) -> Result<&str, DecodeError> {
        self.state.source_type()
    }

    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    pub fn header(&self) -> Option<&Header> {
        self.state.header()
    }

    /// Stream offset of the next unread byte
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// True once the stream has ended or an error was returned
    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Unwrap the byte source. Bytes read ahead into the buffer are lost.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
