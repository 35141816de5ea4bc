// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffered reader with lookahead and position tracking
//!
//! Record decoders peek a window covering every field of a record, decode
//! the fields out of that slice, then discard exactly the bytes they used.
//! This keeps the number of calls into the underlying reader independent of
//! how many fields a record has.

use crate::error::DecodeError;
use std::io::{ErrorKind, Read};

/// Lookahead buffer over an arbitrary byte source
pub struct Lookahead<R> {
    inner: R,
    buf: Vec<u8>,
    /// First unconsumed byte in `buf`
    start: usize,
    /// End of valid data in `buf`
    end: usize,
    /// Absolute count of bytes consumed from the stream start
    position: u64,
    eof: bool,
}

impl<R: Read> Lookahead<R> {
    /// Wrap `inner` with a buffer of `capacity` bytes
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; capacity.max(1)],
            start: 0,
            end: 0,
            position: 0,
            eof: false,
        }
    }

    /// Absolute position of the next unconsumed byte
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Current size of the internal buffer
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes read from the source but not yet consumed
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// View the next `n` bytes without consuming them.
    ///
    /// Fails with `TruncatedInput` if the stream ends first. Requests larger
    /// than the buffer grow it.
    pub fn peek(&mut self, n: usize) -> Result<&[u8], DecodeError> {
        self.fill(n)?;
        let available = self.buffered();
        if available < n {
            return Err(DecodeError::TruncatedInput {
                offset: self.position,
                needed: n,
                available,
            });
        }
        Ok(&self.buf[self.start..self.start + n])
    }

    /// View up to `n` bytes without consuming them.
    ///
    /// Returns fewer than `n` bytes only when the stream ends first.
    pub fn peek_up_to(&mut self, n: usize) -> Result<&[u8], DecodeError> {
        self.fill(n)?;
        let len = n.min(self.buffered());
        Ok(&self.buf[self.start..self.start + len])
    }

    /// Consume exactly `n` bytes.
    ///
    /// `n` may exceed the buffer size; the excess is streamed through.
    pub fn discard(&mut self, n: usize) -> Result<(), DecodeError> {
        let offset = self.position;
        let mut remaining = n;
        loop {
            remaining -= self.consume(remaining);
            if remaining == 0 {
                return Ok(());
            }
            if !self.refill()? {
                return Err(DecodeError::TruncatedInput {
                    offset,
                    needed: n,
                    available: n - remaining,
                });
            }
        }
    }

    /// Consume a single byte, failing at end of stream
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        match self.try_read_byte()? {
            Some(byte) => Ok(byte),
            None => Err(DecodeError::TruncatedInput {
                offset: self.position,
                needed: 1,
                available: 0,
            }),
        }
    }

    /// Consume a single byte, or return `None` at a clean end of stream
    pub fn try_read_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.start == self.end && !self.refill()? {
            return Ok(None);
        }
        let byte = self.buf[self.start];
        self.start += 1;
        self.position += 1;
        Ok(Some(byte))
    }

    /// Replace the contents of `out` with the next `n` bytes.
    ///
    /// `out` keeps its allocation, so a reused vector only ever grows.
    pub fn read_into(&mut self, n: usize, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        out.clear();
        let offset = self.position;
        let mut remaining = n;
        loop {
            let take = remaining.min(self.buffered());
            out.extend_from_slice(&self.buf[self.start..self.start + take]);
            self.consume(take);
            remaining -= take;
            if remaining == 0 {
                return Ok(());
            }
            if !self.refill()? {
                return Err(DecodeError::TruncatedInput {
                    offset,
                    needed: n,
                    available: n - remaining,
                });
            }
        }
    }

    /// Unwrap the underlying reader, dropping any buffered bytes
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn consume(&mut self, n: usize) -> usize {
        let take = n.min(self.buffered());
        self.start += take;
        self.position += take as u64;
        take
    }

    /// Read more data into an empty buffer. Returns false at end of stream.
    fn refill(&mut self) -> Result<bool, DecodeError> {
        self.fill(1)?;
        Ok(self.buffered() > 0)
    }

    /// Ensure at least `n` bytes are buffered unless the stream ends first.
    fn fill(&mut self, n: usize) -> Result<(), DecodeError> {
        if self.buffered() >= n {
            return Ok(());
        }

        if self.buf.len() - self.start < n {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
            if self.buf.len() < n {
                tracing::trace!(from = self.buf.len(), to = n, "growing lookahead buffer");
                self.buf.resize(n, 0);
            }
        }

        while self.buffered() < n && !self.eof {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(read) => self.end += read,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lookahead_tests.rs"]
mod tests;
