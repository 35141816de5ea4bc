// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jrnl-core: building blocks for decoding journal streams
//!
//! This crate provides:
//! - The LEB128 / zig-zag varint codec
//! - A lookahead buffer with peek/discard over any `Read`
//! - The metadata type table and entry decoder
//! - Error and configuration types shared by the decoder

pub mod config;
pub mod error;
pub mod lookahead;
pub mod metadata;
pub mod varint;

// Re-exports
pub use config::{ConfigError, DecoderConfig, MetadataMode};
pub use error::DecodeError;
pub use lookahead::Lookahead;
pub use metadata::{MetadataEntry, MetadataKind};
pub use varint::VarintError;
