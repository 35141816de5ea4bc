// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoder configuration
//!
//! Configuration is plain data with defaults for every field, so an empty
//! TOML document yields the default decoder. Spelled out, the defaults are:
//!
//! ```toml
//! buffer_capacity = 32768
//! metadata = "materialize"
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Default read buffer size, matching a typical decompressor output block.
pub const DEFAULT_BUFFER_CAPACITY: usize = 32 * 1024;

/// Smallest buffer that holds every fixed-size peek the record decoders make.
pub const MIN_BUFFER_CAPACITY: usize = 128;

/// Errors that can occur when building a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("buffer capacity {capacity} is below the minimum of {minimum}")]
    BufferTooSmall { capacity: usize, minimum: usize },
}

/// What the decoder does with per-event metadata entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    /// Decode entries only far enough to stay aligned with the stream
    Skip,
    /// Keep decoded entries on the event
    #[default]
    Materialize,
}

/// Tunables for a journal decoder
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Initial capacity of the lookahead buffer in bytes
    pub buffer_capacity: usize,
    pub metadata: MetadataMode,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            metadata: MetadataMode::default(),
        }
    }
}

impl DecoderConfig {
    /// Smallest legal buffer, so tests cross refill boundaries often.
    pub fn for_testing() -> Self {
        Self {
            buffer_capacity: MIN_BUFFER_CAPACITY,
            metadata: MetadataMode::Materialize,
        }
    }

    /// Parse and validate a configuration from TOML
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: DecoderConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a decoder
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity < MIN_BUFFER_CAPACITY {
            return Err(ConfigError::BufferTooSmall {
                capacity: self.buffer_capacity,
                minimum: MIN_BUFFER_CAPACITY,
            });
        }
        Ok(())
    }
}
