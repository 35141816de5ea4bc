//! Test helpers for behavioral specifications.
//!
//! Journals are written to a temporary directory and decoded from the file,
//! the same way a caller handing the decoder an opened chunk would.

pub use jrnl_journal::{
    ActiveStateUpdate, ConfigError, DecodeError, DecoderConfig, DecoderStats, EventRecord,
    JournalBuilder, JournalDecoder, MetadataKind, MetadataMode, StringTable,
};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What a caller observes about one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub message: String,
    pub host: Option<String>,
    pub source: Option<String>,
    pub index_time: i64,
    pub stream_id: u64,
    pub metadata: usize,
}

/// Journal bytes stored in a temporary file
pub struct JournalFile {
    dir: TempDir,
    path: PathBuf,
}

impl JournalFile {
    pub fn new(bytes: &[u8]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal");
        std::fs::write(&path, bytes).unwrap();
        Self { dir, path }
    }

    pub fn from_builder(builder: JournalBuilder) -> Self {
        Self::new(&builder.build())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a `decoder.toml` next to the journal and return its path
    pub fn config_file(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("decoder.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn open(&self) -> JournalDecoder<BufReader<File>> {
        JournalDecoder::open(BufReader::new(File::open(&self.path).unwrap()))
    }

    pub fn decode(&self) -> Outcome {
        Outcome::collect(self.open())
    }

    pub fn decode_with(&self, config: DecoderConfig) -> Outcome {
        let file = BufReader::new(File::open(&self.path).unwrap());
        Outcome::collect(JournalDecoder::with_config(file, config).unwrap())
    }
}

/// Everything a full decode produced
#[derive(Debug)]
pub struct Outcome {
    pub events: Vec<Seen>,
    pub error: Option<DecodeError>,
    pub stats: DecoderStats,
    pub position: u64,
}

impl Outcome {
    fn collect<R: std::io::Read>(mut decoder: JournalDecoder<R>) -> Self {
        let mut events = Vec::new();
        let mut error = None;
        loop {
            match decoder.next_event() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
            let event = decoder.current_event();
            events.push(Seen {
                message: event.message_str().into_owned(),
                host: decoder.host().ok().map(str::to_string),
                source: decoder.source().ok().map(str::to_string),
                index_time: event.index_time(),
                stream_id: event.stream_id(),
                metadata: event.metadata().len(),
            });
        }
        Self {
            events,
            error,
            stats: decoder.stats(),
            position: decoder.position(),
        }
    }

    /// Assert the stream ended cleanly
    pub fn passes(self) -> Self {
        if let Some(err) = &self.error {
            panic!("expected clean end of stream, got: {err}");
        }
        self
    }

    /// Assert the stream failed, returning the error
    pub fn fails(self) -> DecodeError {
        match self.error {
            Some(err) => err,
            None => panic!("expected a decode error, got {} events", self.events.len()),
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.message.as_str()).collect()
    }
}
