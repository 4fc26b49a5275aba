//! Kana ↔ romaji transliteration table.
//!
//! Merges Hepburn dictionaries (`romaji kana` per line) into one table
//! keyed by kana. One romaji may have many kana spellings, but every kana
//! must have exactly one romaji; a kana claimed by two romaji fails the build.

mod builder;
mod persistence;
mod source;
mod table;

pub use builder::KanaTableBuilder;
pub use source::{parse_dictionary, DictionaryLine, DictionaryParser, KanaRecord};
pub use table::{KanaEntry, KanaStats, KanaTable};

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum RomajiError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{source_name}:{line}: {reason}")]
    Format {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("duplicate kana {kana:?} listed twice for {romaji:?}")]
    DuplicateKana { kana: String, romaji: String },

    #[error("duplicate kana {kana:?} for {first:?} and {second:?}")]
    DuplicateKey {
        kana: String,
        first: String,
        second: String,
    },

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected KNTB)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}
