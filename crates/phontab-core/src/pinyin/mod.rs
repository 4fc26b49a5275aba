//! [Pinyin](https://en.wikipedia.org/wiki/Pinyin) table compiler and query.
//!
//! The compact source file has three sections (`pinyins:`,
//! `pinyin_combinations:`, `pinyin_tables:`). They compile into:
//!
//! - a reading table, indexed by reading ID;
//! - a reading-set table: rows of `arity` reading IDs, right-padded with
//!   [`SENTINEL`];
//! - a range table: sorted, disjoint inclusive code point ranges, each with
//!   one reading-set index (or [`SENTINEL`]) per code point.
//!
//! A query binary-searches the ranges, indexes the dense array and walks
//! one reading-set row, so it costs `O(log R + arity)` and never allocates.

mod combination;
mod compiled;
mod query;
mod range_table;
mod record;
mod tables_io;
#[cfg(test)]
mod tests;

pub use combination::ReadingSets;
pub use compiled::{CompiledPinyin, TableStats};
pub use query::{
    PinyinNotation, PinyinRange, PinyinTables, Pinyins, RangeSource, Reading, ReadingSource,
};
pub use range_table::{CodepointRange, RangeTable};
pub use record::{parse_source, PinyinSource, RawCombination, RawRange, ReadingRecord};

use std::io;

/// Reserved "absent" value in reading sets and dense range arrays.
pub const SENTINEL: u16 = u16::MAX;

/// Textual forms of [`SENTINEL`] accepted in dense range data. Matched
/// case-sensitively: `F` is the sentinel, `f` is a format error.
pub const SENTINEL_TOKENS: [&str; 2] = ["65535", "F"];

/// Errors raised while compiling, loading or saving pinyin tables.
///
/// Every variant aborts the whole build; no partial table is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum PinyinError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// Inconsistent table data with no source line, e.g. from a binary file.
    #[error("{0}")]
    Invalid(String),

    #[error(
        "range {next_start:#X}..={next_end:#X} overlaps or precedes \
         {prev_start:#X}..={prev_end:#X}"
    )]
    RangeOverlap {
        prev_start: u32,
        prev_end: u32,
        next_start: u32,
        next_end: u32,
    },

    #[error("sentinel collision: {0}")]
    SentinelCollision(String),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected PYTB)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch (expected {expected:#010x}, got {actual:#010x})")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

impl PinyinError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}
