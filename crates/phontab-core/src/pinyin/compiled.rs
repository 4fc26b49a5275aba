use serde::Serialize;
use tracing::{debug_span, info};

use super::{
    parse_source, CodepointRange, PinyinError, PinyinSource, PinyinTables, RangeTable,
    ReadingRecord, ReadingSets,
};
use crate::settings::PinyinSettings;

/// A fully validated pinyin table set.
///
/// Only produced by [`compile`](Self::compile) or the binary loader, both of
/// which check every invariant the query path relies on, so a value of
/// this type is always internally consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPinyin {
    pub(super) readings: Vec<ReadingRecord>,
    pub(super) sets: ReadingSets,
    pub(super) ranges: RangeTable,
}

/// Size summary of a compiled table set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub readings: usize,
    pub reading_sets: usize,
    pub arity: usize,
    pub ranges: usize,
    /// Code points inside some range.
    pub covered: usize,
    /// Code points with at least one reading.
    pub mapped: usize,
    pub first_code_point: Option<u32>,
    pub last_code_point: Option<u32>,
}

impl CompiledPinyin {
    /// Run the normalizer and the range builder over parsed records.
    pub fn compile(source: &PinyinSource) -> Result<Self, PinyinError> {
        let _span = debug_span!("compile_pinyin").entered();
        let sets = ReadingSets::normalize(&source.combinations, source.readings.len())?;
        let ranges = RangeTable::build(&source.ranges, sets.len())?;
        let compiled = Self {
            readings: source.readings.clone(),
            sets,
            ranges,
        };
        let stats = compiled.stats();
        info!(
            readings = stats.readings,
            reading_sets = stats.reading_sets,
            arity = stats.arity,
            ranges = stats.ranges,
            mapped = stats.mapped,
            "compiled pinyin tables"
        );
        Ok(compiled)
    }

    /// Parse and compile the compact source text in one step.
    pub fn from_text(text: &str, settings: &PinyinSettings) -> Result<Self, PinyinError> {
        Self::compile(&parse_source(text, settings)?)
    }

    /// Reassemble from binary parts, re-checking every invariant.
    pub(super) fn from_parts(
        readings: Vec<ReadingRecord>,
        arity: usize,
        set_ids: Vec<u16>,
        ranges: Vec<CodepointRange>,
    ) -> Result<Self, PinyinError> {
        if readings.len() > super::SENTINEL as usize {
            return Err(PinyinError::SentinelCollision(format!(
                "{} readings would assign reading ID {}",
                readings.len(),
                super::SENTINEL
            )));
        }
        let sets = ReadingSets::from_padded(arity, set_ids, readings.len())?;
        let ranges = RangeTable::from_ranges(ranges, sets.len())?;
        Ok(Self {
            readings,
            sets,
            ranges,
        })
    }

    /// Query view over this table set.
    pub fn tables(&self) -> PinyinTables<'_, ReadingRecord, CodepointRange> {
        PinyinTables::new(
            &self.readings,
            self.sets.as_flat(),
            self.sets.arity(),
            self.ranges.ranges(),
        )
    }

    pub fn readings(&self) -> &[ReadingRecord] {
        &self.readings
    }

    pub fn reading_sets(&self) -> &ReadingSets {
        &self.sets
    }

    pub fn range_table(&self) -> &RangeTable {
        &self.ranges
    }

    pub fn stats(&self) -> TableStats {
        let span = self.ranges.span();
        TableStats {
            readings: self.readings.len(),
            reading_sets: self.sets.len(),
            arity: self.sets.arity(),
            ranges: self.ranges.len(),
            covered: self.ranges.covered(),
            mapped: self.ranges.mapped(),
            first_code_point: span.map(|(start, _)| start),
            last_code_point: span.map(|(_, end)| end),
        }
    }
}
