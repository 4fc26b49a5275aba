use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug_span, info, warn};

use super::source::DictionaryParser;
use super::{KanaEntry, KanaRecord, KanaTable, RomajiError};
use crate::settings::{DuplicatePolicy, RomajiSettings};

/// Accumulates dictionary records grouped by romaji, in first-seen order.
#[derive(Debug, Default)]
pub struct KanaTableBuilder {
    groups: Vec<(String, Vec<KanaRecord>)>,
    index: HashMap<String, usize>,
    parser: DictionaryParser,
    sources: usize,
}

impl KanaTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one dictionary text and add its records.
    ///
    /// The half kana marker carries over: once a source contains it, the
    /// records of every later source are flagged as half kana.
    pub fn add_source(
        &mut self,
        source_name: &str,
        text: &str,
        settings: &RomajiSettings,
    ) -> Result<&mut Self, RomajiError> {
        let records = self.parser.parse(source_name, text, settings)?;
        self.sources += 1;
        self.add_records(records);
        Ok(self)
    }

    pub fn add_records(&mut self, records: impl IntoIterator<Item = KanaRecord>) -> &mut Self {
        for record in records {
            let slot = match self.index.entry(record.romaji.clone()) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    self.groups.push((record.romaji.clone(), Vec::new()));
                    *e.insert(self.groups.len() - 1)
                }
            };
            self.groups[slot].1.push(record);
        }
        self
    }

    /// Number of records added so far, duplicates included.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    /// Drop repeated kana per romaji, invert into a kana-keyed table and
    /// sort it by the kana's scalar values.
    ///
    /// A kana repeated under the same romaji is dropped with a warning, or
    /// rejected under [`DuplicatePolicy::Error`]. A kana listed under two
    /// different romaji always fails with [`RomajiError::DuplicateKey`].
    pub fn build(&self, policy: DuplicatePolicy) -> Result<KanaTable, RomajiError> {
        let _span = debug_span!("build_kana_table", sources = self.sources).entered();
        let mut owners: HashMap<&str, &KanaRecord> = HashMap::new();
        let mut entries = Vec::new();
        let mut dropped = 0usize;

        for (romaji, records) in &self.groups {
            let mut seen: Vec<&str> = Vec::with_capacity(records.len());
            for record in records {
                if seen.contains(&record.kana.as_str()) {
                    if policy == DuplicatePolicy::Error {
                        return Err(RomajiError::DuplicateKana {
                            kana: record.kana.clone(),
                            romaji: romaji.clone(),
                        });
                    }
                    warn!(
                        kana = %record.kana,
                        romaji = %romaji,
                        source = %record.source_name,
                        line = record.line,
                        "duplicate kana dropped"
                    );
                    dropped += 1;
                    continue;
                }
                seen.push(record.kana.as_str());

                match owners.entry(record.kana.as_str()) {
                    Entry::Occupied(e) => {
                        return Err(RomajiError::DuplicateKey {
                            kana: record.kana.clone(),
                            first: e.get().romaji.clone(),
                            second: record.romaji.clone(),
                        });
                    }
                    Entry::Vacant(e) => {
                        e.insert(record);
                    }
                }
                entries.push(KanaEntry {
                    kana: record.kana.clone(),
                    romaji: romaji.clone(),
                    half: record.half,
                });
            }
        }

        let table = KanaTable::from_unique(entries);
        info!(
            entries = table.len(),
            romaji = self.groups.len(),
            dropped,
            "built kana table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RomajiSettings {
        RomajiSettings::default()
    }

    fn kanas(table: &KanaTable) -> Vec<(&str, &str)> {
        table
            .entries()
            .iter()
            .map(|e| (e.kana.as_str(), e.romaji.as_str()))
            .collect()
    }

    #[test]
    fn merges_two_dictionaries() {
        let mut builder = KanaTableBuilder::new();
        builder
            .add_source("dict", "ka カ\nki キ\n", &settings())
            .unwrap()
            .add_source("hira", "ka か\n;; half kana mappings\nka ｶ\n", &settings())
            .unwrap();
        assert_eq!(builder.record_count(), 4);

        let table = builder.build(DuplicatePolicy::Warn).unwrap();
        assert_eq!(
            kanas(&table),
            vec![("か", "ka"), ("カ", "ka"), ("キ", "ki"), ("ｶ", "ka")]
        );
        assert_eq!(table.stats().half_section, 1);
    }

    #[test]
    fn repeated_kana_under_same_romaji_is_dropped() {
        let mut builder = KanaTableBuilder::new();
        builder
            .add_source("a", "ka か\n", &settings())
            .unwrap()
            .add_source("b", "ka か\nku く\n", &settings())
            .unwrap();
        let table = builder.build(DuplicatePolicy::Warn).unwrap();
        assert_eq!(kanas(&table), vec![("か", "ka"), ("く", "ku")]);
    }

    #[test]
    fn repeated_kana_rejected_under_error_policy() {
        let mut builder = KanaTableBuilder::new();
        builder.add_source("a", "ka か\nka か\n", &settings()).unwrap();
        let err = builder.build(DuplicatePolicy::Error).unwrap_err();
        assert!(matches!(
            err,
            RomajiError::DuplicateKana { ref kana, ref romaji } if kana == "か" && romaji == "ka"
        ));
    }

    #[test]
    fn kana_under_two_romaji_fails() {
        let mut builder = KanaTableBuilder::new();
        builder
            .add_source("a", "ji じ\n", &settings())
            .unwrap()
            .add_source("b", "zi じ\n", &settings())
            .unwrap();
        let err = builder.build(DuplicatePolicy::Warn).unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate kana \"じ\" for \"ji\" and \"zi\""
        );
    }

    #[test]
    fn escaped_kana_sorts_by_scalar_value() {
        let mut builder = KanaTableBuilder::new();
        builder
            .add_source("a", "e \\U1B001\nko こ\n", &settings())
            .unwrap();
        let table = builder.build(DuplicatePolicy::Warn).unwrap();
        assert_eq!(kanas(&table), vec![("こ", "ko"), ("\u{1B001}", "e")]);
    }

    #[test]
    fn order_independent_of_input() {
        let mut forward = KanaTableBuilder::new();
        forward.add_source("a", "ka か\nsa さ\nta た\n", &settings()).unwrap();
        let mut backward = KanaTableBuilder::new();
        backward.add_source("a", "ta た\nsa さ\nka か\n", &settings()).unwrap();
        assert_eq!(
            forward.build(DuplicatePolicy::Warn).unwrap(),
            backward.build(DuplicatePolicy::Warn).unwrap()
        );
    }

    #[test]
    fn half_section_carries_into_later_sources() {
        let mut builder = KanaTableBuilder::new();
        builder
            .add_source("dict", "ka カ\n;; half kana mappings\nki ｷ\n", &settings())
            .unwrap()
            .add_source("hira", "ku く\n", &settings())
            .unwrap();
        let table = builder.build(DuplicatePolicy::Warn).unwrap();
        let half: Vec<_> = table
            .entries()
            .iter()
            .filter(|e| e.half)
            .map(|e| e.kana.as_str())
            .collect();
        assert_eq!(half, vec!["く", "ｷ"]);
    }
}
