use serde::{Deserialize, Serialize};

use crate::unicode::{floor_char_boundary, is_halfwidth_katakana, is_hiragana, is_katakana};

/// One kana → romaji mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanaEntry {
    pub kana: String,
    pub romaji: String,
    /// Read from the half kana section of its dictionary.
    pub half: bool,
}

/// Compiled kana table, sorted by the scalar values of the kana key.
///
/// Keys are unique; lookups binary-search the sorted entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanaTable {
    pub(super) entries: Vec<KanaEntry>,
    /// Longest kana key in bytes, bounding the prefix search.
    pub(super) max_kana_len: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KanaStats {
    pub entries: usize,
    pub distinct_romaji: usize,
    pub hiragana: usize,
    pub katakana: usize,
    pub halfwidth: usize,
    /// Keys mixing scripts or outside the kana blocks.
    pub other: usize,
    pub half_section: usize,
}

impl KanaTable {
    /// Build from entries with unique keys; sorts them.
    pub(super) fn from_unique(mut entries: Vec<KanaEntry>) -> Self {
        entries.sort_by(|a, b| a.kana.cmp(&b.kana));
        let max_kana_len = entries.iter().map(|e| e.kana.len()).max().unwrap_or(0);
        Self {
            entries,
            max_kana_len,
        }
    }

    pub fn entries(&self) -> &[KanaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Romaji for an exact kana key.
    pub fn get(&self, kana: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|e| e.kana.as_str().cmp(kana))
            .ok()
            .map(|i| self.entries[i].romaji.as_str())
    }

    /// All kana spellings that transliterate to `romaji`, in table order.
    pub fn kanas_for<'a>(&'a self, romaji: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.romaji == romaji)
            .map(|e| e.kana.as_str())
    }

    /// Longest kana key that prefixes `s`, as `(byte_len, romaji)`.
    pub fn romanize_prefix(&self, s: &str) -> Option<(usize, &str)> {
        let limit = floor_char_boundary(s, self.max_kana_len);
        let mut candidates: Vec<usize> = s[..limit]
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        candidates.reverse();
        candidates
            .into_iter()
            .find_map(|len| self.get(&s[..len]).map(|romaji| (len, romaji)))
    }

    /// Romanize all of `s` by repeated longest-prefix matches.
    ///
    /// Returns `None` if some part of `s` matches no kana key.
    pub fn romanize(&self, s: &str) -> Option<String> {
        let mut out = String::with_capacity(s.len());
        let mut rest = s;
        while !rest.is_empty() {
            let (len, romaji) = self.romanize_prefix(rest)?;
            out.push_str(romaji);
            rest = &rest[len..];
        }
        Some(out)
    }

    pub fn stats(&self) -> KanaStats {
        let mut stats = KanaStats {
            entries: self.entries.len(),
            ..KanaStats::default()
        };
        let mut romaji: Vec<&str> = self.entries.iter().map(|e| e.romaji.as_str()).collect();
        romaji.sort_unstable();
        romaji.dedup();
        stats.distinct_romaji = romaji.len();

        for entry in &self.entries {
            let kana = entry.kana.as_str();
            if kana.chars().all(is_hiragana) {
                stats.hiragana += 1;
            } else if kana.chars().all(is_katakana) {
                stats.katakana += 1;
            } else if kana.chars().all(is_halfwidth_katakana) {
                stats.halfwidth += 1;
            } else {
                stats.other += 1;
            }
            if entry.half {
                stats.half_section += 1;
            }
        }
        stats
    }
}
