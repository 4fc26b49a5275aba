//! Compiles curated phonetic mapping data into compact lookup tables.
//!
//! - [`pinyin`]: code point → pinyin readings, compiled into sorted range
//!   tables backed by fixed-width reading sets.
//! - [`romaji`]: kana ↔ romaji transliteration pairs, merged from external
//!   dictionaries into a collision-checked, sorted table.
//! - [`emit`]: renders compiled tables as source literals for a target language.

pub mod emit;
pub mod pinyin;
pub mod romaji;
pub mod settings;
pub mod unicode;
