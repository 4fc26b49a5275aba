//! Render compiled tables as source literals.
//!
//! Emitters only format; every table they receive has already passed the
//! compiler's checks, so rendering either succeeds or fails on the writer.

mod cpp;
mod rust;

pub use cpp::CppEmitter;
pub use rust::RustEmitter;

use std::fmt::{self, Write};

use crate::pinyin::CompiledPinyin;
use crate::romaji::KanaTable;

/// A target language for emitted tables.
pub trait Emitter {
    /// Target name as accepted by [`from_name`].
    fn name(&self) -> &'static str;

    /// Readings, padded reading sets and range tables, plus a ready-made
    /// query view where the target supports one.
    fn emit_pinyin(&self, tables: &CompiledPinyin, out: &mut String) -> fmt::Result;

    /// Two parallel arrays, kana patterns and romaji values, wrapped every
    /// `group_size` entries.
    fn emit_kana(&self, table: &KanaTable, group_size: usize, out: &mut String) -> fmt::Result;
}

/// Names accepted by [`from_name`].
pub const TARGETS: [&str; 2] = ["rust", "cpp"];

pub fn from_name(name: &str) -> Option<Box<dyn Emitter>> {
    match name {
        "rust" => Some(Box::new(RustEmitter)),
        "cpp" => Some(Box::new(CppEmitter)),
        _ => None,
    }
}

/// Write `items` as comma-terminated literals, `group_size` per line.
fn write_grouped<I>(out: &mut String, indent: &str, group_size: usize, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    let group_size = group_size.max(1);
    for (i, item) in items.into_iter().enumerate() {
        if i % group_size == 0 {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(indent);
        } else {
            out.push(' ');
        }
        write!(out, "{item},")?;
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(())
}

/// Reading IDs of one padded row, the sentinel written as `F`.
fn id_list(ids: &[u16]) -> String {
    let mut s = String::new();
    for (i, &id) in ids.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        if id == crate::pinyin::SENTINEL {
            s.push('F');
        } else {
            // Writing to a String cannot fail.
            let _ = write!(s, "{id}");
        }
    }
    s
}
