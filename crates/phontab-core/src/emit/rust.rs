use std::fmt::{self, Write};

use super::{id_list, write_grouped, Emitter};
use crate::pinyin::CompiledPinyin;
use crate::romaji::KanaTable;

const INDENT: &str = "    ";

/// Emits `static` arrays that build a `PinyinTables` view at compile time,
/// so the generated file only depends on `phontab_core::pinyin`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustEmitter;

impl Emitter for RustEmitter {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn emit_pinyin(&self, tables: &CompiledPinyin, out: &mut String) -> fmt::Result {
        let readings = tables.readings();
        let sets = tables.reading_sets();
        let ranges = tables.range_table().ranges();

        writeln!(out, "// @generated by phontab. Do not edit.")?;
        writeln!(out)?;
        writeln!(out, "#[allow(unused_imports)]")?;
        writeln!(
            out,
            "use phontab_core::pinyin::{{PinyinRange, PinyinTables, Reading, SENTINEL as F}};"
        )?;
        writeln!(out)?;
        writeln!(out, "pub const PINYIN_COMBINATION_LEN: usize = {};", sets.arity())?;
        writeln!(out)?;

        writeln!(out, "pub static READINGS: [Reading<'static>; {}] = [", readings.len())?;
        for r in readings {
            writeln!(
                out,
                "{INDENT}Reading::new({:?}, {:?}, {:?}),",
                r.pinyin, r.ascii, r.numeric
            )?;
        }
        writeln!(out, "];")?;
        writeln!(out)?;

        writeln!(
            out,
            "pub static PINYIN_COMBINATIONS: [u16; {}] = [",
            sets.as_flat().len()
        )?;
        for i in 0..sets.len() {
            if let Some(row) = sets.row(i) {
                writeln!(out, "{INDENT}{},", id_list(row))?;
            }
        }
        writeln!(out, "];")?;
        writeln!(out)?;

        writeln!(
            out,
            "pub static PINYIN_RANGES: [PinyinRange<'static>; {}] = [",
            ranges.len()
        )?;
        for range in ranges {
            writeln!(
                out,
                "{INDENT}PinyinRange::new(0x{:X}, 0x{:X}, &[{}]),",
                range.start,
                range.end,
                id_list(&range.table)
            )?;
        }
        writeln!(out, "];")?;
        writeln!(out)?;

        writeln!(out, "pub static PINYIN_TABLES: PinyinTables<'static> = PinyinTables::new(")?;
        writeln!(out, "{INDENT}&READINGS,")?;
        writeln!(out, "{INDENT}&PINYIN_COMBINATIONS,")?;
        writeln!(out, "{INDENT}PINYIN_COMBINATION_LEN,")?;
        writeln!(out, "{INDENT}&PINYIN_RANGES,")?;
        writeln!(out, ");")
    }

    fn emit_kana(&self, table: &KanaTable, group_size: usize, out: &mut String) -> fmt::Result {
        let entries = table.entries();
        writeln!(out, "// @generated by phontab. Do not edit.")?;
        writeln!(out)?;

        writeln!(out, "pub static HEPBURN_KANAS: [&str; {}] = [", entries.len())?;
        let kanas = entries.iter().map(|e| format!("{:?}", e.kana));
        write_grouped(out, INDENT, group_size, kanas)?;
        writeln!(out, "];")?;
        writeln!(out)?;

        writeln!(out, "pub static HEPBURN_ROMAJIS: [&str; {}] = [", entries.len())?;
        let romajis = entries.iter().map(|e| format!("{:?}", e.romaji));
        write_grouped(out, INDENT, group_size, romajis)?;
        writeln!(out, "];")
    }
}
