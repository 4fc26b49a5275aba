use std::fmt::{self, Write};

use super::{id_list, write_grouped, Emitter};
use crate::pinyin::CompiledPinyin;
use crate::romaji::KanaTable;

const INDENT: &str = "    ";

/// Emits a C++17 header with `constexpr` arrays in namespace `phontab`.
///
/// Strings are written as UTF-8 narrow literals; the consumer must compile
/// with a UTF-8 execution character set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppEmitter;

/// Quote `s` as a narrow C++ string literal. Control characters use octal
/// escapes, which unlike `\x` stop after three digits.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '?' => out.push_str("\\?"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn prologue(out: &mut String, includes: &[&str]) -> fmt::Result {
    writeln!(out, "// @generated by phontab. Do not edit.")?;
    writeln!(out, "#pragma once")?;
    writeln!(out)?;
    for include in includes {
        writeln!(out, "#include <{include}>")?;
    }
    writeln!(out)?;
    writeln!(out, "namespace phontab {{")?;
    writeln!(out)
}

fn epilogue(out: &mut String) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "}}  // namespace phontab")
}

impl Emitter for CppEmitter {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn emit_pinyin(&self, tables: &CompiledPinyin, out: &mut String) -> fmt::Result {
        let readings = tables.readings();
        let sets = tables.reading_sets();
        let ranges = tables.range_table().ranges();

        prologue(out, &["array", "cstddef", "cstdint"])?;
        writeln!(out, "constexpr std::uint16_t F = 65535;")?;
        writeln!(
            out,
            "constexpr std::size_t PINYIN_COMBINATION_LEN = {};",
            sets.arity()
        )?;
        writeln!(out)?;
        writeln!(out, "struct Reading {{")?;
        writeln!(out, "{INDENT}const char* pinyin;")?;
        writeln!(out, "{INDENT}const char* ascii;")?;
        writeln!(out, "{INDENT}const char* numeric;")?;
        writeln!(out, "}};")?;
        writeln!(out)?;
        writeln!(out, "struct PinyinRange {{")?;
        writeln!(out, "{INDENT}char32_t start;")?;
        writeln!(out, "{INDENT}char32_t end;")?;
        writeln!(out, "{INDENT}const std::uint16_t* table;")?;
        writeln!(out, "}};")?;
        writeln!(out)?;

        writeln!(
            out,
            "inline constexpr std::array<Reading, {}> READINGS = {{{{",
            readings.len()
        )?;
        for r in readings {
            writeln!(
                out,
                "{INDENT}{{{}, {}, {}}},",
                quote(&r.pinyin),
                quote(&r.ascii),
                quote(&r.numeric)
            )?;
        }
        writeln!(out, "}}}};")?;
        writeln!(out)?;

        writeln!(
            out,
            "inline constexpr std::array<std::uint16_t, {}> PINYIN_COMBINATIONS = {{{{",
            sets.as_flat().len()
        )?;
        for i in 0..sets.len() {
            if let Some(row) = sets.row(i) {
                writeln!(out, "{INDENT}{},", id_list(row))?;
            }
        }
        writeln!(out, "}}}};")?;
        writeln!(out)?;

        for range in ranges {
            writeln!(
                out,
                "inline constexpr std::uint16_t pinyin_table_{:04X}_{:04X}[] = {{{}}};",
                range.start,
                range.end,
                id_list(&range.table)
            )?;
        }
        if !ranges.is_empty() {
            writeln!(out)?;
        }

        writeln!(
            out,
            "inline constexpr std::array<PinyinRange, {}> PINYIN_RANGES = {{{{",
            ranges.len()
        )?;
        for range in ranges {
            writeln!(
                out,
                "{INDENT}{{0x{:X}, 0x{:X}, pinyin_table_{:04X}_{:04X}}},",
                range.start, range.end, range.start, range.end
            )?;
        }
        writeln!(out, "}}}};")?;
        epilogue(out)
    }

    fn emit_kana(&self, table: &KanaTable, group_size: usize, out: &mut String) -> fmt::Result {
        let entries = table.entries();
        prologue(out, &["array"])?;

        writeln!(
            out,
            "inline constexpr std::array<const char*, {}> HEPBURN_KANAS = {{{{",
            entries.len()
        )?;
        write_grouped(out, INDENT, group_size, entries.iter().map(|e| quote(&e.kana)))?;
        writeln!(out, "}}}};")?;
        writeln!(out)?;

        writeln!(
            out,
            "inline constexpr std::array<const char*, {}> HEPBURN_ROMAJIS = {{{{",
            entries.len()
        )?;
        write_grouped(out, INDENT, group_size, entries.iter().map(|e| quote(&e.romaji)))?;
        writeln!(out, "}}}};")?;
        epilogue(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::romaji::KanaTableBuilder;
    use crate::settings::{DuplicatePolicy, RomajiSettings};

    #[test]
    fn quotes_literals() {
        assert_eq!(quote("zhōng"), "\"zhōng\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote("??="), "\"\\?\\?=\"");
        assert_eq!(quote("\t1"), "\"\\0111\"");
    }

    #[test]
    fn pinyin_output() {
        let text = "pinyins:\nyī,yi1,yi,yi1\n\npinyin_combinations:\n0\n\npinyin_tables:\n4E00,4E01:\n0,F\n";
        let compiled = CompiledPinyin::from_text(text, &Default::default()).unwrap();
        let mut out = String::new();
        CppEmitter.emit_pinyin(&compiled, &mut out).unwrap();

        assert!(out.starts_with("// @generated by phontab. Do not edit.\n#pragma once\n"));
        assert!(out.contains("constexpr std::size_t PINYIN_COMBINATION_LEN = 1;\n"));
        assert!(out.contains(
            "inline constexpr std::array<Reading, 1> READINGS = {{\n    {\"yī\", \"yi\", \"yi1\"},\n}};\n"
        ));
        assert!(out.contains(
            "inline constexpr std::array<std::uint16_t, 1> PINYIN_COMBINATIONS = {{\n    0,\n}};\n"
        ));
        assert!(out.contains("inline constexpr std::uint16_t pinyin_table_4E00_4E01[] = {0, F};\n"));
        assert!(out.contains("    {0x4E00, 0x4E01, pinyin_table_4E00_4E01},\n"));
        assert!(out.ends_with("}};\n\n}  // namespace phontab\n"));
    }

    #[test]
    fn kana_output() {
        let mut builder = KanaTableBuilder::new();
        builder
            .add_source("a", "a あ\ni い\nu う\n", &RomajiSettings::default())
            .unwrap();
        let table = builder.build(DuplicatePolicy::Warn).unwrap();

        let mut out = String::new();
        CppEmitter.emit_kana(&table, 8, &mut out).unwrap();
        assert!(out.contains(
            "inline constexpr std::array<const char*, 3> HEPBURN_KANAS = {{\n    \"あ\", \"い\", \"う\",\n}};\n"
        ));
        assert!(out.contains(
            "inline constexpr std::array<const char*, 3> HEPBURN_ROMAJIS = {{\n    \"a\", \"i\", \"u\",\n}};\n"
        ));
    }
}
