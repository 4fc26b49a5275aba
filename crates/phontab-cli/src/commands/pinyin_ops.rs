use std::fs;
use std::path::Path;
use std::process;

use serde::Serialize;

use phontab_core::emit;
use phontab_core::pinyin::{CompiledPinyin, PinyinNotation, TableStats};
use phontab_core::settings::settings;
use phontab_core::unicode::is_han;

use super::{file_size_kb, read_magic, write_output};

pub const NOTATIONS: [&str; 4] = ["pinyin", "ascii", "numeric", "initial"];

pub fn parse_notation(name: &str) -> Option<PinyinNotation> {
    match name {
        "pinyin" => Some(PinyinNotation::Pinyin),
        "ascii" => Some(PinyinNotation::PinyinAscii),
        "numeric" => Some(PinyinNotation::PinyinNumeric),
        "initial" => Some(PinyinNotation::PinyinAsciiInitial),
        _ => None,
    }
}

/// Load a PYTB file, or compile a compact source file on the fly.
pub fn load(path: &str) -> CompiledPinyin {
    if read_magic(path).as_ref() == Some(b"PYTB") {
        return die!(
            CompiledPinyin::open(Path::new(path)),
            "Error opening {path}: {}"
        );
    }
    let text = die!(fs::read_to_string(path), "Error reading {path}: {}");
    die!(
        CompiledPinyin::from_text(&text, &settings().pinyin),
        "Error compiling {path}: {}"
    )
}

pub fn compile(input: &str, output: &str) {
    let text = die!(fs::read_to_string(input), "Error reading {input}: {}");
    let compiled = die!(
        CompiledPinyin::from_text(&text, &settings().pinyin),
        "Error compiling {input}: {}"
    );
    die!(
        compiled.save(Path::new(output)),
        "Error writing {output}: {}"
    );

    let stats = compiled.stats();
    eprintln!(
        "Wrote {output} ({:.1} KB): {} readings, {} reading sets, {} ranges",
        file_size_kb(output),
        stats.readings,
        stats.reading_sets,
        stats.ranges
    );
}

pub fn emit(input: &str, target: &str, output: Option<&str>) {
    let emitter = emit::from_name(target).unwrap_or_else(|| {
        eprintln!(
            "Error: unknown target '{target}' (available: {})",
            emit::TARGETS.join(", ")
        );
        process::exit(1);
    });
    let compiled = load(input);
    let mut out = String::new();
    die!(
        emitter.emit_pinyin(&compiled, &mut out),
        "Error rendering tables: {}"
    );
    die!(write_output(output, &out), "Error writing output: {}");
}

pub fn query(table: &str, text: &str, notation: &str) {
    let notation = parse_notation(notation).unwrap_or_else(|| {
        eprintln!(
            "Error: unknown notation '{notation}' (available: {})",
            NOTATIONS.join(", ")
        );
        process::exit(1);
    });
    let compiled = load(table);
    let tables = compiled.tables();
    for c in text.chars() {
        match tables.query(c) {
            Some(pinyins) => {
                let readings: Vec<&str> = pinyins.map(|r| r.notation(notation)).collect();
                println!("{c} U+{:04X} → {}", c as u32, readings.join(", "));
            }
            None if is_han(c) => println!("{c} U+{:04X} → (no reading)", c as u32),
            None => {}
        }
    }
}

#[derive(Serialize)]
struct PinyinInfo<'a> {
    file: &'a str,
    format: &'static str,
    #[serde(flatten)]
    stats: TableStats,
}

pub fn info(file: &str, json: bool) {
    let compiled = load(file);
    let stats = compiled.stats();
    if json {
        let report = PinyinInfo {
            file,
            format: "PYTB",
            stats,
        };
        let text = die!(serde_json::to_string_pretty(&report), "Error: {}");
        println!("{text}");
        return;
    }

    println!("Pinyin tables: {file}");
    println!("File size:     {:.1} KB", file_size_kb(file));
    println!("Readings:      {}", stats.readings);
    println!("Reading sets:  {} (arity {})", stats.reading_sets, stats.arity);
    println!("Ranges:        {}", stats.ranges);
    println!("Covered:       {} code points", stats.covered);
    println!("Mapped:        {} code points", stats.mapped);
    if let (Some(first), Some(last)) = (stats.first_code_point, stats.last_code_point) {
        println!("Span:          U+{first:04X}..=U+{last:04X}");
    }

    let tables = compiled.tables();
    let samples = ['中', '乐', '行', '长'];
    println!();
    println!("Sample lookups:");
    for c in samples {
        match tables.query(c) {
            Some(pinyins) => {
                let readings: Vec<&str> = pinyins.map(|r| r.pinyin).collect();
                println!("  {c} → {}", readings.join(", "));
            }
            None => println!("  {c} → (not found)"),
        }
    }
}
