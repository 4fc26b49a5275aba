use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use serde::Serialize;

use phontab_core::emit;
use phontab_core::romaji::{KanaStats, KanaTable, KanaTableBuilder};
use phontab_core::settings::settings;
use phontab_core::unicode::is_kana;

use super::{file_size_kb, write_output};
use crate::kana_source;

pub fn fetch(output_dir: &str, force: bool) {
    let sources = &settings().romaji.sources;
    if sources.is_empty() {
        eprintln!("Error: no kana sources configured ([romaji] sources)");
        process::exit(1);
    }
    let paths = die!(
        kana_source::fetch_all(sources, Path::new(output_dir), force),
        "Error fetching kana dictionaries: {}"
    );
    for path in paths {
        eprintln!("  {}", path.display());
    }
}

/// Merge dictionary files, in order, into one table.
pub fn build(paths: &[PathBuf]) -> KanaTable {
    let romaji = &settings().romaji;
    let mut builder = KanaTableBuilder::new();
    for path in paths {
        eprintln!("Reading {}...", path.display());
        let text = die!(
            fs::read_to_string(path),
            "Error reading {}: {}",
            path.display()
        );
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        die!(
            builder.add_source(&name, &text, romaji),
            "Error parsing dictionary: {}"
        );
    }
    die!(
        builder.build(romaji.duplicate_kana),
        "Error building kana table: {}"
    )
}

/// Dictionary paths: the given files, or the configured sources inside `dir`.
pub fn resolve_inputs(inputs: &[String], dir: &str) -> Vec<PathBuf> {
    if !inputs.is_empty() {
        return inputs.iter().map(PathBuf::from).collect();
    }
    die!(
        kana_source::local_paths(&settings().romaji.sources, Path::new(dir)),
        "Error resolving kana sources: {}"
    )
}

pub fn compile(inputs: &[String], dir: &str, output: &str) {
    let paths = resolve_inputs(inputs, dir);
    if paths.is_empty() {
        eprintln!("Error: no dictionaries given and no kana sources configured");
        process::exit(1);
    }
    let table = build(&paths);
    die!(table.save(Path::new(output)), "Error writing {output}: {}");
    eprintln!(
        "Wrote {output} ({:.1} KB): {} entries",
        file_size_kb(output),
        table.len()
    );
}

fn load(path: &str) -> KanaTable {
    die!(KanaTable::open(Path::new(path)), "Error opening {path}: {}")
}

pub fn emit(table: &str, target: &str, group_size: Option<usize>, output: Option<&str>) {
    let emitter = emit::from_name(target).unwrap_or_else(|| {
        eprintln!(
            "Error: unknown target '{target}' (available: {})",
            emit::TARGETS.join(", ")
        );
        process::exit(1);
    });
    let group_size = group_size.unwrap_or(settings().emit.group_size);
    if group_size == 0 {
        eprintln!("Error: group size must be at least 1");
        process::exit(1);
    }
    let table = load(table);
    let mut out = String::new();
    die!(
        emitter.emit_kana(&table, group_size, &mut out),
        "Error rendering table: {}"
    );
    die!(write_output(output, &out), "Error writing output: {}");
}

/// Romanize `text`, copying characters no kana key covers.
pub fn romanize_lossy(table: &KanaTable, text: &str) -> (String, Vec<char>) {
    let mut out = String::with_capacity(text.len());
    let mut unmatched = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match table.romanize_prefix(rest) {
            Some((len, romaji)) => {
                out.push_str(romaji);
                rest = &rest[len..];
            }
            None => {
                if is_kana(c) {
                    unmatched.push(c);
                }
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    (out, unmatched)
}

pub fn romanize(table: &str, text: &str) {
    let table = load(table);
    let (out, unmatched) = romanize_lossy(&table, text);
    println!("{out}");
    if !unmatched.is_empty() {
        let chars: String = unmatched.into_iter().collect();
        eprintln!("Warning: no romaji for kana {chars:?}");
    }
}

#[derive(Serialize)]
struct KanaInfo<'a> {
    file: &'a str,
    format: &'static str,
    #[serde(flatten)]
    stats: KanaStats,
}

pub fn info(file: &str, json: bool) {
    let table = load(file);
    let stats = table.stats();
    if json {
        let report = KanaInfo {
            file,
            format: "KNTB",
            stats,
        };
        let text = die!(serde_json::to_string_pretty(&report), "Error: {}");
        println!("{text}");
        return;
    }

    println!("Kana table: {file}");
    println!("File size:  {:.1} KB", file_size_kb(file));
    println!("Entries:    {}", stats.entries);
    println!("Romaji:     {} distinct", stats.distinct_romaji);
    println!("Hiragana:   {}", stats.hiragana);
    println!("Katakana:   {}", stats.katakana);
    println!("Halfwidth:  {}", stats.halfwidth);
    println!("Other:      {}", stats.other);
    println!("Half section entries: {}", stats.half_section);

    let samples = ["きゃ", "シ", "ｶ"];
    println!();
    println!("Sample lookups:");
    for kana in samples {
        println!("  {kana} → {}", table.get(kana).unwrap_or("(not found)"));
    }
}
