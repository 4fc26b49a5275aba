use std::fs;

use phontab_core::settings;

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: pinyin.strict_sections={}, romaji.duplicate_kana={:?}, romaji.sources={}, emit.group_size={}",
        s.pinyin.strict_sections,
        s.romaji.duplicate_kana,
        s.romaji.sources.len(),
        s.emit.group_size
    );
}

/// Replace the built-in settings with `file` for the rest of the process.
pub fn load_settings(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(settings::init_custom(content), "Error in {file}: {}");
}
