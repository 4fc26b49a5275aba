use phontab_core::emit;
use phontab_core::pinyin::{
    CompiledPinyin, PinyinNotation, PinyinRange, PinyinTables, RangeSource, Reading,
    ReadingSource,
};
use phontab_core::romaji::{KanaTable, KanaTableBuilder, RomajiError};
use phontab_core::settings::{parse_settings_toml, DuplicatePolicy, RomajiSettings};

const PINYIN: &str = include_str!("data/pinyin_sample.txt");
const HEPBURN: &str = include_str!("data/hepburn_sample.utf8");

fn compiled() -> CompiledPinyin {
    CompiledPinyin::from_text(PINYIN, &Default::default()).unwrap()
}

fn pinyin_of<R, G>(tables: &PinyinTables<'_, R, G>, c: char) -> Vec<String>
where
    R: ReadingSource,
    G: RangeSource,
{
    tables
        .query(c)
        .map(|p| p.map(|r| r.numeric.to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn compiles_sample_corpus() {
    let compiled = compiled();
    let stats = compiled.stats();
    assert_eq!(stats.readings, 19);
    assert_eq!(stats.reading_sets, 12);
    assert_eq!(stats.arity, 2);
    assert_eq!(stats.ranges, 4);
    assert_eq!(stats.covered, 17);
    assert_eq!(stats.mapped, 12);
}

#[test]
fn queries_sample_corpus() {
    let compiled = compiled();
    let tables = compiled.tables();
    assert_eq!(pinyin_of(&tables, '行'), vec!["xing2", "hang2"]);
    assert_eq!(pinyin_of(&tables, '上'), vec!["shang4", "shang3"]);
    assert_eq!(pinyin_of(&tables, '不'), vec!["bu4", "fou3"]);
    assert_eq!(pinyin_of(&tables, '下'), vec!["xia4"]);
    assert!(pinyin_of(&tables, '丂').is_empty());
    assert!(pinyin_of(&tables, '丌').is_empty());
    assert!(pinyin_of(&tables, 'x').is_empty());

    let initials: String = "中乐行"
        .chars()
        .filter_map(|c| tables.primary(c))
        .map(|r| r.notation(PinyinNotation::PinyinAsciiInitial))
        .collect();
    assert_eq!(initials, "zlx");
}

#[test]
fn binary_tables_survive_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pinyin.pytb");
    let compiled = compiled();
    compiled.save(&path).unwrap();
    let loaded = CompiledPinyin::open(&path).unwrap();
    assert_eq!(loaded, compiled);
    assert_eq!(pinyin_of(&loaded.tables(), '乐'), vec!["le4", "yue4"]);
}

#[test]
fn static_view_matches_compiled_view() {
    // Hand-written equivalent of what the Rust emitter produces for 中.
    static READINGS: [Reading<'static>; 2] = [
        Reading::new("zhōng", "zhong", "zhong1"),
        Reading::new("zhòng", "zhong", "zhong4"),
    ];
    static SETS: [u16; 2] = [0, 1];
    static RANGES: [PinyinRange<'static>; 1] = [PinyinRange::new(0x4E2D, 0x4E2D, &[0])];
    static TABLES: PinyinTables<'static> = PinyinTables::new(&READINGS, &SETS, 2, &RANGES);

    let compiled = compiled();
    assert_eq!(pinyin_of(&TABLES, '中'), pinyin_of(&compiled.tables(), '中'));
}

#[test]
fn emits_every_target() {
    let compiled = compiled();
    for name in emit::TARGETS {
        let emitter = emit::from_name(name).unwrap();
        let mut out = String::new();
        emitter.emit_pinyin(&compiled, &mut out).unwrap();
        assert!(out.contains("0x884C"), "{name} output lacks the 行 range");
    }
}

fn kana_table() -> KanaTable {
    let mut builder = KanaTableBuilder::new();
    builder
        .add_source("hepburn_sample.utf8", HEPBURN, &RomajiSettings::default())
        .unwrap();
    builder.build(DuplicatePolicy::Warn).unwrap()
}

#[test]
fn builds_sample_kana_table() {
    let table = kana_table();
    assert_eq!(table.len(), 14);
    assert_eq!(table.get("きゃ"), Some("kya"));
    assert_eq!(table.get("\u{1B001}"), Some("e"));
    assert_eq!(table.kanas_for("ka").collect::<Vec<_>>(), vec!["か", "カ", "ｶ"]);
    assert_eq!(table.romanize("きゃしつ").as_deref(), Some("kyashitsu"));
    assert_eq!(table.stats().half_section, 2);

    let mut out = String::new();
    emit::from_name("rust")
        .unwrap()
        .emit_kana(&table, 8, &mut out)
        .unwrap();
    assert!(out.contains("pub static HEPBURN_KANAS: [&str; 14] = [\n    \"あ\","));
}

#[test]
fn strict_duplicate_policy_from_settings() {
    let toml = phontab_core::settings::default_toml()
        .replace("duplicate_kana = \"warn\"", "duplicate_kana = \"error\"");
    let settings = parse_settings_toml(&toml).unwrap();
    assert_eq!(settings.romaji.duplicate_kana, DuplicatePolicy::Error);

    let mut builder = KanaTableBuilder::new();
    builder
        .add_source("hepburn_sample.utf8", HEPBURN, &settings.romaji)
        .unwrap();
    let err = builder.build(settings.romaji.duplicate_kana).unwrap_err();
    assert!(matches!(err, RomajiError::DuplicateKana { .. }));
}

#[test]
fn kana_table_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kana.kntb");
    let table = kana_table();
    table.save(&path).unwrap();
    assert_eq!(KanaTable::open(&path).unwrap(), table);
}
