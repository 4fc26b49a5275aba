use super::sample;
use crate::pinyin::{CompiledPinyin, PinyinError};

#[test]
fn bytes_round_trip() {
    let compiled = sample();
    let bytes = compiled.to_bytes().unwrap();
    assert_eq!(&bytes[..4], b"PYTB");
    let loaded = CompiledPinyin::from_bytes(&bytes).unwrap();
    assert_eq!(loaded, compiled);

    let zhong: Vec<_> = loaded.tables().query('中').unwrap().map(|r| r.pinyin).collect();
    assert_eq!(zhong, vec!["zhōng", "zhòng"]);
}

#[test]
fn save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("pinyin.pytb");
    let compiled = sample();
    compiled.save(&path).unwrap();
    assert!(!path.with_extension("tmp").exists());
    assert_eq!(CompiledPinyin::open(&path).unwrap(), compiled);
}

#[test]
fn rejects_bad_magic_and_version() {
    let mut bytes = sample().to_bytes().unwrap();
    bytes[4] = 9;
    assert!(matches!(
        CompiledPinyin::from_bytes(&bytes),
        Err(PinyinError::UnsupportedVersion(9))
    ));
    bytes[0] = b'X';
    assert!(matches!(
        CompiledPinyin::from_bytes(&bytes),
        Err(PinyinError::InvalidMagic)
    ));
    assert!(matches!(
        CompiledPinyin::from_bytes(b"PY"),
        Err(PinyinError::InvalidHeader)
    ));
}

#[test]
fn rejects_corrupted_body() {
    let mut bytes = sample().to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        CompiledPinyin::from_bytes(&bytes),
        Err(PinyinError::ChecksumMismatch { .. })
    ));
}

#[test]
fn rejects_truncated_file() {
    let bytes = sample().to_bytes().unwrap();
    let truncated = &bytes[..bytes.len() - 2];
    // The checksum no longer matches either, which is reported first.
    assert!(CompiledPinyin::from_bytes(truncated).is_err());
    assert!(matches!(
        CompiledPinyin::from_bytes(&bytes[..20]),
        Err(PinyinError::InvalidHeader)
    ));
}

#[test]
fn open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CompiledPinyin::open(&dir.path().join("missing.pytb")).unwrap_err();
    assert!(matches!(err, PinyinError::Io(_)));
}
