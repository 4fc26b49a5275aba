use std::fs;
use std::io::{self, Write};
use std::path::Path;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod config_ops;
pub mod kana_ops;
pub mod pinyin_ops;

/// Write `content` to `path`, or to stdout when no path is given. Files are
/// written to a `.tmp` sibling and renamed into place.
pub fn write_output(path: Option<&str>, content: &str) -> io::Result<()> {
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        return stdout.flush();
    };
    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

/// First four bytes of `path`, or `None` if it is shorter or unreadable.
pub fn read_magic(path: &str) -> Option<[u8; 4]> {
    let bytes = fs::read(path).ok()?;
    bytes.get(..4)?.try_into().ok()
}

/// Show table statistics, picking the format from the magic bytes. Anything
/// that is not a binary table is treated as compact pinyin source.
pub fn info(file: &str, json: bool) {
    match read_magic(file).as_ref() {
        Some(b"KNTB") => kana_ops::info(file, json),
        _ => pinyin_ops::info(file, json),
    }
}

fn file_size_kb(path: &str) -> f64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0) as f64 / 1024.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("tables.rs");
        let path_str = path.to_str().unwrap();
        write_output(Some(path_str), "pub static X: u8 = 0;\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pub static X: u8 = 0;\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn magic_of_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short");
        fs::write(&path, b"PY").unwrap();
        assert_eq!(read_magic(path.to_str().unwrap()), None);
        fs::write(&path, b"PYTB\x01").unwrap();
        assert_eq!(read_magic(path.to_str().unwrap()), Some(*b"PYTB"));
    }
}
