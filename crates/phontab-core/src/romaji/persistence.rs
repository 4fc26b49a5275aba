use std::fs;
use std::path::Path;

use tracing::debug;

use super::{KanaEntry, KanaTable, RomajiError};

const MAGIC: &[u8; 4] = b"KNTB";
const VERSION: u8 = 1;

impl KanaTable {
    /// Serialize to bytes (KNTB format): magic, version, bincode entries.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RomajiError> {
        let body = bincode::serialize(&self.entries).map_err(RomajiError::Serialize)?;

        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (KNTB format). Entries are re-sorted and the
    /// kana keys checked for uniqueness.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RomajiError> {
        if bytes.len() < 5 {
            return Err(RomajiError::InvalidHeader);
        }
        if &bytes[0..4] != MAGIC {
            return Err(RomajiError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(RomajiError::UnsupportedVersion(bytes[4]));
        }
        let entries: Vec<KanaEntry> =
            bincode::deserialize(&bytes[5..]).map_err(RomajiError::Deserialize)?;

        let table = Self::from_unique(entries);
        if let Some(pair) = table.entries.windows(2).find(|w| w[0].kana == w[1].kana) {
            return Err(RomajiError::DuplicateKey {
                kana: pair[0].kana.clone(),
                first: pair[0].romaji.clone(),
                second: pair[1].romaji.clone(),
            });
        }
        debug!(entries = table.len(), "loaded kana table");
        Ok(table)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), RomajiError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn open(path: &Path) -> Result<Self, RomajiError> {
        Self::from_bytes(&fs::read(path)?)
    }
}
