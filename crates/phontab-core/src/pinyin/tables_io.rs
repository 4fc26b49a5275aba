use std::fs;
use std::path::Path;

use tracing::debug;

use super::{CodepointRange, CompiledPinyin, PinyinError, ReadingRecord};

const MAGIC: &[u8; 4] = b"PYTB";
const VERSION: u8 = 1;
// magic + version + reserved[3] + reading_count + arity + set_count + range_count + crc32
const HEADER_SIZE: usize = 4 + 1 + 3 + 4 + 4 + 4 + 4 + 4;

/// Little-endian reader over the body of a table file. Every read is
/// bounds-checked and reports a truncated file as `InvalidHeader`.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], PinyinError> {
        let end = self.pos.checked_add(n).ok_or(PinyinError::InvalidHeader)?;
        let bytes = self.data.get(self.pos..end).ok_or(PinyinError::InvalidHeader)?;
        self.pos = end;
        Ok(bytes)
    }

    fn u16(&mut self) -> Result<u16, PinyinError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, PinyinError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn str(&mut self) -> Result<String, PinyinError> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| PinyinError::invalid(format!("reading is not UTF-8: {e}")))
    }

    fn u16_vec(&mut self, n: usize) -> Result<Vec<u16>, PinyinError> {
        let bytes = self.take(n.checked_mul(2).ok_or(PinyinError::InvalidHeader)?)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect())
    }
}

fn push_str(buf: &mut Vec<u8>, s: &str) -> Result<(), PinyinError> {
    let len: u16 = s
        .len()
        .try_into()
        .map_err(|_| PinyinError::invalid(format!("reading '{s}' is too long")))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn count_u32(n: usize, what: &str) -> Result<u32, PinyinError> {
    n.try_into()
        .map_err(|_| PinyinError::invalid(format!("{what} count exceeds u32::MAX")))
}

impl CompiledPinyin {
    /// Serialize to the PYTB binary format.
    ///
    /// Layout: header, then readings (three length-prefixed strings each),
    /// the padded reading-set rows, and for every range `start`, `end`
    /// followed by its dense array. All integers are little-endian; the
    /// header carries a CRC-32 of everything after it.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PinyinError> {
        let mut body = Vec::new();
        for r in &self.readings {
            push_str(&mut body, &r.pinyin)?;
            push_str(&mut body, &r.ascii)?;
            push_str(&mut body, &r.numeric)?;
        }
        for &id in self.sets.as_flat() {
            body.extend_from_slice(&id.to_le_bytes());
        }
        for range in self.ranges.ranges() {
            body.extend_from_slice(&range.start.to_le_bytes());
            body.extend_from_slice(&range.end.to_le_bytes());
            for &index in &range.table {
                body.extend_from_slice(&index.to_le_bytes());
            }
        }

        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&count_u32(self.readings.len(), "reading")?.to_le_bytes());
        buf.extend_from_slice(&count_u32(self.sets.arity(), "arity")?.to_le_bytes());
        buf.extend_from_slice(&count_u32(self.sets.len(), "reading set")?.to_le_bytes());
        buf.extend_from_slice(&count_u32(self.ranges.len(), "range")?.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Parse the PYTB binary format, validating the checksum and every
    /// table invariant.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PinyinError> {
        if data.len() < 5 {
            return Err(PinyinError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(PinyinError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(PinyinError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(PinyinError::InvalidHeader);
        }

        let mut header = Reader {
            data: &data[8..HEADER_SIZE],
            pos: 0,
        };
        let reading_count = header.u32()? as usize;
        let arity = header.u32()? as usize;
        let set_count = header.u32()? as usize;
        let range_count = header.u32()? as usize;
        let expected = header.u32()?;
        if arity == 0 && set_count != 0 {
            return Err(PinyinError::InvalidHeader);
        }

        let body = &data[HEADER_SIZE..];
        let actual = crc32fast::hash(body);
        if actual != expected {
            return Err(PinyinError::ChecksumMismatch { expected, actual });
        }

        let mut reader = Reader { data: body, pos: 0 };
        let mut readings = Vec::with_capacity(reading_count.min(body.len()));
        for _ in 0..reading_count {
            readings.push(ReadingRecord {
                pinyin: reader.str()?,
                ascii: reader.str()?,
                numeric: reader.str()?,
            });
        }
        let set_len = arity
            .checked_mul(set_count)
            .ok_or(PinyinError::InvalidHeader)?;
        let set_ids = reader.u16_vec(set_len)?;
        let mut ranges = Vec::with_capacity(range_count.min(body.len()));
        for _ in 0..range_count {
            let start = reader.u32()?;
            let end = reader.u32()?;
            if start > end || end > char::MAX as u32 {
                return Err(PinyinError::invalid(format!("invalid range {start:X}..={end:X}")));
            }
            let table = reader.u16_vec((end - start) as usize + 1)?;
            ranges.push(CodepointRange { start, end, table });
        }
        if reader.pos != body.len() {
            return Err(PinyinError::invalid(format!(
                "{} trailing bytes after tables",
                body.len() - reader.pos
            )));
        }

        let compiled = Self::from_parts(readings, arity, set_ids, ranges)?;
        debug!(
            readings = reading_count,
            sets = set_count,
            ranges = range_count,
            "loaded pinyin tables"
        );
        Ok(compiled)
    }

    /// Load a PYTB file.
    pub fn open(path: &Path) -> Result<Self, PinyinError> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), PinyinError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
