use tracing::{debug, debug_span};

use super::{PinyinError, RawCombination, SENTINEL};

/// Fixed-width reading-set table.
///
/// Rows are stored flat in row-major order; every row is exactly `arity`
/// IDs long, right-padded with [`SENTINEL`]. Row order and the order of IDs
/// within a row match the source (first ID = preferred reading).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingSets {
    arity: usize,
    ids: Vec<u16>,
}

impl ReadingSets {
    /// Pad `combinations` to a common width.
    ///
    /// `arity` is the longest combination in the corpus. Every ID must refer
    /// to one of `reading_count` readings and must not coincide with the
    /// sentinel.
    pub fn normalize(
        combinations: &[RawCombination],
        reading_count: usize,
    ) -> Result<Self, PinyinError> {
        let _span = debug_span!("normalize_combinations", count = combinations.len()).entered();

        // IDs run 0..reading_count; the last one must stay below the sentinel.
        if reading_count > SENTINEL as usize {
            return Err(PinyinError::SentinelCollision(format!(
                "{reading_count} readings would assign reading ID {SENTINEL}"
            )));
        }
        if combinations.len() > SENTINEL as usize {
            return Err(PinyinError::SentinelCollision(format!(
                "{} reading sets would assign set index {SENTINEL}",
                combinations.len()
            )));
        }

        let arity = combinations.iter().map(|c| c.ids.len()).max().unwrap_or(0);
        let mut ids = Vec::with_capacity(arity * combinations.len());

        for combination in combinations {
            if combination.ids.is_empty() {
                return Err(PinyinError::format(combination.line, "empty reading set"));
            }
            for &id in &combination.ids {
                if id == SENTINEL as u32 {
                    return Err(PinyinError::SentinelCollision(format!(
                        "line {}: reading ID {id} equals the sentinel",
                        combination.line
                    )));
                }
                if id as usize >= reading_count {
                    return Err(PinyinError::format(
                        combination.line,
                        format!("reading ID {id} out of range ({reading_count} readings)"),
                    ));
                }
                ids.push(id as u16);
            }
            ids.extend(std::iter::repeat(SENTINEL).take(arity - combination.ids.len()));
        }

        debug!(arity, sets = combinations.len(), "normalized reading sets");
        Ok(Self { arity, ids })
    }

    /// Rebuild from already padded rows, checking the same invariants as
    /// [`normalize`](Self::normalize).
    pub(crate) fn from_padded(
        arity: usize,
        ids: Vec<u16>,
        reading_count: usize,
    ) -> Result<Self, PinyinError> {
        if arity == 0 {
            if !ids.is_empty() {
                return Err(PinyinError::invalid(
                    "reading sets present with zero arity",
                ));
            }
            return Ok(Self { arity, ids });
        }
        if ids.len() % arity != 0 {
            return Err(PinyinError::invalid(format!(
                "{} reading-set IDs is not a multiple of arity {arity}",
                ids.len()
            )));
        }
        for (index, row) in ids.chunks_exact(arity).enumerate() {
            let used = row.iter().take_while(|&&id| id != SENTINEL).count();
            if used == 0 {
                return Err(PinyinError::invalid(format!("reading set {index} is empty")));
            }
            if row[used..].iter().any(|&id| id != SENTINEL) {
                return Err(PinyinError::invalid(format!(
                    "reading set {index} has IDs after padding"
                )));
            }
            if let Some(&id) = row[..used].iter().find(|&&id| id as usize >= reading_count) {
                return Err(PinyinError::invalid(format!(
                    "reading set {index}: reading ID {id} out of range"
                )));
            }
        }
        Ok(Self { arity, ids })
    }

    /// Width of every row.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of reading sets.
    pub fn len(&self) -> usize {
        if self.arity == 0 {
            0
        } else {
            self.ids.len() / self.arity
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The padded row at `index`.
    pub fn row(&self, index: usize) -> Option<&[u16]> {
        let start = index.checked_mul(self.arity)?;
        self.ids.get(start..start + self.arity)
    }

    /// The reading IDs of row `index`, without padding.
    pub fn expand(&self, index: usize) -> impl Iterator<Item = u16> + '_ {
        self.row(index)
            .unwrap_or(&[])
            .iter()
            .copied()
            .take_while(|&id| id != SENTINEL)
    }

    /// All rows, flattened row-major.
    pub fn as_flat(&self) -> &[u16] {
        &self.ids
    }
}
