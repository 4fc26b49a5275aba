use tracing::{debug, debug_span};

use super::{PinyinError, RawRange, SENTINEL, SENTINEL_TOKENS};

/// An inclusive code point range with one reading-set index per code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodepointRange {
    pub start: u32,
    pub end: u32,
    /// `end - start + 1` entries; [`SENTINEL`] means no reading.
    pub table: Vec<u16>,
}

impl CodepointRange {
    pub fn contains(&self, c: u32) -> bool {
        self.start <= c && c <= self.end
    }
}

/// Sorted, pairwise disjoint code point ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTable {
    ranges: Vec<CodepointRange>,
}

impl RangeTable {
    /// Parse the dense data of every raw range and validate the result.
    ///
    /// `set_count` is the length of the reading-set table; every
    /// non-sentinel entry must index into it.
    pub fn build(raw: &[RawRange], set_count: usize) -> Result<Self, PinyinError> {
        let _span = debug_span!("build_range_table", ranges = raw.len()).entered();

        let mut ranges = Vec::with_capacity(raw.len());
        for range in raw {
            let table = parse_dense(range, set_count)?;
            ranges.push(CodepointRange {
                start: range.start,
                end: range.end,
                table,
            });
        }

        let table = Self::from_ranges(ranges, set_count)?;
        debug!(
            ranges = table.len(),
            code_points = table.covered(),
            "built range table"
        );
        Ok(table)
    }

    /// Validate already parsed ranges: sizes, ordering and index bounds.
    pub(crate) fn from_ranges(
        ranges: Vec<CodepointRange>,
        set_count: usize,
    ) -> Result<Self, PinyinError> {
        for range in &ranges {
            let expected = range.end.checked_sub(range.start).map(|d| d as usize + 1);
            if expected != Some(range.table.len()) {
                return Err(PinyinError::invalid(format!(
                    "range {:X}..={:X} has {} entries",
                    range.start,
                    range.end,
                    range.table.len()
                )));
            }
            if let Some(&index) = range
                .table
                .iter()
                .find(|&&i| i != SENTINEL && i as usize >= set_count)
            {
                return Err(PinyinError::invalid(format!(
                    "range {:X}..={:X}: reading-set index {index} out of range \
                     ({set_count} sets)",
                    range.start, range.end
                )));
            }
        }
        for pair in ranges.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start <= prev.end {
                return Err(PinyinError::RangeOverlap {
                    prev_start: prev.start,
                    prev_end: prev.end,
                    next_start: next.start,
                    next_end: next.end,
                });
            }
        }
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[CodepointRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of code points inside some range.
    pub fn covered(&self) -> usize {
        self.ranges.iter().map(|r| r.table.len()).sum()
    }

    /// Number of code points that map to a reading set.
    pub fn mapped(&self) -> usize {
        self.ranges
            .iter()
            .flat_map(|r| r.table.iter())
            .filter(|&&i| i != SENTINEL)
            .count()
    }

    /// Smallest range covering every range in the table.
    pub fn span(&self) -> Option<(u32, u32)> {
        Some((self.ranges.first()?.start, self.ranges.last()?.end))
    }
}

fn parse_dense(range: &RawRange, set_count: usize) -> Result<Vec<u16>, PinyinError> {
    let line = range.data_line;
    let mut table = Vec::with_capacity(range.len());
    for token in range.data.split(',') {
        let index = if SENTINEL_TOKENS.contains(&token) {
            SENTINEL
        } else {
            let index: u16 = token.parse().map_err(|e| {
                PinyinError::format(line, format!("invalid reading-set index '{token}': {e}"))
            })?;
            if index as usize >= set_count {
                return Err(PinyinError::format(
                    line,
                    format!("reading-set index {index} out of range ({set_count} sets)"),
                ));
            }
            index
        };
        table.push(index);
    }
    if table.len() != range.len() {
        return Err(PinyinError::format(
            line,
            format!(
                "range {:X}..={:X} covers {} code points but has {} entries",
                range.start,
                range.end,
                range.len(),
                table.len()
            ),
        ));
    }
    Ok(table)
}
