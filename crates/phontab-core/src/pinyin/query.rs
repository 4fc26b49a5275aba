use std::cmp::Ordering;
use std::fmt;
use std::slice;

use super::{CodepointRange, ReadingRecord, SENTINEL};

/// One pinyin reading, borrowed from a reading table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reading<'a> {
    pub pinyin: &'a str,
    pub ascii: &'a str,
    pub numeric: &'a str,
}

impl<'a> Reading<'a> {
    pub const fn new(pinyin: &'a str, ascii: &'a str, numeric: &'a str) -> Self {
        Self {
            pinyin,
            ascii,
            numeric,
        }
    }

    pub fn notation(&self, notation: PinyinNotation) -> &'a str {
        match notation {
            PinyinNotation::Pinyin => self.pinyin,
            PinyinNotation::PinyinAscii => self.ascii,
            PinyinNotation::PinyinNumeric => self.numeric,
            PinyinNotation::PinyinAsciiInitial => self.ascii.get(..1).unwrap_or(""),
        }
    }
}

impl fmt::Display for Reading<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.pinyin, self.ascii, self.numeric)
    }
}

/// The string forms a [`Reading`] can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinyinNotation {
    /// Tone marks, e.g. `zhōng`.
    Pinyin,
    /// ASCII letters only, e.g. `zhong`.
    PinyinAscii,
    /// ASCII with a trailing tone number, e.g. `zhong1`.
    PinyinNumeric,
    /// First ASCII letter, e.g. `z`.
    PinyinAsciiInitial,
}

impl PinyinNotation {
    pub const ALL: [PinyinNotation; 4] = [
        PinyinNotation::Pinyin,
        PinyinNotation::PinyinAscii,
        PinyinNotation::PinyinNumeric,
        PinyinNotation::PinyinAsciiInitial,
    ];
}

/// Anything a reading table can be made of: compiled records or static
/// [`Reading`] literals.
pub trait ReadingSource {
    fn reading(&self) -> Reading<'_>;
}

impl ReadingSource for Reading<'_> {
    fn reading(&self) -> Reading<'_> {
        *self
    }
}

impl ReadingSource for ReadingRecord {
    fn reading(&self) -> Reading<'_> {
        Reading::new(&self.pinyin, &self.ascii, &self.numeric)
    }
}

/// Anything a range table can be made of.
pub trait RangeSource {
    fn start(&self) -> u32;
    fn end(&self) -> u32;
    fn table(&self) -> &[u16];
}

/// A code point range as emitted into static data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinyinRange<'a> {
    start: u32,
    end: u32,
    /// Indices into the reading-set table, [`SENTINEL`] for none.
    table: &'a [u16],
}

impl<'a> PinyinRange<'a> {
    pub const fn new(start: u32, end: u32, table: &'a [u16]) -> Self {
        Self { start, end, table }
    }
}

impl RangeSource for PinyinRange<'_> {
    fn start(&self) -> u32 {
        self.start
    }

    fn end(&self) -> u32 {
        self.end
    }

    fn table(&self) -> &[u16] {
        self.table
    }
}

impl RangeSource for CodepointRange {
    fn start(&self) -> u32 {
        self.start
    }

    fn end(&self) -> u32 {
        self.end
    }

    fn table(&self) -> &[u16] {
        &self.table
    }
}

/// Read-only view over a compiled table set.
///
/// Works the same over [`CompiledPinyin`](super::CompiledPinyin) data and
/// over emitted `static` arrays. Holds only shared references, so any
/// number of threads can query one view concurrently.
#[derive(Debug)]
pub struct PinyinTables<'a, R = Reading<'a>, G = PinyinRange<'a>> {
    readings: &'a [R],
    /// Reading sets, row-major, `arity` IDs per row.
    sets: &'a [u16],
    arity: usize,
    /// Sorted by start, pairwise disjoint.
    ranges: &'a [G],
}

impl<R, G> Clone for PinyinTables<'_, R, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, G> Copy for PinyinTables<'_, R, G> {}

impl<'a, R, G> PinyinTables<'a, R, G> {
    /// Assemble a view. The caller guarantees the table invariants, which
    /// the compiler checks before producing any of these slices.
    pub const fn new(readings: &'a [R], sets: &'a [u16], arity: usize, ranges: &'a [G]) -> Self {
        Self {
            readings,
            sets,
            arity,
            ranges,
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }
}

impl<'a, R: ReadingSource, G: RangeSource> PinyinTables<'a, R, G> {
    /// Reading-set index for code point `c`, or `None` if `c` is outside
    /// every range or explicitly has no reading.
    pub fn set_index(&self, c: u32) -> Option<u16> {
        let i = self
            .ranges
            .binary_search_by(|range| {
                if range.end() < c {
                    Ordering::Less
                } else if range.start() > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()?;
        let range = &self.ranges[i];
        match range.table().get((c - range.start()) as usize).copied()? {
            SENTINEL => None,
            index => Some(index),
        }
    }

    /// Padded row of reading IDs for a reading-set index.
    fn row(&self, index: u16) -> &'a [u16] {
        let start = index as usize * self.arity;
        self.sets.get(start..start + self.arity).unwrap_or(&[])
    }

    /// Readings of `c` in preference order, or `None` if it has none.
    ///
    /// The returned iterator is never empty.
    pub fn query(&self, c: char) -> Option<Pinyins<'a, R>> {
        self.query_scalar(c as u32)
    }

    /// [`query`](Self::query) for a raw scalar value.
    pub fn query_scalar(&self, c: u32) -> Option<Pinyins<'a, R>> {
        let row = self.row(self.set_index(c)?);
        match row.first() {
            Some(&id) if id != SENTINEL => Some(Pinyins {
                readings: self.readings,
                ids: row.iter(),
            }),
            _ => None,
        }
    }

    /// Call `f` for each reading of `c` in preference order.
    pub fn for_each_pinyin(&self, c: char, mut f: impl FnMut(Reading<'a>)) {
        if let Some(pinyins) = self.query(c) {
            pinyins.for_each(&mut f);
        }
    }

    /// Preferred reading of `c`.
    pub fn primary(&self, c: char) -> Option<Reading<'a>> {
        self.query(c)?.next()
    }
}

/// Iterator over the readings of one code point.
pub struct Pinyins<'a, R = Reading<'a>> {
    readings: &'a [R],
    ids: slice::Iter<'a, u16>,
}

impl<'a, R: ReadingSource> Iterator for Pinyins<'a, R> {
    type Item = Reading<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.ids.next() {
            Some(&id) if id != SENTINEL => self.readings.get(id as usize).map(|r| r.reading()),
            _ => {
                let done: &'a [u16] = &[];
                self.ids = done.iter();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.ids.len()))
    }
}

impl<R> fmt::Debug for Pinyins<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pinyins")
            .field("remaining", &self.ids.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: u16 = SENTINEL;

    static READINGS: [Reading<'static>; 3] = [
        Reading::new("zhōng", "zhong", "zhong1"),
        Reading::new("zhòng", "zhong", "zhong4"),
        Reading::new("yī", "yi", "yi1"),
    ];
    static SETS: [u16; 4] = [0, 1, 2, F];
    static RANGES: [PinyinRange<'static>; 2] = [
        PinyinRange::new(0x4E00, 0x4E00, &[1]),
        PinyinRange::new(0x4E2D, 0x4E2F, &[0, F, 1]),
    ];
    static TABLES: PinyinTables<'static> = PinyinTables::new(&READINGS, &SETS, 2, &RANGES);

    #[test]
    fn query_static_tables() {
        let zhong: Vec<_> = TABLES.query('中').unwrap().collect();
        assert_eq!(zhong, vec![READINGS[0], READINGS[1]]);

        let yi: Vec<_> = TABLES.query('一').unwrap().map(|r| r.numeric).collect();
        assert_eq!(yi, vec!["yi1"]);
    }

    #[test]
    fn sentinel_inside_range() {
        assert!(TABLES.query('\u{4E2E}').is_none());
    }

    #[test]
    fn outside_every_range() {
        assert!(TABLES.query('\u{4DFF}').is_none());
        assert!(TABLES.query('\u{4E01}').is_none());
        assert!(TABLES.query('\u{4E30}').is_none());
        assert!(TABLES.query('a').is_none());
        assert!(TABLES.query(char::MAX).is_none());
    }

    #[test]
    fn primary_reading() {
        assert_eq!(TABLES.primary('\u{4E2F}').unwrap().pinyin, "yī");
        assert_eq!(TABLES.primary('\u{4E2E}'), None);
    }

    #[test]
    fn for_each_pinyin() {
        let mut seen = Vec::new();
        TABLES.for_each_pinyin('中', |r| seen.push(r.numeric));
        assert_eq!(seen, vec!["zhong1", "zhong4"]);
    }

    #[test]
    fn iterator_stops_at_sentinel() {
        let mut pinyins = TABLES.query('\u{4E2F}').unwrap();
        assert!(pinyins.next().is_some());
        assert!(pinyins.next().is_none());
        assert!(pinyins.next().is_none());
    }

    #[test]
    fn notations() {
        let r = READINGS[0];
        assert_eq!(r.notation(PinyinNotation::Pinyin), "zhōng");
        assert_eq!(r.notation(PinyinNotation::PinyinAscii), "zhong");
        assert_eq!(r.notation(PinyinNotation::PinyinNumeric), "zhong1");
        assert_eq!(r.notation(PinyinNotation::PinyinAsciiInitial), "z");
        for notation in PinyinNotation::ALL {
            assert!(!r.notation(notation).is_empty());
        }
        assert_eq!(Reading::new("", "", "").notation(PinyinNotation::PinyinAsciiInitial), "");
    }

    #[test]
    fn concurrent_readers() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| TABLES.query('中').map(Iterator::count)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(2));
        }
    }
}
