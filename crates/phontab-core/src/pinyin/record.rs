use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use tracing::{debug, debug_span, warn};

use super::PinyinError;
use crate::settings::PinyinSettings;

const PINYINS_HEADER: &str = "pinyins:";
const COMBINATIONS_HEADER: &str = "pinyin_combinations:";
const TABLES_HEADER: &str = "pinyin_tables:";

/// One row of the `pinyins:` section: columns 0, 2 and 3 of the CSV line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRecord {
    /// Tone-marked form, e.g. `zhōng`.
    pub pinyin: String,
    /// Plain ASCII form, e.g. `zhong`.
    pub ascii: String,
    /// Numeric-tone form, e.g. `zhong1`.
    pub numeric: String,
}

/// One row of the `pinyin_combinations:` section, before padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCombination {
    pub line: usize,
    /// Reading IDs in preference order. Kept wider than `u16` so the
    /// normalizer can report sentinel collisions instead of overflows.
    pub ids: Vec<u32>,
}

/// One header/data line pair of the `pinyin_tables:` section.
///
/// The dense data stays textual here; the range table builder parses and
/// validates it against the reading-set table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRange {
    pub line: usize,
    pub start: u32,
    pub end: u32,
    pub data_line: usize,
    pub data: String,
}

impl RawRange {
    /// Number of code points covered, i.e. the expected dense array length.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

/// Everything read from one compact pinyin source file.
///
/// Produced by [`parse_source`] and consumed by the builders; it owns no
/// state beyond one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinyinSource {
    pub readings: Vec<ReadingRecord>,
    pub combinations: Vec<RawCombination>,
    pub ranges: Vec<RawRange>,
}

/// Line cursor with 1-based line numbers.
struct Cursor<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.lines.next().map(|(i, line)| (i + 1, line))
    }

    /// Next line of the current section, or `None` at a blank line
    /// (consumed) or end of input.
    fn next_record(&mut self) -> Option<(usize, &'a str)> {
        match self.next()? {
            (_, "") => None,
            record => Some(record),
        }
    }

    fn peek_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines.peek().map(|&(i, line)| (i + 1, line))
    }

    /// Consume the rest of the input, returning the first non-blank line and
    /// the number of non-blank lines.
    fn drain(&mut self) -> (Option<(usize, &'a str)>, usize) {
        let mut first = None;
        let mut count = 0;
        while let Some((line_no, line)) = self.next() {
            if !line.is_empty() {
                first.get_or_insert((line_no, line));
                count += 1;
            }
        }
        (first, count)
    }

    /// Consume `header` if it is the next line.
    ///
    /// In strict mode any other line (or end of input) is an error. In
    /// lenient mode the section is treated as absent and nothing is consumed.
    fn enter_section(&mut self, header: &str, strict: bool) -> Result<bool, PinyinError> {
        match self.peek_line() {
            Some((_, line)) if line == header => {
                self.next();
                Ok(true)
            }
            Some((line_no, line)) if strict => Err(PinyinError::format(
                line_no,
                format!("expected section header `{header}`, found `{line}`"),
            )),
            None if strict => Err(PinyinError::invalid(format!(
                "missing section header `{header}`"
            ))),
            _ => Ok(false),
        }
    }
}

/// Parse the compact pinyin source text.
///
/// Sections must appear in the fixed order `pinyins:`,
/// `pinyin_combinations:`, `pinyin_tables:`, each ending at a blank line
/// or end of input.
pub fn parse_source(text: &str, settings: &PinyinSettings) -> Result<PinyinSource, PinyinError> {
    let _span = debug_span!("parse_source", strict = settings.strict_sections).entered();
    let strict = settings.strict_sections;
    let mut cursor = Cursor::new(text);
    let mut source = PinyinSource::default();

    if cursor.enter_section(PINYINS_HEADER, strict)? {
        while let Some((line_no, line)) = cursor.next_record() {
            source.readings.push(parse_reading(line_no, line)?);
        }
    }
    if cursor.enter_section(COMBINATIONS_HEADER, strict)? {
        while let Some((line_no, line)) = cursor.next_record() {
            source.combinations.push(parse_combination(line_no, line)?);
        }
    }
    if cursor.enter_section(TABLES_HEADER, strict)? {
        while let Some((line_no, line)) = cursor.next_record() {
            let (start, end) = parse_range_header(line_no, line)?;
            let (data_line, data) = cursor.next_record().ok_or_else(|| {
                PinyinError::format(
                    line_no,
                    format!("range {start:X}..={end:X} has no data line"),
                )
            })?;
            source.ranges.push(RawRange {
                line: line_no,
                start,
                end,
                data_line,
                data: data.to_string(),
            });
        }
    }

    if let (Some((line_no, line)), skipped) = cursor.drain() {
        if strict {
            return Err(PinyinError::format(
                line_no,
                format!("unexpected content after `{TABLES_HEADER}` section: `{line}`"),
            ));
        }
        warn!(line = line_no, skipped, "unparsed lines after pinyin sections");
    }

    debug!(
        readings = source.readings.len(),
        combinations = source.combinations.len(),
        ranges = source.ranges.len(),
        "parsed pinyin source"
    );
    Ok(source)
}

fn parse_reading(line_no: usize, line: &str) -> Result<ReadingRecord, PinyinError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 4 {
        return Err(PinyinError::format(
            line_no,
            format!("expected at least 4 columns, got {}", fields.len()),
        ));
    }
    Ok(ReadingRecord {
        pinyin: fields[0].to_string(),
        ascii: fields[2].to_string(),
        numeric: fields[3].to_string(),
    })
}

fn parse_combination(line_no: usize, line: &str) -> Result<RawCombination, PinyinError> {
    let ids = line
        .split(',')
        .map(|field| {
            field.parse::<u32>().map_err(|e| {
                PinyinError::format(line_no, format!("invalid reading ID '{field}': {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawCombination { line: line_no, ids })
}

/// Parse `startHex,endHexX`. The last character is a formatting artifact
/// of the source file and is dropped before splitting.
fn parse_range_header(line_no: usize, line: &str) -> Result<(u32, u32), PinyinError> {
    let mut chars = line.chars();
    chars.next_back();
    let trimmed = chars.as_str();

    let Some((start, end)) = trimmed.split_once(',') else {
        return Err(PinyinError::format(
            line_no,
            format!("expected `start,end` range header, got `{line}`"),
        ));
    };
    let start = u32::from_str_radix(start, 16)
        .map_err(|e| PinyinError::format(line_no, format!("invalid range start '{start}': {e}")))?;
    let end = u32::from_str_radix(end, 16)
        .map_err(|e| PinyinError::format(line_no, format!("invalid range end '{end}': {e}")))?;

    if start > end {
        return Err(PinyinError::format(
            line_no,
            format!("range start {start:X} is after end {end:X}"),
        ));
    }
    if end > char::MAX as u32 {
        return Err(PinyinError::format(
            line_no,
            format!("range end {end:X} is beyond the last code point"),
        ));
    }
    Ok((start, end))
}
