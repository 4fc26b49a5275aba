mod tables_io;

use super::{CompiledPinyin, PinyinSource, RawCombination, RawRange, ReadingRecord};

pub(super) fn reading(pinyin: &str, ascii: &str, numeric: &str) -> ReadingRecord {
    ReadingRecord {
        pinyin: pinyin.to_string(),
        ascii: ascii.to_string(),
        numeric: numeric.to_string(),
    }
}

/// 中 (zhōng, zhòng), 一 (yī), 乐 (lè, yuè), with 丁 explicitly unmapped.
pub(super) const SAMPLE: &str = "pinyins:
zhōng,zhong1,zhong,zhong1
zhòng,zhong4,zhong,zhong4
yī,yi1,yi,yi1
lè,le4,le,le4
yuè,yue4,yue,yue4

pinyin_combinations:
0,1
2
3,4
1

pinyin_tables:
4E00,4E01:
1,65535
4E2D,4E2D:
0
4E50,4E50:
2
";

pub(super) fn sample() -> CompiledPinyin {
    CompiledPinyin::from_text(SAMPLE, &Default::default()).unwrap()
}

pub(super) fn source(
    readings: Vec<ReadingRecord>,
    combinations: &[&[u32]],
    ranges: &[(u32, u32, &str)],
) -> PinyinSource {
    PinyinSource {
        readings,
        combinations: combinations
            .iter()
            .enumerate()
            .map(|(i, ids)| RawCombination {
                line: i + 1,
                ids: ids.to_vec(),
            })
            .collect(),
        ranges: ranges
            .iter()
            .enumerate()
            .map(|(i, &(start, end, data))| RawRange {
                line: 2 * i + 1,
                start,
                end,
                data_line: 2 * i + 2,
                data: data.to_string(),
            })
            .collect(),
    }
}
