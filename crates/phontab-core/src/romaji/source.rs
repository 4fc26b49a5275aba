use tracing::{debug, debug_span};

use super::RomajiError;
use crate::settings::RomajiSettings;
use crate::unicode::decode_escaped_scalar;

/// One `romaji kana` pair read from a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanaRecord {
    pub romaji: String,
    /// Kana spelling with escapes already decoded.
    pub kana: String,
    /// Whether the record follows the half kana marker comment.
    pub half: bool,
    /// Dictionary the record came from.
    pub source_name: String,
    pub line: usize,
}

/// Classification of one dictionary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryLine<'a> {
    Blank,
    Comment,
    /// The comment that starts the half-width kana section.
    HalfKanaMarker,
    Record { romaji: &'a str, kana: String },
}

impl<'a> DictionaryLine<'a> {
    /// Classify `line`. Records are exactly two tokens separated by one
    /// space; an escaped kana token is decoded to the character it names.
    pub fn parse(line: &'a str, settings: &RomajiSettings) -> Result<Self, String> {
        if line.is_empty() {
            return Ok(Self::Blank);
        }
        if line == settings.half_kana_marker {
            return Ok(Self::HalfKanaMarker);
        }
        if line.starts_with(&settings.comment_prefix) {
            return Ok(Self::Comment);
        }

        let fields: Vec<&str> = line.split(' ').collect();
        let [romaji, kana] = fields[..] else {
            return Err(format!(
                "expected `romaji kana`, got {} space-separated fields",
                fields.len()
            ));
        };
        if romaji.is_empty() || kana.is_empty() {
            return Err("empty romaji or kana".to_string());
        }
        let kana = match decode_escaped_scalar(kana, &settings.escape_prefix) {
            Some(Ok(c)) => c.to_string(),
            Some(Err(token)) => return Err(format!("invalid escaped kana '{token}'")),
            None => kana.to_string(),
        };
        Ok(Self::Record { romaji, kana })
    }
}

/// Dictionary parser that keeps the half kana flag between texts.
///
/// Once a dictionary contains the half kana marker, records of every later
/// dictionary parsed by the same parser are flagged as half kana too.
#[derive(Debug, Clone, Default)]
pub struct DictionaryParser {
    half: bool,
}

impl DictionaryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the half kana marker has been seen.
    pub fn in_half_section(&self) -> bool {
        self.half
    }

    /// Parse one dictionary text into records, in file order.
    pub fn parse(
        &mut self,
        source_name: &str,
        text: &str,
        settings: &RomajiSettings,
    ) -> Result<Vec<KanaRecord>, RomajiError> {
        let _span = debug_span!("parse_dictionary", source = source_name).entered();
        let mut records = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let parsed =
                DictionaryLine::parse(line, settings).map_err(|reason| RomajiError::Format {
                    source_name: source_name.to_string(),
                    line: line_no,
                    reason,
                })?;
            match parsed {
                DictionaryLine::Blank | DictionaryLine::Comment => {}
                DictionaryLine::HalfKanaMarker => self.half = true,
                DictionaryLine::Record { romaji, kana } => records.push(KanaRecord {
                    romaji: romaji.to_string(),
                    kana,
                    half: self.half,
                    source_name: source_name.to_string(),
                    line: line_no,
                }),
            }
        }

        debug!(records = records.len(), half = self.half, "parsed kana dictionary");
        Ok(records)
    }
}

/// Parse a single dictionary text; the half kana flag starts cleared.
pub fn parse_dictionary(
    source_name: &str,
    text: &str,
    settings: &RomajiSettings,
) -> Result<Vec<KanaRecord>, RomajiError> {
    DictionaryParser::new().parse(source_name, text, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RomajiSettings {
        RomajiSettings::default()
    }

    #[test]
    fn classify_lines() {
        let s = settings();
        assert_eq!(DictionaryLine::parse("", &s), Ok(DictionaryLine::Blank));
        assert_eq!(
            DictionaryLine::parse(";; hepburn dictionary", &s),
            Ok(DictionaryLine::Comment)
        );
        assert_eq!(
            DictionaryLine::parse(";; half kana mappings", &s),
            Ok(DictionaryLine::HalfKanaMarker)
        );
        assert_eq!(
            DictionaryLine::parse("ka か", &s),
            Ok(DictionaryLine::Record {
                romaji: "ka",
                kana: "か".to_string()
            })
        );
    }

    #[test]
    fn escaped_kana_decoded() {
        let s = settings();
        assert_eq!(
            DictionaryLine::parse("ko \\U1B001", &s),
            Ok(DictionaryLine::Record {
                romaji: "ko",
                kana: "\u{1B001}".to_string()
            })
        );
        assert!(DictionaryLine::parse("ko \\Uxyz", &s).is_err());
    }

    #[test]
    fn malformed_records() {
        let s = settings();
        assert!(DictionaryLine::parse("ka", &s).is_err());
        assert!(DictionaryLine::parse("ka  か", &s).is_err());
        assert!(DictionaryLine::parse("ka か extra", &s).is_err());
        assert!(DictionaryLine::parse(" か", &s).is_err());
    }

    #[test]
    fn tracks_half_kana_section() {
        let text = ";; full\nka か\n;; half kana mappings\nka ｶ\n";
        let records = parse_dictionary("hira", text, &settings()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].half);
        assert!(records[1].half);
        assert_eq!(records[1].kana, "ｶ");
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].source_name, "hira");
    }

    #[test]
    fn error_reports_source_and_line() {
        let err = parse_dictionary("dict", "a あ\nbroken\n", &settings()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "dict:2: expected `romaji kana`, got 1 space-separated fields"
        );
    }

    #[test]
    fn half_flag_persists_across_texts() {
        let mut parser = DictionaryParser::new();
        let first = parser.parse("a", "ka か
", &settings()).unwrap();
        assert!(!first[0].half);
        assert!(!parser.in_half_section());

        parser
            .parse("b", ";; half kana mappings
ka ｶ
", &settings())
            .unwrap();
        assert!(parser.in_half_section());
        let third = parser.parse("c", "ki ｷ
", &settings()).unwrap();
        assert!(third[0].half);

        let fresh = parse_dictionary("c", "ki ｷ
", &settings()).unwrap();
        assert!(!fresh[0].half);
    }
}
