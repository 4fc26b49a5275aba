//! Build settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before the first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Builders never read the singleton themselves; callers pass the relevant
//! section in, so tests can use `parse_settings_toml` directly.

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
///
/// Falls back to the embedded defaults if the custom TOML was rejected
/// after validation (which `init_custom` already prevents).
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        CUSTOM_TOML
            .get()
            .and_then(|s| parse_settings_toml(s).ok())
            .unwrap_or_else(Settings::builtin)
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pinyin: PinyinSettings,
    pub romaji: RomajiSettings,
    pub emit: EmitSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinyinSettings {
    pub strict_sections: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RomajiSettings {
    pub comment_prefix: String,
    pub half_kana_marker: String,
    pub escape_prefix: String,
    pub duplicate_kana: DuplicatePolicy,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmitSettings {
    pub group_size: usize,
}

/// How the kana table builder treats one romaji listing the same kana twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    Warn,
    Error,
}

impl Default for PinyinSettings {
    fn default() -> Self {
        Self {
            strict_sections: true,
        }
    }
}

impl Default for RomajiSettings {
    fn default() -> Self {
        Self {
            comment_prefix: ";;".to_string(),
            half_kana_marker: ";; half kana mappings".to_string(),
            escape_prefix: "\\U".to_string(),
            duplicate_kana: DuplicatePolicy::Warn,
            sources: Vec::new(),
        }
    }
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self { group_size: 8 }
    }
}

impl Settings {
    /// The embedded defaults. The file is checked by `build.rs`, so parsing
    /// only fails if it was edited into something that no longer validates.
    fn builtin() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap_or_else(|e| {
            tracing::error!("embedded settings rejected: {e}");
            Self {
                pinyin: PinyinSettings::default(),
                romaji: RomajiSettings::default(),
                emit: EmitSettings::default(),
            }
        })
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_non_empty!(romaji.comment_prefix);
    check_non_empty!(romaji.half_kana_marker);
    check_non_empty!(romaji.escape_prefix);
    check_non_empty!(romaji.sources);

    if !s.romaji.half_kana_marker.starts_with(&s.romaji.comment_prefix) {
        return Err(SettingsError::InvalidValue {
            field: "romaji.half_kana_marker".to_string(),
            reason: "must be a comment line".to_string(),
        });
    }
    if s.emit.group_size == 0 {
        return Err(SettingsError::InvalidValue {
            field: "emit.group_size".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert!(s.pinyin.strict_sections);
        assert_eq!(s.romaji.comment_prefix, ";;");
        assert_eq!(s.romaji.escape_prefix, "\\U");
        assert_eq!(s.romaji.duplicate_kana, DuplicatePolicy::Warn);
        assert_eq!(s.romaji.sources.len(), 2);
        assert_eq!(s.emit.group_size, 8);
    }

    #[test]
    fn duplicate_policy_error() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            "duplicate_kana = \"warn\"",
            "duplicate_kana = \"error\"",
        );
        let s = parse_settings_toml(&toml).unwrap();
        assert_eq!(s.romaji.duplicate_kana, DuplicatePolicy::Error);
    }

    #[test]
    fn unknown_duplicate_policy_rejected() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            "duplicate_kana = \"warn\"",
            "duplicate_kana = \"ignore\"",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn zero_group_size_rejected() {
        let toml = DEFAULT_SETTINGS_TOML.replace("group_size = 8", "group_size = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        match err {
            SettingsError::InvalidValue { field, .. } => assert_eq!(field, "emit.group_size"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn marker_must_be_comment() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            "half_kana_marker = \";; half kana mappings\"",
            "half_kana_marker = \"half kana mappings\"",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn builtin_matches_embedded() {
        let s = Settings::builtin();
        assert_eq!(s.emit.group_size, 8);
        assert!(default_toml().contains("[pinyin]"));
    }
}
