//! Character-level Unicode helpers shared by the table builders.

/// Check the full Hiragana block (U+3040..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF) and the phonetic
/// extensions block (U+31F0..U+31FF).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c) || ('\u{31F0}'..='\u{31FF}').contains(&c)
}

/// Halfwidth katakana forms (U+FF65..U+FF9F), used by the "half kana"
/// section of the Hepburn dictionaries.
pub fn is_halfwidth_katakana(c: char) -> bool {
    ('\u{FF65}'..='\u{FF9F}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || is_halfwidth_katakana(c)
}

/// CJK unified ideographs, including the extension blocks that carry pinyin.
pub fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || ('\u{20000}'..='\u{3134F}').contains(&c)
}

/// Decode a token written as `prefix` followed by hex digits into the
/// character it names.
///
/// Returns `None` if the token doesn't start with `prefix`, and
/// `Some(Err(token))` if it does but the digits don't name a scalar value.
pub fn decode_escaped_scalar<'a>(token: &'a str, prefix: &str) -> Option<Result<char, &'a str>> {
    let digits = token.strip_prefix(prefix)?;
    Some(
        u32::from_str_radix(digits, 16)
            .ok()
            .filter(|_| !digits.is_empty() && digits.len() <= 8)
            .and_then(char::from_u32)
            .ok_or(token),
    )
}

/// Largest char boundary of `s` not exceeding `index`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
    }
}
