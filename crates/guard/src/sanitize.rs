use std::sync::OnceLock;

use regex::Regex;

/// Default ceiling for a sanitized string, in UTF-16 code units.
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// Characters that are removed wherever they occur.
const STRIPPED_CHARACTERS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Script-like fragments that are removed wherever they occur.
static DANGEROUS_PATTERNS: OnceLock<Regex> = OnceLock::new();

fn dangerous_patterns() -> &'static Regex {
    DANGEROUS_PATTERNS.get_or_init(|| {
        Regex::new(r"(?i)javascript:|data:|vbscript:|on\w+\s*=").expect("dangerous pattern regex is valid")
    })
}

/// Cleans an untrusted string with the default length ceiling.
///
/// See [`sanitize_with_limit`].
pub fn sanitize(raw: &str) -> String {
    sanitize_with_limit(raw, DEFAULT_MAX_LENGTH)
}

/// Cleans an untrusted string.
///
/// Removes `<`, `>`, `"`, `'` and `&`, then removes `javascript:`, `data:`,
/// `vbscript:` and `on<word>=` event handler fragments regardless of case, and
/// finally cuts the result to at most `max_length` UTF-16 code units. Removal
/// repeats until nothing matches, so fragments spliced together by an earlier
/// removal are caught as well. Every other character is kept as is.
///
/// The length is a ceiling: removed characters are not padded back. A cut that
/// would split a surrogate pair drops the whole character.
pub fn sanitize_with_limit(raw: &str, max_length: usize) -> String {
    let mut cleaned: String = raw.chars().filter(|c| !STRIPPED_CHARACTERS.contains(c)).collect();

    while dangerous_patterns().is_match(&cleaned) {
        cleaned = dangerous_patterns().replace_all(&cleaned, "").into_owned();
    }

    truncate_utf16(&mut cleaned, max_length);
    cleaned
}

fn truncate_utf16(value: &mut String, max_length: usize) {
    let mut units = 0;

    for (index, c) in value.char_indices() {
        units += c.len_utf16();

        if units > max_length {
            value.truncate(index);
            return;
        }
    }
}
