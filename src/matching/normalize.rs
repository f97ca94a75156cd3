//! Name normalization shared by the matchers.

use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

const STOPWORDS: &[&str] = &["the", "a", "an", "and", "or", "of", "in", "on", "at", "to", "for"];

/// NFC-compose then lowercase.
///
/// NAS shares frequently hand back decomposed (NFD) names; composing first
/// lets them compare equal to ledger text typed by hand.
pub fn fold_case(name: &str) -> String {
    name.nfc().collect::<String>().to_lowercase()
}

/// Folder-name form: lowercase, `-`/`_` become spaces, whitespace collapsed
pub fn normalize_folder_name(name: &str) -> String {
    let replaced: String = fold_case(name)
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    collapse_whitespace(&replaced)
}

/// File/title form: extension stripped, lowercase, only `a-z`, `0-9`,
/// Hangul syllables and whitespace survive, whitespace collapsed
pub fn normalize_title(name: &str) -> String {
    let composed: String = name.nfc().collect();
    let stem = strip_extension(&composed);
    let cleaned: String = stem
        .to_lowercase()
        .chars()
        .map(|c| if is_title_char(c) { c } else { ' ' })
        .collect();
    collapse_whitespace(&cleaned)
}

/// Stopword-filtered keyword set of a file name or title
pub fn keywords(text: &str) -> BTreeSet<String> {
    normalize_title(text)
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Whitespace-separated words of an already-normalized name
pub fn word_set(normalized: &str) -> BTreeSet<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop a trailing `.` followed by 2-4 ASCII alphanumerics
fn strip_extension(name: &str) -> &str {
    if let Some((stem, ext)) = name.rsplit_once('.') {
        if (2..=4).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return stem;
        }
    }
    name
}

fn is_title_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ('\u{AC00}'..='\u{D7A3}').contains(&c) || c.is_whitespace()
}
