use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes free text for address matching.
///
/// Lowercases, decomposes (NFD), drops combining marks, turns every
/// non-word character into a separator and collapses separators into single
/// spaces with no leading or trailing space. Letters outside ASCII that have
/// no decomposition (`ß`, `ø`, CJK, ...) are separators, just like
/// punctuation.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase).nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        if is_word_char(ch) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Word characters kept by [`normalize`]: ASCII letters, digits and `_`.
#[inline]
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
