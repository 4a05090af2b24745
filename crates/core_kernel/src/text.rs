//! Text normalisation used for tags, skills and vocabulary matching

use std::ops::Range;

/// Collapses runs of whitespace and trims the ends
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts free text into a lowercase, hyphen-separated slug
///
/// `"Knee Slice  Pass!"` becomes `"knee-slice-pass"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Number of characters (not bytes) in `input`
pub fn char_len(input: &str) -> usize {
    input.chars().count()
}

/// Byte ranges of every word-bounded occurrence of `phrase`
///
/// `haystack` must already be lowercase.
pub fn find_phrase(haystack: &str, phrase: &str) -> Vec<Range<usize>> {
    let needle = phrase.to_lowercase();
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(&needle) {
        let start = search_from + pos;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            found.push(start..end);
        }
        search_from = start + needle.chars().next().map_or(1, |c| c.len_utf8());
    }
    found
}

/// Case-insensitive phrase search on word boundaries
///
/// `haystack` must already be lowercase.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    !find_phrase(haystack, phrase).is_empty()
}

/// Splits text into sentences on `.`, `!`, `?`, `;` and newlines
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c| matches!(c, '.' | '!' | '?' | ';' | '\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
