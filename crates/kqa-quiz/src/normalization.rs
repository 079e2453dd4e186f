//! Lenient text comparison for repairing generated answer keys.
//!
//! Generated questions sometimes name the correct answer with different
//! casing, spacing, accents or trailing punctuation than the option it refers
//! to ("the blue whale." vs "The Blue Whale"). Scoring itself always uses exact
//! equality; this module is only consulted when a record arrives whose answer
//! key matches none of its options exactly.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for answer key comparison.
///
/// Applies the following transformations in order:
/// 1. Lowercase
/// 2. Ligature expansion (e.g. `ß` -> `ss`)
/// 3. Unicode NFD decomposition to separate base characters from combining marks
/// 4. Strip everything that is not a letter, digit or whitespace
/// 5. Collapse and trim whitespace
pub fn normalize_for_comparison(s: &str) -> String {
    s.to_lowercase()
        .replace('ß', "ss")
        .replace('æ', "ae")
        .replace('œ', "oe")
        .nfd()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the single option that leniently matches `answer`.
///
/// Returns `None` when no option matches or when more than one does, so an
/// ambiguous key is never silently resolved.
pub fn find_lenient_match<'a>(answer: &str, options: &'a [String]) -> Option<&'a String> {
    let wanted = normalize_for_comparison(answer);
    if wanted.is_empty() {
        return None;
    }

    let mut matches = options
        .iter()
        .filter(|option| normalize_for_comparison(option) == wanted);

    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
