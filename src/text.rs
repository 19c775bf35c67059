//! Small text helpers shared by the parsers and the matcher.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Normalise a name for fuzzy comparison.
///
/// Lowercases, decomposes (NFKD), turns everything except `a-z` and `0-9`
/// into a space, then collapses whitespace. Combining marks left by the
/// decomposition become spaces too, so an accent splits its word:
/// `"Crème Brûlée (GF)"` becomes `"cre me bru le e gf"`.
pub fn normalize(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .nfkd()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\S*").unwrap());

/// Title-case a section header.
///
/// The header is lowercased first, then the first character of every word
/// (a run starting at a word character) is uppercased. Punctuation that
/// opens a token is left alone: `"(am) prep"` → `"(Am) Prep"`.
pub fn title_case(s: &str) -> String {
    let lower = s.to_lowercase();
    RE_WORD
        .replace_all(&lower, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .into_owned()
}
