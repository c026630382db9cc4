//! Keyword normalization and variant generation.
//!
//! The upstream search endpoints are picky about casing and accents, so a
//! single topic is tried under several spellings. [`variants`] produces them
//! in the order they are attempted.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("punctuation regex is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// `true` when the keyword is empty or only whitespace.
pub fn is_blank(keyword: &str) -> bool {
    keyword.trim().is_empty()
}

/// Remove diacritics: `"educação"` -> `"educacao"`.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Upper-case the first letter of every word, lower-case the rest.
///
/// Words are separated by whitespace and the separators are preserved.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Lower-case, strip punctuation and collapse whitespace.
///
/// Matches the normalization applied to the subject column in the judicial
/// warehouse query.
pub fn search_term(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Spellings to try, in order: original, accent-stripped lowercase, title
/// case, uppercase. Duplicates are dropped keeping the first occurrence.
pub fn variants(keyword: &str) -> Vec<String> {
    let k = keyword.trim();
    if k.is_empty() {
        return Vec::new();
    }
    [
        k.to_string(),
        strip_accents(k).to_lowercase(),
        title_case(k),
        k.to_uppercase(),
    ]
    .into_iter()
    .unique()
    .collect()
}
