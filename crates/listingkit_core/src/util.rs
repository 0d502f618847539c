//! Stateless text helpers behind title normalization.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::conf::{C_LABEL_FRAME, C_LABEL_UNFRAME};

static RE_FRAME_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:Frame|Unframe)-").expect("static regex"));
static RE_NUMERIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d+(\s|$)").expect("static regex"));
static RE_SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("static regex"));
// Longer literal first so leftmost-first matching never splits `Unframe-style`.
static RE_PROTECTED_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "{}|{}",
        regex::escape(C_LABEL_UNFRAME),
        regex::escape(C_LABEL_FRAME)
    ))
    .expect("static regex")
});

////////////////////////////////////////////////////////////////////////////////
// #region TitleHelpers

/// Collapse whitespace runs of two or more into one space, then trim.
pub fn collapse_spaces(text: &str) -> String {
    RE_SPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Strip the first ` Frame-…` / ` Unframe-…` variant tail from a title.
///
/// Titles without such a tail are only trimmed, so the function is
/// idempotent.
pub fn extract_base_title(name: &str) -> String {
    match RE_FRAME_SPLIT.find(name) {
        Some(m) => name[..m.start()].trim().to_string(),
        None => name.trim().to_string(),
    }
}

/// Drop `-<digits>` suffixes that end a word (`Art-1` -> `Art`).
///
/// `Frame-style` / `Unframe-style` are untouched because their hyphen is not
/// followed by digits.
pub fn remove_numeric_suffix(text: &str) -> String {
    RE_NUMERIC_SUFFIX.replace_all(text, "${1}").into_owned()
}

/// Replace `-` with a space everywhere except inside the variant labels.
pub fn replace_hyphens(text: &str) -> String {
    let mut c_out = String::with_capacity(text.len());
    let mut n_cursor = 0;
    for m in RE_PROTECTED_LABELS.find_iter(text) {
        c_out.push_str(&text[n_cursor..m.start()].replace('-', " "));
        c_out.push_str(m.as_str());
        n_cursor = m.end();
    }
    c_out.push_str(&text[n_cursor..].replace('-', " "));
    c_out
}

/// Replace `_` with a space.
pub fn replace_underscores(text: &str) -> String {
    text.replace('_', " ")
}

/// Drop the third and later occurrences of any word.
///
/// Words are split on single spaces and compared case-insensitively; kept
/// words retain their casing. Empty tokens pass through untouched.
pub fn deduplicate_words(text: &str) -> String {
    let mut dict_counts: HashMap<String, usize> = HashMap::new();
    let l_words: Vec<&str> = text
        .split(' ')
        .filter(|word| {
            if word.is_empty() {
                return true;
            }
            let n_seen = dict_counts.entry(word.to_lowercase()).or_insert(0);
            *n_seen += 1;
            *n_seen <= 2
        })
        .collect();
    l_words.join(" ")
}

/// Full cleaning pipeline applied to every constructed title.
///
/// Order matters: suffix removal must see collapsed spacing, and hyphen
/// replacement must run after suffixes are gone.
pub fn clean_title(text: &str) -> String {
    let c_name = collapse_spaces(text);
    let c_name = remove_numeric_suffix(&c_name);
    let c_name = replace_hyphens(&c_name);
    let c_name = replace_underscores(&c_name);
    let c_name = deduplicate_words(&c_name);
    collapse_spaces(&c_name)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
