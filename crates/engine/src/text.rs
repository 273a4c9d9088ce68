//! Small text helpers used when rendering explanations.

use std::collections::BTreeSet;

/// Characters stripped from both ends of a description token
const TOKEN_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"'];

/// Tokens must be longer than this many characters (before stripping)
const MIN_TOKEN_CHARS: usize = 3;

/// Replace every run of whitespace with a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten a description to at most `max_chars` characters plus `"..."`.
///
/// Whitespace is collapsed first. Longer text is cut at the last space at
/// or before `max_chars`, so a word is never split. A single word longer
/// than the limit is cut at the limit.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    let text = collapse_whitespace(text);
    if text.chars().count() <= max_chars {
        return text;
    }

    let prefix: String = text.chars().take(max_chars).collect();
    let kept = match prefix.rfind(' ') {
        Some(pos) => &prefix[..pos],
        None => prefix.as_str(),
    };
    format!("{}...", kept)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"science fiction"` becomes `"Science Fiction"`, `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }
    out
}

/// Case-folded, punctuation-stripped words of a description
pub fn description_tokens(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .map(|word| word.to_lowercase().trim_matches(TOKEN_PUNCTUATION).to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
