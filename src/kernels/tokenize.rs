//! Word/punctuation splitting used to feed a tagger running in pretokenized mode.
//!
//! Words keep internal hyphens, apostrophes, colons and periods (`BLM-1943:1`,
//! `t.ex`), every other non-space character becomes a token of its own.

use std::sync::OnceLock;

use regex::Regex;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\w+(?:[-'’:.]\w+)*|\S").expect("token pattern is a valid regex")
    })
}

/// Splits `text` into tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    token_pattern().find_iter(text).map(|m| m.as_str())
}

/// Tokenizes `text`, then joins the tokens with single spaces.
pub fn pretokenize(text: &str) -> String {
    tokenize(text).collect::<Vec<_>>().join(" ")
}
