//! Normalization pass: comment stripping and whitespace collapse.
//!
//! Matching is purely textual. A `//` inside a string literal or regex is
//! indistinguishable from a real comment and is stripped with the rest of
//! the line. That is a known limitation of the pattern-based approach, not
//! something callers should work around here.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").unwrap());

/// Non-greedy to the nearest `*/`; an unterminated opener swallows
/// everything to the end of the text.
static BLOCK_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*(?:.*?\*/|.*)").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip comments and collapse every whitespace run to a single space.
///
/// Line comments are removed before block comments, so a `//` ahead of a
/// `/*` on the same line takes the block opener with it. Total function:
/// any input produces a (possibly empty) trimmed string.
pub fn normalize(text: &str) -> String {
    let stripped = LINE_COMMENT_RE.replace_all(text, "");
    let stripped = BLOCK_COMMENT_RE.replace_all(&stripped, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}
