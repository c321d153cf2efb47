//! String-literal encoding pass.
//!
//! Quoted literals are replaced by `atob("<base64>")` call expressions. The
//! payload is the standard base64 encoding of the literal's UTF-8 bytes, so
//! the call only evaluates back to the original text in an environment
//! whose `atob` counterpart decodes those bytes as UTF-8.
//!
//! Backtick literals are matched but passed through untouched; rewriting
//! them would break embedded `${}` interpolation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One alternation per delimiter. Literals never span lines, and an
/// unterminated literal simply does not match.
static STRING_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'(?:\\.|[^'\\\r\n])*'|"(?:\\.|[^"\\\r\n])*"|`(?:\\.|[^`\\\r\n])*`"#).unwrap()
});

/// `atob("<base64>")` calls as produced by [`encode_strings`].
static ATOB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"atob\("([A-Za-z0-9+/=]*)"\)"#).unwrap());

/// Replace single- and double-quoted literals with `atob("<base64>")` calls.
///
/// Template expressions inside backtick literals are not recursed into.
pub fn encode_strings(text: &str) -> String {
    STRING_LITERAL_RE
        .replace_all(text, |caps: &Captures| {
            let literal = &caps[0];
            if literal.starts_with('`') {
                return literal.to_string();
            }
            let raw = resolve_escapes(&literal[1..literal.len() - 1]);
            format!("atob(\"{}\")", STANDARD.encode(raw.as_bytes()))
        })
        .into_owned()
}

/// Decode every `atob("<base64>")` call back into a double-quoted literal.
///
/// The inverse of [`encode_strings`], used by the `unshroud` binary. Calls
/// whose payload is not valid base64, or whose decoded bytes are not valid
/// UTF-8, are left in place.
pub fn decode_strings(text: &str) -> String {
    ATOB_RE
        .replace_all(text, |caps: &Captures| {
            let decoded = STANDARD
                .decode(&caps[1])
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok());
            match decoded {
                Some(raw) => format!("\"{}\"", escape_literal(&raw)),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Minimal escape resolution: `\n`, `\t` and `\r` become their control
/// characters, any other `\c` pair becomes `c`. A trailing lone backslash
/// is kept as-is.
fn resolve_escapes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Re-escape raw text for embedding in a double-quoted literal.
fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
