//! Identifier renaming pass.
//!
//! Discovers identifier-shaped tokens, skips language keywords and
//! well-known globals, and maps every remaining distinct token to a short
//! generated name in order of first appearance.
//!
//! There is no scope analysis: a variable `x` and a bare property `x` are
//! indistinguishable here and both get renamed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Language keywords that must never be renamed.
const RESERVED_WORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    "let",
    "enum",
    "await",
    "implements",
    "package",
    "protected",
    "static",
    "interface",
    "private",
    "public",
];

/// Well-known globals excluded from renaming. Fixed list; `atob` is
/// deliberately not on it, see [`crate::transform::transform`].
const BUILTINS: &[&str] = &[
    "Array",
    "Boolean",
    "Date",
    "Math",
    "Number",
    "Object",
    "RegExp",
    "String",
    "JSON",
    "console",
    "document",
    "window",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
];

static RESERVED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

static BUILTIN_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| BUILTINS.iter().copied().collect());

/// Maximal identifier-shaped runs. The boundaries are ASCII word
/// boundaries, so a leading `$` only anchors after a word character; a
/// token like `$el` after whitespace is discovered as `el`.
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[$A-Za-z_][0-9A-Za-z_$]*(?-u:\b)").unwrap());

/// Ordered mapping from original identifiers to generated names.
///
/// Entry order is first-discovery order in the scanned text; replacements
/// are `_0`, `_1`, ... `_z`, `_10`, ... (a base-36 counter). The map
/// serializes to YAML so the renaming can be reversed later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameMap {
    entries: Vec<(String, String)>,
}

impl RenameMap {
    /// Discover renameable identifiers in `text` and assign each a
    /// generated name.
    pub fn from_text(text: &str) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries: Vec<(String, String)> = Vec::new();

        for token in IDENT_RE.find_iter(text) {
            let token = token.as_str();
            if RESERVED_SET.contains(token) || BUILTIN_SET.contains(token) {
                continue;
            }
            if seen.insert(token) {
                let replacement = short_name(entries.len());
                entries.push((token.to_string(), replacement));
            }
        }

        Self { entries }
    }

    /// Substitute every whole-word occurrence of each original, one entry
    /// at a time over the current text state. Later entries see the result
    /// of earlier substitutions; generated names cannot collide with each
    /// other, so the order only shows when the input itself contains
    /// `_<base36>`-shaped names.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (original, replacement) in &self.entries {
            result = replace_word(&result, original, replacement);
        }
        result
    }

    /// The `(original, replacement)` pairs in discovery order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Number of renamed identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was renamed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rename every non-reserved, non-builtin identifier in `text`.
pub fn rename_identifiers(text: &str) -> String {
    RenameMap::from_text(text).apply(text)
}

/// Generated name for the nth mapping entry: `_` + n in base 36.
fn short_name(index: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = index;
    let mut encoded = String::new();
    loop {
        encoded.insert(0, DIGITS[n % 36] as char);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    format!("_{}", encoded)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace whole-word occurrences of `from` with `to`, using ASCII
/// word-boundary semantics on both ends. Shared by the renamer and the
/// `unshroud` decoder.
pub fn replace_word(text: &str, from: &str, to: &str) -> String {
    let first_is_word = from.chars().next().map_or(false, is_word_char);
    let last_is_word = from.chars().next_back().map_or(false, is_word_char);

    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    for (start, matched) in text.match_indices(from) {
        let end = start + matched.len();
        let prev_is_word = text[..start].chars().next_back().map_or(false, is_word_char);
        let next_is_word = text[end..].chars().next().map_or(false, is_word_char);
        if prev_is_word != first_is_word && next_is_word != last_is_word {
            out.push_str(&text[last_end..start]);
            out.push_str(to);
            last_end = end;
        }
    }
    out.push_str(&text[last_end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renames_in_discovery_order() {
        assert_eq!(
            rename_identifiers("let foo = bar + foo;"),
            "let _0 = _1 + _0;"
        );
    }

    #[test]
    fn test_reserved_and_builtins_untouched() {
        assert_eq!(
            rename_identifiers("function foo(){ return Math.abs(foo); }"),
            "function _0(){ return Math._1(_0); }"
        );
    }

    #[test]
    fn test_whole_word_substitution_only() {
        // `value` and `values` are distinct tokens and must not bleed into
        // each other.
        assert_eq!(rename_identifiers("value values value"), "_0 _1 _0");
    }

    #[test]
    fn test_map_has_one_entry_per_distinct_token() {
        let map = RenameMap::from_text("foo bar foo");
        assert_eq!(
            map.entries(),
            &[
                ("foo".to_string(), "_0".to_string()),
                ("bar".to_string(), "_1".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_name_base36() {
        assert_eq!(short_name(0), "_0");
        assert_eq!(short_name(9), "_9");
        assert_eq!(short_name(10), "_a");
        assert_eq!(short_name(35), "_z");
        assert_eq!(short_name(36), "_10");
        assert_eq!(short_name(36 * 36), "_100");
    }

    #[test]
    fn test_base36_rollover_in_mapping() {
        let input: String = (0..37).map(|i| format!("v{} ", i)).collect();
        let map = RenameMap::from_text(&input);
        assert_eq!(map.len(), 37);
        assert_eq!(map.entries()[35], ("v35".to_string(), "_z".to_string()));
        assert_eq!(map.entries()[36], ("v36".to_string(), "_10".to_string()));
    }

    #[test]
    fn test_input_containing_generated_style_name() {
        // `_0` in the source is itself a renameable token; sequential
        // substitution keeps the result consistent.
        assert_eq!(rename_identifiers("let _0 = a;"), "let _0 = _1;");
    }

    #[test]
    fn test_dollar_prefixed_names() {
        // A leading `$` after whitespace sits outside the word boundary,
        // so `$el` contributes the token `el`.
        assert_eq!(rename_identifiers("$el.show($el)"), "$_0._1($_0)");
    }

    #[test]
    fn test_property_positions_are_renamed() {
        // No scope analysis: `obj.foo` renames both sides.
        assert_eq!(rename_identifiers("obj.foo = foo;"), "_0._1 = _1;");
    }

    #[test]
    fn test_map_yaml_round_trip() {
        let map = RenameMap::from_text("alpha beta");
        let yaml = serde_yaml::to_string(&map).unwrap();
        let back: RenameMap = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.entries(), map.entries());
    }

    #[test]
    fn test_replace_word_boundaries() {
        assert_eq!(replace_word("foo food foo", "foo", "_0"), "_0 food _0");
        assert_eq!(replace_word("a.foo(foo)", "foo", "_0"), "a._0(_0)");
        assert_eq!(replace_word("foofoo", "foo", "_0"), "foofoo");
    }

    #[test]
    fn test_empty_text() {
        let map = RenameMap::from_text("");
        assert!(map.is_empty());
        assert_eq!(rename_identifiers(""), "");
    }
}
