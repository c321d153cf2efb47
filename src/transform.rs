//! Pipeline driver composing the three passes.

use crate::idents::rename_identifiers;
use crate::normalize::normalize;
use crate::strings::encode_strings;

/// Caller-selected pipeline options. Both optional passes default to off;
/// normalization always runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub rename_identifiers: bool,
    pub encode_strings: bool,
}

/// Run the pipeline: normalize, then optionally encode strings, then
/// optionally rename identifiers. Whitespace-only input short-circuits to
/// an empty string.
///
/// Pure and deterministic; nothing is carried over between calls.
///
/// When both optional passes are on, the renamer also sees the `atob`
/// calls the string pass just produced: `atob` itself and identifier-shaped
/// runs inside the base64 payloads are renamed like any other token.
/// Reversing such output requires the rename map.
pub fn transform(source: &str, options: &TransformOptions) -> String {
    if source.trim().is_empty() {
        return String::new();
    }

    let mut result = normalize(source);
    if options.encode_strings {
        result = encode_strings(&result);
    }
    if options.rename_identifiers {
        result = rename_identifiers(&result);
    }
    result
}
