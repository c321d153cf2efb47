//! shroud: pattern-based source obfuscator
//!
//! Takes a snippet of source text and produces a harder-to-read variant:
//! - Comments stripped, whitespace collapsed
//! - Identifiers renamed to short generated tokens
//! - String literals encoded into reversible `atob()` calls
//!
//! ## How it works
//!
//! 1. **Normalize**: remove `//` and `/* */` comments, collapse whitespace
//! 2. **Encode**: rewrite quoted literals as `atob("<base64>")` calls
//! 3. **Rename**: map each remaining identifier to `_0`, `_1`, ... in order
//!    of first appearance
//!
//! Every stage is a pure text-to-text function; [`transform`] composes them.
//! Matching is pattern-based, not a real lexer, so the output is merely less
//! readable. It is not guaranteed syntactically valid and offers no
//! protection for secrets.

pub mod idents;
pub mod normalize;
pub mod strings;
pub mod transform;

pub use idents::{rename_identifiers, replace_word, RenameMap};
pub use normalize::normalize;
pub use strings::{decode_strings, encode_strings};
pub use transform::{transform, TransformOptions};
