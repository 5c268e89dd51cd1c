//! Text normalization for concept matching.
//!
//! Both the source text and every concept phrase pass through the same
//! routine, so matching happens in a single token space:
//!
//! 1. Optional Unicode NFKC normalization
//! 2. Locale-free Unicode lowercasing (one char may expand into several)
//! 3. Alphanumeric characters are kept; combining marks are dropped in place;
//!    everything else is a separator
//! 4. Separator runs collapse to one ASCII space, edges are trimmed
//! 5. With NFKC on, steps 1-4 repeat until the text is stable
//!
//! ```rust
//! use concepts::normalize_for_concept_match;
//!
//! assert_eq!(
//!     normalize_for_concept_match("  Photosynthesis\u{2014}converts  light!  "),
//!     "photosynthesis converts light"
//! );
//! assert_eq!(normalize_for_concept_match("Newton's first law"), "newton s first law");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::ConceptMatchConfig;
use crate::token::{tokenize, Token};

/// Normalizes text with the default configuration.
///
/// Total and idempotent: the output contains only lowercase alphanumeric
/// tokens separated by single spaces, and normalizing it again returns it
/// unchanged. Empty input yields an empty string.
pub fn normalize_for_concept_match(text: &str) -> String {
    normalize_with_config(text, &ConceptMatchConfig::default())
}

/// Upper bound on NFKC passes; real text settles after the second.
const MAX_PASSES: usize = 4;

/// Normalizes text using the Unicode policy of `cfg`.
///
/// Dropping a mark can leave two characters side by side that NFKC composes
/// (conjoining Hangul jamo, for one), so with NFKC enabled the pass repeats
/// until the output stops changing.
pub fn normalize_with_config(text: &str, cfg: &ConceptMatchConfig) -> String {
    if !cfg.normalize_unicode {
        return fold_chars(text);
    }

    let mut normalized = fold_chars(&text.nfkc().collect::<String>());
    for _ in 1..MAX_PASSES {
        if normalized.is_ascii() {
            break;
        }
        let next = fold_chars(&normalized.nfkc().collect::<String>());
        if next == normalized {
            break;
        }
        normalized = next;
    }
    normalized
}

/// Lowercases, drops marks and collapses separators in one scan.
fn fold_chars(source: &str) -> String {
    let mut normalized = String::with_capacity(source.len());
    let mut pending_space = false;

    for ch in source.chars() {
        for lower in ch.to_lowercase() {
            dispatch_char(lower, &mut normalized, &mut pending_space);
        }
    }

    normalized
}

/// Decides whether a lowercased character extends a token, vanishes, or
/// separates tokens.
fn dispatch_char(ch: char, normalized: &mut String, pending_space: &mut bool) {
    if ch.is_alphanumeric() {
        if *pending_space {
            normalized.push(' ');
            *pending_space = false;
        }
        normalized.push(ch);
    } else if ch.is_mark() {
        // Marks that are not alphabetic (accents left over when NFKC is off,
        // the dot of a lowercased 'İ') belong to the previous letter.
    } else if !normalized.is_empty() {
        *pending_space = true;
    }
}

/// Normalized text together with its token spans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    tokens: Vec<Token>,
}

impl NormalizedText {
    pub fn new(input: &str, cfg: &ConceptMatchConfig) -> Self {
        let text = normalize_with_config(input, cfg);
        let tokens = tokenize(&text);
        Self { text, tokens }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Tokens in text order, with byte offsets into [`as_str`](Self::as_str).
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
