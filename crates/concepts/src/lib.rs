//! Jivvy concept layer.
//!
//! Normalizes quiz text and concept phrases into one token space and reports
//! which concepts occur in the text as whole-token matches. The quiz tagger
//! and the tagging server are thin layers over this crate.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC by default, configurable)
//! - Locale-free lowercasing
//! - Punctuation, symbols and dashes become separators; whitespace collapses
//! - Tokenization with byte offsets for highlighting
//! - Whole-token matching of single- and multi-word concepts, capped and
//!   ordered by the concept list
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no shared mutable state. The same text, concept
//! list and config give the same result on any machine and any thread.
//!
//! ## Invariants worth knowing
//!
//! - `normalize(normalize(s)) == normalize(s)`
//! - A concept never matches inside a longer token ("cell" vs "cells")
//! - The result is a duplicate-free subsequence of the concept list no longer
//!   than the cap

mod config;
mod error;
mod matcher;
mod normalize;
mod token;

pub use crate::config::{ConceptMatchConfig, DEFAULT_MAX_MATCHES};
pub use crate::error::ConceptError;
pub use crate::matcher::{match_concepts, match_concepts_in_text, ConceptHit, ConceptMatcher};
pub use crate::normalize::{normalize_for_concept_match, normalize_with_config, NormalizedText};
pub use crate::token::{tokenize, Token};
