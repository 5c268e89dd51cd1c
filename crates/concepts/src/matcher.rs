//! Whole-token concept matching.
//!
//! A concept matches when its full token sequence occurs contiguously in the
//! normalized text's token sequence. Substrings of longer tokens never count:
//! `"cell"` does not match `"cells"`.
//!
//! Results follow concept-list order, not text order, and stop at the
//! configured cap. The output depends only on the text, the concept list and
//! the config.

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::config::{ConceptMatchConfig, DEFAULT_MAX_MATCHES};
use crate::error::ConceptError;
use crate::normalize::{normalize_with_config, NormalizedText};
use crate::token::Token;

/// A matched concept and the span of its first occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptHit {
    /// The concept exactly as it appeared in the concept list.
    pub concept: String,
    /// Byte offset (inclusive) in the normalized text.
    pub start: usize,
    /// Byte offset (exclusive) in the normalized text.
    pub end: usize,
}

#[derive(Debug, Clone)]
struct CompiledConcept {
    original: String,
    tokens: Vec<String>,
}

/// A concept list compiled once and matched against many texts.
///
/// Compilation normalizes every concept with the same rules used for the
/// text, drops concepts that normalize to nothing, and keeps only the first
/// of several concepts sharing a normalized form.
///
/// ```rust
/// use concepts::{ConceptMatchConfig, ConceptMatcher};
///
/// let matcher = ConceptMatcher::new(
///     ["cell", "mitosis", "photosynthesis"],
///     ConceptMatchConfig::default(),
/// )
/// .unwrap();
///
/// let text = "Q: Which process splits one nucleus into two?\nA) cells\nB) mitosis\nC) meiosis";
/// assert_eq!(matcher.find(text), vec!["mitosis"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConceptMatcher {
    concepts: Vec<CompiledConcept>,
    config: ConceptMatchConfig,
}

impl ConceptMatcher {
    /// Compiles `concepts` after validating `config`.
    pub fn new<I, S>(concepts: I, config: ConceptMatchConfig) -> Result<Self, ConceptError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;
        Ok(Self::compile(concepts, config))
    }

    fn compile<I, S>(concepts: I, config: ConceptMatchConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut compiled = Vec::new();

        for concept in concepts {
            let original: String = concept.into();
            let normalized = normalize_with_config(&original, &config);
            if normalized.is_empty() || seen.contains(&normalized) {
                continue;
            }
            let tokens = normalized.split(' ').map(str::to_owned).collect();
            seen.insert(normalized);
            compiled.push(CompiledConcept { original, tokens });
        }

        Self {
            concepts: compiled,
            config,
        }
    }

    /// Number of distinct, non-empty concepts retained after compilation.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn config(&self) -> &ConceptMatchConfig {
        &self.config
    }

    /// Concepts in compiled order, as supplied by the caller.
    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.concepts.iter().map(|c| c.original.as_str())
    }

    /// Returns the matched concepts for `text`, in concept-list order.
    pub fn find(&self, text: &str) -> Vec<&str> {
        let normalized = NormalizedText::new(text, &self.config);
        self.locate(normalized.tokens())
            .into_iter()
            .map(|(idx, _)| self.concepts[idx].original.as_str())
            .collect()
    }

    /// Like [`find`](Self::find) but also reports where each concept first
    /// occurs in the normalized text.
    pub fn find_hits(&self, text: &str) -> Vec<ConceptHit> {
        let normalized = NormalizedText::new(text, &self.config);
        self.find_hits_in(&normalized)
    }

    /// Matches against text that was already normalized with this matcher's
    /// config.
    pub fn find_hits_in(&self, normalized: &NormalizedText) -> Vec<ConceptHit> {
        let tokens = normalized.tokens();
        self.locate(tokens)
            .into_iter()
            .map(|(idx, pos)| {
                let concept = &self.concepts[idx];
                let last = pos + concept.tokens.len() - 1;
                ConceptHit {
                    concept: concept.original.clone(),
                    start: tokens[pos].start,
                    end: tokens[last].end,
                }
            })
            .collect()
    }

    /// Pairs of (concept index, first token position), capped at
    /// `max_matches`.
    fn locate(&self, tokens: &[Token]) -> Vec<(usize, usize)> {
        let cap = self.config.max_matches;
        if cap == 0 || tokens.is_empty() || self.concepts.is_empty() {
            return Vec::new();
        }

        let mut first_seen: FxHashMap<&str, usize> = FxHashMap::default();
        for (pos, token) in tokens.iter().enumerate() {
            first_seen.entry(token.text.as_str()).or_insert(pos);
        }

        let mut found = Vec::with_capacity(cap.min(self.concepts.len()));
        for (idx, concept) in self.concepts.iter().enumerate() {
            if found.len() == cap {
                break;
            }
            if let Some(pos) = find_sequence(tokens, &concept.tokens, &first_seen) {
                found.push((idx, pos));
            }
        }
        found
    }
}

/// Position of the first contiguous occurrence of `needle` in `tokens`.
fn find_sequence(
    tokens: &[Token],
    needle: &[String],
    first_seen: &FxHashMap<&str, usize>,
) -> Option<usize> {
    match needle {
        [] => None,
        [single] => first_seen.get(single.as_str()).copied(),
        [head, ..] => {
            if needle.iter().any(|t| !first_seen.contains_key(t.as_str())) {
                return None;
            }
            let from = first_seen[head.as_str()];
            tokens[from..]
                .windows(needle.len())
                .position(|window| window.iter().zip(needle).all(|(t, n)| t.text == *n))
                .map(|offset| from + offset)
        }
    }
}

/// Matches `concepts` against `text`, returning at most `max_matches`
/// concepts in concept-list order.
///
/// Total: empty text, an empty list, or a cap of zero all yield an empty
/// result.
///
/// ```rust
/// use concepts::match_concepts_in_text;
///
/// let text = "Newton's first law states an object stays at rest unless acted on.";
/// let found = match_concepts_in_text(text, &["newton s first law", "mass"], 5);
/// assert_eq!(found, vec!["newton s first law".to_string()]);
/// ```
pub fn match_concepts_in_text<S: AsRef<str>>(
    text: &str,
    concepts: &[S],
    max_matches: usize,
) -> Vec<String> {
    if max_matches == 0 || concepts.is_empty() {
        return Vec::new();
    }
    let matcher = ConceptMatcher::compile(
        concepts.iter().map(|c| c.as_ref().to_owned()),
        ConceptMatchConfig::with_max_matches(max_matches),
    );
    matcher.find(text).into_iter().map(str::to_owned).collect()
}

/// [`match_concepts_in_text`] with [`DEFAULT_MAX_MATCHES`].
pub fn match_concepts<S: AsRef<str>>(text: &str, concepts: &[S]) -> Vec<String> {
    match_concepts_in_text(text, concepts, DEFAULT_MAX_MATCHES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MITOSIS_QUIZ: &str =
        "Q: Which process splits one nucleus into two?\nA) cells\nB) mitosis\nC) meiosis";

    #[test]
    fn substring_inside_token_does_not_match() {
        let found = match_concepts(MITOSIS_QUIZ, &["cell", "mitosis", "photosynthesis"]);
        assert_eq!(found, vec!["mitosis"]);
    }

    #[test]
    fn multi_token_concept_matches_across_punctuation() {
        let text = "Newton's first law states an object stays at rest unless acted on.";
        let found = match_concepts(text, &["newton s first law", "mass"]);
        assert_eq!(found, vec!["newton s first law"]);
    }

    #[test]
    fn multi_token_concept_requires_contiguity() {
        let text = "Newton wrote a first draft of the law";
        assert!(match_concepts(text, &["newton s first law"]).is_empty());
        assert!(match_concepts("first law of newton", &["newton first"]).is_empty());
    }

    #[test]
    fn multi_token_concept_found_after_false_start() {
        let text = "first order, then first law";
        assert_eq!(match_concepts(text, &["first law"]), vec!["first law"]);
    }

    #[test]
    fn cap_keeps_concept_list_order() {
        let concepts: Vec<String> = (0..100).map(|i| format!("concept {i}")).collect();
        let text = concepts[..30].join(" ");

        let found = match_concepts_in_text(&text, &concepts, 5);
        assert_eq!(found, concepts[..5].to_vec());
    }

    #[test]
    fn order_follows_list_not_text() {
        let text = "mitosis happens before cytokinesis in the cell";
        let found = match_concepts(text, &["cell", "cytokinesis", "mitosis"]);
        assert_eq!(found, vec!["cell", "cytokinesis", "mitosis"]);
    }

    #[test]
    fn repeated_occurrences_match_once() {
        let found = match_concepts("mass mass mass", &["mass"]);
        assert_eq!(found, vec!["mass"]);
    }

    #[test]
    fn duplicate_concepts_emitted_once() {
        let found = match_concepts("Mass and energy", &["mass", "Mass", "energy", "mass"]);
        assert_eq!(found, vec!["mass", "energy"]);
    }

    #[test]
    fn unnormalized_concepts_are_normalized() {
        let found = match_concepts("newton s first law", &["Newton\u{2019}s First Law!"]);
        assert_eq!(found, vec!["Newton\u{2019}s First Law!"]);
    }

    #[test]
    fn precomposed_concept_matches_jamo_split_by_mark() {
        let found = match_concepts("\u{1100}\u{301}\u{1161} \u{c740}", &["\u{ac00}"]);
        assert_eq!(found, vec!["\u{ac00}"]);
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        let none: [&str; 0] = [];
        assert!(match_concepts("anything", &none).is_empty());
        assert!(match_concepts("", &["mass"]).is_empty());
        assert!(match_concepts("?!", &["mass"]).is_empty());
        assert!(match_concepts("mass", &["", "  ", "--"]).is_empty());
        assert!(match_concepts_in_text("mass", &["mass"], 0).is_empty());
    }

    #[test]
    fn matcher_rejects_invalid_config() {
        let err = ConceptMatcher::new(["mass"], ConceptMatchConfig::with_max_matches(0))
            .expect_err("zero cap should be rejected");
        assert!(matches!(err, ConceptError::InvalidConfig(_)));
    }

    #[test]
    fn matcher_skips_empty_and_duplicate_concepts() {
        let matcher = ConceptMatcher::new(
            ["mass", "", "MASS", "first law"],
            ConceptMatchConfig::default(),
        )
        .expect("valid config");
        assert_eq!(matcher.len(), 2);
        assert_eq!(matcher.concepts().collect::<Vec<_>>(), vec!["mass", "first law"]);
    }

    #[test]
    fn hits_report_normalized_spans() {
        let matcher = ConceptMatcher::new(
            ["first law", "rest"],
            ConceptMatchConfig::default(),
        )
        .expect("valid config");
        let text = "Newton's first law: objects at rest stay at rest.";
        let normalized = NormalizedText::new(text, matcher.config());
        let hits = matcher.find_hits_in(&normalized);

        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert_eq!(&normalized.as_str()[hit.start..hit.end], hit.concept);
        }
        assert_eq!(hits[0].start, "newton s ".len());
        assert_eq!(hits[1].start, "newton s first law objects at ".len());
    }
}
