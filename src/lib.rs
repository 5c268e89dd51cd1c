//! Quiz tagging for the Jivvy study app.
//!
//! This crate stitches the concept layer (`concepts`) into the quiz workflow:
//! a project's concept list is compiled once into a [`QuizTagger`], which
//! then tags questions (prompt, choices and explanation) with the concepts
//! they mention.

pub use concepts::{
    match_concepts, match_concepts_in_text, normalize_for_concept_match, normalize_with_config,
    tokenize, ConceptError, ConceptHit, ConceptMatchConfig, ConceptMatcher, NormalizedText, Token,
    DEFAULT_MAX_MATCHES,
};

pub mod config;
mod quiz;
mod tagger;

pub use crate::config::{ConfigLoadError, JivvyConfig};
pub use crate::quiz::{QuizQuestion, TaggedQuestion};
pub use crate::tagger::{QuizTagger, TaggerConfig};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

/// Errors that can occur while tagging quiz questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    Concept(ConceptError),
    InvalidConfig(String),
    MissingQuestionId,
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Concept(err) => write!(f, "concept matcher failure: {err}"),
            TagError::InvalidConfig(msg) => write!(f, "invalid tagger configuration: {msg}"),
            TagError::MissingQuestionId => write!(f, "quiz question requires a non-empty id"),
        }
    }
}

impl Error for TagError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TagError::Concept(err) => Some(err),
            TagError::InvalidConfig(_) | TagError::MissingQuestionId => None,
        }
    }
}

impl From<ConceptError> for TagError {
    fn from(value: ConceptError) -> Self {
        TagError::Concept(value)
    }
}

/// Tag a piece of free text with the default matching configuration.
///
/// ```
/// let tags = jivvy::tag_text("Inertia depends on mass.", &["mass", "velocity", "inertia"]);
/// assert_eq!(tags, vec!["mass", "inertia"]);
/// ```
pub fn tag_text<S: AsRef<str>>(text: &str, concepts: &[S]) -> Vec<String> {
    match_concepts_in_text(text, concepts, DEFAULT_MAX_MATCHES)
}

/// Metrics observer for question tagging.
///
/// `result` carries the number of concepts attached on success.
pub trait TaggingMetrics: Send + Sync {
    fn record_tag(&self, latency: Duration, result: Result<usize, TagError>);
}

/// Install or clear the global tagging metrics recorder.
pub fn set_tagging_metrics(recorder: Option<Arc<dyn TaggingMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn TaggingMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn TaggingMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn TaggingMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}
