use std::time::Instant;

use concepts::{ConceptMatchConfig, ConceptMatcher};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::quiz::{QuizQuestion, TaggedQuestion};
use crate::{metrics_recorder, TagError};

/// Runtime configuration for [`QuizTagger`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaggerConfig {
    /// Normalization and cap applied to every question.
    #[serde(default)]
    pub matching: ConceptMatchConfig,
    /// Spread large batches across the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// Smallest batch tagged in parallel when `parallel` is set.
    #[serde(default = "TaggerConfig::default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl TaggerConfig {
    pub(crate) fn default_parallel_threshold() -> usize {
        64
    }

    pub(crate) fn validate(&self) -> Result<(), TagError> {
        if self.parallel && self.parallel_threshold == 0 {
            return Err(TagError::InvalidConfig(
                "parallel_threshold must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            matching: ConceptMatchConfig::default(),
            parallel: false,
            parallel_threshold: Self::default_parallel_threshold(),
        }
    }
}

/// Tags quiz questions with the concepts of one project.
///
/// The concept list is compiled once; the tagger is immutable afterwards and
/// can be shared across threads.
#[derive(Debug, Clone)]
pub struct QuizTagger {
    matcher: ConceptMatcher,
    config: TaggerConfig,
}

impl QuizTagger {
    pub fn new<I, S>(concepts: I, config: TaggerConfig) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;
        let matcher = ConceptMatcher::new(concepts, config.matching.clone())?;
        tracing::debug!(
            concepts = matcher.len(),
            max_matches = config.matching.max_matches,
            "compiled concept list"
        );
        Ok(Self { matcher, config })
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn matcher(&self) -> &ConceptMatcher {
        &self.matcher
    }

    /// Tags a single question.
    pub fn tag(&self, question: &QuizQuestion) -> Result<TaggedQuestion, TagError> {
        let span = metrics_recorder().map(|recorder| (recorder, Instant::now()));
        let result = self.tag_inner(question);
        if let Some((recorder, start)) = span {
            let outcome = match &result {
                Ok(tagged) => Ok(tagged.concepts.len()),
                Err(err) => Err(err.clone()),
            };
            recorder.record_tag(start.elapsed(), outcome);
        }
        result
    }

    fn tag_inner(&self, question: &QuizQuestion) -> Result<TaggedQuestion, TagError> {
        let question_id = question.id.trim();
        if question_id.is_empty() {
            return Err(TagError::MissingQuestionId);
        }

        let concepts = self
            .matcher
            .find(&question.tagging_text())
            .into_iter()
            .map(str::to_owned)
            .collect();

        Ok(TaggedQuestion {
            question_id: question_id.to_string(),
            concepts,
        })
    }

    /// Tags a batch, preserving input order. The first failing question
    /// aborts the batch.
    pub fn tag_all(&self, questions: &[QuizQuestion]) -> Result<Vec<TaggedQuestion>, TagError> {
        let parallel = self.config.parallel && questions.len() >= self.config.parallel_threshold;
        tracing::debug!(questions = questions.len(), parallel, "tagging batch");

        if parallel {
            questions.par_iter().map(|q| self.tag(q)).collect()
        } else {
            questions.iter().map(|q| self.tag(q)).collect()
        }
    }
}
