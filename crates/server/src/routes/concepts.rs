use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use jivvy::{
    ConceptHit, ConceptMatcher, NormalizedText, QuizQuestion, QuizTagger, TaggedQuestion, Token,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Normalize request
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
}

/// Normalize response
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub normalized: String,
    pub tokens: Vec<Token>,
}

/// Concept match request
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Free-form text to scan
    pub text: String,

    /// Concept phrases, in priority order
    #[serde(default)]
    pub concepts: Vec<String>,

    /// Cap on returned concepts; the server default applies when absent
    #[serde(default)]
    pub max_matches: Option<usize>,
}

/// Concept match response
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub total_matches: usize,
    pub matches: Vec<String>,
    pub hits: Vec<ConceptHit>,
}

/// Batch quiz tagging request
#[derive(Debug, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub concepts: Vec<String>,

    pub questions: Vec<QuizQuestion>,

    #[serde(default)]
    pub max_matches: Option<usize>,
}

/// Batch quiz tagging response
#[derive(Debug, Serialize, Deserialize)]
pub struct TagResponse {
    pub total_questions: usize,
    pub tagged: Vec<TaggedQuestion>,
}

fn check_concept_count(state: &ServerState, count: usize) -> ServerResult<()> {
    if count > state.config.max_concepts {
        return Err(ServerError::BadRequest(format!(
            "too many concepts: {count} (max {})",
            state.config.max_concepts
        )));
    }
    Ok(())
}

/// Normalize text the way concepts and quiz text are normalized before
/// matching.
pub async fn normalize_text(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<NormalizeRequest>,
) -> ServerResult<impl IntoResponse> {
    let normalized = NormalizedText::new(&request.text, &state.config.match_config(None));
    let tokens = normalized.tokens().to_vec();

    Ok(Json(NormalizeResponse {
        normalized: normalized.into_string(),
        tokens,
    }))
}

/// Match a concept list against one text.
///
/// Matches are whole-token, returned in concept-list order and capped at
/// `max_matches`. Each hit carries the byte span of the concept's first
/// occurrence in the normalized text.
pub async fn match_concepts(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<MatchRequest>,
) -> ServerResult<impl IntoResponse> {
    check_concept_count(&state, request.concepts.len())?;

    let config = state.config.match_config(request.max_matches);
    let matcher = ConceptMatcher::new(request.concepts, config)?;
    let hits = matcher.find_hits(&request.text);
    let matches: Vec<String> = hits.iter().map(|hit| hit.concept.clone()).collect();

    metrics::counter!("jivvy_concept_match_requests_total").increment(1);
    metrics::histogram!("jivvy_concept_matches").record(matches.len() as f64);
    tracing::debug!(
        concepts = matcher.len(),
        matches = matches.len(),
        "matched concepts"
    );

    Ok(Json(MatchResponse {
        total_matches: matches.len(),
        matches,
        hits,
    }))
}

/// Tag a batch of quiz questions with a shared concept list.
///
/// Tagging runs on the blocking pool; large batches additionally fan out
/// across rayon.
pub async fn tag_questions(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<TagRequest>,
) -> ServerResult<impl IntoResponse> {
    check_concept_count(&state, request.concepts.len())?;
    if request.questions.len() > state.config.max_batch_size {
        return Err(ServerError::BadRequest(format!(
            "too many questions: {} (max {})",
            request.questions.len(),
            state.config.max_batch_size
        )));
    }

    let tagger = QuizTagger::new(
        request.concepts,
        state.config.tagger_config(request.max_matches),
    )?;
    let questions = request.questions;

    let tagged = tokio::task::spawn_blocking(move || tagger.tag_all(&questions)).await??;

    metrics::counter!("jivvy_questions_tagged_total").increment(tagged.len() as u64);

    Ok(Json(TagResponse {
        total_questions: tagged.len(),
        tagged,
    }))
}
