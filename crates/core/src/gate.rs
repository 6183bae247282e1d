//! Relevance Gate
//!
//! Decides whether a user query may be answered before any generation
//! happens. Three checks run in order, first match wins: acknowledgement
//! shortcut, conversational continuation, embedding similarity against the
//! precomputed syllabus table.

use crate::embedding::{EmbeddingService, TopicEmbeddings};
use crate::session::SessionContext;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Similarity score a query must exceed to count as on-syllabus.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.75;

/// Short conversational utterances that are always let through.
const ACKNOWLEDGEMENTS: [&str; 7] = ["yes", "no", "maybe", "okay", "sure", "thanks", "thank you"];

/// Checks whether a query is a short acknowledgement like "yes" or "thanks".
///
/// Matching is exact after trimming and lowercasing; these queries are
/// answered with a canned redirect and never reach the LLM.
pub fn is_acknowledgement(query: &str) -> bool {
    let normalized = query.trim().to_lowercase();
    ACKNOWLEDGEMENTS.contains(&normalized.as_str())
}

/// The gate's verdict for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The query matched the acknowledgement set.
    Acknowledgement,
    /// The session already has a prior reply; follow-ups pass unconditionally.
    Continuation,
    /// Best similarity against the syllabus exceeded the threshold.
    OnTopic,
    /// Nothing in the syllabus scored above the threshold.
    OffTopic,
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, GateDecision::OffTopic)
    }
}

/// Admits or rejects queries against the syllabus.
///
/// Read-only with respect to session state; the tutor records replies, the
/// gate only inspects them.
pub struct RelevanceGate {
    embedder: Arc<dyn EmbeddingService>,
    topics: Arc<TopicEmbeddings>,
    threshold: f32,
}

impl RelevanceGate {
    pub fn new(
        embedder: Arc<dyn EmbeddingService>,
        topics: Arc<TopicEmbeddings>,
        threshold: f32,
    ) -> Self {
        Self {
            embedder,
            topics,
            threshold,
        }
    }

    /// Evaluates a query in decision order.
    ///
    /// The similarity check is only reached on a session's first turn: once
    /// any reply has been recorded, the continuation check admits everything.
    /// An embedding failure propagates as an error rather than silently
    /// admitting or rejecting.
    pub async fn evaluate(&self, query: &str, session: &SessionContext) -> Result<GateDecision> {
        if is_acknowledgement(query) {
            return Ok(GateDecision::Acknowledgement);
        }

        if session.in_progress() {
            return Ok(GateDecision::Continuation);
        }

        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .context("Failed to embed query for relevance check")?;

        match self.topics.best_match(&query_embedding) {
            Some((label, score)) => {
                info!(%query, best_match = %label, score, "Similarity check complete");
                if score > self.threshold {
                    Ok(GateDecision::OnTopic)
                } else {
                    Ok(GateDecision::OffTopic)
                }
            }
            None => Ok(GateDecision::OffTopic),
        }
    }
}
