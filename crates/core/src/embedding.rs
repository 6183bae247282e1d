//! Embedding Service and Similarity Scoring
//!
//! This module provides the text-embedding abstraction used by the relevance
//! gate, an OpenAI-compatible implementation, and the syllabus embedding
//! table that is precomputed once at startup.

use crate::syllabus::Syllabus;
use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::CreateEmbeddingRequestArgs,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Defines the contract for any service that can embed text.
///
/// This abstraction allows the system to swap between different embedding
/// backends (e.g., OpenAI-compatible APIs, a static mock for tests) while
/// keeping the gate logic provider-agnostic.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Computes a fixed-length vector representation of the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// An implementation of `EmbeddingService` for any OpenAI-compatible API.
pub struct OpenAIEmbeddingService {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIEmbeddingService {
    /// Creates a new client for an OpenAI-compatible embeddings endpoint.
    ///
    /// # Arguments
    ///
    /// * `config` - OpenAI API configuration (API key, base URL, etc.).
    /// * `model` - Embedding model identifier (e.g., "text-embedding-ada-002").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(text)
            .build()?;

        let response = self.client.embeddings().create(request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .context("Embedding response contained no data")?
            .embedding;

        Ok(embedding)
    }
}

/// A mock `EmbeddingService` for development and integration testing.
///
/// Returns preconfigured vectors for known texts and a fallback vector for
/// everything else, and counts how often it is called.
pub struct MockEmbeddingService {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
}

impl MockEmbeddingService {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers a canned vector for an exact input text.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Number of `embed` calls made against this mock.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Cosine similarity between two vectors: dot(a, b) / (|a| * |b|).
///
/// Returns 0.0 if either vector has zero norm, so degenerate inputs score as
/// maximally dissimilar instead of producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// The precomputed embedding table for every syllabus label.
///
/// Built eagerly at startup (one embedding call per distinct label) and
/// immutable afterwards; the gate only reads from it.
pub struct TopicEmbeddings {
    entries: Vec<(String, Vec<f32>)>,
}

impl TopicEmbeddings {
    /// Embeds every distinct syllabus label through the given service.
    pub async fn build(service: &dyn EmbeddingService, syllabus: &Syllabus) -> Result<Self> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for label in syllabus.labels() {
            // A subtopic may repeat a topic name; one entry per distinct label.
            if !seen.insert(label.to_string()) {
                continue;
            }
            let vector = service
                .embed(label)
                .await
                .with_context(|| format!("Failed to embed syllabus label '{}'", label))?;
            entries.push((label.to_string(), vector));
        }
        info!(labels = entries.len(), "Syllabus embedding table built");
        Ok(Self { entries })
    }

    /// Returns the best-matching label and its similarity to the query vector.
    pub fn best_match(&self, query: &[f32]) -> Option<(&str, f32)> {
        self.entries
            .iter()
            .map(|(label, vector)| (label.as_str(), cosine_similarity(query, vector)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
