//! Indexing service composing the chunker, embedder, and Qdrant client.

use crate::{
    config::get_config,
    embedding::EmbeddingClient,
    processing::{
        chunking::chunk_resume_text,
        types::{IndexingError, MatchMetadata, ResumeMatch, SearchRequest},
    },
    qdrant::{
        QdrantService, ResumeMetadata, ScoredPoint, VectorPoint, build_resume_filter,
        payload::generate_point_id,
    },
};
use async_trait::async_trait;
use serde_json::Value;

/// Document-level vector operations used by the pipeline and the HTTP surface.
#[async_trait]
pub trait ResumeIndex: Send + Sync {
    /// Chunk, embed, and upsert a resume's text; returns the number of points stored.
    async fn store(
        &self,
        resume_id: &str,
        text: &str,
        metadata: ResumeMetadata,
    ) -> Result<usize, IndexingError>;

    /// Embed a query and return matches ordered by descending similarity score.
    async fn search(&self, request: SearchRequest) -> Result<Vec<ResumeMatch>, IndexingError>;

    /// Remove every vector point owned by the given resume id. Idempotent.
    async fn delete(&self, resume_id: &str) -> Result<(), IndexingError>;
}

/// Tuning knobs for the indexing service, usually derived from configuration.
#[derive(Debug, Clone)]
pub struct IndexingOptions {
    /// Qdrant collection holding resume chunks.
    pub collection: String,
    /// Dimensionality of the embedding space.
    pub vector_dimension: usize,
    /// Optional token budget override for semantic chunking.
    pub chunk_token_budget: Option<usize>,
    /// Result cap applied when a search request omits a limit.
    pub default_limit: usize,
    /// Hard upper bound on search result counts.
    pub max_limit: usize,
    /// Minimum similarity score applied when a request omits one.
    pub default_score_threshold: f32,
}

impl IndexingOptions {
    /// Derive options from the loaded configuration.
    pub fn from_config() -> Self {
        let config = get_config();
        Self {
            collection: config.qdrant_collection_name.clone(),
            vector_dimension: config.embedding_dimension,
            chunk_token_budget: config.chunk_token_budget,
            default_limit: config.search_default_limit,
            max_limit: config.search_max_limit,
            default_score_threshold: config.search_default_score_threshold,
        }
    }
}

/// Owns the embedding client and Qdrant transport for resume vector operations.
///
/// Construct once near process start and share through an `Arc`; the collaborators are
/// injected explicitly so tests can substitute fakes.
pub struct IndexingService {
    embedding: Box<dyn EmbeddingClient + Send + Sync>,
    qdrant: QdrantService,
    options: IndexingOptions,
}

impl IndexingService {
    /// Build an indexing service from explicit collaborators.
    pub fn new(
        embedding: Box<dyn EmbeddingClient + Send + Sync>,
        qdrant: QdrantService,
        options: IndexingOptions,
    ) -> Self {
        Self {
            embedding,
            qdrant,
            options,
        }
    }

    /// Build a config-driven service and ensure the target collection exists.
    pub async fn connect(
        embedding: Box<dyn EmbeddingClient + Send + Sync>,
    ) -> Result<Self, IndexingError> {
        let options = IndexingOptions::from_config();
        let qdrant = QdrantService::from_config()?;
        qdrant
            .create_collection_if_not_exists(&options.collection, options.vector_dimension as u64)
            .await?;
        tracing::debug!(collection = %options.collection, "Resume collection ready");
        Ok(Self::new(embedding, qdrant, options))
    }
}

#[async_trait]
impl ResumeIndex for IndexingService {
    async fn store(
        &self,
        resume_id: &str,
        text: &str,
        metadata: ResumeMetadata,
    ) -> Result<usize, IndexingError> {
        if text.trim().is_empty() {
            tracing::warn!(resume_id, "Refusing to index empty resume text");
            return Err(IndexingError::EmptyDocument);
        }

        let chunks = chunk_resume_text(text, self.options.chunk_token_budget);
        if chunks.is_empty() {
            tracing::warn!(resume_id, "Chunker produced no chunks for resume");
            return Err(IndexingError::NoChunks);
        }

        let embeddings = self.embedding.generate_embeddings(chunks.clone()).await?;
        debug_assert_eq!(chunks.len(), embeddings.len());

        let points: Vec<VectorPoint> = chunks
            .iter()
            .zip(embeddings.into_iter())
            .enumerate()
            .map(|(chunk_index, (chunk, vector))| VectorPoint {
                id: generate_point_id(),
                vector,
                payload: crate::qdrant::build_chunk_payload(
                    resume_id,
                    chunk_index,
                    chunk,
                    &metadata,
                ),
            })
            .collect();

        let stored = self
            .qdrant
            .upsert_points(&self.options.collection, points)
            .await?;
        tracing::info!(resume_id, points = stored, "Resume vectors stored");
        Ok(stored)
    }

    async fn search(&self, request: SearchRequest) -> Result<Vec<ResumeMatch>, IndexingError> {
        let SearchRequest {
            query_text,
            limit,
            score_threshold,
        } = request;

        let mut vectors = self.embedding.generate_embeddings(vec![query_text]).await?;
        let vector = vectors.pop().ok_or(IndexingError::EmptyEmbedding)?;

        let limit = limit
            .unwrap_or(self.options.default_limit)
            .clamp(1, self.options.max_limit);
        let threshold = score_threshold
            .unwrap_or(self.options.default_score_threshold)
            .clamp(0.0, 1.0);

        let hits = self
            .qdrant
            .search_points(
                &self.options.collection,
                vector,
                limit,
                Some(threshold),
                None,
            )
            .await?;

        Ok(hits.into_iter().filter_map(map_scored_point).collect())
    }

    async fn delete(&self, resume_id: &str) -> Result<(), IndexingError> {
        self.qdrant
            .delete_points(&self.options.collection, build_resume_filter(resume_id))
            .await?;
        tracing::info!(resume_id, "Resume vectors deleted");
        Ok(())
    }
}

/// Map a Qdrant scored point into a resume match, skipping points without an owner id.
fn map_scored_point(point: ScoredPoint) -> Option<ResumeMatch> {
    let ScoredPoint { id, score, payload } = point;
    let mut map = payload?;

    let resume_id = match map.remove("resume_id") {
        Some(Value::String(value)) if !value.is_empty() => value,
        _ => {
            tracing::warn!(point_id = %id, "Dropping scored point without a resume_id payload");
            return None;
        }
    };

    let chunk_text = match map.remove("chunk_text") {
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value),
        _ => None,
    };

    let string_field = |value: Option<Value>| match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    };
    let metadata = MatchMetadata {
        fullname: string_field(map.remove("fullname")),
        email: string_field(map.remove("email")),
        category: string_field(map.remove("category")),
        skills: match map.remove("skills") {
            Some(Value::Array(values)) if !values.is_empty() => Some(
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        Value::String(skill) if !skill.trim().is_empty() => Some(skill),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        },
        file_name: string_field(map.remove("file_name")),
    };

    Some(ResumeMatch {
        score,
        resume_id,
        chunk_text,
        metadata,
    })
}
