//! Core data types and error definitions for the processing pipeline.

use crate::{
    embedding::EmbeddingClientError, ocr::OcrError, qdrant::QdrantError, resume::StoreError,
};
use serde::Serialize;
use thiserror::Error;

/// Errors emitted by a resume pipeline run.
///
/// Only these cross the pipeline boundary; summarization and field extraction absorb
/// their own failures, and indexing failures are logged without aborting the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The resume id did not resolve to a record.
    #[error("Resume not found: {0}")]
    NotFound(String),
    /// The record store rejected a read or write.
    #[error("Record store failed: {0}")]
    Store(#[from] StoreError),
    /// Text extraction failed; the run was rolled back to pending.
    #[error("Text extraction failed: {0}")]
    Extraction(#[from] OcrError),
}

/// Errors emitted while indexing or searching resume vectors.
#[derive(Debug, Error)]
pub enum IndexingError {
    /// Document text was empty or whitespace-only.
    #[error("Document text is empty")]
    EmptyDocument,
    /// The chunker produced no chunks for the document.
    #[error("No chunks produced for document")]
    NoChunks,
    /// Embedding provider failed to produce vectors.
    #[error("Failed to generate embeddings: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// Embedding provider returned no vector for the query.
    #[error("Embedding provider returned no vectors for the query")]
    EmptyEmbedding,
    /// Qdrant interaction failed.
    #[error("Qdrant request failed: {0}")]
    Qdrant(#[from] QdrantError),
}

/// Parameters supplied to the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Natural language query text to embed.
    pub query_text: String,
    /// Maximum number of results to return (defaults applied downstream).
    pub limit: Option<usize>,
    /// Minimum score accepted from Qdrant (defaults applied downstream).
    pub score_threshold: Option<f32>,
}

/// One search match: a scored chunk and the metadata carried in its payload.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeMatch {
    /// Similarity score reported by Qdrant.
    pub score: f32,
    /// Id of the resume owning the matched chunk.
    pub resume_id: String,
    /// Stored chunk text preview, if available.
    pub chunk_text: Option<String>,
    /// Metadata subset persisted with the chunk.
    pub metadata: MatchMetadata,
}

/// Metadata subset exposed on each search match.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchMetadata {
    /// Candidate full name, if stored.
    pub fullname: Option<String>,
    /// Candidate email, if stored.
    pub email: Option<String>,
    /// Job category, if stored.
    pub category: Option<String>,
    /// Skills, if stored.
    pub skills: Option<Vec<String>>,
    /// Source file name, if stored.
    pub file_name: Option<String>,
}
