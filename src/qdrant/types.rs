//! Shared types used by the Qdrant client and helpers.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while interacting with Qdrant.
#[derive(Debug, Error)]
pub enum QdrantError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid Qdrant URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Qdrant responded with an unexpected status code.
    #[error("Unexpected Qdrant response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Qdrant.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Caller-supplied metadata merged into each chunk payload.
///
/// The named fields map to fixed payload keys; `extra` carries open extension entries.
/// None of them may override the reserved chunk keys (`resume_id`, `chunk_index`,
/// `chunk_text`, `chunk_length`).
#[derive(Debug, Clone, Default)]
pub struct ResumeMetadata {
    /// Candidate full name.
    pub fullname: Option<String>,
    /// Candidate email address.
    pub email: Option<String>,
    /// Job category assigned by the extractor.
    pub category: Option<String>,
    /// Extracted skills.
    pub skills: Option<Vec<String>>,
    /// Original uploaded file name.
    pub file_name: Option<String>,
    /// Open extension entries persisted alongside the fixed fields.
    pub extra: Map<String, Value>,
}

/// Prepared point ready for upsert: id, vector, and assembled payload.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    /// Opaque point identifier, independent of the owning resume id.
    pub id: String,
    /// Embedding vector produced for the chunk.
    pub vector: Vec<f32>,
    /// Payload object stored with the vector.
    pub payload: Value,
}

/// Scored payload returned by Qdrant queries.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    /// Identifier assigned to the vector.
    pub id: String,
    /// Similarity score computed by Qdrant.
    pub score: f32,
    /// Optional payload associated with the vector.
    pub payload: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub(crate) struct QueryResponse {
    pub(crate) result: QueryResponseResult,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum QueryResponseResult {
    Points(Vec<QueryPoint>),
    Object {
        #[serde(default)]
        points: Vec<QueryPoint>,
    },
}

#[derive(Deserialize)]
pub(crate) struct QueryPoint {
    pub(crate) id: Value,
    pub(crate) score: f32,
    #[serde(default)]
    pub(crate) payload: Option<Map<String, Value>>,
}
