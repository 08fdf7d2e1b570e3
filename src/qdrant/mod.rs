//! Qdrant vector store integration.

pub mod client;
pub mod filters;
pub mod payload;
pub mod types;

pub use client::QdrantService;
pub use filters::build_resume_filter;
pub use payload::{CHUNK_PREVIEW_CHARS, build_chunk_payload};
pub use types::{QdrantError, ResumeMetadata, ScoredPoint, VectorPoint};
