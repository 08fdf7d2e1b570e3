//! Resume processing: chunking, vector indexing, and the pipeline orchestrator.

pub mod chunking;
pub mod indexing;
pub mod pipeline;
pub mod types;

pub use chunking::chunk_resume_text;
pub use indexing::{IndexingOptions, IndexingService, ResumeIndex};
pub use pipeline::ResumePipeline;
pub use types::{IndexingError, MatchMetadata, PipelineError, ResumeMatch, SearchRequest};
