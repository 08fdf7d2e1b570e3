//! The resume processing state machine.

use crate::{
    llm::{FieldExtractor, Summarizer},
    metrics::IntakeMetrics,
    ocr::TextExtractor,
    processing::{indexing::ResumeIndex, types::PipelineError},
    qdrant::ResumeMetadata,
    resume::{Resume, ResumeStatus, ResumeStore},
};
use std::sync::Arc;

/// Drives one resume record through `pending → processing → completed`.
///
/// Collaborators are injected explicitly so tests can substitute fakes. The pipeline
/// assumes at most one concurrent run per resume id; concurrent runs on the same id
/// produce an undefined interleaving of status and field writes (documented constraint,
/// not enforced).
pub struct ResumePipeline {
    store: Arc<dyn ResumeStore>,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    fields: Arc<dyn FieldExtractor>,
    index: Arc<dyn ResumeIndex>,
    metrics: Arc<IntakeMetrics>,
}

impl ResumePipeline {
    /// Assemble a pipeline from its collaborators.
    pub fn new(
        store: Arc<dyn ResumeStore>,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
        fields: Arc<dyn FieldExtractor>,
        index: Arc<dyn ResumeIndex>,
        metrics: Arc<IntakeMetrics>,
    ) -> Self {
        Self {
            store,
            extractor,
            summarizer,
            fields,
            index,
            metrics,
        }
    }

    /// Run the pipeline for one resume id.
    ///
    /// A missing id yields [`PipelineError::NotFound`]. Text-extraction failure is fatal
    /// to the run: the status rolls back to pending, is persisted, and the error
    /// propagates so the enqueuer can retry. Indexing failure is logged and the run still
    /// completes. On success the output fields and the completed status are persisted.
    pub async fn process(&self, resume_id: &str) -> Result<(), PipelineError> {
        let Some(mut resume) = self.store.get(resume_id).await? else {
            tracing::warn!(resume_id, "Resume id did not resolve to a record");
            return Err(PipelineError::NotFound(resume_id.to_string()));
        };

        tracing::info!(resume_id, file_name = %resume.file_name, "Processing resume");
        resume.status = ResumeStatus::Processing;
        resume.touch();
        self.store.save(&resume).await?;

        match self.run_stages(&mut resume).await {
            Ok(chunks_indexed) => {
                resume.status = ResumeStatus::Completed;
                resume.touch();
                self.store.save(&resume).await?;
                self.metrics.record_processed(chunks_indexed as u64);
                tracing::info!(resume_id, chunks_indexed, "Resume processing completed");
                Ok(())
            }
            Err(error) => {
                resume.status = ResumeStatus::Pending;
                resume.touch();
                if let Err(rollback) = self.store.save(&resume).await {
                    tracing::error!(resume_id, error = %rollback, "Failed to persist rollback to pending");
                }
                self.metrics.record_failed();
                tracing::warn!(resume_id, error = %error, "Resume processing failed; reset to pending");
                Err(error)
            }
        }
    }

    /// Execute the extraction, enrichment, and indexing stages against a resolved record.
    ///
    /// Returns the number of chunks indexed (zero when vectorization was skipped or
    /// failed). Errors bubble to [`Self::process`], which owns the rollback.
    async fn run_stages(&self, resume: &mut Resume) -> Result<usize, PipelineError> {
        let text = self
            .extractor
            .extract(&resume.file_path, &resume.file_name)
            .await?;

        let (summary, fields) = tokio::join!(
            self.summarizer.summarize(&text),
            self.fields.extract_fields(&text),
        );

        resume.fullname = fields.full_name;
        resume.email = fields.email;
        resume.phone = fields.phone;
        resume.address = fields.address;
        resume.category = fields.category;
        resume.skills = fields.skills;
        resume.strengths = fields.strengths;
        resume.summary = summary;
        resume.raw_text = text;

        if resume.raw_text.trim().is_empty() {
            tracing::debug!(resume_id = %resume.id, "No extracted text; skipping vectorization");
            return Ok(0);
        }

        let metadata = ResumeMetadata {
            fullname: Some(resume.fullname.clone()),
            email: Some(resume.email.clone()),
            category: Some(resume.category.clone()),
            skills: Some(resume.skills.clone()),
            file_name: Some(resume.file_name.clone()),
            extra: serde_json::Map::new(),
        };

        match self.index.store(&resume.id, &resume.raw_text, metadata).await {
            Ok(stored) => Ok(stored),
            Err(error) => {
                // Vectorization is optional: search degrades for this resume, the run completes.
                tracing::warn!(resume_id = %resume.id, error = %error, "Vector indexing failed; continuing");
                Ok(0)
            }
        }
    }
}
