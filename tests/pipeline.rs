//! End-to-end pipeline tests with stubbed collaborators.

use applicantbuddy::{
    llm::{FieldExtractor, ResumeFields, Summarizer},
    metrics::IntakeMetrics,
    ocr::{OcrError, TextExtractor},
    processing::{IndexingError, PipelineError, ResumeIndex, ResumeMatch, ResumePipeline, SearchRequest},
    qdrant::ResumeMetadata,
    resume::{InMemoryResumeStore, Resume, ResumeStatus, ResumeStore},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

struct StubExtractor {
    text: Result<String, String>,
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, _file_path: &str, _file_name: &str) -> Result<String, OcrError> {
        match &self.text {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(OcrError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            ))),
        }
    }
}

struct StubSummarizer;

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _text: &str) -> String {
        "- Senior software engineer\n- Python and AWS background".to_string()
    }
}

struct StubFieldExtractor;

#[async_trait]
impl FieldExtractor for StubFieldExtractor {
    async fn extract_fields(&self, _text: &str) -> ResumeFields {
        ResumeFields {
            full_name: "Jane Doe".into(),
            email: "jane@example.org".into(),
            phone: "+1 555 0100".into(),
            address: "Portland, OR".into(),
            category: "software_engineer".into(),
            skills: vec!["Python".into(), "AWS".into()],
            strengths: vec!["fast learner".into()],
        }
    }
}

#[derive(Default)]
struct RecordingIndex {
    fail: bool,
    stored: Mutex<Vec<(String, String, ResumeMetadata)>>,
}

#[async_trait]
impl ResumeIndex for RecordingIndex {
    async fn store(
        &self,
        resume_id: &str,
        text: &str,
        metadata: ResumeMetadata,
    ) -> Result<usize, IndexingError> {
        if self.fail {
            return Err(IndexingError::EmptyEmbedding);
        }
        self.stored
            .lock()
            .unwrap()
            .push((resume_id.to_string(), text.to_string(), metadata));
        Ok(3)
    }

    async fn search(&self, _request: SearchRequest) -> Result<Vec<ResumeMatch>, IndexingError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _resume_id: &str) -> Result<(), IndexingError> {
        Ok(())
    }
}

struct Harness {
    store: Arc<InMemoryResumeStore>,
    index: Arc<RecordingIndex>,
    metrics: Arc<IntakeMetrics>,
    pipeline: ResumePipeline,
}

fn harness(extracted: Result<&str, &str>, index_fails: bool) -> Harness {
    let store = Arc::new(InMemoryResumeStore::new());
    let index = Arc::new(RecordingIndex {
        fail: index_fails,
        stored: Mutex::new(Vec::new()),
    });
    let metrics = Arc::new(IntakeMetrics::new());
    let pipeline = ResumePipeline::new(
        store.clone(),
        Arc::new(StubExtractor {
            text: extracted.map(str::to_string).map_err(str::to_string),
        }),
        Arc::new(StubSummarizer),
        Arc::new(StubFieldExtractor),
        index.clone(),
        metrics.clone(),
    );
    Harness {
        store,
        index,
        metrics,
        pipeline,
    }
}

async fn seed_pending(store: &InMemoryResumeStore) -> Resume {
    let resume = Resume::new("jane.pdf", "public/resumes/jane.pdf");
    store.save(&resume).await.unwrap();
    resume
}

#[tokio::test]
async fn successful_run_completes_record_with_extracted_fields() {
    let harness = harness(Ok("Jane Doe, Software Engineer, Python, AWS"), false);
    let resume = seed_pending(&harness.store).await;

    harness.pipeline.process(&resume.id).await.expect("pipeline run");

    let record = harness.store.get(&resume.id).await.unwrap().expect("record");
    assert_eq!(record.status, ResumeStatus::Completed);
    assert_eq!(record.fullname, "Jane Doe");
    assert_eq!(record.category, "software_engineer");
    assert_eq!(record.skills, vec!["Python", "AWS"]);
    assert_eq!(record.raw_text, "Jane Doe, Software Engineer, Python, AWS");
    assert!(record.summary.starts_with("- Senior software engineer"));
    assert!(record.updated_at >= record.created_at);

    let snapshot = harness.metrics.snapshot();
    assert_eq!(snapshot.resumes_processed, 1);
    assert_eq!(snapshot.chunks_indexed, 3);
    assert_eq!(snapshot.resumes_failed, 0);
}

#[tokio::test]
async fn indexed_chunks_carry_record_metadata() {
    let harness = harness(Ok("Jane Doe resume body"), false);
    let resume = seed_pending(&harness.store).await;

    harness.pipeline.process(&resume.id).await.expect("pipeline run");

    let stored = harness.index.stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    let (stored_id, stored_text, metadata) = &stored[0];
    assert_eq!(stored_id, &resume.id);
    assert_eq!(stored_text, "Jane Doe resume body");
    assert_eq!(metadata.fullname.as_deref(), Some("Jane Doe"));
    assert_eq!(metadata.file_name.as_deref(), Some("jane.pdf"));
    assert_eq!(
        metadata.skills.as_deref(),
        Some(["Python".to_string(), "AWS".to_string()].as_slice())
    );
}

#[tokio::test]
async fn extraction_failure_rolls_back_to_pending_and_propagates() {
    let harness = harness(Err("scanner offline"), false);
    let resume = seed_pending(&harness.store).await;

    let error = harness
        .pipeline
        .process(&resume.id)
        .await
        .expect_err("extraction failure should propagate");
    assert!(matches!(error, PipelineError::Extraction(_)));

    let record = harness.store.get(&resume.id).await.unwrap().expect("record");
    assert_eq!(record.status, ResumeStatus::Pending);
    assert!(record.fullname.is_empty());
    assert!(harness.index.stored.lock().unwrap().is_empty());
    assert_eq!(harness.metrics.snapshot().resumes_failed, 1);
}

#[tokio::test]
async fn indexing_failure_still_completes_the_record() {
    let harness = harness(Ok("Jane Doe resume body"), true);
    let resume = seed_pending(&harness.store).await;

    harness.pipeline.process(&resume.id).await.expect("pipeline run");

    let record = harness.store.get(&resume.id).await.unwrap().expect("record");
    assert_eq!(record.status, ResumeStatus::Completed);
    assert_eq!(record.fullname, "Jane Doe");
    assert_eq!(record.summary.is_empty(), false);

    let snapshot = harness.metrics.snapshot();
    assert_eq!(snapshot.resumes_processed, 1);
    assert_eq!(snapshot.chunks_indexed, 0);
}

#[tokio::test]
async fn empty_extracted_text_skips_vectorization() {
    let harness = harness(Ok("   \n  "), false);
    let resume = seed_pending(&harness.store).await;

    harness.pipeline.process(&resume.id).await.expect("pipeline run");

    let record = harness.store.get(&resume.id).await.unwrap().expect("record");
    assert_eq!(record.status, ResumeStatus::Completed);
    assert!(harness.index.stored.lock().unwrap().is_empty());
    assert_eq!(harness.metrics.snapshot().chunks_indexed, 0);
}

#[tokio::test]
async fn unknown_resume_id_is_an_error() {
    let harness = harness(Ok("text"), false);

    let error = harness
        .pipeline
        .process("no-such-id")
        .await
        .expect_err("unknown id");
    assert!(matches!(error, PipelineError::NotFound(id) if id == "no-such-id"));
    assert_eq!(harness.metrics.snapshot().resumes_failed, 0);
}
