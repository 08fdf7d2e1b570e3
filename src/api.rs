//! HTTP surface for ApplicantBuddy.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /resumes` – Upload a PDF resume. The file is persisted, a pending record is
//!   created, and a pipeline run is enqueued; the reply is `202 Accepted` with the id.
//! - `GET /resumes` – List resume records, newest first.
//! - `GET /resumes/:id` – Fetch one record, including summary and strengths.
//! - `DELETE /resumes/:id` – Remove a record and purge its vectors.
//! - `POST /search` – Semantic search over indexed resume chunks.
//! - `GET /metrics` – Observe intake counters.
//!
//! Processing happens asynchronously: clients poll the record and observe the status
//! move through `pending`, `processing`, and `completed`.

use crate::{
    metrics::IntakeMetrics,
    processing::{IndexingError, ResumeIndex, ResumeMatch, SearchRequest},
    queue::JobQueue,
    resume::{Resume, ResumeStore, StoreError},
};
use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handler state: the record store, vector index, job queue, and metrics.
#[derive(Clone)]
pub struct AppState {
    /// Resume record store.
    pub store: Arc<dyn ResumeStore>,
    /// Vector index operations.
    pub index: Arc<dyn ResumeIndex>,
    /// Pipeline job queue.
    pub queue: Arc<dyn JobQueue>,
    /// Intake counters.
    pub metrics: Arc<IntakeMetrics>,
    /// Directory where uploaded files are persisted.
    pub storage_dir: String,
}

/// Build the HTTP router exposing the resume intake surface.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/resumes", post(upload_resume).get(list_resumes))
        .route("/resumes/:id", get(get_resume).delete(delete_resume))
        .route("/search", post(search_resumes))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Success response for `POST /resumes`.
#[derive(Serialize)]
struct UploadResponse {
    id: String,
    file_name: String,
    status: crate::resume::ResumeStatus,
}

/// Record view returned by the list endpoint.
#[derive(Serialize)]
struct ResumeResponse {
    id: String,
    fullname: String,
    email: String,
    phone: String,
    address: String,
    category: String,
    skills: Vec<String>,
    status: crate::resume::ResumeStatus,
    file_name: String,
    created_at: String,
}

/// Record view returned by the single-resume endpoint.
#[derive(Serialize)]
struct ResumeDetailResponse {
    #[serde(flatten)]
    base: ResumeResponse,
    strengths: Vec<String>,
    summary: String,
}

impl From<&Resume> for ResumeResponse {
    fn from(resume: &Resume) -> Self {
        Self {
            id: resume.id.clone(),
            fullname: resume.fullname.clone(),
            email: resume.email.clone(),
            phone: resume.phone.clone(),
            address: resume.address.clone(),
            category: resume.category.clone(),
            skills: resume.skills.clone(),
            status: resume.status,
            file_name: resume.file_name.clone(),
            created_at: resume.created_at.clone(),
        }
    }
}

impl From<&Resume> for ResumeDetailResponse {
    fn from(resume: &Resume) -> Self {
        Self {
            base: ResumeResponse::from(resume),
            strengths: resume.strengths.clone(),
            summary: resume.summary.clone(),
        }
    }
}

/// Accept a PDF upload, persist it, create a pending record, and enqueue processing.
async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = sanitize_file_name(field.file_name().unwrap_or("resume.pdf"));
        let bytes = field
            .bytes()
            .await
            .map_err(|error| ApiError::BadRequest(error.to_string()))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::BadRequest(
            "multipart field 'file' is required".to_string(),
        ));
    };

    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest(
            "Only PDF files are allowed. File must have .pdf extension.".to_string(),
        ));
    }

    let file_path = format!("{}/{}", state.storage_dir.trim_end_matches('/'), file_name);
    tokio::fs::create_dir_all(&state.storage_dir)
        .await
        .map_err(|error| ApiError::Storage(error.to_string()))?;
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|error| ApiError::Storage(error.to_string()))?;

    let resume = Resume::new(file_name.clone(), file_path);
    state.store.save(&resume).await?;
    state.queue.enqueue(resume.id.clone());
    tracing::info!(resume_id = %resume.id, file_name = %file_name, "Resume uploaded and enqueued");

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            id: resume.id,
            file_name,
            status: resume.status,
        }),
    ))
}

/// List resume records, newest first.
async fn list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeResponse>>, ApiError> {
    let resumes = state.store.list().await?;
    Ok(Json(resumes.iter().map(ResumeResponse::from).collect()))
}

/// Fetch one resume record.
async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeDetailResponse>, ApiError> {
    let resume = state.store.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(ResumeDetailResponse::from(&resume)))
}

/// Remove a record and purge its vector group.
async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete(&id).await? {
        return Err(ApiError::NotFound);
    }
    if let Err(error) = state.index.delete(&id).await {
        // Record deletion wins; orphaned vectors are purged on the next delete or re-index.
        tracing::warn!(resume_id = %id, error = %error, "Failed to purge resume vectors");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Request body for `POST /search`.
#[derive(Deserialize)]
struct SearchBody {
    /// Natural language query.
    query: String,
    /// Optional result cap.
    #[serde(default)]
    limit: Option<usize>,
    /// Optional minimum similarity score.
    #[serde(default)]
    score_threshold: Option<f32>,
}

/// Response body for `POST /search`.
#[derive(Serialize)]
struct SearchResponse {
    results: Vec<ResumeMatch>,
}

/// Semantic search over indexed resume chunks.
async fn search_resumes(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>, ApiError> {
    if body.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let results = state
        .index
        .search(SearchRequest {
            query_text: body.query,
            limit: body.limit,
            score_threshold: body.score_threshold,
        })
        .await?;
    Ok(Json(SearchResponse { results }))
}

/// Return a concise intake metrics snapshot.
async fn get_metrics(
    State(state): State<AppState>,
) -> Json<crate::metrics::MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// Keep uploaded names flat: strip any path components supplied by the client.
fn sanitize_file_name(name: &str) -> String {
    let flattened = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string();
    if flattened.is_empty() {
        "resume.pdf".to_string()
    } else {
        flattened
    }
}

enum ApiError {
    BadRequest(String),
    NotFound,
    Storage(String),
    Store(StoreError),
    Index(IndexingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "resume not found").into_response(),
            Self::Storage(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            Self::Store(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
            }
            Self::Index(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(inner: StoreError) -> Self {
        Self::Store(inner)
    }
}

impl From<IndexingError> for ApiError {
    fn from(inner: IndexingError) -> Self {
        Self::Index(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::MatchMetadata;
    use crate::qdrant::ResumeMetadata;
    use crate::resume::InMemoryResumeStore;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubQueue {
        enqueued: Mutex<Vec<String>>,
    }

    impl JobQueue for StubQueue {
        fn enqueue(&self, resume_id: String) {
            self.enqueued.lock().unwrap().push(resume_id);
        }
    }

    #[derive(Default)]
    struct StubIndex {
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ResumeIndex for StubIndex {
        async fn store(
            &self,
            _resume_id: &str,
            _text: &str,
            _metadata: ResumeMetadata,
        ) -> Result<usize, IndexingError> {
            Ok(1)
        }

        async fn search(
            &self,
            request: SearchRequest,
        ) -> Result<Vec<ResumeMatch>, IndexingError> {
            Ok(vec![ResumeMatch {
                score: 0.87,
                resume_id: "r1".into(),
                chunk_text: Some(format!("match for {}", request.query_text)),
                metadata: MatchMetadata {
                    fullname: Some("Jane Doe".into()),
                    ..Default::default()
                },
            }])
        }

        async fn delete(&self, resume_id: &str) -> Result<(), IndexingError> {
            self.deleted.lock().unwrap().push(resume_id.to_string());
            Ok(())
        }
    }

    struct TestHarness {
        state: AppState,
        queue: Arc<StubQueue>,
        index: Arc<StubIndex>,
        store: Arc<InMemoryResumeStore>,
    }

    fn test_harness() -> TestHarness {
        let store = Arc::new(InMemoryResumeStore::new());
        let queue = Arc::new(StubQueue::default());
        let index = Arc::new(StubIndex::default());
        let storage_dir = std::env::temp_dir()
            .join(format!("applicantbuddy-api-test-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let state = AppState {
            store: store.clone(),
            index: index.clone(),
            queue: queue.clone(),
            metrics: Arc::new(IntakeMetrics::new()),
            storage_dir,
        };
        TestHarness {
            state,
            queue,
            index,
            store,
        }
    }

    fn multipart_pdf_request(file_name: &str) -> Request<Body> {
        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4 fake\r\n--{boundary}--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri("/resumes")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn upload_persists_pending_record_and_enqueues_job() {
        let harness = test_harness();
        let app = create_router(harness.state.clone());

        let response = app
            .oneshot(multipart_pdf_request("jane.pdf"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["file_name"], "jane.pdf");

        let id = json["id"].as_str().unwrap();
        let record = harness.store.get(id).await.unwrap().expect("record saved");
        assert_eq!(record.file_name, "jane.pdf");
        assert_eq!(harness.queue.enqueued.lock().unwrap().as_slice(), [id]);
        assert!(std::fs::metadata(&record.file_path).is_ok());

        let _ = std::fs::remove_dir_all(&harness.state.storage_dir);
    }

    #[tokio::test]
    async fn upload_rejects_non_pdf_extension() {
        let harness = test_harness();
        let app = create_router(harness.state.clone());

        let response = app
            .oneshot(multipart_pdf_request("notes.txt"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(harness.queue.enqueued.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_resume_returns_404_for_unknown_id() {
        let harness = test_harness();
        let app = create_router(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/resumes/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_returns_scored_matches() {
        let harness = test_harness();
        let app = create_router(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/search")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({ "query": "python engineer" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["results"][0]["resume_id"], "r1");
        assert_eq!(json["results"][0]["metadata"]["fullname"], "Jane Doe");
    }

    #[tokio::test]
    async fn delete_removes_record_and_purges_vectors() {
        let harness = test_harness();
        let resume = Resume::new("jane.pdf", "/tmp/jane.pdf");
        harness.store.save(&resume).await.unwrap();
        let app = create_router(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/resumes/{}", resume.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(harness.store.get(&resume.id).await.unwrap().is_none());
        assert_eq!(
            harness.index.deleted.lock().unwrap().as_slice(),
            [resume.id.clone()]
        );
    }
}
