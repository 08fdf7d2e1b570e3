//! Resume records, the processing status state machine, and the record store seam.
//!
//! The store is an external collaborator: real deployments back it with a database, while
//! the bundled in-memory implementation serves the default binary and the test suite. The
//! pipeline is the only writer while a resume is `processing`; query handlers may read the
//! record at any time and can observe the intermediate status (progress polling is by
//! design). Concurrent runs on the same id are not mutually excluded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Processing status of a resume record.
///
/// Valid transitions: `Pending → Processing → Completed` on success, and
/// `Processing → Pending` when a run fails (allowing re-enqueue). `Completed` is not
/// terminal; a retry drives the record back through `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    /// Not yet processed, or reset after a failed run.
    Pending,
    /// A pipeline run is in flight.
    Processing,
    /// The last run finished successfully.
    Completed,
}

/// One resume: the job unit and its extracted output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    /// Opaque unique identifier.
    pub id: String,
    /// Creation timestamp, RFC3339.
    pub created_at: String,
    /// Last-update timestamp, RFC3339.
    pub updated_at: String,
    /// Original uploaded file name.
    pub file_name: String,
    /// Path of the stored file on disk.
    pub file_path: String,
    /// Extracted full name, empty until processed.
    #[serde(default)]
    pub fullname: String,
    /// Extracted email address.
    #[serde(default)]
    pub email: String,
    /// Extracted phone number.
    #[serde(default)]
    pub phone: String,
    /// Extracted postal address.
    #[serde(default)]
    pub address: String,
    /// Job category assigned by the extractor.
    #[serde(default)]
    pub category: String,
    /// Bullet-point summary produced by the summarizer.
    #[serde(default)]
    pub summary: String,
    /// Raw text recovered from the document.
    #[serde(default)]
    pub raw_text: String,
    /// Extracted skills.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Extracted strengths.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Current processing status.
    pub status: ResumeStatus,
}

impl Resume {
    /// Create a fresh pending record for an uploaded file.
    pub fn new(file_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        let now = now_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now.clone(),
            updated_at: now,
            file_name: file_name.into(),
            file_path: file_path.into(),
            fullname: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            category: String::new(),
            summary: String::new(),
            raw_text: String::new(),
            skills: Vec::new(),
            strengths: Vec::new(),
            status: ResumeStatus::Pending,
        }
    }

    /// Refresh the update timestamp; called before every persist.
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

/// Current timestamp formatted for record storage.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Errors surfaced by record store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend was unreachable or rejected the operation.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for resume records.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Fetch a record by id, `None` when the id does not resolve.
    async fn get(&self, id: &str) -> Result<Option<Resume>, StoreError>;

    /// Insert or replace a record.
    async fn save(&self, resume: &Resume) -> Result<(), StoreError>;

    /// List all records, newest first.
    async fn list(&self) -> Result<Vec<Resume>, StoreError>;

    /// Remove a record, returning whether it existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// In-memory store used by the default binary and tests.
#[derive(Default)]
pub struct InMemoryResumeStore {
    records: RwLock<HashMap<String, Resume>>,
}

impl InMemoryResumeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn get(&self, id: &str) -> Result<Option<Resume>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn save(&self, resume: &Resume) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(resume.id.clone(), resume.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Resume>, StoreError> {
        let mut records: Vec<Resume> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_pending_with_empty_output_fields() {
        let resume = Resume::new("cv.pdf", "public/resumes/cv.pdf");
        assert_eq!(resume.status, ResumeStatus::Pending);
        assert!(resume.fullname.is_empty());
        assert!(resume.skills.is_empty());
        assert!(!resume.id.is_empty());
        assert!(resume.created_at.contains('T'));
    }

    #[tokio::test]
    async fn store_round_trips_and_deletes() {
        let store = InMemoryResumeStore::new();
        let resume = Resume::new("cv.pdf", "public/resumes/cv.pdf");
        store.save(&resume).await.unwrap();

        let loaded = store.get(&resume.id).await.unwrap().expect("record");
        assert_eq!(loaded.file_name, "cv.pdf");

        assert!(store.delete(&resume.id).await.unwrap());
        assert!(!store.delete(&resume.id).await.unwrap());
        assert!(store.get(&resume.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryResumeStore::new();
        let mut first = Resume::new("a.pdf", "public/resumes/a.pdf");
        first.created_at = "2025-01-01T00:00:00Z".into();
        let mut second = Resume::new("b.pdf", "public/resumes/b.pdf");
        second.created_at = "2025-06-01T00:00:00Z".into();
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].file_name, "b.pdf");
    }
}
