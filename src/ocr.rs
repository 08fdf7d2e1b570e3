//! Text extraction adapter backed by an external OCR service.
//!
//! The HTTP flow mirrors the document-OCR services this backend targets: upload the stored
//! file, request a signed URL for it, then run OCR against that URL and concatenate the
//! per-page markdown. Failures propagate to the caller; in the pipeline they are fatal to
//! the run.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors raised while extracting text from a stored file.
#[derive(Debug, Error)]
pub enum OcrError {
    /// Stored file could not be read from disk.
    #[error("Failed to read stored file: {0}")]
    Io(#[from] std::io::Error),
    /// HTTP layer failed before receiving a response.
    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// OCR service responded with an unexpected status code.
    #[error("Unexpected OCR response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the service.
        status: reqwest::StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Converts a stored file into raw text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of the file at `file_path`.
    async fn extract(&self, file_path: &str, file_name: &str) -> Result<String, OcrError>;
}

/// HTTP client for the external OCR service.
pub struct OcrClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct UploadedFile {
    id: String,
}

#[derive(Deserialize)]
struct SignedUrl {
    url: String,
}

#[derive(Deserialize)]
struct OcrOutcome {
    pages: Vec<OcrPage>,
}

#[derive(Deserialize)]
struct OcrPage {
    markdown: String,
}

impl OcrClient {
    /// Construct a client for the given OCR endpoint.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, OcrError> {
        let http = Client::builder().user_agent("applicantbuddy/0.1").build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Construct a client using configuration derived from the environment.
    pub fn from_config() -> Result<Self, OcrError> {
        let config = get_config();
        Self::new(config.ocr_url.clone(), config.ocr_api_key.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) if !key.is_empty() => request.bearer_auth(key),
            _ => request,
        }
    }

    async fn upload_file(&self, file_path: &str, file_name: &str) -> Result<String, OcrError> {
        let bytes = tokio::fs::read(file_path).await?;
        let form = Form::new().text("purpose", "ocr").part(
            "file",
            Part::bytes(bytes).file_name(file_name.to_string()),
        );

        let response = self
            .authorize(self.http.post(self.endpoint("files")))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadedFile = decode(response).await?;
        Ok(uploaded.id)
    }

    async fn signed_url(&self, file_id: &str) -> Result<String, OcrError> {
        let response = self
            .authorize(
                self.http
                    .get(self.endpoint(&format!("files/{file_id}/url"))),
            )
            .send()
            .await?;
        let signed: SignedUrl = decode(response).await?;
        Ok(signed.url)
    }

    async fn run_ocr(&self, document_url: &str) -> Result<String, OcrError> {
        let body = json!({
            "document": {
                "type": "document_url",
                "document_url": document_url,
            }
        });

        let response = self
            .authorize(self.http.post(self.endpoint("ocr")))
            .json(&body)
            .send()
            .await?;
        let outcome: OcrOutcome = decode(response).await?;
        Ok(outcome
            .pages
            .into_iter()
            .map(|page| page.markdown)
            .collect::<Vec<_>>()
            .concat())
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, OcrError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(OcrError::UnexpectedStatus { status, body });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl TextExtractor for OcrClient {
    async fn extract(&self, file_path: &str, file_name: &str) -> Result<String, OcrError> {
        tracing::debug!(file_path, file_name, "Extracting resume text");
        let file_id = self.upload_file(file_path, file_name).await?;
        let url = self.signed_url(&file_id).await?;
        let text = self.run_ocr(&url).await?;
        tracing::debug!(file_name, chars = text.len(), "Text extraction finished");
        Ok(text)
    }
}
